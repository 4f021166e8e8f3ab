//! # Route Table
//!
//! An ordered list of path patterns, each naming the logical service that owns it.
//! Resolution walks the list in registration order and the first match wins. There is no
//! longest-match tie-break: if two patterns overlap, the one registered later is never
//! reached for the overlapping paths. [`RouteTable::new`] logs such shadowed routes at
//! `warn` but keeps them as configured.
//!
//! Pattern syntax:
//! - `/orders/**` matches `/orders` and anything below `/orders/`, but not `/ordersx`.
//! - Any other pattern is a plain prefix.

use tracing::warn;

const WILDCARD_SUFFIX: &str = "/**";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: String,
    pub service: String,
}

impl Route {
    pub fn new(pattern: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            service: service.into(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self.pattern.strip_suffix(WILDCARD_SUFFIX) {
            Some(base) => match path.strip_prefix(base) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
            None => path.starts_with(self.pattern.as_str()),
        }
    }

    fn base(&self) -> &str {
        self.pattern
            .strip_suffix(WILDCARD_SUFFIX)
            .unwrap_or(&self.pattern)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        for (i, later) in routes.iter().enumerate() {
            if let Some(earlier) = routes[..i].iter().find(|r| r.matches(later.base())) {
                warn!(
                    shadowed = %later.pattern,
                    by = %earlier.pattern,
                    "Route is shadowed by an earlier pattern"
                );
            }
        }
        Self { routes }
    }

    /// Logical service owning `path`, `None` when no pattern matches.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|route| route.matches(path))
            .map(|route| route.service.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new(vec![
            Route::new("/products/**", "products-catalog"),
            Route::new("/orders/**", "order-simulator"),
        ])
    }

    #[test]
    fn resolves_wildcard_prefixes() {
        let table = table();
        assert_eq!(table.resolve("/products"), Some("products-catalog"));
        assert_eq!(table.resolve("/products/7"), Some("products-catalog"));
        assert_eq!(table.resolve("/orders/simulate"), Some("order-simulator"));
        assert_eq!(
            table.resolve("/orders/available-products"),
            Some("order-simulator")
        );
    }

    #[test]
    fn wildcard_respects_segment_boundary() {
        assert_eq!(table().resolve("/ordersx"), None);
        assert_eq!(table().resolve("/productsfoo/1"), None);
    }

    #[test]
    fn unmatched_path_has_no_route() {
        assert_eq!(table().resolve("/users/1"), None);
        assert_eq!(table().resolve("/"), None);
    }

    #[test]
    fn first_registered_match_wins() {
        let table = RouteTable::new(vec![
            Route::new("/orders/**", "order-simulator"),
            Route::new("/orders/admin/**", "admin"),
        ]);
        assert_eq!(table.resolve("/orders/admin/x"), Some("order-simulator"));

        let reversed = RouteTable::new(vec![
            Route::new("/orders/admin/**", "admin"),
            Route::new("/orders/**", "order-simulator"),
        ]);
        assert_eq!(reversed.resolve("/orders/admin/x"), Some("admin"));
        assert_eq!(reversed.resolve("/orders/simulate"), Some("order-simulator"));
    }

    #[test]
    fn plain_pattern_is_a_raw_prefix() {
        let table = RouteTable::new(vec![Route::new("/api", "api")]);
        assert_eq!(table.resolve("/api/v1"), Some("api"));
        assert_eq!(table.resolve("/apix"), Some("api"));
    }
}
