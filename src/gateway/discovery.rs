//! # Service Discovery
//!
//! Maps a logical service name (`"order-simulator"`) to the base URL of one live instance.
//! Names are case-insensitive. The static registry rotates through the instances of a
//! service round-robin, one per call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Service discovery abstraction
pub trait ServiceDiscovery: Send + Sync {
    /// Every known base URL for `service`, empty when none is registered.
    fn instances(&self, service: &str) -> Vec<String>;

    /// Base URL of the instance the next request to `service` should go to.
    fn next_instance(&self, service: &str) -> Option<String>;
}

struct Pool {
    urls: Vec<String>,
    cursor: AtomicUsize,
}

/// Fixed registry built from configuration.
#[derive(Default)]
pub struct StaticServiceDiscovery {
    services: HashMap<String, Pool>,
}

impl StaticServiceDiscovery {
    pub fn new<I, S, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<U>)>,
        S: AsRef<str>,
        U: Into<String>,
    {
        let mut services = HashMap::new();
        for (name, urls) in entries {
            let urls: Vec<String> = urls
                .into_iter()
                .map(|u| u.into().trim_end_matches('/').to_string())
                .collect();
            services.insert(
                normalize(name.as_ref()),
                Pool {
                    urls,
                    cursor: AtomicUsize::new(0),
                },
            );
        }
        Self { services }
    }
}

impl ServiceDiscovery for StaticServiceDiscovery {
    fn instances(&self, service: &str) -> Vec<String> {
        self.services
            .get(&normalize(service))
            .map(|pool| pool.urls.clone())
            .unwrap_or_default()
    }

    fn next_instance(&self, service: &str) -> Option<String> {
        let pool = self.services.get(&normalize(service))?;
        if pool.urls.is_empty() {
            return None;
        }
        let slot = pool.cursor.fetch_add(1, Ordering::Relaxed) % pool.urls.len();
        let url = pool.urls[slot].clone();
        debug!(%service, %url, "Selected instance");
        Some(url)
    }
}

fn normalize(service: &str) -> String {
    service.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_service_has_no_instance() {
        let discovery = StaticServiceDiscovery::new([("products-catalog", vec!["http://a"])]);
        assert_eq!(discovery.next_instance("order-simulator"), None);
        assert!(discovery.instances("order-simulator").is_empty());
    }

    #[test]
    fn empty_pool_has_no_instance() {
        let discovery = StaticServiceDiscovery::new([("order-simulator", Vec::<String>::new())]);
        assert_eq!(discovery.next_instance("order-simulator"), None);
    }

    #[test]
    fn names_are_case_insensitive() {
        let discovery = StaticServiceDiscovery::new([("ORDER-SIMULATOR", vec!["http://a/"])]);
        assert_eq!(
            discovery.next_instance("order-simulator").as_deref(),
            Some("http://a")
        );
        assert_eq!(discovery.instances("Order-Simulator"), vec!["http://a"]);
    }

    #[test]
    fn instances_rotate_round_robin() {
        let discovery =
            StaticServiceDiscovery::new([("products-catalog", vec!["http://a", "http://b"])]);
        let picks: Vec<_> = (0..4)
            .filter_map(|_| discovery.next_instance("products-catalog"))
            .collect();
        assert_eq!(picks, vec!["http://a", "http://b", "http://a", "http://b"]);
    }
}
