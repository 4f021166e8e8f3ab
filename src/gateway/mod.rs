//! # API Gateway
//!
//! Single entry point in front of the backend services. Every request is checked by the
//! [`AuthGuard`] before anything else, then routed by path to a logical service and
//! forwarded to one of its instances.
//!
//! ## Structure
//!
//! - [`auth`] - shared-secret bearer check with a public-path allowlist
//! - [`routes`] - ordered, first-match path table
//! - [`discovery`] - logical service name to instance URL
//! - [`forward`] - HTTP forwarding to the chosen instance
//! - [`dispatcher`] - the guard → route → forward pipeline
//! - [`http`] - axum router wrapping the dispatcher

pub mod auth;
pub mod discovery;
pub mod dispatcher;
pub mod forward;
pub mod http;
pub mod routes;

pub use auth::{AuthDecision, AuthGuard};
pub use discovery::{ServiceDiscovery, StaticServiceDiscovery};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use forward::{ForwardError, HttpUpstream, Upstream, UpstreamResponse};
pub use routes::{Route, RouteTable};

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};

/// An inbound request as the gateway sees it. Header names are case-insensitive.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayRequest {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HeaderMap,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers,
            body: body.into(),
        }
    }

    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.map(str::to_string);
        self
    }
}
