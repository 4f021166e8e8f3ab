//! # Dispatcher
//!
//! The gateway's request pipeline: guard, then route, then forward. [`Dispatcher::admit`]
//! is the guard step on its own, [`Dispatcher::forward_admitted`] the rest.
//!
//! ```text
//! request ──► AuthGuard ──► Unauthorized / Forbidden ──► Rejected (no upstream contact)
//!                 │
//!                 └─ Bypass / Admit ──► RouteTable ──► no match ──► NoRoute
//!                                           │
//!                                           └─ service ──► discovery ──► none ──► ServiceUnavailable
//!                                                              │
//!                                                              └─ base url ──► Upstream ──► Forwarded
//!                                                                                 │
//!                                                                                 └─ transport error ──► ServiceUnavailable
//! ```

use crate::gateway::auth::{AuthDecision, AuthGuard};
use crate::gateway::discovery::ServiceDiscovery;
use crate::gateway::forward::{Upstream, UpstreamResponse};
use crate::gateway::routes::RouteTable;
use crate::gateway::GatewayRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[derive(Debug)]
pub enum DispatchOutcome {
    /// The upstream answered; its response is relayed verbatim.
    Forwarded(UpstreamResponse),
    /// The guard stopped the request. Only `Unauthorized` or `Forbidden`.
    Rejected(AuthDecision),
    NoRoute,
    ServiceUnavailable { service: String },
}

impl IntoResponse for DispatchOutcome {
    fn into_response(self) -> Response {
        match self {
            DispatchOutcome::Forwarded(upstream) => upstream.into_response(),
            DispatchOutcome::Rejected(decision) => decision
                .rejection_status()
                .unwrap_or(StatusCode::FORBIDDEN)
                .into_response(),
            DispatchOutcome::NoRoute => StatusCode::NOT_FOUND.into_response(),
            DispatchOutcome::ServiceUnavailable { service } => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Service {service} is unavailable"),
            )
                .into_response(),
        }
    }
}

pub struct Dispatcher {
    guard: AuthGuard,
    routes: RouteTable,
    discovery: Arc<dyn ServiceDiscovery>,
    upstream: Arc<dyn Upstream>,
}

impl Dispatcher {
    pub fn new(
        guard: AuthGuard,
        routes: RouteTable,
        discovery: Arc<dyn ServiceDiscovery>,
        upstream: Arc<dyn Upstream>,
    ) -> Self {
        Self {
            guard,
            routes,
            discovery,
            upstream,
        }
    }

    /// Runs the guard alone. It needs only the method, path and headers, so callers can
    /// reject a request before reading its body.
    pub fn admit(&self, request: &GatewayRequest) -> Result<AuthDecision, DispatchOutcome> {
        let decision = self.guard.decide(request);
        if decision.allows() {
            Ok(decision)
        } else {
            Err(DispatchOutcome::Rejected(decision))
        }
    }

    pub async fn dispatch(&self, request: GatewayRequest) -> DispatchOutcome {
        if let Err(rejected) = self.admit(&request) {
            return rejected;
        }
        self.forward_admitted(request).await
    }

    /// Routes and forwards a request that already passed [`Dispatcher::admit`].
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn forward_admitted(&self, request: GatewayRequest) -> DispatchOutcome {
        let Some(service) = self.routes.resolve(&request.path) else {
            debug!("No route");
            return DispatchOutcome::NoRoute;
        };

        let Some(base_url) = self.discovery.next_instance(service) else {
            error!(%service, "No instance registered");
            return DispatchOutcome::ServiceUnavailable {
                service: service.to_string(),
            };
        };

        match self.upstream.forward(&base_url, &request).await {
            Ok(response) => DispatchOutcome::Forwarded(response),
            Err(e) => {
                error!(%service, %base_url, error = %e, "Failed to forward request to service");
                DispatchOutcome::ServiceUnavailable {
                    service: service.to_string(),
                }
            }
        }
    }
}
