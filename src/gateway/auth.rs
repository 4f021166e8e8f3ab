//! # Ingress Guard
//!
//! Decides, once per request, whether the gateway may go on to routing.
//!
//! Evaluation order:
//! 1. A path containing any public-endpoint entry is bypassed, whatever headers it carries.
//! 2. No `Authorization` header, or one not starting with `"Bearer "`, is unauthorized.
//! 3. A bearer token different from the configured secret is forbidden.
//! 4. Otherwise the request is admitted.
//!
//! The guard holds one shared secret handed in at construction. There are no per-user
//! tokens, expiry or signatures. The token check is a plain string comparison.

use crate::gateway::GatewayRequest;
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use tracing::{debug, warn};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Outcome of the guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Public path; credentials were not examined.
    Bypass,
    /// Missing or malformed credential.
    Unauthorized,
    /// Credential present but not the configured secret.
    Forbidden,
    /// Credential matches.
    Admit,
}

impl AuthDecision {
    /// Whether the request may continue to routing.
    pub fn allows(self) -> bool {
        matches!(self, AuthDecision::Bypass | AuthDecision::Admit)
    }

    /// Terminal HTTP status for a rejection, `None` when the request may continue.
    pub fn rejection_status(self) -> Option<StatusCode> {
        match self {
            AuthDecision::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            AuthDecision::Forbidden => Some(StatusCode::FORBIDDEN),
            AuthDecision::Bypass | AuthDecision::Admit => None,
        }
    }
}

#[derive(Clone)]
pub struct AuthGuard {
    secret: String,
    public_paths: Vec<String>,
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard")
            .field("secret", &"<redacted>")
            .field("public_paths", &self.public_paths)
            .finish()
    }
}

impl AuthGuard {
    pub fn new(secret: impl Into<String>, public_paths: Vec<String>) -> Self {
        Self {
            secret: secret.into(),
            public_paths,
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths
            .iter()
            .any(|public| path.contains(public.as_str()))
    }

    pub fn decide(&self, request: &GatewayRequest) -> AuthDecision {
        let path = request.path.as_str();
        if self.is_public(path) {
            debug!(%path, "Public endpoint, skipping credential check");
            return AuthDecision::Bypass;
        }

        let Some(header) = request
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            debug!(%path, "Missing Authorization header");
            return AuthDecision::Unauthorized;
        };

        let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
            warn!(%path, "Invalid Authorization header format");
            return AuthDecision::Unauthorized;
        };

        if token != self.secret {
            warn!(%path, "Bearer token rejected");
            return AuthDecision::Forbidden;
        }

        AuthDecision::Admit
    }
}
