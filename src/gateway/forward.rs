//! # Upstream Forwarding
//!
//! Sends an admitted request to one instance of a backend service and brings the answer
//! back. Status, end-to-end headers and body from the upstream are relayed as-is; only a
//! transport failure (refused connection, timeout) is an error. Hop-by-hop headers belong
//! to a single connection and are dropped in both directions.

use crate::gateway::GatewayRequest;
use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::header::{CONNECTION, HOST, TE, TRAILER, TRANSFER_ENCODING, UPGRADE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("Failed to build upstream client: {0}")]
    Client(String),
}

/// What came back from the upstream.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Headers scoped to one connection (RFC 9110 section 7.6.1).
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "keep-alive" | "proxy-connection" | "proxy-authenticate" | "proxy-authorization"
    ) || [CONNECTION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE].contains(name)
}

/// Copy of `headers` without hop-by-hop headers, including any named by `Connection`.
fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let listed: Vec<String> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .collect();

    let mut kept = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if is_hop_by_hop(name) || listed.iter().any(|token| token == name.as_str()) {
            continue;
        }
        kept.append(name.clone(), value.clone());
    }
    kept
}

#[async_trait]
pub trait Upstream: Send + Sync {
    /// Forward `request` to the instance rooted at `base_url`.
    async fn forward(
        &self,
        base_url: &str,
        request: &GatewayRequest,
    ) -> Result<UpstreamResponse, ForwardError>;
}

/// Forwards over HTTP with a shared pooled client.
#[derive(Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new(timeout: Duration) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ForwardError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn forward(
        &self,
        base_url: &str,
        request: &GatewayRequest,
    ) -> Result<UpstreamResponse, ForwardError> {
        let url = match &request.query {
            Some(query) => format!("{}{}?{}", base_url, request.path, query),
            None => format!("{}{}", base_url, request.path),
        };

        let mut builder = self.client.request(request.method.clone(), &url);
        // Host is set by reqwest for the target
        for (name, value) in end_to_end_headers(&request.headers).iter() {
            if *name != HOST {
                builder = builder.header(name, value);
            }
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let transport = |e: reqwest::Error| ForwardError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        };
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        let headers = end_to_end_headers(response.headers());
        let body = response.bytes().await.map_err(transport)?;

        debug!(%url, %status, "Upstream answered");
        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
