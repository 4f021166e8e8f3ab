//! Gateway HTTP surface: its own health path, everything else through the [`Dispatcher`].

use crate::gateway::dispatcher::Dispatcher;
use crate::gateway::GatewayRequest;
use crate::health::{health, HEALTH_PATH};
use axum::body::{self, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::warn;

/// Largest request body the gateway will buffer before forwarding.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .fallback(route_request)
        .with_state(dispatcher)
}

async fn route_request(
    State(dispatcher): State<Arc<Dispatcher>>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let mut request =
        GatewayRequest::new(parts.method, parts.uri.path(), parts.headers, Bytes::new())
            .with_query(parts.uri.query());

    // The guard sees headers only; rejected bodies are never read
    if let Err(rejected) = dispatcher.admit(&request) {
        return rejected.into_response();
    }

    request.body = match body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Failed to read request body");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };
    dispatcher.forward_admitted(request).await.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::auth::AuthGuard;
    use crate::gateway::discovery::StaticServiceDiscovery;
    use crate::gateway::forward::{ForwardError, Upstream, UpstreamResponse};
    use crate::gateway::routes::{Route, RouteTable};
    use async_trait::async_trait;
    use axum::http::header::AUTHORIZATION;
    use axum::http::{Method, Request as HttpRequest};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Records the body length of every forwarded request.
    #[derive(Default)]
    struct BodyRecorder {
        lengths: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Upstream for BodyRecorder {
        async fn forward(
            &self,
            _base_url: &str,
            request: &GatewayRequest,
        ) -> Result<UpstreamResponse, ForwardError> {
            self.lengths.lock().unwrap().push(request.body.len());
            Ok(UpstreamResponse::new(StatusCode::OK, "forwarded"))
        }
    }

    fn app(upstream: Arc<BodyRecorder>) -> Router {
        let dispatcher = Dispatcher::new(
            AuthGuard::new("s3cret", vec![HEALTH_PATH.to_string()]),
            RouteTable::new(vec![Route::new("/orders/**", "order-simulator")]),
            Arc::new(StaticServiceDiscovery::new([(
                "order-simulator",
                vec!["http://orders"],
            )])),
            upstream,
        );
        router(Arc::new(dispatcher))
    }

    fn post(token: Option<&str>, body_len: usize) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder()
            .method(Method::POST)
            .uri("/orders/simulate");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(vec![b' '; body_len])).unwrap()
    }

    const OVERSIZED: usize = 3 * 1024 * 1024;

    #[tokio::test]
    async fn test_oversized_body_without_credentials_is_401() {
        let upstream = Arc::new(BodyRecorder::default());

        let response = app(upstream.clone())
            .oneshot(post(None, OVERSIZED))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(upstream.lengths.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_with_wrong_token_is_403() {
        let upstream = Arc::new(BodyRecorder::default());

        let response = app(upstream.clone())
            .oneshot(post(Some("nope"), OVERSIZED))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(upstream.lengths.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_after_admission_is_413() {
        let upstream = Arc::new(BodyRecorder::default());

        let response = app(upstream.clone())
            .oneshot(post(Some("s3cret"), OVERSIZED))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(upstream.lengths.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admitted_body_is_forwarded_whole() {
        let upstream = Arc::new(BodyRecorder::default());

        let response = app(upstream.clone())
            .oneshot(post(Some("s3cret"), 1024))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*upstream.lengths.lock().unwrap(), vec![1024]);
    }

    #[tokio::test]
    async fn test_health_is_served_locally() {
        let upstream = Arc::new(BodyRecorder::default());

        let request = HttpRequest::builder()
            .uri(HEALTH_PATH)
            .body(Body::empty())
            .unwrap();
        let response = app(upstream.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(upstream.lengths.lock().unwrap().is_empty());
    }
}
