//! End-to-end: catalog, order simulator and gateway on real sockets.

use async_trait::async_trait;
use axum::routing::get;
use axum::Router;
use order_gateway::catalog;
use order_gateway::gateway::{
    self, AuthGuard, Dispatcher, HttpUpstream, Route, RouteTable, StaticServiceDiscovery,
};
use order_gateway::lifecycle::CatalogSystem;
use order_gateway::lookup::HttpProductLookup;
use order_gateway::model::OrderEvent;
use order_gateway::orders::http::OrderState;
use order_gateway::orders::{
    self, ChannelEventSink, DeliveredEvent, EventDestination, EventSink, OrderAggregator,
    OrderEventPublisher, PublishError,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TOKEN: &str = "test-secret";
const TIMEOUT: Duration = Duration::from_secs(5);

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Parses `raw` keeping number literals as written, so `5000.00` only equals `5000.00`.
fn exact_json(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

/// An address nothing listens on.
async fn dead_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl EventSink for FailingSink {
    async fn send(
        &self,
        destination: &EventDestination,
        _event: OrderEvent,
    ) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PublishError::Send {
            destination: destination.to_string(),
            reason: "broker down".to_string(),
        })
    }
}

struct Stack {
    gateway: SocketAddr,
    client: reqwest::Client,
}

impl Stack {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.gateway, path)
    }

    async fn simulate(&self, body: Value, token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.post(self.url("/orders/simulate")).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }
}

/// Catalog and order simulator behind a gateway. `sink` receives order events.
async fn start_stack(sink: Arc<dyn EventSink>) -> Stack {
    let system = CatalogSystem::new();
    system.seed(CatalogSystem::demo_products()).await.unwrap();
    let catalog_addr = serve(catalog::http::router(system.catalog_client.clone())).await;

    let catalog_discovery = Arc::new(StaticServiceDiscovery::new([(
        "products-catalog",
        vec![format!("http://{catalog_addr}")],
    )]));
    let lookup = HttpProductLookup::new(catalog_discovery, "products-catalog", TIMEOUT).unwrap();
    let order_addr = serve(orders::http::router(OrderState {
        aggregator: OrderAggregator::new(Arc::new(lookup)),
        publisher: OrderEventPublisher::new(
            sink,
            EventDestination::new("order.events", "order.created"),
        ),
    }))
    .await;

    let discovery = StaticServiceDiscovery::new([
        ("products-catalog", vec![format!("http://{catalog_addr}")]),
        ("order-simulator", vec![format!("http://{order_addr}")]),
        ("inventory", vec![format!("http://{}", dead_addr().await)]),
    ]);
    let dispatcher = Dispatcher::new(
        AuthGuard::new(TOKEN, vec!["/actuator/health".to_string()]),
        RouteTable::new(vec![
            Route::new("/products/**", "products-catalog"),
            Route::new("/orders/**", "order-simulator"),
            Route::new("/inventory/**", "inventory"),
            Route::new("/unregistered/**", "nowhere"),
        ]),
        Arc::new(discovery),
        Arc::new(HttpUpstream::new(TIMEOUT).unwrap()),
    );
    let gateway = serve(gateway::http::router(Arc::new(dispatcher))).await;

    Stack {
        gateway,
        client: reqwest::Client::new(),
    }
}

async fn start_with_channel() -> (Stack, mpsc::Receiver<DeliveredEvent>) {
    let (sink, receiver) = ChannelEventSink::new(16);
    (start_stack(Arc::new(sink)).await, receiver)
}

#[tokio::test]
async fn test_health_is_public_whatever_the_header() {
    let (stack, _events) = start_with_channel().await;

    for header in [None, Some("Bearer wrong"), Some("garbage")] {
        let mut request = stack.client.get(stack.url("/actuator/health"));
        if let Some(value) = header {
            request = request.header("Authorization", value);
        }
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "header {header:?}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"status": "UP"}));
    }
}

#[tokio::test]
async fn test_missing_or_malformed_credentials_are_401() {
    let (stack, mut events) = start_with_channel().await;

    let response = stack.simulate(json!([1]), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = stack
        .client
        .post(stack.url("/orders/simulate"))
        .header("Authorization", format!("Token {TOKEN}"))
        .json(&json!([1]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Nothing reached the order simulator
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_wrong_token_is_403() {
    let (stack, mut events) = start_with_channel().await;

    let response = stack.simulate(json!([1]), Some("not-the-secret")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_simulate_through_gateway() {
    let (stack, mut events) = start_with_channel().await;

    let response = stack.simulate(json!([1, 2, 99, 2]), Some(TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        exact_json(
            r#"{
                "items": [
                    {"productId": 1, "quantity": 1, "unitPrice": 5000.00},
                    {"productId": 2, "quantity": 1, "unitPrice": 150.00},
                    {"productId": 2, "quantity": 1, "unitPrice": 150.00}
                ],
                "totalAmount": 5300.00,
                "productsNotFound": [99]
            }"#
        )
    );
    assert!(body["totalAmount"].is_number());

    let delivered = tokio::time::timeout(TIMEOUT, events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(delivered.destination.routing_key, "order.created");
    let published: Value = serde_json::from_str(&delivered.event.serialized_order).unwrap();
    assert_eq!(published, body);
}

#[tokio::test]
async fn test_empty_basket() {
    let (stack, _events) = start_with_channel().await;

    let response = stack.simulate(json!([]), Some(TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        exact_json(r#"{"items": [], "totalAmount": 0.00, "productsNotFound": []}"#)
    );
    assert_eq!(body["totalAmount"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_publish_failure_leaves_response_unchanged() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let stack = start_stack(Arc::new(FailingSink {
        attempts: attempts.clone(),
    }))
    .await;

    let response = stack.simulate(json!([1, 99]), Some(TOKEN)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        exact_json(
            r#"{
                "items": [{"productId": 1, "quantity": 1, "unitPrice": 5000.00}],
                "totalAmount": 5000.00,
                "productsNotFound": [99]
            }"#
        )
    );

    // The attempt happens in the background, once
    for _ in 0..50 {
        if attempts.load(Ordering::SeqCst) > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_catalog_routes_through_gateway() {
    let (stack, _events) = start_with_channel().await;

    let response = stack
        .client
        .get(stack.url("/products/1"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product: Value = response.json().await.unwrap();
    assert_eq!(product["name"], "Notebook");
    assert!(product["price"].is_number());
    assert_eq!(product["price"].to_string(), "5000.00");

    let response = stack
        .client
        .get(stack.url("/products/404"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = stack
        .client
        .get(stack.url("/orders/available-products"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Value> = response.json().await.unwrap();
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn test_unknown_path_is_404_after_admission() {
    let (stack, _events) = start_with_channel().await;

    let response = stack.client.get(stack.url("/users/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = stack
        .client
        .get(stack.url("/users/1"))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_upstream_is_503() {
    let (stack, _events) = start_with_channel().await;

    for path in ["/inventory/items", "/unregistered/x"] {
        let response = stack
            .client
            .get(stack.url(path))
            .bearer_auth(TOKEN)
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::SERVICE_UNAVAILABLE,
            "path {path}"
        );
    }
}

/// An order simulator whose catalog lives at `catalog_url`.
async fn order_service(catalog_url: String) -> (SocketAddr, mpsc::Receiver<DeliveredEvent>) {
    let catalog_discovery = Arc::new(StaticServiceDiscovery::new([(
        "products-catalog",
        vec![catalog_url],
    )]));
    let lookup = HttpProductLookup::new(catalog_discovery, "products-catalog", TIMEOUT).unwrap();
    let (sink, events) = ChannelEventSink::new(4);
    let order_addr = serve(orders::http::router(OrderState {
        aggregator: OrderAggregator::new(Arc::new(lookup)),
        publisher: OrderEventPublisher::new(
            Arc::new(sink),
            EventDestination::new("order.events", "order.created"),
        ),
    }))
    .await;
    (order_addr, events)
}

/// Posts a basket straight to the order simulator and expects a 503 with no event.
async fn assert_simulation_unavailable(
    order_addr: SocketAddr,
    mut events: mpsc::Receiver<DeliveredEvent>,
) {
    let response = reqwest::Client::new()
        .post(format!("http://{order_addr}/orders/simulate"))
        .json(&json!([1, 2]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(events.try_recv().is_err(), "No event for an aborted simulation");
}

#[tokio::test]
async fn test_unreachable_catalog_fails_simulation_with_503() {
    let (order_addr, events) = order_service(format!("http://{}", dead_addr().await)).await;
    assert_simulation_unavailable(order_addr, events).await;
}

#[tokio::test]
async fn test_failing_catalog_fails_simulation_with_503() {
    let catalog = Router::new().route(
        "/products/:id",
        get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let catalog_addr = serve(catalog).await;

    let (order_addr, events) = order_service(format!("http://{catalog_addr}")).await;
    assert_simulation_unavailable(order_addr, events).await;
}

#[tokio::test]
async fn test_garbled_catalog_answer_fails_simulation_with_503() {
    let catalog = Router::new().route(
        "/products/:id",
        get(|| async { (axum::http::StatusCode::OK, "{\"id\": 1, \"price\":") }),
    );
    let catalog_addr = serve(catalog).await;

    let (order_addr, events) = order_service(format!("http://{catalog_addr}")).await;
    assert_simulation_unavailable(order_addr, events).await;
}
