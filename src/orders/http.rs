//! Order simulator HTTP surface.
//!
//! - `POST /orders/simulate` with a JSON array of ids → 200 with the [`SimulatedOrder`]
//! - `GET /orders/available-products` → 200 with the catalog listing
//!
//! A catalog that cannot be reached answers 503 on both.

use crate::health::{health, HEALTH_PATH};
use crate::model::{ProductId, ProductRecord, SimulatedOrder};
use crate::orders::{OrderAggregator, OrderError, OrderEventPublisher};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

#[derive(Clone)]
pub struct OrderState {
    pub aggregator: OrderAggregator,
    pub publisher: OrderEventPublisher,
}

pub fn router(state: OrderState) -> Router {
    Router::new()
        .route("/orders/simulate", post(simulate))
        .route("/orders/available-products", get(available_products))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

async fn simulate(
    State(state): State<OrderState>,
    Json(ids): Json<Vec<ProductId>>,
) -> Result<Json<SimulatedOrder>, OrderError> {
    let order = state.aggregator.simulate(&ids).await?;
    // Not awaited: delivery must not hold up or change the response
    state.publisher.publish(&order);
    Ok(Json(order))
}

async fn available_products(
    State(state): State<OrderState>,
) -> Result<Json<Vec<ProductRecord>>, OrderError> {
    Ok(Json(state.aggregator.available_products().await?))
}
