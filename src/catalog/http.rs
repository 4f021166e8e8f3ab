//! Read-only HTTP surface of the in-memory catalog.
//!
//! - `GET /products` → 200 with the listing, or 204 when the catalog is empty
//! - `GET /products/:id` → 200 with the record, or 404

use crate::catalog::CatalogClient;
use crate::health::{health, HEALTH_PATH};
use crate::lookup::{Lookup, LookupError, ProductLookup};
use crate::model::ProductId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::error;

pub fn router(catalog: CatalogClient) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route(HEALTH_PATH, get(health))
        .with_state(catalog)
}

async fn list_products(State(catalog): State<CatalogClient>) -> Response {
    match catalog.list().await {
        Ok(products) if products.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(products) => Json(products).into_response(),
        Err(e) => unavailable(e),
    }
}

async fn get_product(State(catalog): State<CatalogClient>, Path(id): Path<u64>) -> Response {
    match catalog.find(ProductId(id)).await {
        Ok(Lookup::Found(product)) => Json(product).into_response(),
        Ok(Lookup::NotFound) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => unavailable(e),
    }
}

fn unavailable(e: LookupError) -> Response {
    error!(error = %e, "Catalog actor unavailable");
    (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
}
