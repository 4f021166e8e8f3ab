use crate::lookup::LookupError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that abort a whole simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] LookupError),
    #[error("Order total overflowed")]
    TotalOverflow,
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = match self {
            OrderError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            OrderError::TotalOverflow => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, self.to_string()).into_response()
    }
}
