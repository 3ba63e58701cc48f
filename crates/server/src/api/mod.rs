pub mod handlers;
pub mod history;
pub mod middleware;
pub mod preferences;
pub mod routes;
pub mod saved;
pub mod search;

pub use routes::create_router;

use std::sync::Arc;

use axum::{http::StatusCode, Json};
use litscout_core::OpportunityStore;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub(crate) fn internal_error(error: impl std::fmt::Display) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

/// The configured store, or 503 when the server runs without persistence.
pub(crate) fn require_store(state: &AppState) -> Result<&Arc<dyn OpportunityStore>, ApiError> {
    state.store().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "persistence is not configured",
        )
    })
}
