//! Saved opportunity handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use litscout_core::{OpportunityRecord, SavedOpportunity};
use serde::Serialize;
use tracing::info;

use super::{api_error, internal_error, middleware::Caller, require_store, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SavedListResponse {
    pub saved: Vec<SavedOpportunity>,
    pub total: usize,
}

/// GET /api/v1/saved
pub async fn list_saved(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<SavedListResponse>, ApiError> {
    let store = require_store(&state)?;
    let saved = store.saved_opportunities(&caller).map_err(internal_error)?;
    let total = saved.len();
    Ok(Json(SavedListResponse { saved, total }))
}

/// POST /api/v1/saved
///
/// Keep a search result for later.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(record): Json<OpportunityRecord>,
) -> Result<(StatusCode, Json<SavedOpportunity>), ApiError> {
    let store = require_store(&state)?;
    if record.title.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "record title is empty"));
    }

    let saved = store
        .save_opportunity(&caller, &record)
        .map_err(internal_error)?;
    info!(caller = %caller, id = %saved.id, "Saved opportunity");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/v1/saved/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = require_store(&state)?;
    match store.remove_saved(&caller, &id) {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Saved opportunity not found: {}", id),
        )),
        Err(e) => Err(internal_error(e)),
    }
}
