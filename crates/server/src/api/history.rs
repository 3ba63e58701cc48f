//! Search history handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use litscout_core::HistoryEntry;
use serde::{Deserialize, Serialize};

use super::{internal_error, middleware::Caller, require_store, ApiError};
use crate::state::AppState;

const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub removed: usize,
}

/// GET /api/v1/history
///
/// The caller's most recent searches, newest first.
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let store = require_store(&state)?;
    let limit = params.limit.min(MAX_LIMIT);

    let entries = store
        .search_history(&caller, limit)
        .map_err(internal_error)?;
    let total = entries.len();
    Ok(Json(HistoryResponse { entries, total }))
}

/// DELETE /api/v1/history
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<ClearHistoryResponse>, ApiError> {
    let store = require_store(&state)?;
    let removed = store.clear_history(&caller).map_err(internal_error)?;
    Ok(Json(ClearHistoryResponse { removed }))
}
