//! Per-caller preference handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use litscout_core::UserPreferences;

use super::{internal_error, middleware::Caller, require_store, ApiError};
use crate::state::AppState;

/// GET /api/v1/preferences
///
/// Saved preferences, or the defaults when the caller has none.
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> Result<Json<UserPreferences>, ApiError> {
    let store = require_store(&state)?;
    let preferences = store.preferences(&caller).map_err(internal_error)?;
    Ok(Json(preferences.unwrap_or_default()))
}

/// PUT /api/v1/preferences
pub async fn put_preferences(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(preferences): Json<UserPreferences>,
) -> Result<Json<UserPreferences>, ApiError> {
    let store = require_store(&state)?;
    store
        .save_preferences(&caller, &preferences)
        .map(Json)
        .map_err(internal_error)
}
