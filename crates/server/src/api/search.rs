//! Search API handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use litscout_core::{FilterConfig, PipelineError, SearchOutcome, SearchRequest, SortSpec};
use serde::Deserialize;
use tracing::debug;

use super::{api_error, middleware::Caller, ApiError};
use crate::state::AppState;

/// Body of `POST /api/v1/search`. The caller comes from the session header.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub sort: SortSpec,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SearchBody {
    fn into_request(self, caller: String) -> SearchRequest {
        let mut request = SearchRequest::new(self.sources, self.query)
            .with_keywords(self.keywords)
            .with_filters(self.filters)
            .with_sort(self.sort.key, self.sort.direction)
            .with_caller(caller);
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }
        request
    }
}

/// POST /api/v1/search
///
/// Run one search across the selected sources.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchOutcome>, ApiError> {
    debug!(caller = %caller, sources = ?body.sources, "Search requested");

    match state.pipeline().run_search(body.into_request(caller)).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(PipelineError::InvalidRequest(message)) => {
            Err(api_error(StatusCode::BAD_REQUEST, message))
        }
    }
}
