use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, history, middleware::metrics_middleware, preferences, saved, search};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/sources", get(handlers::list_sources))
        // Search
        .route("/search", post(search::search))
        // History
        .route("/history", get(history::list_history).delete(history::clear_history))
        // Saved opportunities
        .route("/saved", get(saved::list_saved).post(saved::save))
        .route("/saved/{id}", delete(saved::remove))
        // Preferences
        .route(
            "/preferences",
            get(preferences::get_preferences).put(preferences::put_preferences),
        )
        .route("/stats", get(handlers::get_stats))
        .with_state(Arc::clone(&state));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
