//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use fileshelf_core::MAX_CONTENT_SIZE;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health_check))
        // Generic command endpoint, verb names match the dispatcher's
        .route("/v1/commands/{verb}", post(handlers::run_command))
        .route(
            "/v1/files",
            get(handlers::fetch_by_location)
                .put(handlers::store_at_location)
                .delete(handlers::delete_by_location),
        )
        .route(
            "/v1/files/{id}",
            get(handlers::fetch_by_id).delete(handlers::delete_by_id),
        )
        // One byte over the content limit so oversized payloads reach validation
        .layer(DefaultBodyLimit::max(MAX_CONTENT_SIZE + 1))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
