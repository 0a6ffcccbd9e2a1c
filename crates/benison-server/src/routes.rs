//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

/// Create the service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/auth/bless",
            get(handlers::bless_query).post(handlers::bless_form),
        )
        .route("/blessing-root", get(handlers::blessing_root))
        .route("/stats/blessings", get(handlers::blessing_stats))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
