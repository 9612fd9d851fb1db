//! Admin endpoints, all behind the shared ingestion secret

pub mod cache;
pub mod ingest;

use axum::routing::{get, post};
use axum::Router;

use super::state::AppState;

/// Create the admin router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(ingest::trigger_ingest))
        .route("/ingest/status", get(ingest::ingest_status))
        .route("/cache/clear", post(cache::clear_cache))
        .route("/cache/stats", get(cache::cache_stats))
}
