//! Administrative cache operations
//!
//! The only way entries ever leave the persistent store.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::middleware::RequireIngestSecret;
use crate::api::state::AppState;
use crate::api::types::ApiError;

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub cleared: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub persistent_entries: usize,
}

/// POST /admin/cache/clear
pub async fn clear_cache(
    _auth: RequireIngestSecret,
    State(state): State<AppState>,
) -> Result<Json<CacheClearResponse>, ApiError> {
    let entries = state.store.count().await.unwrap_or(0);

    state.store.clear().await?;
    state.bill_service.clear_cache().await;

    info!(entries, "Administrative cache clear");

    Ok(Json(CacheClearResponse {
        cleared: true,
        message: format!("Cleared {} cached bills and the memory cache", entries),
    }))
}

/// GET /admin/cache/stats
pub async fn cache_stats(
    _auth: RequireIngestSecret,
    State(state): State<AppState>,
) -> Result<Json<CacheStatsResponse>, ApiError> {
    let persistent_entries = state.store.count().await?;

    Ok(Json(CacheStatsResponse { persistent_entries }))
}
