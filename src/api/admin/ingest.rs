//! Ingestion trigger and status endpoints
//!
//! Scheduling stays external: a cron job (or an operator) POSTs here
//! with the shared secret and gets a synchronous run report back.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::RequireIngestSecret;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::bill::validate_congress;
use crate::domain::DomainError;
use crate::infrastructure::services::ingestion_service::ingestion_target;

#[derive(Debug, Deserialize)]
pub struct IngestParams {
    pub congress: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub processed: u32,
    pub errors: u32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct IngestStatusResponse {
    pub target: String,
    pub run_id: Uuid,
    pub last_refresh: DateTime<Utc>,
    pub processed: u32,
    pub errors: u32,
}

/// POST /admin/ingest
pub async fn trigger_ingest(
    _auth: RequireIngestSecret,
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
) -> Result<Json<IngestResponse>, ApiError> {
    let congress = params.congress.unwrap_or(state.default_congress);
    validate_congress(congress).map_err(DomainError::from)?;

    let report = state.ingestion_service.run(congress).await?;

    Ok(Json(IngestResponse {
        processed: report.processed,
        errors: report.errors,
        message: report.message,
    }))
}

/// GET /admin/ingest/status
pub async fn ingest_status(
    _auth: RequireIngestSecret,
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
) -> Result<Json<IngestStatusResponse>, ApiError> {
    let congress = params.congress.unwrap_or(state.default_congress);
    let target = ingestion_target(congress);

    let meta = state
        .store
        .metadata(&target)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No ingestion run recorded for {}", target)))?;

    Ok(Json(IngestStatusResponse {
        target: meta.target,
        run_id: meta.run_id,
        last_refresh: meta.last_refresh,
        processed: meta.processed,
        errors: meta.errors,
    }))
}
