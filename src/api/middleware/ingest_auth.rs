//! Ingestion endpoint authentication
//!
//! Admin operations carry `Authorization: Bearer <shared secret>`. The
//! secret is a single static value resolved at startup; mismatches are
//! rejected before any work happens.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Extractor that requires the shared ingestion secret
#[derive(Debug, Clone)]
pub struct RequireIngestSecret;

impl FromRequestParts<AppState> for RequireIngestSecret {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        if token != *state.ingest_secret {
            return Err(ApiError::unauthorized("Invalid ingestion secret"));
        }

        debug!("Ingestion request authenticated");
        Ok(RequireIngestSecret)
    }
}

fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::unauthorized("Authorization required. Provide 'Authorization: Bearer <secret>'")
        })?
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .ok_or_else(|| ApiError::unauthorized("Authorization header must be a Bearer token"))
}
