//! Ranked feed endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, BillResponse, ProvenanceMeta};
use crate::domain::bill::validate_congress;
use crate::domain::DomainError;

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize, Validate)]
pub struct FeedParams {
    pub congress: Option<u16>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct FeedResponse {
    pub bills: Vec<BillResponse>,
    pub meta: ProvenanceMeta,
}

/// GET /v1/feed
pub async fn get_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, ApiError> {
    params
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let congress = params.congress.unwrap_or(state.default_congress);
    validate_congress(congress).map_err(DomainError::from)?;

    let page = state
        .feed_service
        .feed(
            congress,
            params.limit.unwrap_or(DEFAULT_LIMIT),
            params.offset.unwrap_or(0),
        )
        .await?;

    let meta = ProvenanceMeta::new(page.origin, page.bills.len(), Some(congress));
    let bills = page.bills.into_iter().map(BillResponse::from).collect();

    Ok(Json(FeedResponse { bills, meta }))
}
