//! Single-bill detail endpoint

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, BillResponse};
use crate::domain::{BillId, BillType, DomainError};

#[derive(Debug, Serialize)]
pub struct BillDetailResponse {
    pub bill: BillResponse,
}

/// GET /v1/bills/{congress}/{bill_type}/{number}
pub async fn get_bill(
    State(state): State<AppState>,
    Path((congress, bill_type, number)): Path<(u16, String, u32)>,
) -> Result<Json<BillDetailResponse>, ApiError> {
    let bill_type = BillType::from_str(&bill_type).map_err(DomainError::from)?;
    let id = BillId::new(congress, bill_type, number).map_err(DomainError::from)?;

    let bill = state.bill_service.bill(&id).await?;

    Ok(Json(BillDetailResponse {
        bill: BillResponse::from(bill),
    }))
}
