//! Bill search endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, BillResponse, ProvenanceMeta};
use crate::domain::Subject;
use crate::infrastructure::services::SearchQuery;

#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    /// Free-text term matched across title, sponsor, subjects, bill
    /// number, and latest action
    #[validate(length(min = 2, message = "Search term must be at least 2 characters"))]
    pub term: Option<String>,
    /// Comma-separated subject labels
    pub subject: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
pub struct SearchResponse {
    pub bills: Vec<BillResponse>,
    pub meta: ProvenanceMeta,
}

/// GET /v1/search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    params
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let subjects = parse_subjects(params.subject.as_deref())?;

    let query = SearchQuery {
        term: params.term,
        subjects,
        limit: params.limit,
    };

    let page = state.search_service.search(query).await?;

    let meta = ProvenanceMeta::new(page.origin, page.bills.len(), None);
    let bills = page.bills.into_iter().map(BillResponse::from).collect();

    Ok(Json(SearchResponse { bills, meta }))
}

fn parse_subjects(raw: Option<&str>) -> Result<Vec<Subject>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(|label| {
            Subject::from_label(label)
                .map_err(|e| ApiError::bad_request(e.to_string()).with_param("subject"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subjects_list() {
        let subjects = parse_subjects(Some("energy, healthcare")).unwrap();
        assert_eq!(subjects, vec![Subject::Energy, Subject::Healthcare]);
    }

    #[test]
    fn test_parse_subjects_rejects_unknown() {
        assert!(parse_subjects(Some("energy,quantum")).is_err());
    }

    #[test]
    fn test_parse_subjects_none() {
        assert!(parse_subjects(None).unwrap().is_empty());
    }

    #[test]
    fn test_short_term_fails_validation() {
        let params = SearchParams {
            term: Some("x".to_string()),
            subject: None,
            limit: None,
        };
        assert!(params.validate().is_err());
    }
}
