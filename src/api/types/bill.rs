//! Shared response DTOs for bill read endpoints

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::Bill;
use crate::infrastructure::services::ResultOrigin;

/// A bill as rendered to API callers
#[derive(Debug, Clone, Serialize)]
pub struct BillResponse {
    pub congress: u16,
    pub bill_type: String,
    pub number: u32,
    pub citation: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_chamber: Option<String>,
    pub update_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_action: Option<LatestActionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<SponsorResponse>,
    pub cosponsor_count: u32,
    pub subjects: Vec<String>,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestActionResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SponsorResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            congress: bill.id.congress(),
            bill_type: bill.id.bill_type().to_string(),
            number: bill.id.number(),
            citation: bill.id.citation(),
            title: bill.title,
            short_title: bill.short_title,
            origin_chamber: bill.origin_chamber.map(|c| format!("{:?}", c)),
            update_date: bill.update_date,
            latest_action: bill.latest_action.map(|a| LatestActionResponse {
                text: a.text,
                action_date: a.action_date,
            }),
            sponsor: bill.sponsor.map(|s| SponsorResponse {
                name: s.name,
                party: s.party,
                image_url: s.image_url,
            }),
            cosponsor_count: bill.cosponsor_count,
            subjects: bill.subjects.iter().map(|s| s.label().to_string()).collect(),
            score: bill.score,
        }
    }
}

/// Provenance block attached to every read response so callers and
/// tests can tell cache-origin from live-origin answers
#[derive(Debug, Clone, Serialize)]
pub struct ProvenanceMeta {
    pub origin: ResultOrigin,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congress: Option<u16>,
    pub fallback: bool,
    pub generated_at: DateTime<Utc>,
}

impl ProvenanceMeta {
    pub fn new(origin: ResultOrigin, count: usize, congress: Option<u16>) -> Self {
        Self {
            origin,
            count,
            congress,
            fallback: origin == ResultOrigin::LiveFallback,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BillId, BillType, Chamber, Subject};

    #[test]
    fn test_bill_response_projection() {
        let id = BillId::new(119, BillType::Hr, 1234).unwrap();
        let bill = Bill::new(id, "Test Act", Utc::now())
            .with_origin_chamber(Chamber::House)
            .with_subjects(vec!["Energy".into()], vec![Subject::Energy])
            .with_score(43);

        let response = BillResponse::from(bill);

        assert_eq!(response.citation, "H.R. 1234");
        assert_eq!(response.bill_type, "hr");
        assert_eq!(response.origin_chamber.as_deref(), Some("House"));
        assert_eq!(response.subjects, vec!["energy"]);
        assert_eq!(response.score, 43);
    }

    #[test]
    fn test_provenance_meta_flags_fallback() {
        let meta = ProvenanceMeta::new(ResultOrigin::LiveFallback, 3, None);
        assert!(meta.fallback);

        let meta = ProvenanceMeta::new(ResultOrigin::Cache, 3, Some(119));
        assert!(!meta.fallback);
        assert_eq!(meta.congress, Some(119));
    }
}
