//! Upstream bill source contract
//!
//! The upstream service is slow, rate-limited, and bills a separate call
//! for each bill's subject detail, which is why everything behind this
//! trait sits under the cache layers.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::bill::{Bill, BillId, Chamber, LatestAction, Sponsor, Subject, SubjectNormalizer};
use crate::domain::scoring::score_bill;
use crate::domain::DomainError;

/// A bill as returned by the upstream list/detail endpoints, before
/// subject normalization and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillSummary {
    pub id: BillId,
    pub title: String,
    pub short_title: Option<String>,
    pub origin_chamber: Option<Chamber>,
    pub update_date: DateTime<Utc>,
    pub latest_action: Option<LatestAction>,
    pub sponsor: Option<Sponsor>,
    pub cosponsor_count: u32,
}

impl BillSummary {
    /// Assemble the domain bill: normalize raw subjects and compute the
    /// importance score as of `now`
    pub fn into_bill(
        self,
        raw_subjects: Vec<String>,
        normalizer: &dyn SubjectNormalizer,
        now: DateTime<Utc>,
    ) -> Bill {
        let mut normalized: Vec<Subject> = raw_subjects
            .iter()
            .filter_map(|raw| normalizer.normalize(raw))
            .collect();
        normalized.sort_by_key(|s| s.label());
        normalized.dedup();

        let mut bill = Bill::new(self.id, self.title, self.update_date)
            .with_cosponsor_count(self.cosponsor_count)
            .with_subjects(raw_subjects, normalized);
        bill.short_title = self.short_title;
        bill.origin_chamber = self.origin_chamber;
        bill.latest_action = self.latest_action;
        bill.sponsor = self.sponsor;

        let score = score_bill(&bill, now);
        bill.with_score(score)
    }
}

/// Read access to the upstream legislative data source
#[async_trait]
pub trait BillSource: Send + Sync + Debug {
    /// Most-recently-updated bills for a congress, bounded window only
    /// (no pagination walk)
    async fn recent_bills(
        &self,
        congress: u16,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<BillSummary>, DomainError>;

    /// Single bill lookup
    async fn bill(&self, id: &BillId) -> Result<BillSummary, DomainError>;

    /// Raw subject terms for one bill (the per-call-billed sub-resource)
    async fn subjects(&self, id: &BillId) -> Result<Vec<String>, DomainError>;
}
