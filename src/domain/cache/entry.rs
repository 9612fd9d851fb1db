//! Persistent cache documents

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::bill::Bill;

/// How a cache entry was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSource {
    /// Written back by a read path that had to go live
    Live,
    /// Written by the batch ingestion job
    CongressApi,
}

impl std::fmt::Display for CacheSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::CongressApi => write!(f, "congress_api"),
        }
    }
}

/// A bill wrapped with cache bookkeeping
///
/// The store never enforces a TTL; staleness is decided at read time by
/// comparing `cached_at` against the query layer's freshness window.
/// Entries are only ever removed by the explicit administrative clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedBill {
    pub bill: Bill,
    pub cached_at: DateTime<Utc>,
    pub source: CacheSource,
}

impl CachedBill {
    pub fn new(bill: Bill, cached_at: DateTime<Utc>, source: CacheSource) -> Self {
        Self {
            bill,
            cached_at,
            source,
        }
    }

    /// Read-time freshness decision
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.cached_at) < window
    }
}

/// Singleton observability record per ingestion target
///
/// Overwritten wholesale on each run; never consulted for correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionMetadata {
    pub target: String,
    pub run_id: Uuid,
    pub last_refresh: DateTime<Utc>,
    pub processed: u32,
    pub errors: u32,
}

impl IngestionMetadata {
    pub fn new(
        target: impl Into<String>,
        last_refresh: DateTime<Utc>,
        processed: u32,
        errors: u32,
    ) -> Self {
        Self {
            target: target.into(),
            run_id: Uuid::new_v4(),
            last_refresh,
            processed,
            errors,
        }
    }
}
