//! Application services: ingestion and the cache-backed read paths

pub mod bill_service;
pub mod feed_service;
pub mod ingestion_service;
pub mod search_service;

pub use bill_service::BillService;
pub use feed_service::{FeedConfig, FeedPage, FeedService};
pub use ingestion_service::{IngestionConfig, IngestionReport, IngestionService};
pub use search_service::{SearchConfig, SearchPage, SearchQuery, SearchService};

use serde::Serialize;

use crate::domain::Bill;

/// Where a read-path result came from, surfaced to callers for
/// provenance and test assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    /// Served from the fresh persistent cache
    Cache,
    /// Pulled live because the cache was empty or stale
    Live,
    /// Served live after the cache path failed or matched nothing
    LiveFallback,
}

/// Rank bills for presentation: importance score descending, ties broken
/// by update timestamp descending, then bill key ascending
///
/// The stable secondary keys are deliberate; store iteration order is
/// never relied on.
pub fn rank_bills(bills: &mut [Bill]) {
    bills.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.update_date.cmp(&a.update_date))
            .then_with(|| a.id.key().cmp(&b.id.key()))
    });
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::{BillId, BillType};

    fn bill(number: u32, score: u32, age_minutes: i64) -> Bill {
        let id = BillId::new(119, BillType::Hr, number).unwrap();
        Bill::new(id, "Act", Utc::now() - Duration::minutes(age_minutes)).with_score(score)
    }

    #[test]
    fn test_rank_orders_by_score_desc() {
        let mut bills = vec![bill(1, 10, 0), bill(2, 50, 0), bill(3, 30, 0)];
        rank_bills(&mut bills);

        let numbers: Vec<u32> = bills.iter().map(|b| b.id.number()).collect();
        assert_eq!(numbers, vec![2, 3, 1]);
    }

    #[test]
    fn test_rank_breaks_ties_by_recency_then_key() {
        let mut bills = vec![bill(2, 30, 60), bill(1, 30, 0), bill(3, 30, 60)];
        rank_bills(&mut bills);

        let numbers: Vec<u32> = bills.iter().map(|b| b.id.number()).collect();
        // Same score: newest first, then key order for the equal pair
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
