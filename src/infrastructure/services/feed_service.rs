//! Ranked feed read path
//!
//! Fallback cascade: fresh persistent cache -> live upstream pull with
//! write-back. A failing store read degrades to the live path; a failing
//! live pull on a cold cache is surfaced to the caller rather than
//! returned as a silently empty feed.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use metrics::counter;
use tracing::warn;

use crate::domain::cache::{BillStore, CacheSource, CachedBill};
use crate::domain::{Bill, BillSource, Clock, DomainError, SubjectNormalizer};

use super::{rank_bills, ResultOrigin};

/// Feed read-path configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// How old a cache entry may be and still count as fresh
    pub freshness_window: chrono::Duration,
    /// Bills pulled per live refresh (the bounded upstream window)
    pub live_window: usize,
    /// Concurrent per-bill detail fetches during a live pull
    pub fan_out: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            freshness_window: chrono::Duration::hours(1),
            live_window: 20,
            fan_out: 5,
        }
    }
}

/// One page of the ranked feed plus provenance
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub bills: Vec<Bill>,
    pub origin: ResultOrigin,
}

/// Serves the ranked bill feed for a congress
pub struct FeedService {
    store: Arc<dyn BillStore>,
    source: Arc<dyn BillSource>,
    normalizer: Arc<dyn SubjectNormalizer>,
    clock: Arc<dyn Clock>,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(
        store: Arc<dyn BillStore>,
        source: Arc<dyn BillSource>,
        normalizer: Arc<dyn SubjectNormalizer>,
        clock: Arc<dyn Clock>,
        config: FeedConfig,
    ) -> Self {
        Self {
            store,
            source,
            normalizer,
            clock,
            config,
        }
    }

    /// Ranked feed for one congress
    pub async fn feed(
        &self,
        congress: u16,
        limit: usize,
        offset: usize,
    ) -> Result<FeedPage, DomainError> {
        let now = self.clock.now();
        let scan = self.config.live_window.max(limit + offset);

        match self.store.recent(Some(congress), scan, 0).await {
            Ok(entries) => {
                let mut fresh: Vec<Bill> = entries
                    .into_iter()
                    .filter(|e| e.is_fresh(now, self.config.freshness_window))
                    .map(|e| e.bill)
                    .collect();

                if !fresh.is_empty() {
                    counter!("feed_cache_hits_total").increment(1);
                    rank_bills(&mut fresh);
                    return Ok(FeedPage {
                        bills: page(fresh, limit, offset),
                        origin: ResultOrigin::Cache,
                    });
                }
            }
            Err(e) => {
                warn!(error = %e, "Persistent cache read failed; falling back to live feed");
            }
        }

        counter!("feed_live_pulls_total").increment(1);
        let mut bills = self.live_bills(congress).await?;
        self.write_back(&bills).await;

        rank_bills(&mut bills);
        Ok(FeedPage {
            bills: page(bills, limit, offset),
            origin: ResultOrigin::Live,
        })
    }

    /// Bounded live pull: list the most recently updated bills, then
    /// enrich each with its subject detail under a concurrency bound
    ///
    /// A failed subject fetch degrades that one bill to no subjects; the
    /// bill still gets scored and returned.
    pub async fn live_bills(&self, congress: u16) -> Result<Vec<Bill>, DomainError> {
        let summaries = self
            .source
            .recent_bills(congress, self.config.live_window, 0)
            .await?;
        let now = self.clock.now();

        let bills = stream::iter(summaries.into_iter().map(|summary| {
            let source = self.source.clone();
            let normalizer = self.normalizer.clone();

            async move {
                let raw_subjects = match source.subjects(&summary.id).await {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(bill = %summary.id, error = %e, "Subject detail fetch failed; continuing without subjects");
                        Vec::new()
                    }
                };
                summary.into_bill(raw_subjects, normalizer.as_ref(), now)
            }
        }))
        .buffer_unordered(self.config.fan_out)
        .collect::<Vec<_>>()
        .await;

        Ok(bills)
    }

    /// Best-effort write-back of a live pull; failures never fail the read
    async fn write_back(&self, bills: &[Bill]) {
        let now = self.clock.now();

        for bill in bills {
            let entry = CachedBill::new(bill.clone(), now, CacheSource::Live);
            if let Err(e) = self.store.upsert(entry).await {
                warn!(bill = %bill.id, error = %e, "Feed cache write-back failed");
            }
        }
    }
}

fn page(bills: Vec<Bill>, limit: usize, offset: usize) -> Vec<Bill> {
    bills.into_iter().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::bill::{BillId, BillType, LatestAction, MockSubjectNormalizer, Subject};
    use crate::domain::cache::mock::MockBillStore;
    use crate::domain::clock::mock::ManualClock;
    use crate::domain::source::mock::MockBillSource;
    use crate::domain::source::BillSummary;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn bill_id(number: u32) -> BillId {
        BillId::new(119, BillType::Hr, number).unwrap()
    }

    fn summary(number: u32, title: &str) -> BillSummary {
        BillSummary {
            id: bill_id(number),
            title: title.to_string(),
            short_title: None,
            origin_chamber: None,
            update_date: now(),
            latest_action: Some(LatestAction::new("Passed House by recorded vote.")),
            sponsor: None,
            cosponsor_count: 0,
        }
    }

    fn cached(number: u32, score: u32, cached_at: chrono::DateTime<Utc>) -> CachedBill {
        let bill = Bill::new(bill_id(number), "Cached Act", now()).with_score(score);
        CachedBill::new(bill, cached_at, CacheSource::CongressApi)
    }

    fn normalizer() -> Arc<MockSubjectNormalizer> {
        let mut normalizer = MockSubjectNormalizer::new();
        normalizer
            .expect_normalize()
            .returning(|_| Some(Subject::Energy));
        Arc::new(normalizer)
    }

    fn service(
        store: Arc<MockBillStore>,
        source: Arc<MockBillSource>,
        clock: Arc<ManualClock>,
    ) -> FeedService {
        FeedService::new(store, source, normalizer(), clock, FeedConfig::default())
    }

    #[tokio::test]
    async fn test_fresh_cache_serves_without_upstream_call() {
        let store = Arc::new(
            MockBillStore::new()
                .with_entry(cached(1, 40, now() - chrono::Duration::minutes(10)))
                .with_entry(cached(2, 60, now() - chrono::Duration::minutes(10))),
        );
        let source = Arc::new(MockBillSource::new());
        let clock = Arc::new(ManualClock::new(now()));

        let page = service(store, source.clone(), clock)
            .feed(119, 20, 0)
            .await
            .unwrap();

        assert_eq!(page.origin, ResultOrigin::Cache);
        assert_eq!(page.bills.len(), 2);
        // Ranked by score, not store order
        assert_eq!(page.bills[0].id.number(), 2);
        assert_eq!(source.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_live_pull_and_write_back() {
        let store = Arc::new(
            MockBillStore::new().with_entry(cached(1, 40, now() - chrono::Duration::hours(3))),
        );
        let source = Arc::new(
            MockBillSource::new()
                .with_bill(summary(1, "Refreshed Act"))
                .with_subjects(&bill_id(1), vec!["Solar energy"]),
        );
        let clock = Arc::new(ManualClock::new(now()));

        let page = service(store.clone(), source.clone(), clock)
            .feed(119, 20, 0)
            .await
            .unwrap();

        assert_eq!(page.origin, ResultOrigin::Live);
        assert_eq!(page.bills[0].title, "Refreshed Act");
        assert_eq!(source.list_calls(), 1);

        // Write-back replaced the stale entry
        let entry = store.entry("119-hr-1").unwrap();
        assert_eq!(entry.bill.title, "Refreshed Act");
        assert_eq!(entry.source, CacheSource::Live);
    }

    #[tokio::test]
    async fn test_empty_cache_goes_live() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(MockBillSource::new().with_bill(summary(7, "Live Act")));
        let clock = Arc::new(ManualClock::new(now()));

        let page = service(store, source, clock).feed(119, 20, 0).await.unwrap();

        assert_eq!(page.origin, ResultOrigin::Live);
        assert_eq!(page.bills.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_live() {
        let store = Arc::new(MockBillStore::new().with_error("store down"));
        let source = Arc::new(MockBillSource::new().with_bill(summary(7, "Live Act")));
        let clock = Arc::new(ManualClock::new(now()));

        let page = service(store, source, clock).feed(119, 20, 0).await.unwrap();

        assert_eq!(page.origin, ResultOrigin::Live);
        assert_eq!(page.bills.len(), 1);
    }

    #[tokio::test]
    async fn test_cold_cache_and_failed_live_pull_is_an_error() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(MockBillSource::new().with_list_failure());
        let clock = Arc::new(ManualClock::new(now()));

        let err = service(store, source, clock)
            .feed(119, 20, 0)
            .await
            .unwrap_err();

        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_subject_fetch_failure_keeps_bill_without_subjects() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(
            MockBillSource::new()
                .with_bill(summary(1, "Flaky Subjects Act"))
                .with_subjects_failure(&bill_id(1)),
        );
        let clock = Arc::new(ManualClock::new(now()));

        let page = service(store, source, clock).feed(119, 20, 0).await.unwrap();

        assert_eq!(page.bills.len(), 1);
        assert!(page.bills[0].subjects.is_empty());
        assert!(page.bills[0].score > 0);
    }

    #[tokio::test]
    async fn test_pagination_applies_after_ranking() {
        let store = Arc::new(
            MockBillStore::new()
                .with_entry(cached(1, 10, now()))
                .with_entry(cached(2, 30, now()))
                .with_entry(cached(3, 20, now())),
        );
        let source = Arc::new(MockBillSource::new());
        let clock = Arc::new(ManualClock::new(now()));

        let page = service(store, source, clock).feed(119, 1, 1).await.unwrap();

        assert_eq!(page.bills.len(), 1);
        assert_eq!(page.bills[0].id.number(), 3);
    }
}
