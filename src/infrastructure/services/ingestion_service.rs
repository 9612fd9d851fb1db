//! Batch ingestion/refresh job
//!
//! Pulls a bounded window of recently-updated bills, enriches each with
//! its subject detail, scores it, and upserts a cache document. Bills
//! are processed in fixed-size batches with a delay between batches to
//! respect the upstream rate limit; within a batch the per-bill work
//! runs concurrently. A bill that fails is counted and skipped; only a
//! failure of the initial list pull aborts the run.

use std::sync::Arc;

use futures::future;
use metrics::counter;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::cache::{BillStore, CacheSource, CachedBill, IngestionMetadata};
use crate::domain::source::BillSummary;
use crate::domain::{BillSource, Clock, DomainError, SubjectNormalizer};

/// Ingestion job configuration
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Bills pulled per run (the bounded upstream window)
    pub page_limit: usize,
    /// Bills processed concurrently per batch
    pub batch_size: usize,
    /// Pause between batches, purely for upstream rate limits
    pub batch_delay: std::time::Duration,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            page_limit: 50,
            batch_size: 10,
            batch_delay: std::time::Duration::from_secs(1),
        }
    }
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    pub processed: u32,
    pub errors: u32,
    pub message: String,
}

/// Runs the batch ingestion job on demand
pub struct IngestionService {
    store: Arc<dyn BillStore>,
    source: Arc<dyn BillSource>,
    normalizer: Arc<dyn SubjectNormalizer>,
    clock: Arc<dyn Clock>,
    config: IngestionConfig,
}

impl IngestionService {
    pub fn new(
        store: Arc<dyn BillStore>,
        source: Arc<dyn BillSource>,
        normalizer: Arc<dyn SubjectNormalizer>,
        clock: Arc<dyn Clock>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            store,
            source,
            normalizer,
            clock,
            config,
        }
    }

    /// One full refresh run for a congress
    pub async fn run(&self, congress: u16) -> Result<IngestionReport, DomainError> {
        info!(congress, limit = self.config.page_limit, "Starting ingestion run");

        // A dead upstream at the start aborts the whole run
        let summaries = self
            .source
            .recent_bills(congress, self.config.page_limit, 0)
            .await?;
        let total = summaries.len();

        let mut processed: u32 = 0;
        let mut errors: u32 = 0;

        for (index, batch) in summaries.chunks(self.config.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            let results =
                future::join_all(batch.iter().map(|summary| self.ingest_one(summary.clone())))
                    .await;

            for result in results {
                match result {
                    Ok(()) => processed += 1,
                    Err(e) => {
                        errors += 1;
                        warn!(error = %e, "Bill ingestion failed; skipping");
                    }
                }
            }
        }

        counter!("ingestion_bills_processed_total").increment(u64::from(processed));
        counter!("ingestion_bills_errored_total").increment(u64::from(errors));

        // Best-effort observability record; cache entries already
        // written stay valid regardless
        let meta = IngestionMetadata::new(
            ingestion_target(congress),
            self.clock.now(),
            processed,
            errors,
        );
        if let Err(e) = self.store.put_metadata(meta).await {
            warn!(error = %e, "Ingestion metadata write failed");
        }

        info!(congress, processed, errors, "Ingestion run complete");

        Ok(IngestionReport {
            processed,
            errors,
            message: format!(
                "Ingested {} of {} bills for congress {} ({} errors)",
                processed, total, congress, errors
            ),
        })
    }

    async fn ingest_one(&self, summary: BillSummary) -> Result<(), DomainError> {
        let raw_subjects = self.source.subjects(&summary.id).await?;
        let now = self.clock.now();
        let bill = summary.into_bill(raw_subjects, self.normalizer.as_ref(), now);

        self.store
            .upsert(CachedBill::new(bill, now, CacheSource::CongressApi))
            .await
    }
}

/// Metadata key for a congress-wide refresh
pub fn ingestion_target(congress: u16) -> String {
    format!("congress-{}", congress)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::bill::{BillId, BillType, LatestAction, MockSubjectNormalizer, Subject};
    use crate::domain::cache::mock::MockBillStore;
    use crate::domain::clock::mock::ManualClock;
    use crate::domain::source::mock::MockBillSource;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn bill_id(number: u32) -> BillId {
        BillId::new(119, BillType::Hr, number).unwrap()
    }

    fn summary(number: u32) -> BillSummary {
        BillSummary {
            id: bill_id(number),
            title: format!("Act Number {}", number),
            short_title: None,
            origin_chamber: None,
            update_date: now(),
            latest_action: Some(LatestAction::new("Referred to the Committee on Rules.")),
            sponsor: None,
            cosponsor_count: 0,
        }
    }

    fn config() -> IngestionConfig {
        IngestionConfig {
            page_limit: 50,
            batch_size: 10,
            batch_delay: std::time::Duration::ZERO,
        }
    }

    fn service(store: Arc<MockBillStore>, source: Arc<MockBillSource>) -> IngestionService {
        let mut normalizer = MockSubjectNormalizer::new();
        normalizer
            .expect_normalize()
            .returning(|_| Some(Subject::Economy));

        IngestionService::new(
            store,
            source,
            Arc::new(normalizer),
            Arc::new(ManualClock::new(now())),
            config(),
        )
    }

    fn source_with_bills(count: u32) -> MockBillSource {
        let mut source = MockBillSource::new();
        for number in 1..=count {
            source = source
                .with_bill(summary(number))
                .with_subjects(&bill_id(number), vec!["Taxation"]);
        }
        source
    }

    #[tokio::test]
    async fn test_successful_run_processes_all_bills() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(source_with_bills(10));

        let report = service(store.clone(), source).run(119).await.unwrap();

        assert_eq!(report.processed, 10);
        assert_eq!(report.errors, 0);
        assert_eq!(store.len(), 10);

        let entry = store.entry("119-hr-1").unwrap();
        assert_eq!(entry.source, CacheSource::CongressApi);
        assert_eq!(entry.bill.subjects, vec![Subject::Economy]);
        // Bare referral scores the baseline 2
        assert_eq!(entry.bill.score, 2);
    }

    #[tokio::test]
    async fn test_partial_failure_is_counted_not_fatal() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(source_with_bills(10).with_subjects_failure(&bill_id(3)));

        let report = service(store.clone(), source).run(119).await.unwrap();

        assert_eq!(report.processed, 9);
        assert_eq!(report.errors, 1);

        // Everything except the failed item landed
        assert_eq!(store.len(), 9);
        assert!(store.entry("119-hr-2").is_some());
        assert!(store.entry("119-hr-3").is_none());
        assert!(store.entry("119-hr-4").is_some());
        assert!(store.entry("119-hr-10").is_some());
    }

    #[tokio::test]
    async fn test_dead_upstream_aborts_run() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(MockBillSource::new().with_list_failure());

        let err = service(store.clone(), source).run(119).await.unwrap_err();

        assert!(err.is_upstream());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_metadata_recorded_after_run() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(source_with_bills(3).with_subjects_failure(&bill_id(2)));

        service(store.clone(), source).run(119).await.unwrap();

        let meta = store.metadata("congress-119").await.unwrap().unwrap();
        assert_eq!(meta.processed, 2);
        assert_eq!(meta.errors, 1);
        assert_eq!(meta.target, "congress-119");
    }

    #[tokio::test]
    async fn test_metadata_write_failure_does_not_fail_run() {
        let store = Arc::new(MockBillStore::new().with_metadata_error("metadata table gone"));
        let source = Arc::new(source_with_bills(2));

        let report = service(store.clone(), source).run(119).await.unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_rerun_converges_via_upsert() {
        let store = Arc::new(MockBillStore::new());
        let source = Arc::new(source_with_bills(5));

        let svc = service(store.clone(), source);
        svc.run(119).await.unwrap();
        svc.run(119).await.unwrap();

        assert_eq!(store.len(), 5);
    }
}
