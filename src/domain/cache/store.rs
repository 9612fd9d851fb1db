//! Persistent cache store contract

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::bill::{BillId, Subject};
use crate::domain::DomainError;

use super::entry::{CachedBill, IngestionMetadata};

/// Document store for cached bills, keyed by the bill identity triple
///
/// Every write is a full-document idempotent upsert; there is no
/// multi-document transaction and none is needed. Ordering queries run
/// on the bill's upstream update timestamp, not on `cached_at`.
#[async_trait]
pub trait BillStore: Send + Sync + Debug {
    /// Create or overwrite the entry for this bill identity
    async fn upsert(&self, entry: CachedBill) -> Result<(), DomainError>;

    /// Point lookup by identity triple
    async fn get(&self, id: &BillId) -> Result<Option<CachedBill>, DomainError>;

    /// Entries ordered descending by bill update timestamp, optionally
    /// restricted to one congress
    async fn recent(
        &self,
        congress: Option<u16>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CachedBill>, DomainError>;

    /// Entries whose normalized subjects intersect the given set
    async fn with_any_subject(
        &self,
        subjects: &[Subject],
        limit: usize,
    ) -> Result<Vec<CachedBill>, DomainError>;

    /// Overwrite the singleton metadata record for an ingestion target
    async fn put_metadata(&self, meta: IngestionMetadata) -> Result<(), DomainError>;

    /// Last-run metadata for an ingestion target
    async fn metadata(&self, target: &str) -> Result<Option<IngestionMetadata>, DomainError>;

    /// Administrative clear of all entries and metadata
    async fn clear(&self) -> Result<(), DomainError>;

    /// Approximate number of cached bills
    async fn count(&self) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Mock store for service tests
    ///
    /// Supports seeded entries, a blanket error for all operations, and
    /// a metadata-only error for exercising best-effort writes.
    #[derive(Debug, Default)]
    pub struct MockBillStore {
        entries: Mutex<HashMap<String, CachedBill>>,
        metadata: Mutex<HashMap<String, IngestionMetadata>>,
        error: Mutex<Option<String>>,
        metadata_error: Mutex<Option<String>>,
        overbroad_subject_matches: Mutex<bool>,
    }

    impl MockBillStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, entry: CachedBill) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(entry.bill.id.key(), entry);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn with_metadata_error(self, error: impl Into<String>) -> Self {
            *self.metadata_error.lock().unwrap() = Some(error.into());
            self
        }

        /// Make `with_any_subject` behave like an over-broad index that
        /// returns every entry regardless of subjects
        pub fn with_overbroad_subject_matches(self) -> Self {
            *self.overbroad_subject_matches.lock().unwrap() = true;
            self
        }

        pub fn entry(&self, key: &str) -> Option<CachedBill> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BillStore for MockBillStore {
        async fn upsert(&self, entry: CachedBill) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(entry.bill.id.key(), entry);
            Ok(())
        }

        async fn get(&self, id: &BillId) -> Result<Option<CachedBill>, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().get(&id.key()).cloned())
        }

        async fn recent(
            &self,
            congress: Option<u16>,
            limit: usize,
            offset: usize,
        ) -> Result<Vec<CachedBill>, DomainError> {
            self.check_error()?;
            let mut entries: Vec<CachedBill> = self
                .entries
                .lock()
                .unwrap()
                .values()
                .filter(|e| congress.is_none_or(|c| e.bill.id.congress() == c))
                .cloned()
                .collect();

            entries.sort_by(|a, b| b.bill.update_date.cmp(&a.bill.update_date));
            Ok(entries.into_iter().skip(offset).take(limit).collect())
        }

        async fn with_any_subject(
            &self,
            subjects: &[Subject],
            limit: usize,
        ) -> Result<Vec<CachedBill>, DomainError> {
            self.check_error()?;
            let overbroad = *self.overbroad_subject_matches.lock().unwrap();
            let mut entries: Vec<CachedBill> = self
                .entries
                .lock()
                .unwrap()
                .values()
                .filter(|e| overbroad || e.bill.matches_any_subject(subjects))
                .cloned()
                .collect();

            entries.sort_by(|a, b| b.bill.update_date.cmp(&a.bill.update_date));
            Ok(entries.into_iter().take(limit).collect())
        }

        async fn put_metadata(&self, meta: IngestionMetadata) -> Result<(), DomainError> {
            self.check_error()?;
            if let Some(error) = self.metadata_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            self.metadata
                .lock()
                .unwrap()
                .insert(meta.target.clone(), meta);
            Ok(())
        }

        async fn metadata(&self, target: &str) -> Result<Option<IngestionMetadata>, DomainError> {
            self.check_error()?;
            Ok(self.metadata.lock().unwrap().get(target).cloned())
        }

        async fn clear(&self) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries.lock().unwrap().clear();
            self.metadata.lock().unwrap().clear();
            Ok(())
        }

        async fn count(&self) -> Result<usize, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().len())
        }
    }
}
