//! In-memory bill store implementation
//!
//! Used for development and tests; data is lost when the process
//! terminates.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::cache::{BillStore, CachedBill, IngestionMetadata};
use crate::domain::{BillId, DomainError, Subject};

/// Thread-safe in-memory document store for cached bills
#[derive(Debug, Default)]
pub struct InMemoryBillStore {
    entries: RwLock<HashMap<String, CachedBill>>,
    metadata: RwLock<HashMap<String, IngestionMetadata>>,
}

impl InMemoryBillStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries
    pub fn with_entries(entries: Vec<CachedBill>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.write().unwrap();

            for entry in entries {
                map.insert(entry.bill.id.key(), entry);
            }
        }
        store
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn upsert(&self, entry: CachedBill) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        entries.insert(entry.bill.id.key(), entry);
        Ok(())
    }

    async fn get(&self, id: &BillId) -> Result<Option<CachedBill>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.get(&id.key()).cloned())
    }

    async fn recent(
        &self,
        congress: Option<u16>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CachedBill>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut matching: Vec<CachedBill> = entries
            .values()
            .filter(|e| congress.is_none_or(|c| e.bill.id.congress() == c))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.bill.update_date.cmp(&a.bill.update_date));
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn with_any_subject(
        &self,
        subjects: &[Subject],
        limit: usize,
    ) -> Result<Vec<CachedBill>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut matching: Vec<CachedBill> = entries
            .values()
            .filter(|e| e.bill.matches_any_subject(subjects))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.bill.update_date.cmp(&a.bill.update_date));
        Ok(matching.into_iter().take(limit).collect())
    }

    async fn put_metadata(&self, meta: IngestionMetadata) -> Result<(), DomainError> {
        let mut metadata = self
            .metadata
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        metadata.insert(meta.target.clone(), meta);
        Ok(())
    }

    async fn metadata(&self, target: &str) -> Result<Option<IngestionMetadata>, DomainError> {
        let metadata = self
            .metadata
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(metadata.get(target).cloned())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.entries
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?
            .clear();
        self.metadata
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?
            .clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::bill::{Bill, BillType};
    use crate::domain::cache::CacheSource;

    fn entry(number: u32, title: &str, age_minutes: i64) -> CachedBill {
        let id = BillId::new(119, BillType::Hr, number).unwrap();
        let update_date = Utc::now() - Duration::minutes(age_minutes);
        CachedBill::new(
            Bill::new(id, title, update_date),
            Utc::now(),
            CacheSource::CongressApi,
        )
    }

    fn entry_with_subjects(number: u32, subjects: Vec<Subject>) -> CachedBill {
        let mut e = entry(number, "Subject Act", 0);
        e.bill.subjects = subjects;
        e
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let store = InMemoryBillStore::new();
        let e = entry(1, "First Act", 0);

        store.upsert(e.clone()).await.unwrap();

        let found = store.get(&e.bill.id).await.unwrap();
        assert_eq!(found.unwrap().bill.title, "First Act");
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_on_identity() {
        let store = InMemoryBillStore::new();

        store.upsert(entry(1, "Original Title", 0)).await.unwrap();
        store.upsert(entry(1, "Rewritten Title", 0)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);

        let id = BillId::new(119, BillType::Hr, 1).unwrap();
        let found = store.get(&id).await.unwrap().unwrap();
        assert_eq!(found.bill.title, "Rewritten Title");
    }

    #[tokio::test]
    async fn test_recent_orders_by_update_date_desc() {
        let store = InMemoryBillStore::with_entries(vec![
            entry(1, "Oldest", 120),
            entry(2, "Newest", 0),
            entry(3, "Middle", 60),
        ]);

        let recent = store.recent(Some(119), 10, 0).await.unwrap();
        let titles: Vec<&str> = recent.iter().map(|e| e.bill.title.as_str()).collect();

        assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn test_recent_applies_limit_and_offset() {
        let store = InMemoryBillStore::with_entries(vec![
            entry(1, "A", 30),
            entry(2, "B", 20),
            entry(3, "C", 10),
        ]);

        let page = store.recent(Some(119), 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].bill.title, "B");
    }

    #[tokio::test]
    async fn test_recent_filters_by_congress() {
        let mut other = entry(5, "Other Congress", 0);
        other.bill.id = BillId::new(118, BillType::Hr, 5).unwrap();

        let store = InMemoryBillStore::with_entries(vec![entry(1, "Current", 0), other]);

        let recent = store.recent(Some(119), 10, 0).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].bill.title, "Current");

        let all = store.recent(None, 10, 0).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_with_any_subject_intersects() {
        let store = InMemoryBillStore::with_entries(vec![
            entry_with_subjects(1, vec![Subject::Energy, Subject::Economy]),
            entry_with_subjects(2, vec![Subject::Healthcare]),
            entry_with_subjects(3, vec![]),
        ]);

        let hits = store
            .with_any_subject(&[Subject::Energy, Subject::Defense], 10)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].bill.id.number(), 1);
    }

    #[tokio::test]
    async fn test_metadata_round_trip() {
        let store = InMemoryBillStore::new();
        let meta = IngestionMetadata::new("congress-119", Utc::now(), 40, 2);

        store.put_metadata(meta).await.unwrap();

        let found = store.metadata("congress-119").await.unwrap().unwrap();
        assert_eq!(found.processed, 40);
        assert_eq!(found.errors, 2);
        assert!(store.metadata("congress-118").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = InMemoryBillStore::with_entries(vec![entry(1, "A", 0)]);
        store
            .put_metadata(IngestionMetadata::new("congress-119", Utc::now(), 1, 0))
            .await
            .unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.metadata("congress-119").await.unwrap().is_none());
    }
}
