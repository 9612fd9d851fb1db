//! Single-bill detail lookups
//!
//! Non-bulk reads go straight to the upstream source, so the
//! stale-while-revalidate memory cache sits in front of them. This path
//! is independent of the persistent store the feed and search use.

use std::sync::Arc;

use crate::domain::{Bill, BillId, BillSource, Clock, DomainError, SubjectNormalizer};
use crate::infrastructure::cache::{SwrCache, SwrCacheConfig};

/// Serves single-bill detail through the memory cache
pub struct BillService {
    source: Arc<dyn BillSource>,
    normalizer: Arc<dyn SubjectNormalizer>,
    clock: Arc<dyn Clock>,
    cache: SwrCache<Bill>,
}

impl BillService {
    pub fn new(
        source: Arc<dyn BillSource>,
        normalizer: Arc<dyn SubjectNormalizer>,
        clock: Arc<dyn Clock>,
        cache_config: SwrCacheConfig,
    ) -> Self {
        let cache = SwrCache::new(cache_config, clock.clone());

        Self {
            source,
            normalizer,
            clock,
            cache,
        }
    }

    /// Full detail for one bill, cache-first
    pub async fn bill(&self, id: &BillId) -> Result<Bill, DomainError> {
        let key = format!("bill:{}", id.key());

        let source = self.source.clone();
        let normalizer = self.normalizer.clone();
        let clock = self.clock.clone();
        let id = id.clone();

        self.cache
            .get_or_fetch(&key, move || async move {
                let summary = source.bill(&id).await?;
                let raw_subjects = source.subjects(&id).await?;
                Ok(summary.into_bill(raw_subjects, normalizer.as_ref(), clock.now()))
            })
            .await
    }

    /// Drop all memoized lookups (admin cache clear)
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
