//! In-process memory cache with stale-while-revalidate
//!
//! Per-key lifecycle: empty -> fresh -> stale -> expired. Fresh entries
//! are served without I/O; stale entries (past the hard TTL but inside
//! the revalidate window) are served immediately while a background
//! refresh replaces them; expired entries behave like misses and the
//! caller waits on a synchronous fetch. Background refresh failures are
//! logged and swallowed, leaving the stale value in place; synchronous
//! fetch failures propagate.
//!
//! Instances are injected, never global, and read time through the
//! [`Clock`] abstraction. The cache is private to one process; a
//! horizontally scaled deployment has one independently-cold instance
//! per replica.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use moka::future::Cache as MokaCache;
use tracing::warn;

use crate::domain::{Clock, DomainError};

/// Memory cache configuration
#[derive(Debug, Clone)]
pub struct SwrCacheConfig {
    /// Hard TTL; entries younger than this are served without I/O
    pub ttl: Duration,
    /// Extra window past the TTL during which entries are served stale
    /// while a background refresh runs
    pub stale_while_revalidate: Duration,
    /// Entry cap; an old entry is evicted once the cap is exceeded
    pub max_entries: u64,
}

impl Default for SwrCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            stale_while_revalidate: Duration::from_secs(7200),
            max_entries: 256,
        }
    }
}

impl SwrCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_stale_while_revalidate(mut self, window: Duration) -> Self {
        self.stale_while_revalidate = window;
        self
    }

    pub fn with_max_entries(mut self, max: u64) -> Self {
        self.max_entries = max;
        self
    }
}

#[derive(Debug, Clone)]
struct SwrEntry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
}

enum Freshness {
    Fresh,
    Stale,
    Expired,
}

/// Keyed result cache with TTL and stale-while-revalidate semantics
#[derive(Debug, Clone)]
pub struct SwrCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    entries: MokaCache<String, SwrEntry<V>>,
    config: SwrCacheConfig,
    clock: Arc<dyn Clock>,
}

impl<V> SwrCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: SwrCacheConfig, clock: Arc<dyn Clock>) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(config.max_entries)
            .build();

        Self {
            entries,
            config,
            clock,
        }
    }

    /// Look up `key`, falling back to `fetch`
    ///
    /// The fetch closure is invoked at most once per call: synchronously
    /// for misses and expired entries, in a spawned task for stale ones,
    /// and not at all on a fresh hit.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V, DomainError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(key).await {
            match self.freshness(&entry, now) {
                Freshness::Fresh => {
                    counter!("memory_cache_hits_total").increment(1);
                    return Ok(entry.value);
                }
                Freshness::Stale => {
                    counter!("memory_cache_stale_hits_total").increment(1);
                    self.spawn_refresh(key.to_string(), fetch);
                    return Ok(entry.value);
                }
                Freshness::Expired => {
                    counter!("memory_cache_expirations_total").increment(1);
                }
            }
        } else {
            counter!("memory_cache_misses_total").increment(1);
        }

        let value = fetch().await?;
        self.insert(key.to_string(), value.clone()).await;
        Ok(value)
    }

    /// Remove one key
    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Remove everything
    pub async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    /// Approximate number of live entries
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    fn freshness(&self, entry: &SwrEntry<V>, now: DateTime<Utc>) -> Freshness {
        let age = now
            .signed_duration_since(entry.fetched_at)
            .to_std()
            .unwrap_or_default();

        if age < self.config.ttl {
            Freshness::Fresh
        } else if age < self.config.ttl + self.config.stale_while_revalidate {
            Freshness::Stale
        } else {
            Freshness::Expired
        }
    }

    async fn insert(&self, key: String, value: V) {
        let entry = SwrEntry {
            value,
            fetched_at: self.clock.now(),
        };
        self.entries.insert(key, entry).await;
    }

    /// Fire-and-forget refresh; the caller that observed the stale entry
    /// is never blocked and never sees the outcome
    fn spawn_refresh<F, Fut>(&self, key: String, fetch: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, DomainError>> + Send + 'static,
    {
        let cache = self.clone();

        tokio::spawn(async move {
            match fetch().await {
                Ok(value) => {
                    cache.insert(key, value).await;
                    counter!("memory_cache_refreshes_total").increment(1);
                }
                Err(e) => {
                    counter!("memory_cache_refresh_failures_total").increment(1);
                    warn!(key = %key, error = %e, "Background cache refresh failed; stale entry kept");
                }
            }
        });
    }
}
