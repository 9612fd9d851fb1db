//! Legisfeed
//!
//! Legislative bill ingestion, importance scoring, and cache-backed
//! retrieval:
//! - Batch ingestion from a rate-limited upstream source with per-bill
//!   subject enrichment and scoring
//! - A persistent document cache plus an in-process
//!   stale-while-revalidate memory cache
//! - Ranked feed and search read paths with a live-upstream fallback

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use api::state::AppState;
use domain::cache::BillStore;
use domain::{BillSource, Clock, SubjectNormalizer, SystemClock};
use infrastructure::cache::SwrCacheConfig;
use infrastructure::services::{
    BillService, FeedConfig, FeedService, IngestionConfig, IngestionService, SearchConfig,
    SearchService,
};
use infrastructure::store::{InMemoryBillStore, PostgresBillStore, PostgresConfig};
use infrastructure::subjects::KeywordSubjectNormalizer;
use infrastructure::upstream::{CongressApiClient, CongressApiConfig};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let normalizer: Arc<dyn SubjectNormalizer> = Arc::new(KeywordSubjectNormalizer::new());

    let source = create_bill_source(config)?;
    let store = create_bill_store(config).await?;

    let feed_config = FeedConfig {
        freshness_window: chrono::Duration::seconds(config.cache.freshness_window_secs as i64),
        ..FeedConfig::default()
    };
    let feed_service = Arc::new(FeedService::new(
        store.clone(),
        source.clone(),
        normalizer.clone(),
        clock.clone(),
        feed_config,
    ));

    let search_config = SearchConfig {
        congress: config.ingestion.congress,
        ..SearchConfig::default()
    };
    let search_service = Arc::new(SearchService::new(
        store.clone(),
        feed_service.clone(),
        search_config,
    ));

    let swr_config = SwrCacheConfig::default()
        .with_ttl(std::time::Duration::from_secs(config.cache.memory_ttl_secs))
        .with_stale_while_revalidate(std::time::Duration::from_secs(
            config.cache.memory_stale_extra_secs,
        ))
        .with_max_entries(config.cache.memory_max_entries);
    let bill_service = Arc::new(BillService::new(
        source.clone(),
        normalizer.clone(),
        clock.clone(),
        swr_config,
    ));

    let ingestion_config = IngestionConfig {
        page_limit: config.ingestion.page_limit,
        batch_size: config.ingestion.batch_size,
        batch_delay: std::time::Duration::from_millis(config.ingestion.batch_delay_ms),
    };
    let ingestion_service = Arc::new(IngestionService::new(
        store.clone(),
        source,
        normalizer,
        clock,
        ingestion_config,
    ));

    let ingest_secret = resolve_ingest_secret(config);

    Ok(AppState::new(
        feed_service,
        search_service,
        bill_service,
        ingestion_service,
        store,
        ingest_secret,
        config.ingestion.congress,
    ))
}

fn create_bill_source(config: &AppConfig) -> anyhow::Result<Arc<dyn BillSource>> {
    let api_key = config
        .upstream
        .api_key
        .clone()
        .or_else(|| std::env::var("CONGRESS_API_KEY").ok())
        .unwrap_or_else(|| {
            warn!("No upstream API key configured; set CONGRESS_API_KEY for live requests");
            String::new()
        });

    let upstream_config = CongressApiConfig::new(&config.upstream.base_url, api_key)
        .with_list_timeout(std::time::Duration::from_secs(
            config.upstream.list_timeout_secs,
        ))
        .with_item_timeout(std::time::Duration::from_secs(
            config.upstream.item_timeout_secs,
        ));

    Ok(Arc::new(CongressApiClient::new(upstream_config)?))
}

async fn create_bill_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BillStore>> {
    match config.storage.backend.as_str() {
        "postgres" => {
            let url = std::env::var("DATABASE_URL").map_err(|_| {
                anyhow::anyhow!("DATABASE_URL environment variable is required for the postgres backend")
            })?;

            info!("Connecting to PostgreSQL bill store...");
            let store = PostgresBillStore::connect(&PostgresConfig::new(url)).await?;
            store.ensure_schema().await?;
            info!("PostgreSQL bill store ready");

            Ok(Arc::new(store))
        }
        other => {
            if other != "memory" {
                warn!("Unknown storage backend '{}', using in-memory store", other);
            }
            info!("Using in-memory bill store");
            Ok(Arc::new(InMemoryBillStore::new()))
        }
    }
}

/// Resolve the shared ingestion secret: config, then environment, then a
/// generated value that only lives for this process
fn resolve_ingest_secret(config: &AppConfig) -> String {
    config
        .ingestion
        .shared_secret
        .clone()
        .or_else(|| std::env::var("INGEST_SHARED_SECRET").ok())
        .unwrap_or_else(|| {
            let secret = generate_random_secret();
            warn!(
                "No ingestion secret configured. Generated one for this process: {}. \
                Set INGEST_SHARED_SECRET for a stable secret.",
                secret
            );
            secret
        })
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
