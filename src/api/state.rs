//! Application state for shared services

use std::sync::Arc;

use crate::domain::cache::BillStore;
use crate::domain::{Bill, BillId, DomainError};
use crate::infrastructure::services::{
    BillService, FeedPage, FeedService, IngestionReport, IngestionService, SearchPage,
    SearchQuery, SearchService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub feed_service: Arc<dyn FeedServiceTrait>,
    pub search_service: Arc<dyn SearchServiceTrait>,
    pub bill_service: Arc<dyn BillServiceTrait>,
    pub ingestion_service: Arc<dyn IngestionServiceTrait>,
    pub store: Arc<dyn BillStore>,
    pub ingest_secret: Arc<String>,
    pub default_congress: u16,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        feed_service: Arc<dyn FeedServiceTrait>,
        search_service: Arc<dyn SearchServiceTrait>,
        bill_service: Arc<dyn BillServiceTrait>,
        ingestion_service: Arc<dyn IngestionServiceTrait>,
        store: Arc<dyn BillStore>,
        ingest_secret: String,
        default_congress: u16,
    ) -> Self {
        Self {
            feed_service,
            search_service,
            bill_service,
            ingestion_service,
            store,
            ingest_secret: Arc::new(ingest_secret),
            default_congress,
        }
    }
}

/// Trait for the ranked feed read path
#[async_trait::async_trait]
pub trait FeedServiceTrait: Send + Sync {
    async fn feed(&self, congress: u16, limit: usize, offset: usize)
        -> Result<FeedPage, DomainError>;
}

/// Trait for bill search
#[async_trait::async_trait]
pub trait SearchServiceTrait: Send + Sync {
    async fn search(&self, query: SearchQuery) -> Result<SearchPage, DomainError>;
}

/// Trait for single-bill detail lookups
#[async_trait::async_trait]
pub trait BillServiceTrait: Send + Sync {
    async fn bill(&self, id: &BillId) -> Result<Bill, DomainError>;
    async fn clear_cache(&self);
}

/// Trait for the on-demand ingestion job
#[async_trait::async_trait]
pub trait IngestionServiceTrait: Send + Sync {
    async fn run(&self, congress: u16) -> Result<IngestionReport, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl FeedServiceTrait for FeedService {
    async fn feed(
        &self,
        congress: u16,
        limit: usize,
        offset: usize,
    ) -> Result<FeedPage, DomainError> {
        FeedService::feed(self, congress, limit, offset).await
    }
}

#[async_trait::async_trait]
impl SearchServiceTrait for SearchService {
    async fn search(&self, query: SearchQuery) -> Result<SearchPage, DomainError> {
        SearchService::search(self, query).await
    }
}

#[async_trait::async_trait]
impl BillServiceTrait for BillService {
    async fn bill(&self, id: &BillId) -> Result<Bill, DomainError> {
        BillService::bill(self, id).await
    }

    async fn clear_cache(&self) {
        BillService::clear_cache(self).await
    }
}

#[async_trait::async_trait]
impl IngestionServiceTrait for IngestionService {
    async fn run(&self, congress: u16) -> Result<IngestionReport, DomainError> {
        IngestionService::run(self, congress).await
    }
}
