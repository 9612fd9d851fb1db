//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, IngestionSettings, LogFormat, LoggingConfig, MetricsConfig,
    ServerConfig, StorageConfig, UpstreamConfig,
};
