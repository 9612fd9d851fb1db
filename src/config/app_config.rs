use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub ingestion: IngestionSettings,
    pub storage: StorageConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Upstream legislative data source settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// API key; falls back to the CONGRESS_API_KEY environment variable
    pub api_key: Option<String>,
    pub list_timeout_secs: u64,
    pub item_timeout_secs: u64,
}

/// Freshness windows and memory-cache bounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Persistent-cache freshness window for the feed path
    pub freshness_window_secs: u64,
    /// Memory cache hard TTL
    pub memory_ttl_secs: u64,
    /// Extra stale-while-revalidate window past the TTL
    pub memory_stale_extra_secs: u64,
    /// Memory cache entry cap
    pub memory_max_entries: u64,
}

/// Ingestion job settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Legislative session ingested and served by default
    pub congress: u16,
    pub page_limit: usize,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    /// Shared secret for the ingestion trigger; falls back to the
    /// INGEST_SHARED_SECRET environment variable, then a generated value
    pub shared_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// "memory" or "postgres" (postgres requires DATABASE_URL)
    pub backend: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.congress.gov/v3".to_string(),
            api_key: None,
            list_timeout_secs: 30,
            item_timeout_secs: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: 3600,
            memory_ttl_secs: 3600,
            memory_stale_extra_secs: 7200,
            memory_max_entries: 256,
        }
    }
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            congress: 119,
            page_limit: 50,
            batch_size: 10,
            batch_delay_ms: 1000,
            shared_secret: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "/metrics".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
