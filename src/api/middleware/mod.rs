//! API middleware

pub mod ingest_auth;
pub mod metrics;

pub use ingest_auth::RequireIngestSecret;
pub use metrics::metrics_middleware;
