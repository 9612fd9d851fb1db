//! Process-local caching

pub mod swr;

pub use swr::{SwrCache, SwrCacheConfig};
