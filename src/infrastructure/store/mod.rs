//! Persistent store implementations

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryBillStore;
pub use postgres::{PostgresBillStore, PostgresConfig};
