//! Infrastructure layer: trait implementations and application services

pub mod cache;
pub mod logging;
pub mod observability;
pub mod services;
pub mod store;
pub mod subjects;
pub mod upstream;
