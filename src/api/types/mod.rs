//! Shared API types

pub mod bill;
pub mod error;

pub use bill::{BillResponse, LatestActionResponse, ProvenanceMeta};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
