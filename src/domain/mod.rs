//! Domain layer: entities, contracts, and pure logic

pub mod bill;
pub mod cache;
pub mod clock;
pub mod error;
pub mod scoring;
pub mod source;

pub use bill::{
    Bill, BillId, BillType, Chamber, LatestAction, Sponsor, Subject, SubjectNormalizer,
};
pub use cache::{BillStore, CacheSource, CachedBill, IngestionMetadata};
pub use clock::{Clock, SystemClock};
pub use error::DomainError;
pub use scoring::score_bill;
pub use source::{BillSource, BillSummary};
