//! Bill identity validation

use thiserror::Error;

use crate::domain::DomainError;

/// The first congress with data in the upstream source
pub const MIN_CONGRESS: u16 = 93;

/// Upper bound kept loose; rejects obviously bogus path parameters
pub const MAX_CONGRESS: u16 = 200;

/// Validation errors for bill identity components
#[derive(Debug, Error)]
pub enum BillValidationError {
    #[error("Unknown bill type '{0}'")]
    UnknownBillType(String),

    #[error("Congress number {0} out of range ({MIN_CONGRESS}-{MAX_CONGRESS})")]
    CongressOutOfRange(u16),
}

impl From<BillValidationError> for DomainError {
    fn from(err: BillValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

pub fn validate_congress(congress: u16) -> Result<(), BillValidationError> {
    if !(MIN_CONGRESS..=MAX_CONGRESS).contains(&congress) {
        return Err(BillValidationError::CongressOutOfRange(congress));
    }
    Ok(())
}
