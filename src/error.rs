use thiserror::Error;

use crate::db::LedgerError;
use crate::pricing::WeightError;

/// Why a save or lookup did not go through.
///
/// The first three are input problems: nothing was written and the form
/// should keep its values for correction. `StorageFault` means the database
/// failed and the same input can simply be submitted again.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid phone number: expected 10 digits, got {digits}")]
    InvalidPhone { digits: usize },
    #[error("name required")]
    InvalidName,
    #[error("invalid weight: {0}")]
    InvalidWeight(#[from] WeightError),
    #[error("could not reach the ledger: {0}")]
    StorageFault(#[from] LedgerError),
}

impl EntryError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, EntryError::StorageFault(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, EntryError::StorageFault(_))
    }
}
