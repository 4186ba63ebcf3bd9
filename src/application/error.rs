use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to read ledger {}: {reason}", path.display())]
    StorageRead { path: PathBuf, reason: String },

    #[error("Failed to write ledger {}: {reason}", path.display())]
    StorageWrite { path: PathBuf, reason: String },

    #[error("No expenses recorded yet")]
    EmptyLedger,
}

impl LedgerError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        LedgerError::StorageRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        LedgerError::StorageWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
