//! Store error types

use thiserror::Error;

/// Errors raised by persistent store backends.
///
/// The ledger never surfaces these to its callers; they are logged and dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
