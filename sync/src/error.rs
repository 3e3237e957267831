//! Remote sync error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Remote unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
