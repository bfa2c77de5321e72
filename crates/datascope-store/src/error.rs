//! Store error types.

use datascope_core::CoreError;
use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store boundaries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record failed domain validation on write.
    #[error(transparent)]
    InvalidRecord(#[from] CoreError),

    /// The backing store failed.
    #[error("store backend error: {0}")]
    Backend(String),
}
