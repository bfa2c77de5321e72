//! Core error types.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core domain types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity-type key did not have the `namespace.name` shape.
    #[error("invalid entity type key: {0:?}")]
    InvalidEntityTypeKey(String),

    /// A grant record violates a structural invariant.
    #[error("invalid grant {id}: {reason}")]
    InvalidGrant {
        /// The offending grant id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
}
