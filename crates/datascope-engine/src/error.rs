//! Engine error types.

use datascope_store::StoreError;
use thiserror::Error;

/// Result type alias using `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the scoping engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A store boundary failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A second indirect handler was registered for a namespace. The
    /// registry is append-only and populated once at startup.
    #[error("indirect handler already registered for namespace {0:?}")]
    HandlerAlreadyRegistered(String),

    /// An indirect handler failed while deriving a predicate.
    #[error("indirect handler for namespace {namespace:?} failed: {message}")]
    Handler {
        /// The namespace whose handler failed.
        namespace: String,
        /// Failure detail.
        message: String,
    },
}
