//! Cross-cutting error types for Tare.
//!
//! Domain-specific errors (`BoardError`, `StoreError`, `SyncError`) live in
//! their respective crates. Everything converges on `anyhow` in the daemon
//! binary.

use thiserror::Error;

/// Errors that can be raised by any Tare crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value failed a domain invariant (e.g. user id below 1).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
