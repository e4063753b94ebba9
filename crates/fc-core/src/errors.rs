//! Cross-cutting error types for FlowCaser.
//!
//! Domain-specific errors (`DatabaseError`, `LlmError`, ...) live in their
//! respective crates.

use thiserror::Error;

/// Errors that can be raised by any FlowCaser crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
