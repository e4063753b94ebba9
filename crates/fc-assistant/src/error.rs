//! Assistant error types.
//!
//! None of these reach the end user: the generator turns every LLM failure
//! into a template reply, and the assistant turns store failures into empty
//! context. They exist so the fallback sites can log what went wrong.

use fc_db::error::DatabaseError;
use thiserror::Error;

/// Errors from the remote chat-completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error, including timeouts and refused connections.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The API answered but the completion text was blank.
    #[error("empty completion")]
    EmptyCompletion,
}

impl LlmError {
    /// Whether the request never reached the server.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect())
    }
}

#[derive(Debug, Error)]
pub enum AssistantError {
    /// The completion client could not be built or called.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The store rejected a read.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
