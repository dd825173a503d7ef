//! Shared error types for the services crate.

use thiserror::Error;

use mathdash_core::model::AnswerError;

/// Signals returned by `SessionService` when an answer is not scored.
///
/// Neither variant changes any session counter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not active")]
    Inactive,
    #[error(transparent)]
    InvalidInput(#[from] AnswerError),
}
