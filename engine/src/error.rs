//! Error types for the Formwright engine.

use crate::{FormId, OptionId};
use thiserror::Error;

/// All possible errors from the Formwright engine.
///
/// Per-field validation messages are not errors; they are reported through
/// [`crate::ValidationErrors`] and recovered by the filler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Model errors
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("option not found: {0}")]
    OptionNotFound(OptionId),

    #[error("invalid field: {0}")]
    InvalidField(String),

    // Registry errors
    #[error("form not found: {0}")]
    FormNotFound(FormId),

    #[error("form already published: {0}")]
    FormAlreadyPublished(FormId),

    // Boundary errors
    #[error("invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("submission failed: {0}")]
    Transport(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UnknownFieldType("slider".into());
        assert_eq!(err.to_string(), "unknown field type: slider");

        let err = Error::FormNotFound("abc".into());
        assert_eq!(err.to_string(), "form not found: abc");

        let err = Error::Transport("connection refused".into());
        assert_eq!(err.to_string(), "submission failed: connection refused");
    }
}
