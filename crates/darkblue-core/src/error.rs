//! Evaluation error types.
//!
//! These are the only failures the evaluator can produce. Both are raised
//! before any finding is emitted, so a failed evaluation never yields a
//! partial answer key.

use thiserror::Error;

/// Errors that abort an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The `format` attribute is missing or is not the recognized marker.
    #[error("not a DarkBlue configuration document (format: {})", describe(.found))]
    Format { found: Option<String> },

    /// The `OS` attribute is missing or names an unsupported platform.
    #[error("unsupported operating system: {}", describe(.found))]
    UnsupportedPlatform { found: Option<String> },
}

impl EvaluationError {
    /// Returns `true` for errors caused by the document header rather than its platform.
    pub fn is_format_error(&self) -> bool {
        matches!(self, EvaluationError::Format { .. })
    }
}

fn describe(found: &Option<String>) -> String {
    match found {
        Some(value) => format!("{value:?}"),
        None => "missing".to_string(),
    }
}
