/*!
Errors raised while building spans, filling the scoring table or reading the two annotation
streams. Inconsistencies inside the gold annotations are *not* errors: they are logged and the
scoring continues.
*/
use crate::span::Span;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, FrameEvalError>;

#[derive(Error, Debug)]
pub enum FrameEvalError {
    /// The range list given to `Span::new` is empty, odd, or contains overlapping ranges.
    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    /// Only two single-range spans that touch can be added together.
    #[error("Cannot add non-adjacent spans: {0} + {1}")]
    NonAdjacentSpan(Span, Span),

    /// The token-level correct count of a row went below zero. This is an accounting bug.
    #[error("Negative correct count ({correct}) for row `{label}`")]
    NegativeCorrectCount { label: String, correct: i64 },

    /// Gold and predicted token sequences differ. Only raised with `TokenCheck::Strict`.
    #[error("Token mismatch in sentence {sentence}: gold `{gold}`, predicted `{predicted}`")]
    TokenMismatch {
        sentence: usize,
        gold: String,
        predicted: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameEvalError {
    pub(crate) fn invalid_span(msg: impl Into<String>) -> Self {
        FrameEvalError::InvalidSpan(msg.into())
    }
}
