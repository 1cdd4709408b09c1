//! Hard failures of a synthesis call.
//!
//! Anything that reaches the caller as a [`SynthError`] aborts the whole
//! call: no partial trace is returned. Nodes that merely fail to match a
//! known shape never surface here; the pattern classifiers turn them into
//! `Unrecognized` and the engine skips them.

use sortscope_syntax::SyntaxError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("no array found: {reason}")]
    NoArrayFound { reason: String },

    #[error("step limit ({limit}) exceeded while replaying loops")]
    StepLimitExceeded { limit: usize },
}

impl SynthError {
    /// True for failures caused by the input text not parsing.
    pub fn is_syntax(&self) -> bool {
        matches!(self, SynthError::Syntax(_))
    }
}
