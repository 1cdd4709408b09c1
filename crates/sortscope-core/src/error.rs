//! Core error types for sortscope-core.
//!
//! Uses `thiserror` for structured, matchable variants covering trace
//! validation, replay, and algorithm selection failures.

use thiserror::Error;

/// Errors produced by the sortscope-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A trace with no events at all.
    #[error("trace is empty")]
    EmptyTrace,

    /// The first event is not `init`.
    #[error("trace does not start with an init event")]
    MissingInit,

    /// An `init` event appears after the first position.
    #[error("unexpected init event at step {step}")]
    MisplacedInit { step: usize },

    /// The last event is not `complete`.
    #[error("trace does not end with a complete event")]
    MissingComplete,

    /// A `complete` event appears before the last position.
    #[error("unexpected complete event at step {step}")]
    MisplacedComplete { step: usize },

    /// An event refers to a position outside the array.
    #[error("index {index} out of range at step {step} (array length {len})")]
    IndexOutOfRange { step: usize, index: usize, len: usize },

    /// A recorded value disagrees with the replayed array state.
    #[error("replay mismatch at step {step}: recorded {expected:?}, replayed {found:?}")]
    ReplayMismatch {
        step: usize,
        expected: Vec<i64>,
        found: Vec<i64>,
    },

    /// A step number past the end of the trace.
    #[error("step {step} out of range (trace has {len} events)")]
    StepOutOfRange { step: usize, len: usize },

    /// An algorithm name that is not one of the canonical generators.
    #[error("unknown algorithm: '{name}' (expected bubbleSort, selectionSort or insertionSort)")]
    UnknownAlgorithm { name: String },
}
