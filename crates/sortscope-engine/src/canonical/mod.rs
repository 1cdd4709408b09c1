//! Canonical trace generators.
//!
//! Textbook simulations of the named algorithms over a private copy of the
//! input. They share the event schema with the synthesizer and serve as the
//! reference output for source code of the same shape.

mod bubble;
mod insertion;
mod selection;

use sortscope_core::{Algorithm, Trace, TraceRecorder};
use tracing::debug;

pub use bubble::bubble_sort;
pub use insertion::insertion_sort;
pub use selection::selection_sort;

/// Generates the trace of `algorithm` sorting `values` ascending.
pub fn generate(algorithm: Algorithm, values: &[i64]) -> Trace {
    debug!(%algorithm, len = values.len(), "generating canonical trace");
    let mut recorder = TraceRecorder::new(values.to_vec());
    match algorithm {
        Algorithm::BubbleSort => bubble_sort(&mut recorder),
        Algorithm::SelectionSort => selection_sort(&mut recorder),
        Algorithm::InsertionSort => insertion_sort(&mut recorder),
    }
    recorder.finish()
}
