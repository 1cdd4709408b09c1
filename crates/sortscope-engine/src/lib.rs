//! Trace synthesis and canonical trace generation.
//!
//! Two producers share the operation schema of `sortscope_core`:
//!
//! - [`synth`] reads a JavaScript snippet, finds the array it sorts, and
//!   replays the recognized array operations against a shadow copy without
//!   executing anything.
//! - [`canonical`] simulates bubble, selection and insertion sort directly
//!   on a list of values.
//!
//! [`build_trace`] routes a [`TraceSource`] to the right one.
//!
//! # Usage
//!
//! ```ignore
//! let trace = sortscope_engine::synthesize("let a = [2, 1]; [a[0], a[1]] = [a[1], a[0]];")?;
//! assert_eq!(trace.replay()?, vec![1, 2]);
//! ```

pub mod canonical;
pub mod config;
pub mod error;
pub mod input;
pub mod source;
pub mod synth;

pub use canonical::generate;
pub use config::{IndexPolicy, SynthConfig};
pub use error::SynthError;
pub use input::random_values;
pub use source::{build_trace, TraceSource};
pub use synth::{synthesize, Synthesizer};
