//! One entry point for both trace producers.

use serde::{Deserialize, Serialize};
use sortscope_core::{Algorithm, Trace};

use crate::canonical;
use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::synth::Synthesizer;

/// Where a trace comes from: a code snippet, or a named algorithm and its
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TraceSource {
    Code { code: String },
    Algorithm {
        algorithm: Algorithm,
        values: Vec<i64>,
    },
}

/// Builds the trace for `source`. Canonical generation never fails; only
/// code synthesis can return an error.
pub fn build_trace(source: &TraceSource, config: &SynthConfig) -> Result<Trace, SynthError> {
    match source {
        TraceSource::Code { code } => Synthesizer::new(config.clone()).synthesize(code),
        TraceSource::Algorithm { algorithm, values } => Ok(canonical::generate(*algorithm, values)),
    }
}
