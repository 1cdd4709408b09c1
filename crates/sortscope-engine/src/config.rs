//! Synthesis options.

use serde::{Deserialize, Serialize};

/// How a comparison whose array index is not a numeric literal is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// Resolve the index to a fixed placeholder: 0 on the left operand,
    /// 1 on the right.
    #[default]
    Placeholder,
    /// Treat the comparison as unrecognized.
    Strict,
}

/// Configuration for the source synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Handling of non-literal indices in comparisons.
    pub index_policy: IndexPolicy,
    /// Emit a `comment` event when a loop is entered. Default: false.
    pub loop_comments: bool,
    /// Maximum replayed loop iterations before synthesis aborts. Default: 1_000_000.
    pub max_steps: usize,
}

impl SynthConfig {
    pub const DEFAULT_MAX_STEPS: usize = 1_000_000;
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            index_policy: IndexPolicy::Placeholder,
            loop_comments: false,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }
}
