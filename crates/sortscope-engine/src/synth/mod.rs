//! Static trace synthesis from source code.
//!
//! The pipeline runs once per call and owns all of its state:
//!
//! ```text
//! parse -> discover array -> init -> analyze loops -> shadow replay -> complete
//! ```
//!
//! Nothing in the snippet is executed. Only the shapes recognized by
//! [`pattern`] produce events; everything else is skipped.

pub mod discovery;
pub mod engine;
pub mod loops;
pub mod pattern;

use sortscope_core::{Trace, TraceRecorder};
use tracing::{debug, info};

use crate::config::SynthConfig;
use crate::error::SynthError;
use engine::ShadowEngine;
use loops::LoopShape;
use pattern::Classifier;

pub use discovery::{discover, DiscoveredArray};
pub use pattern::Pattern;

/// Synthesizes a trace from `source` with the given configuration.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    pub fn new(config: SynthConfig) -> Self {
        Synthesizer { config }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn synthesize(&self, source: &str) -> Result<Trace, SynthError> {
        let program = sortscope_syntax::parse(source)?;
        let array = discover(&program)?;

        let classifier = Classifier::new(&array.name, self.config.index_policy);
        let shape = loops::analyze(&program, &classifier, array.values.len());
        debug!(shape = shape_name(&shape), "classified loop structure");

        let recorder = TraceRecorder::new(array.values.clone());
        let recorder = ShadowEngine::new(classifier, recorder, &self.config).run(&program, &shape)?;
        let trace = recorder.finish();

        let counts = trace.counts();
        info!(
            array = %array.name,
            operations = trace.len(),
            compares = counts.compares,
            swaps = counts.swaps,
            "synthesized trace"
        );
        Ok(trace)
    }
}

/// Synthesizes a trace from `source` with the default configuration.
pub fn synthesize(source: &str) -> Result<Trace, SynthError> {
    Synthesizer::default().synthesize(source)
}

fn shape_name(shape: &LoopShape<'_>) -> &'static str {
    match shape {
        LoopShape::None => "none",
        LoopShape::Single { .. } => "single",
        LoopShape::Nested { .. } => "nested",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexPolicy;
    use sortscope_core::Operation;

    #[test]
    fn test_literal_swap_program() {
        let trace = synthesize("let arr=[5,3,1]; [arr[0],arr[1]]=[arr[1],arr[0]];").unwrap();
        assert_eq!(
            trace.operations(),
            &[
                Operation::Init {
                    array: vec![5, 3, 1]
                },
                Operation::Swap {
                    indices: [0, 1],
                    values: [5, 3]
                },
                Operation::Complete,
            ]
        );
        assert_eq!(trace.replay().unwrap(), vec![3, 5, 1]);
    }

    #[test]
    fn test_set_records_previous_value() {
        let trace = synthesize("let arr = [4, 4]; arr[1] = 9;").unwrap();
        assert_eq!(
            trace.operations()[1],
            Operation::Set {
                index: 1,
                value: 9,
                previous: 4
            }
        );
    }

    #[test]
    fn test_out_of_range_literal_is_dropped() {
        let trace = synthesize("let arr = [1, 2]; [arr[0], arr[5]] = [arr[5], arr[0]];").unwrap();
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn test_single_loop_replays_literal_swap_each_iteration() {
        let trace = synthesize(
            "let arr = [1, 2, 3];
             for (let i = 0; i < 2; i++) { [arr[0], arr[2]] = [arr[2], arr[0]]; }",
        )
        .unwrap();
        assert_eq!(trace.counts().swaps, 2);
        assert_eq!(trace.replay().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_loop_ignores_comparisons() {
        let trace = synthesize(
            "let arr = [2, 1];
             for (let i = 0; i < arr.length; i++) { if (arr[0] > arr[1]) {} }",
        )
        .unwrap();
        assert_eq!(trace.counts().compares, 0);
    }

    #[test]
    fn test_loop_comments() {
        let synth = Synthesizer::new(SynthConfig {
            loop_comments: true,
            ..SynthConfig::default()
        });
        let trace = synth
            .synthesize("let arr = [1, 2]; for (let i = 0; i < 1; i++) {}")
            .unwrap();
        assert!(matches!(
            &trace.operations()[1],
            Operation::Comment { message } if message == "single loop: i from 0 to 1"
        ));
    }

    #[test]
    fn test_strict_policy_drops_placeholder_compare() {
        let source = "let arr = [2, 1]; if (arr[i] > arr[j]) {}";
        assert_eq!(synthesize(source).unwrap().counts().compares, 1);

        let strict = Synthesizer::new(SynthConfig {
            index_policy: IndexPolicy::Strict,
            ..SynthConfig::default()
        });
        assert_eq!(strict.synthesize(source).unwrap().counts().compares, 0);
    }

    #[test]
    fn test_nested_with_always_swap() {
        let trace = synthesize(
            "let arr = [1, 2, 3];
             for (let i = 0; i < 1; i++)
                 for (let j = 0; j < arr.length - 1; j++)
                     [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];",
        )
        .unwrap();
        assert_eq!(trace.counts().compares, 2);
        assert_eq!(trace.counts().swaps, 2);
        assert_eq!(trace.counts().sorted, 0);
        assert_eq!(trace.replay().unwrap(), vec![2, 3, 1]);
    }

    #[test]
    fn test_descending_guard() {
        let trace = synthesize(
            "let arr = [1, 3, 2];
             for (let i = 0; i < arr.length - 1; i++)
                 for (let j = 0; j < arr.length - i - 1; j++)
                     if (arr[j] < arr[j + 1]) [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];",
        )
        .unwrap();
        assert_eq!(trace.replay().unwrap(), vec![3, 2, 1]);
        assert_eq!(trace.counts().compares, 3);
        assert_eq!(trace.counts().sorted, 2);
    }

    #[test]
    fn test_sets_around_single_loop_are_applied() {
        let trace = synthesize(
            "let arr = [1, 2, 3]; arr[0] = 9;
             for (let i = 0; i < 1; i++) {}
             arr[2] = 7;",
        )
        .unwrap();
        assert_eq!(
            trace.operations(),
            &[
                Operation::Init {
                    array: vec![1, 2, 3]
                },
                Operation::Set {
                    index: 0,
                    value: 9,
                    previous: 1
                },
                Operation::Set {
                    index: 2,
                    value: 7,
                    previous: 3
                },
                Operation::Complete,
            ]
        );
    }

    #[test]
    fn test_set_before_nested_loops_feeds_later_compares() {
        let trace = synthesize(
            "let arr = [3, 1, 2]; arr[0] = 0;
             for (let i = 0; i < arr.length - 1; i++)
                 for (let j = 0; j < arr.length - i - 1; j++)
                     if (arr[j] > arr[j + 1]) [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];",
        )
        .unwrap();
        assert_eq!(
            trace.operations()[1],
            Operation::Set {
                index: 0,
                value: 0,
                previous: 3
            }
        );
        assert_eq!(
            trace.operations()[2],
            Operation::Compare {
                indices: [0, 1],
                values: [0, 1]
            }
        );
        assert_eq!(trace.counts().swaps, 0);
        assert_eq!(trace.replay().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_set_in_outer_body_runs_each_outer_iteration() {
        let trace = synthesize(
            "let arr = [1, 2, 3];
             for (let i = 0; i < 2; i++) {
                 for (let j = 0; j < arr.length - 1; j++) {
                     if (arr[j] > arr[j + 1]) [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];
                 }
                 arr[0] = 9;
             }",
        )
        .unwrap();
        assert_eq!(trace.counts().sets, 2);
        assert_eq!(trace.counts().swaps, 2);
        assert_eq!(trace.replay().unwrap(), vec![9, 3, 9]);
    }

    #[test]
    fn test_extreme_outer_start_does_not_overflow() {
        let synth = Synthesizer::new(SynthConfig {
            max_steps: 50,
            ..SynthConfig::default()
        });
        let err = synth
            .synthesize(
                "let arr = [3, 1, 2];
                 for (let i = -1e30; i < 2; i++)
                     for (let j = 0; j < arr.length - i - 1; j++)
                         if (arr[j] > arr[j + 1]) [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];",
            )
            .unwrap_err();
        assert_eq!(err, SynthError::StepLimitExceeded { limit: 50 });
    }

    #[test]
    fn test_step_limit() {
        let synth = Synthesizer::new(SynthConfig {
            max_steps: 10,
            ..SynthConfig::default()
        });
        let err = synth
            .synthesize("let arr = [1]; for (let i = 0; i < 100; i++) {}")
            .unwrap_err();
        assert_eq!(err, SynthError::StepLimitExceeded { limit: 10 });
    }
}
