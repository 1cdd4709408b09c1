//! End-to-end tests for trace synthesis and canonical generation.
//!
//! Each test feeds a complete snippet (or an algorithm name and values)
//! through the public entry points and checks the resulting trace against
//! the canonical generators or a hand-written expectation.

use sortscope_core::{Algorithm, CoreError, Operation, Trace, TraceMessage};
use sortscope_engine::{
    build_trace, generate, synthesize, IndexPolicy, SynthConfig, SynthError, Synthesizer,
    TraceSource,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const BUBBLE_SORT: &str = r#"
    // classic bubble sort
    let arr = [5, 3, 8, 1];
    for (let i = 0; i < arr.length - 1; i++) {
        for (let j = 0; j < arr.length - i - 1; j++) {
            if (arr[j] > arr[j + 1]) {
                [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];
            }
        }
    }
    console.log(arr);
"#;

const BUBBLE_SORT_TEMP_SWAP: &str = r#"
    var arr = [5, 3, 8, 1]
    for (var i = 0; i < arr.length - 1; i++) {
        for (var j = 0; j < arr.length - i - 1; j++) {
            if (arr[j] > arr[j + 1]) {
                const tmp = arr[j]
                arr[j] = arr[j + 1]
                arr[j + 1] = tmp
            }
        }
    }
"#;

fn swaps(trace: &Trace) -> Vec<[usize; 2]> {
    trace
        .iter()
        .filter_map(|op| match op {
            Operation::Swap { indices, .. } => Some(*indices),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

#[test]
fn test_literal_swap_yields_exact_trace() {
    let trace = synthesize("let arr=[5,3,1]; [arr[0],arr[1]]=[arr[1],arr[0]];").unwrap();
    let json = serde_json::to_value(&trace).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "init", "array": [5, 3, 1]},
            {"type": "swap", "indices": [0, 1], "values": [5, 3]},
            {"type": "complete"}
        ])
    );
    assert_eq!(trace.replay().unwrap(), vec![3, 5, 1]);
}

#[test]
fn test_bubble_sort_code_matches_generator() {
    let synthesized = synthesize(BUBBLE_SORT).unwrap();
    let generated = generate(Algorithm::BubbleSort, &[5, 3, 8, 1]);

    assert_eq!(synthesized.counts(), generated.counts());
    assert_eq!(synthesized.replay().unwrap(), vec![1, 3, 5, 8]);
    assert_eq!(synthesized, generated);
}

#[test]
fn test_temp_variable_swap_is_recognized_as_guard() {
    let synthesized = synthesize(BUBBLE_SORT_TEMP_SWAP).unwrap();
    let generated = generate(Algorithm::BubbleSort, &[5, 3, 8, 1]);
    assert_eq!(swaps(&synthesized), swaps(&generated));
}

#[test]
fn test_first_declared_array_is_used() {
    let trace = synthesize(
        "let first = [2, 1];
         let second = [9, 8, 7];
         [second[0], second[1]] = [second[1], second[0]];
         [first[0], first[1]] = [first[1], first[0]];",
    )
    .unwrap();
    assert_eq!(trace.initial_array(), &[2, 1]);
    assert_eq!(swaps(&trace), vec![[0, 1]]);
}

#[test]
fn test_array_in_earlier_initializer_wins_over_later_sibling() {
    let trace = synthesize("let f = () => { let a = [7, 8]; }, b = [1, 2];").unwrap();
    assert_eq!(trace.initial_array(), &[7, 8]);
}

#[test]
fn test_top_level_sets_survive_every_loop_shape() {
    let sources = [
        "let arr = [4, 5, 6]; arr[0] = 1; arr[2] = 3;",
        "let arr = [4, 5, 6]; arr[0] = 1; for (let i = 0; i < 2; i++) {} arr[2] = 3;",
        "let arr = [4, 5, 6]; arr[0] = 1;
         for (let i = 0; i < arr.length - 1; i++)
             for (let j = 0; j < arr.length - i - 1; j++)
                 if (arr[j] > arr[j + 1]) [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];
         arr[2] = 3;",
    ];
    for source in sources {
        let trace = synthesize(source).unwrap();
        let sets: Vec<_> = trace
            .iter()
            .filter(|op| matches!(op, Operation::Set { .. }))
            .cloned()
            .collect();
        assert_eq!(
            sets,
            vec![
                Operation::Set {
                    index: 0,
                    value: 1,
                    previous: 4
                },
                Operation::Set {
                    index: 2,
                    value: 3,
                    previous: 6
                },
            ],
            "source: {}",
            source
        );
        assert_eq!(trace.replay().unwrap(), vec![1, 5, 3], "source: {}", source);
    }
}

#[test]
fn test_bare_comparison_yields_single_compare() {
    let trace = synthesize("let arr = [4, 2]; if (arr[0] > arr[1]) {}").unwrap();
    assert_eq!(
        trace.operations(),
        &[
            Operation::Init { array: vec![4, 2] },
            Operation::Compare {
                indices: [0, 1],
                values: [4, 2]
            },
            Operation::Complete,
        ]
    );
}

#[test]
fn test_zero_loop_scan_ignores_control_flow() {
    let trace = synthesize(
        "let arr = [1, 2, 3];
         if (false) { [arr[0], arr[2]] = [arr[2], arr[0]]; } else { arr[1] = 7; }",
    )
    .unwrap();
    assert_eq!(trace.replay().unwrap(), vec![3, 7, 1]);
}

#[test]
fn test_function_bodies_are_not_replayed() {
    let trace = synthesize(
        "let arr = [3, 2, 1];
         function sort(a) {
             for (let i = 0; i < a.length; i++) { [arr[0], arr[1]] = [arr[1], arr[0]]; }
         }
         sort(arr);",
    )
    .unwrap();
    assert_eq!(trace.len(), 2);
}

#[test]
fn test_missing_array_is_a_hard_failure() {
    let err = synthesize("let n = 3; for (let i = 0; i < n; i++) {}").unwrap_err();
    assert!(matches!(err, SynthError::NoArrayFound { .. }));
}

#[test]
fn test_syntax_error_is_a_hard_failure() {
    let err = synthesize("let arr = [1, 2; for (").unwrap_err();
    assert!(err.is_syntax());
    assert!(err.to_string().starts_with("parse error at 1:"));
}

#[test]
fn test_strict_indices_drop_unresolved_comparisons() {
    let source = "let arr = [3, 1]; while (arr[i] > arr[i + 1]) {}";
    let strict = Synthesizer::new(SynthConfig {
        index_policy: IndexPolicy::Strict,
        ..SynthConfig::default()
    });
    // A single while loop is replayed without comparisons either way.
    assert_eq!(synthesize(source).unwrap().counts().compares, 0);
    assert_eq!(strict.synthesize(source).unwrap().counts().compares, 0);

    let source = "let arr = [3, 1]; const bigger = arr[i] > arr[i + 1];";
    assert_eq!(synthesize(source).unwrap().counts().compares, 1);
    assert_eq!(strict.synthesize(source).unwrap().counts().compares, 0);
}

#[test]
fn test_loop_comments_mark_each_pass() {
    let synth = Synthesizer::new(SynthConfig {
        loop_comments: true,
        ..SynthConfig::default()
    });
    let trace = synth.synthesize(BUBBLE_SORT).unwrap();
    // One for the outer loop, one per outer pass.
    assert_eq!(trace.counts().comments, 4);
    assert!(matches!(
        &trace.operations()[1],
        Operation::Comment { message } if message == "outer loop: i from 0 to 3"
    ));
}

#[test]
fn test_step_limit_aborts_without_partial_trace() {
    let synth = Synthesizer::new(SynthConfig {
        max_steps: 5,
        ..SynthConfig::default()
    });
    let err = synth.synthesize(BUBBLE_SORT).unwrap_err();
    assert_eq!(err, SynthError::StepLimitExceeded { limit: 5 });
}

#[test]
fn test_repeated_calls_are_independent() {
    let a = synthesize(BUBBLE_SORT).unwrap();
    let b = synthesize(BUBBLE_SORT).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Canonical generators and delivery shapes
// ---------------------------------------------------------------------------

#[test]
fn test_empty_input_yields_two_events() {
    for algorithm in Algorithm::ALL {
        let trace = build_trace(
            &TraceSource::Algorithm {
                algorithm,
                values: vec![],
            },
            &SynthConfig::default(),
        )
        .unwrap();
        assert_eq!(trace.len(), 2);
    }
}

#[test]
fn test_stream_and_batch_envelopes() {
    let trace = generate(Algorithm::InsertionSort, &[2, 1]);
    let lines: Vec<String> = TraceMessage::stream(&trace)
        .map(|msg| serde_json::to_string(&msg).unwrap())
        .collect();
    assert_eq!(lines.len(), trace.len());
    assert_eq!(
        lines[0],
        r#"{"type":"operation","operation":{"type":"init","array":[2,1]}}"#
    );

    let batch = serde_json::to_value(TraceMessage::from(trace.clone())).unwrap();
    assert_eq!(batch["type"], "operations");
    assert_eq!(batch["operations"].as_array().unwrap().len(), trace.len());
}

#[test]
fn test_tampered_trace_fails_replay() {
    let mut ops = generate(Algorithm::SelectionSort, &[3, 1, 2]).into_operations();
    if let Some(Operation::Compare { values, .. }) = ops.get_mut(2) {
        values[0] += 100;
    }
    let trace = Trace::from_operations(ops).unwrap();
    assert!(matches!(
        trace.replay(),
        Err(CoreError::ReplayMismatch { step: 2, .. })
    ));
}
