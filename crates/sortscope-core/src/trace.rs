//! Validated, immutable traces and their replay.
//!
//! A [`Trace`] is only ever constructed through [`Trace::from_operations`]
//! (or [`TraceRecorder::finish`](crate::recorder::TraceRecorder::finish),
//! which upholds the same invariants by construction):
//! - exactly one `init`, at step 0;
//! - exactly one `complete`, at the last step;
//! - every index refers to a position in `init.array`.
//!
//! Replay re-applies the events to the initial array and checks that every
//! recorded `values` / `previous` field matches, so a trace that replays
//! cleanly is self-consistent regardless of who produced it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ops::{Operation, OperationKind};

/// An ordered, validated sequence of [`Operation`]s.
///
/// Serializes as a bare JSON array of operations. Deserialization runs the
/// same structural validation as [`Trace::from_operations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Operation>", into = "Vec<Operation>")]
pub struct Trace {
    operations: Vec<Operation>,
}

/// Per-kind event tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCounts {
    pub compares: usize,
    pub swaps: usize,
    pub sets: usize,
    pub highlights: usize,
    pub sorted: usize,
    pub comments: usize,
}

impl Trace {
    /// Validates structure and index ranges, then wraps the events.
    pub fn from_operations(operations: Vec<Operation>) -> Result<Trace, CoreError> {
        let len = match operations.first() {
            None => return Err(CoreError::EmptyTrace),
            Some(Operation::Init { array }) => array.len(),
            Some(_) => return Err(CoreError::MissingInit),
        };
        if !matches!(operations.last(), Some(Operation::Complete)) || operations.len() < 2 {
            return Err(CoreError::MissingComplete);
        }

        let last = operations.len() - 1;
        for (step, op) in operations.iter().enumerate() {
            match op.kind() {
                OperationKind::Init if step != 0 => {
                    return Err(CoreError::MisplacedInit { step });
                }
                OperationKind::Complete if step != last => {
                    return Err(CoreError::MisplacedComplete { step });
                }
                _ => {}
            }
            if let Some(&index) = op.indices().iter().find(|&&i| i >= len) {
                return Err(CoreError::IndexOutOfRange { step, index, len });
            }
        }

        Ok(Trace { operations })
    }

    /// Wraps events already known to be well-formed.
    pub(crate) fn from_recorded(operations: Vec<Operation>) -> Trace {
        debug_assert!(Trace::from_operations(operations.clone()).is_ok());
        Trace { operations }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Number of events, including `init` and `complete`.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// A validated trace always holds at least `init` and `complete`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The starting array recorded by `init`.
    pub fn initial_array(&self) -> &[i64] {
        match self.operations.first() {
            Some(Operation::Init { array }) => array,
            _ => &[],
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn counts(&self) -> OperationCounts {
        let mut counts = OperationCounts::default();
        for op in &self.operations {
            match op.kind() {
                OperationKind::Compare => counts.compares += 1,
                OperationKind::Swap => counts.swaps += 1,
                OperationKind::Set => counts.sets += 1,
                OperationKind::Highlight => counts.highlights += 1,
                OperationKind::Sorted => counts.sorted += 1,
                OperationKind::Comment => counts.comments += 1,
                OperationKind::Init | OperationKind::Complete => {}
            }
        }
        counts
    }

    /// Replays every event and returns the final array.
    pub fn replay(&self) -> Result<Vec<i64>, CoreError> {
        self.state_at(self.operations.len() - 1)
    }

    /// Returns the array after applying events `0..=step`.
    ///
    /// Stepping backward is just asking for an earlier step: every call
    /// replays from `init`, so results never depend on call order.
    pub fn state_at(&self, step: usize) -> Result<Vec<i64>, CoreError> {
        if step >= self.operations.len() {
            return Err(CoreError::StepOutOfRange {
                step,
                len: self.operations.len(),
            });
        }
        let mut state = self.initial_array().to_vec();
        for (i, op) in self.operations[..=step].iter().enumerate() {
            apply(&mut state, i, op)?;
        }
        Ok(state)
    }
}

/// Applies one event to `state`, checking recorded values first.
fn apply(state: &mut [i64], step: usize, op: &Operation) -> Result<(), CoreError> {
    match op {
        Operation::Compare { indices, values } => {
            check_values(state, step, indices, values)?;
        }
        Operation::Swap { indices, values } => {
            check_values(state, step, indices, values)?;
            state.swap(indices[0], indices[1]);
        }
        Operation::Set {
            index,
            value,
            previous,
        } => {
            check_values(state, step, &[*index], &[*previous])?;
            state[*index] = *value;
        }
        Operation::Init { .. }
        | Operation::Highlight { .. }
        | Operation::Sorted { .. }
        | Operation::Complete
        | Operation::Comment { .. } => {}
    }
    Ok(())
}

fn check_values(
    state: &[i64],
    step: usize,
    indices: &[usize],
    recorded: &[i64],
) -> Result<(), CoreError> {
    let found: Vec<i64> = indices.iter().map(|&i| state[i]).collect();
    if found != recorded {
        return Err(CoreError::ReplayMismatch {
            step,
            expected: recorded.to_vec(),
            found,
        });
    }
    Ok(())
}

impl TryFrom<Vec<Operation>> for Trace {
    type Error = CoreError;

    fn try_from(operations: Vec<Operation>) -> Result<Self, Self::Error> {
        Trace::from_operations(operations)
    }
}

impl From<Trace> for Vec<Operation> {
    fn from(trace: Trace) -> Self {
        trace.operations
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

// ---------------------------------------------------------------------------
// Delivery envelopes
// ---------------------------------------------------------------------------

/// The two message shapes the renderer transport accepts: one event at a
/// time, or a whole trace at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceMessage {
    Operation { operation: Operation },
    Operations { operations: Trace },
}

impl TraceMessage {
    /// Splits a trace into single-event messages, in order.
    pub fn stream(trace: &Trace) -> impl Iterator<Item = TraceMessage> + '_ {
        trace.iter().cloned().map(|operation| TraceMessage::Operation { operation })
    }
}

impl From<Trace> for TraceMessage {
    fn from(operations: Trace) -> Self {
        TraceMessage::Operations { operations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn swap_trace() -> Vec<Operation> {
        vec![
            Operation::Init {
                array: vec![5, 3, 1],
            },
            Operation::Compare {
                indices: [0, 1],
                values: [5, 3],
            },
            Operation::Swap {
                indices: [0, 1],
                values: [5, 3],
            },
            Operation::Set {
                index: 2,
                value: 9,
                previous: 1,
            },
            Operation::Sorted {
                indices: smallvec![2],
            },
            Operation::Complete,
        ]
    }

    #[test]
    fn test_valid_trace_replays_to_final_state() {
        let trace = Trace::from_operations(swap_trace()).unwrap();
        assert_eq!(trace.replay().unwrap(), vec![3, 5, 9]);
        assert_eq!(trace.initial_array(), &[5, 3, 1]);
    }

    #[test]
    fn test_state_at_supports_stepping_backward() {
        let trace = Trace::from_operations(swap_trace()).unwrap();
        assert_eq!(trace.state_at(3).unwrap(), vec![3, 5, 9]);
        assert_eq!(trace.state_at(2).unwrap(), vec![3, 5, 1]);
        assert_eq!(trace.state_at(0).unwrap(), vec![5, 3, 1]);
        assert_eq!(
            trace.state_at(6),
            Err(CoreError::StepOutOfRange { step: 6, len: 6 })
        );
    }

    #[test]
    fn test_empty_trace_is_rejected() {
        assert_eq!(Trace::from_operations(vec![]), Err(CoreError::EmptyTrace));
    }

    #[test]
    fn test_trace_must_start_with_init() {
        let ops = vec![Operation::Complete];
        assert_eq!(Trace::from_operations(ops), Err(CoreError::MissingInit));
    }

    #[test]
    fn test_trace_must_end_with_complete() {
        let ops = vec![Operation::Init { array: vec![1] }];
        assert_eq!(Trace::from_operations(ops), Err(CoreError::MissingComplete));
    }

    #[test]
    fn test_second_init_is_misplaced() {
        let ops = vec![
            Operation::Init { array: vec![1] },
            Operation::Init { array: vec![1] },
            Operation::Complete,
        ];
        assert_eq!(
            Trace::from_operations(ops),
            Err(CoreError::MisplacedInit { step: 1 })
        );
    }

    #[test]
    fn test_early_complete_is_misplaced() {
        let ops = vec![
            Operation::Init { array: vec![1] },
            Operation::Complete,
            Operation::Complete,
        ];
        assert_eq!(
            Trace::from_operations(ops),
            Err(CoreError::MisplacedComplete { step: 1 })
        );
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let ops = vec![
            Operation::Init { array: vec![1, 2] },
            Operation::Swap {
                indices: [1, 2],
                values: [2, 0],
            },
            Operation::Complete,
        ];
        assert_eq!(
            Trace::from_operations(ops),
            Err(CoreError::IndexOutOfRange {
                step: 1,
                index: 2,
                len: 2
            })
        );
    }

    #[test]
    fn test_replay_detects_inconsistent_values() {
        let ops = vec![
            Operation::Init { array: vec![4, 2] },
            Operation::Swap {
                indices: [0, 1],
                values: [2, 4],
            },
            Operation::Complete,
        ];
        let trace = Trace::from_operations(ops).unwrap();
        assert_eq!(
            trace.replay(),
            Err(CoreError::ReplayMismatch {
                step: 1,
                expected: vec![2, 4],
                found: vec![4, 2],
            })
        );
    }

    #[test]
    fn test_counts_tally_each_kind() {
        let trace = Trace::from_operations(swap_trace()).unwrap();
        let counts = trace.counts();
        assert_eq!(counts.compares, 1);
        assert_eq!(counts.swaps, 1);
        assert_eq!(counts.sets, 1);
        assert_eq!(counts.sorted, 1);
        assert_eq!(counts.highlights, 0);
    }

    #[test]
    fn test_trace_serializes_as_bare_array_and_validates_on_read() {
        let trace = Trace::from_operations(swap_trace()).unwrap();
        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.starts_with(r#"[{"type":"init""#));
        let back: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);

        let bad = r#"[{"type":"complete"}]"#;
        assert!(serde_json::from_str::<Trace>(bad).is_err());
    }

    #[test]
    fn test_envelopes_match_transport_shapes() {
        let trace = Trace::from_operations(vec![
            Operation::Init { array: vec![] },
            Operation::Complete,
        ])
        .unwrap();

        let whole = serde_json::to_value(TraceMessage::from(trace.clone())).unwrap();
        assert_eq!(
            whole,
            serde_json::json!({
                "type": "operations",
                "operations": [{"type": "init", "array": []}, {"type": "complete"}]
            })
        );

        let stream: Vec<_> = TraceMessage::stream(&trace).collect();
        assert_eq!(stream.len(), 2);
        let first = serde_json::to_value(&stream[0]).unwrap();
        assert_eq!(
            first,
            serde_json::json!({"type": "operation", "operation": {"type": "init", "array": []}})
        );
    }
}
