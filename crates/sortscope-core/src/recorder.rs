//! Shadow array plus event log for a single trace-producing call.
//!
//! Both the source synthesizer and the canonical generators drive a
//! [`TraceRecorder`]. It is the only writer of its shadow array, and it
//! mutates that array in lockstep with emission, so every recorded
//! `values` field is the true pre-mutation state.
//!
//! Out-of-range indices are rejected here rather than by callers: the
//! method returns `None`/`false`, nothing is emitted, and the array is left
//! untouched.

use tracing::debug;

use crate::ops::{HighlightColor, IndexList, Operation};
use crate::trace::Trace;

#[derive(Debug, Clone)]
pub struct TraceRecorder {
    shadow: Vec<i64>,
    operations: Vec<Operation>,
}

impl TraceRecorder {
    /// Seeds the shadow array and records the `init` event.
    pub fn new(initial: Vec<i64>) -> Self {
        let operations = vec![Operation::Init {
            array: initial.clone(),
        }];
        TraceRecorder {
            shadow: initial,
            operations,
        }
    }

    /// Length of the shadow array (fixed for the recorder's lifetime).
    pub fn array_len(&self) -> usize {
        self.shadow.len()
    }

    /// Current shadow array contents.
    pub fn values(&self) -> &[i64] {
        &self.shadow
    }

    /// Value at `index`, or `None` when out of range.
    pub fn value(&self, index: usize) -> Option<i64> {
        self.shadow.get(index).copied()
    }

    /// Events recorded so far (`init` included, `complete` not yet).
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn in_range(&self, index: usize) -> bool {
        if index < self.shadow.len() {
            true
        } else {
            debug!(index, len = self.shadow.len(), "rejecting out-of-range index");
            false
        }
    }

    /// Records a comparison of `a` and `b`, returning the compared values.
    pub fn compare(&mut self, a: usize, b: usize) -> Option<(i64, i64)> {
        if !self.in_range(a) || !self.in_range(b) {
            return None;
        }
        let values = [self.shadow[a], self.shadow[b]];
        self.operations.push(Operation::Compare {
            indices: [a, b],
            values,
        });
        Some((values[0], values[1]))
    }

    /// Records and applies a swap of `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if !self.in_range(a) || !self.in_range(b) {
            return false;
        }
        self.operations.push(Operation::Swap {
            indices: [a, b],
            values: [self.shadow[a], self.shadow[b]],
        });
        self.shadow.swap(a, b);
        true
    }

    /// Records and applies an overwrite of `index` with `value`.
    pub fn set(&mut self, index: usize, value: i64) -> bool {
        if !self.in_range(index) {
            return false;
        }
        self.operations.push(Operation::Set {
            index,
            value,
            previous: self.shadow[index],
        });
        self.shadow[index] = value;
        true
    }

    pub fn highlight(&mut self, indices: &[usize], color: HighlightColor) -> bool {
        if !indices.iter().all(|&i| self.in_range(i)) {
            return false;
        }
        self.operations.push(Operation::Highlight {
            indices: IndexList::from_slice(indices),
            color,
        });
        true
    }

    pub fn sorted(&mut self, indices: &[usize]) -> bool {
        if !indices.iter().all(|&i| self.in_range(i)) {
            return false;
        }
        self.operations.push(Operation::Sorted {
            indices: IndexList::from_slice(indices),
        });
        true
    }

    pub fn comment(&mut self, message: impl Into<String>) {
        self.operations.push(Operation::Comment {
            message: message.into(),
        });
    }

    /// Appends `complete` and seals the trace.
    pub fn finish(mut self) -> Trace {
        self.operations.push(Operation::Complete);
        Trace::from_recorded(self.operations)
    }
}
