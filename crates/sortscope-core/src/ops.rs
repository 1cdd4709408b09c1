//! Visualization event vocabulary.
//!
//! A [`Trace`](crate::trace::Trace) is an ordered list of [`Operation`]s. The
//! vocabulary is deliberately small:
//! - **Framing**: [`Operation::Init`] always opens a trace and
//!   [`Operation::Complete`] always closes it.
//! - **Mutating**: [`Operation::Swap`] and [`Operation::Set`] change the
//!   array. They record the pre-mutation values so a renderer can step
//!   backward without re-running anything.
//! - **Observing**: [`Operation::Compare`] reads two positions.
//! - **Advisory**: [`Operation::Highlight`], [`Operation::Sorted`] and
//!   [`Operation::Comment`] never touch the array.
//!
//! # Wire format
//!
//! Operations serialize as internally tagged JSON objects with snake_case
//! tags, e.g. `{"type":"swap","indices":[0,1],"values":[5,3]}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index list carried by advisory markers. Nearly always one or two entries.
pub type IndexList = SmallVec<[usize; 4]>;

// ---------------------------------------------------------------------------
// Comparison operators
// ---------------------------------------------------------------------------

/// Relational and equality operators a guard condition can use.
///
/// JavaScript's strict and loose equality collapse to the same variant:
/// the shadow array only ever holds integers, where they agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// Parses a source operator (`>`, `<=`, `===`, ...).
    pub fn from_symbol(symbol: &str) -> Option<CmpOp> {
        match symbol {
            "==" | "===" => Some(CmpOp::Eq),
            "!=" | "!==" => Some(CmpOp::Ne),
            "<" => Some(CmpOp::Lt),
            "<=" => Some(CmpOp::Le),
            ">" => Some(CmpOp::Gt),
            ">=" => Some(CmpOp::Ge),
            _ => None,
        }
    }

    /// Applies the operator to two concrete values.
    pub fn evaluate(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Highlight colors
// ---------------------------------------------------------------------------

/// Tag attached to a [`Operation::Highlight`]. The renderer maps each tag to
/// a color of its choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightColor {
    /// The key being inserted (insertion sort).
    Key,
    /// The current minimum candidate (selection sort).
    Candidate,
    /// Generic "look here" marker.
    Active,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// One discrete, replayable visualization event.
///
/// All `values` / `previous` fields hold the state *before* the event is
/// applied, so replaying a trace in order reproduces every recorded field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Snapshot of the starting array. Always the first event.
    Init { array: Vec<i64> },
    /// Two positions were inspected.
    Compare { indices: [usize; 2], values: [i64; 2] },
    /// Two positions were exchanged. `values` are pre-swap.
    Swap { indices: [usize; 2], values: [i64; 2] },
    /// One position was overwritten with `value`; `previous` is what it held.
    Set { index: usize, value: i64, previous: i64 },
    /// Advisory marker, no mutation.
    Highlight {
        indices: IndexList,
        color: HighlightColor,
    },
    /// Advisory marker that a region is finalized.
    Sorted { indices: IndexList },
    /// Terminates the trace. Always the last event.
    Complete,
    /// Advisory debug note (loop entry).
    Comment { message: String },
}

/// Discriminant-only view of [`Operation`], handy for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Init,
    Compare,
    Swap,
    Set,
    Highlight,
    Sorted,
    Complete,
    Comment,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Init { .. } => OperationKind::Init,
            Operation::Compare { .. } => OperationKind::Compare,
            Operation::Swap { .. } => OperationKind::Swap,
            Operation::Set { .. } => OperationKind::Set,
            Operation::Highlight { .. } => OperationKind::Highlight,
            Operation::Sorted { .. } => OperationKind::Sorted,
            Operation::Complete => OperationKind::Complete,
            Operation::Comment { .. } => OperationKind::Comment,
        }
    }

    /// Returns true if replaying this event changes the array.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Operation::Swap { .. } | Operation::Set { .. })
    }

    /// Returns true for events that never affect or read array state.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            Operation::Highlight { .. } | Operation::Sorted { .. } | Operation::Comment { .. }
        )
    }

    /// Every array index this event refers to, in recorded order.
    pub fn indices(&self) -> IndexList {
        match self {
            Operation::Compare { indices, .. } | Operation::Swap { indices, .. } => {
                IndexList::from_slice(indices)
            }
            Operation::Set { index, .. } => IndexList::from_slice(&[*index]),
            Operation::Highlight { indices, .. } | Operation::Sorted { indices } => indices.clone(),
            Operation::Init { .. } | Operation::Complete | Operation::Comment { .. } => {
                IndexList::new()
            }
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Init => "init",
            OperationKind::Compare => "compare",
            OperationKind::Swap => "swap",
            OperationKind::Set => "set",
            OperationKind::Highlight => "highlight",
            OperationKind::Sorted => "sorted",
            OperationKind::Complete => "complete",
            OperationKind::Comment => "comment",
        };
        f.write_str(name)
    }
}
