//! Source positions attached to tokens, nodes and syntax errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open character range `[start, end)` plus the line and column of
/// `start`. The default span is empty and sits at line 0, which no real
/// token occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// 1-based.
    pub line: u32,
    /// 1-based.
    pub col: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, col: u32) -> Self {
        Span {
            start,
            end,
            line,
            col,
        }
    }

    /// Smallest span covering `self` through `other`, positioned at
    /// whichever of the two starts first.
    pub fn to(self, other: Span) -> Span {
        let first = if other.start < self.start { other } else { self };
        Span {
            end: self.end.max(other.end),
            ..first
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
