//! Selector for the canonical trace generators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The named algorithms a user can pick instead of supplying code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Algorithm {
    BubbleSort,
    SelectionSort,
    InsertionSort,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BubbleSort,
        Algorithm::SelectionSort,
        Algorithm::InsertionSort,
    ];

    /// The selector name used on the wire (`bubbleSort`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubbleSort",
            Algorithm::SelectionSort => "selectionSort",
            Algorithm::InsertionSort => "insertionSort",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CoreError;

    /// Accepts the wire names plus short and kebab-case forms
    /// (`bubble`, `bubble-sort`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "bubblesort" | "bubble" => Ok(Algorithm::BubbleSort),
            "selectionsort" | "selection" => Ok(Algorithm::SelectionSort),
            "insertionsort" | "insertion" => Ok(Algorithm::InsertionSort),
            _ => Err(CoreError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_wire_and_short_names() {
        assert_eq!("bubbleSort".parse(), Ok(Algorithm::BubbleSort));
        assert_eq!("selection".parse(), Ok(Algorithm::SelectionSort));
        assert_eq!("insertion-sort".parse(), Ok(Algorithm::InsertionSort));
        assert_eq!("INSERTIONSORT".parse(), Ok(Algorithm::InsertionSort));
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        assert_eq!(
            "quickSort".parse::<Algorithm>(),
            Err(CoreError::UnknownAlgorithm {
                name: "quickSort".into()
            })
        );
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let json = serde_json::to_string(&Algorithm::SelectionSort).unwrap();
        assert_eq!(json, r#""selectionSort""#);
        for algo in Algorithm::ALL {
            assert_eq!(algo.to_string().parse::<Algorithm>(), Ok(algo));
        }
    }
}
