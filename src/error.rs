//! Error type shared by the ladder core, the roster parser and the browser glue.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while building or querying a ladder.
///
/// Only the roster variants are user-facing; the rest guard the public API
/// against hand-built grids and bad configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LadderError {
    /// Fewer than two participant names after normalization.
    #[error("Please enter at least 2 names.")]
    TooFewNames { found: usize },

    /// Fewer than two outcomes after normalization.
    #[error("Please enter at least 2 results.")]
    TooFewResults { found: usize },

    /// A grid row does not have exactly `lines - 1` slots.
    #[error("row {row} has {found} slots, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A grid row connects one line both left and right.
    #[error("row {row} connects slots {slot} and {} at the same height", .slot + 1)]
    AdjacentRungs { row: usize, slot: usize },

    /// Start (or outcome) index outside `0..lines`.
    #[error("line index {index} out of range for {lines} lines")]
    IndexOutOfRange { index: usize, lines: usize },

    /// Rejected `LadderConfig` value.
    #[error("invalid ladder config: {0}")]
    Config(String),
}

impl From<LadderError> for JsValue {
    fn from(err: LadderError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
