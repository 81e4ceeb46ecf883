// SPDX-License-Identifier: MIT
//! Error taxonomy shared by the buffer, schema and codec layers.
//!
//! Every error is raised at the point of detection, before any byte is
//! mutated, so a failed call never leaves a buffer partially edited.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexError {
    #[error("Range {start}..{end} is out of bounds for length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Buffer too short: expected at least {required} bytes, got {actual}")]
    BufferTooShort { required: usize, actual: usize },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid token index {index}, schema has {count} tokens")]
    NoSuchToken { index: usize, count: usize },

    #[error("Value for token {index} does not fit: expected {expected}")]
    ValueMismatch { index: usize, expected: String },

    #[error("Buffer size {requested} exceeds maximum allowed {max}")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HexError {
    pub(crate) fn out_of_bounds(start: usize, end: usize, len: usize) -> Self {
        HexError::OutOfBounds { start, end, len }
    }
}

/// Check that `start..end` is a well-formed range inside `len`.
///
/// Reversed ranges are rejected rather than swapped.
#[inline]
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), HexError> {
    if start > end || end > len {
        return Err(HexError::out_of_bounds(start, end, len));
    }
    Ok(())
}
