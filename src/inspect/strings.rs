// SPDX-License-Identifier: MIT
use std::ops::Range;

use super::converters::is_printable;

/// Maximal runs of printable ASCII at least `min_len` bytes long.
///
/// A run that reaches the end of `data` is reported too.
pub fn find_strings(data: &[u8], min_len: usize) -> Vec<Range<usize>> {
    let min_len = min_len.max(1);
    let mut found = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, b) in data.iter().enumerate() {
        match (is_printable(*b), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                if i - start >= min_len {
                    found.push(start..i);
                }
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        if data.len() - start >= min_len {
            found.push(start..data.len());
        }
    }
    found
}
