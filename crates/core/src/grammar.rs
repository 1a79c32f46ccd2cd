//! Grammar edit application.
//!
//! The grammar service reports a list of matches against the text it was
//! given. Each match names a span of the ORIGINAL text, so applying them one
//! after another requires shifting later offsets by the length change of the
//! edits already applied.
//!
//! Offsets and lengths count Unicode scalar values, not bytes.

use serde::{Deserialize, Serialize};

/// Language code sent to the grammar service for every check.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// A single correction reported by the grammar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarEdit {
    /// Start of the span in the original text.
    pub offset: usize,
    /// Length of the span in the original text.
    pub length: usize,
    /// Replacement text. `None` when the service offered no candidate, in
    /// which case the original span is kept.
    pub replacement: Option<String>,
}

impl GrammarEdit {
    pub fn new(offset: usize, length: usize, replacement: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            replacement: Some(replacement.into()),
        }
    }

    /// An edit with no replacement candidate.
    pub fn keep(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            replacement: None,
        }
    }
}

/// Apply `edits` to `text` in the order given.
///
/// The effective start of each edit is its original offset plus the
/// cumulative `replacement_len - length` of every edit applied before it.
/// Edits are NOT re-sorted: the service order is trusted. Overlapping edits
/// give last-write-wins results; positions past the end of the buffer are
/// clamped so malformed input can never panic.
pub fn apply(text: &str, edits: &[GrammarEdit]) -> String {
    if edits.is_empty() {
        return text.to_string();
    }

    let mut buffer: Vec<char> = text.chars().collect();
    let mut shift: isize = 0;

    for edit in edits {
        let start = clamp_position(edit.offset as isize + shift, buffer.len());
        let end = start.saturating_add(edit.length).min(buffer.len());

        let replacement: Vec<char> = match &edit.replacement {
            Some(value) => value.chars().collect(),
            None => buffer[start..end].to_vec(),
        };

        shift += replacement.len() as isize - edit.length as isize;
        buffer.splice(start..end, replacement);
    }

    buffer.into_iter().collect()
}

/// User-facing summary of a completed grammar pass.
pub fn summarize(edit_count: usize) -> String {
    if edit_count == 0 {
        "No grammar issues found.".to_string()
    } else {
        format!("Applied {edit_count} grammar fixes.")
    }
}

fn clamp_position(position: isize, len: usize) -> usize {
    if position < 0 {
        0
    } else {
        (position as usize).min(len)
    }
}
