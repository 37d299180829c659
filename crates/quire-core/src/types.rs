//! Selection and code-block range types shared by the decoration passes.
//!
//! These types are framework-agnostic and can be used with any text buffer implementation.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
/// Only the primary selection of the host is ever considered.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// A complete fenced code block, from the start of its opening fence line to
/// the end of its closing fence line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeBlockRange {
    pub start: usize,
    pub end: usize,
}

impl CodeBlockRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether a line spanning `from..to` lies inside this block.
    pub fn encloses(&self, from: usize, to: usize) -> bool {
        from >= self.start && to <= self.end
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }
}
