//! Reveal-on-approach policy.
//!
//! A construct shows its raw syntax when the selection touches it or comes
//! within `slack` chars of either end. With the default slack of one, a caret
//! sitting right after `**bold**` (or right before it) already reveals the
//! asterisks.

use std::ops::Range;

use crate::types::Selection;

/// Default proximity slack in chars.
pub const PROXIMITY_SLACK: usize = 1;

/// True when the selection is within `slack` chars of `range`, meaning the
/// construct should be shown raw rather than rendered.
pub fn should_reveal(selection: &Selection, range: &Range<usize>, slack: usize) -> bool {
    selection.start() <= range.end.saturating_add(slack)
        && selection.end().saturating_add(slack) >= range.start
}

/// A selection bundled with its slack, consulted once per candidate construct.
#[derive(Debug, Clone, Copy)]
pub struct RevealPolicy {
    pub selection: Selection,
    pub slack: usize,
}

impl RevealPolicy {
    pub fn new(selection: Selection, slack: usize) -> Self {
        Self { selection, slack }
    }

    pub fn reveals(&self, range: &Range<usize>) -> bool {
        should_reveal(&self.selection, range, self.slack)
    }

    pub fn hides(&self, range: &Range<usize>) -> bool {
        !self.reveals(range)
    }
}
