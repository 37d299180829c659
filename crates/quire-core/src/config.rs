//! Tunables for the decoration passes.

use serde::{Deserialize, Serialize};

use crate::proximity::PROXIMITY_SLACK;

/// Which span a block marker (heading, quote, list) is revealed around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReveal {
    /// Reveal when the selection is near the marker prefix itself.
    #[default]
    Marker,
    /// Reveal when the selection is anywhere near the line.
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Chars of slack on each side of a construct within which the
    /// selection counts as "near" and the raw syntax is shown.
    pub proximity_slack: usize,
    pub block_reveal: BlockReveal,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            proximity_slack: PROXIMITY_SLACK,
            block_reveal: BlockReveal::default(),
        }
    }
}
