//! Line classification: fenced code, rules, headings, quotes and lists.
//!
//! The walk is a left-to-right fold over lines carrying a [`FenceState`].
//! Fenced blocks are located in a pre-pass so that a fence line can ask
//! whether the selection is anywhere inside its block, not just on itself.

use std::ops::Range;

use smol_str::{SmolStr, format_smolstr};

use crate::config::BlockReveal;
use crate::decoration::{DecorationBuilder, LineStyle, MarkStyle, RenderedForm, TextStyle};
use crate::patterns;
use crate::proximity::RevealPolicy;
use crate::text::{Line, LineSource};
use crate::types::CodeBlockRange;

/// Whether the walk is currently between an opening and closing fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FenceState {
    #[default]
    Outside,
    /// Inside a block whose opening fence line starts at `start`.
    Inside { start: usize },
}

impl FenceState {
    pub fn in_code(&self) -> bool {
        matches!(self, FenceState::Inside { .. })
    }

    /// Step over a fence line spanning `from..to`. Returns the new state and,
    /// when this fence closes a block, the completed block range.
    pub fn advance(self, from: usize, to: usize) -> (Self, Option<CodeBlockRange>) {
        match self {
            FenceState::Outside => (FenceState::Inside { start: from }, None),
            FenceState::Inside { start } => {
                (FenceState::Outside, Some(CodeBlockRange::new(start, to)))
            }
        }
    }
}

/// Locate every closed fenced code block. An opening fence with no closing
/// fence produces nothing.
pub fn code_block_ranges<D: LineSource + ?Sized>(doc: &D) -> Vec<CodeBlockRange> {
    let mut state = FenceState::Outside;
    let mut blocks = Vec::new();
    for number in 1..=doc.line_count() {
        let Some(line) = doc.line(number) else {
            break;
        };
        if !patterns::is_fence(&line.text) {
            continue;
        }
        let (next, closed) = state.advance(line.from, line.to);
        state = next;
        blocks.extend(closed);
    }
    blocks
}

/// What the inline scanner should do with a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Fence, code or rule line: nothing inline to scan.
    Done,
    /// Scan from this char offset (relative to the line start) onwards.
    Inline { start: usize },
}

/// Applies the block matchers to one line at a time.
pub struct LineClassifier<'a> {
    blocks: &'a [CodeBlockRange],
    policy: RevealPolicy,
    block_reveal: BlockReveal,
    fence: FenceState,
}

impl<'a> LineClassifier<'a> {
    pub fn new(blocks: &'a [CodeBlockRange], policy: RevealPolicy, block_reveal: BlockReveal) -> Self {
        Self {
            blocks,
            policy,
            block_reveal,
            fence: FenceState::Outside,
        }
    }

    pub fn classify(&mut self, line: &Line<'_>, out: &mut DecorationBuilder) -> LineOutcome {
        let text: &str = &line.text;

        if patterns::is_fence(text) {
            self.fence_line(line, out);
            return LineOutcome::Done;
        }

        if self.fence.in_code() {
            out.line(line.from, LineStyle::CodeLine);
            return LineOutcome::Done;
        }

        if patterns::is_rule(text) {
            let range = line.char_range();
            if self.policy.hides(&range) {
                out.hide(range, RenderedForm::HorizontalRule);
            } else {
                out.mark(range, MarkStyle::RuleSyntax);
            }
            return LineOutcome::Done;
        }

        let mut inline_start = 0;

        if let Some(heading) = patterns::heading(text) {
            inline_start = heading.len;
            out.line(line.from, LineStyle::Heading { level: heading.level });
            if !self.reveals_marker(line, heading.len) {
                out.hide_zero_width(line.from..line.from + heading.len);
            }
        }

        if let Some(len) = patterns::blockquote(text) {
            inline_start = inline_start.max(len);
            out.line(line.from, LineStyle::Blockquote);
            if !self.reveals_marker(line, len) {
                out.hide_zero_width(line.from..line.from + len);
            }
        }

        if let Some(task) = patterns::task(text) {
            let marker = task.marker;
            inline_start = inline_start.max(marker.len);
            if !self.reveals_marker(line, marker.len) {
                out.hide(
                    offset(line, marker.marker_range()),
                    RenderedForm::Checkbox {
                        checked: task.checked,
                        toggle: offset(line, task.token),
                    },
                );
            }
            out.line(line.from, LineStyle::TaskItem);
        } else {
            if let Some(item) = patterns::ordered(text) {
                let marker = item.marker;
                inline_start = inline_start.max(marker.len);
                if !self.reveals_marker(line, marker.len) {
                    out.hide(
                        offset(line, marker.marker_range()),
                        RenderedForm::Text {
                            text: format_smolstr!("{}.", item.number),
                            style: TextStyle::ListNumber,
                        },
                    );
                }
                out.line(line.from, LineStyle::ListItem);
            }

            if let Some(marker) = patterns::unordered(text) {
                inline_start = inline_start.max(marker.len);
                if !self.reveals_marker(line, marker.len) {
                    out.hide(
                        offset(line, marker.marker_range()),
                        RenderedForm::Text {
                            text: SmolStr::new_static("•"),
                            style: TextStyle::ListBullet,
                        },
                    );
                }
                out.line(line.from, LineStyle::ListItem);
            }
        }

        LineOutcome::Inline {
            start: inline_start,
        }
    }

    fn fence_line(&mut self, line: &Line<'_>, out: &mut DecorationBuilder) {
        let editing = self
            .blocks
            .iter()
            .find(|block| block.encloses(line.from, line.to))
            .is_some_and(|block| self.policy.reveals(&block.to_range()));

        tracing::trace!(
            target: "quire::preview",
            line = line.number,
            editing,
            opening = !self.fence.in_code(),
            "fence line"
        );

        out.line(line.from, LineStyle::CodeFence { editing });
        let style = if editing {
            MarkStyle::FenceSyntax
        } else {
            MarkStyle::FenceCollapsed
        };
        out.mark(line.char_range(), style);

        self.fence = self.fence.advance(line.from, line.to).0;
    }

    /// Whether a block marker of `marker_len` chars at the start of `line`
    /// should stay raw.
    fn reveals_marker(&self, line: &Line<'_>, marker_len: usize) -> bool {
        let zone = match self.block_reveal {
            BlockReveal::Marker => line.from..line.from + marker_len,
            BlockReveal::Line => line.char_range(),
        };
        self.policy.reveals(&zone)
    }
}

/// Shift a line-relative range to document offsets.
fn offset(line: &Line<'_>, range: Range<usize>) -> Range<usize> {
    line.from + range.start..line.from + range.end
}
