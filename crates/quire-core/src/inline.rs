//! Inline construct scanning for the text of a single line.
//!
//! Each construct is matched independently over the whole slice, then
//! emitted in [`InlineKind::PRIORITY`] order. A match is dropped outright if
//! it overlaps a range an earlier construct already claimed, or if the
//! selection is near it (raw syntax stays visible for editing).

use std::ops::Range;

use smol_str::SmolStr;

use crate::decoration::{DecorationBuilder, MarkStyle, RenderedForm, TextStyle};
use crate::patterns::{self, InlineKind, InlineMatch};
use crate::proximity::RevealPolicy;

/// Ranges already claimed on the current line. First writer wins.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    claimed: Vec<Range<usize>>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        self.claimed
            .iter()
            .any(|c| range.start < c.end && range.end > c.start)
    }

    pub fn claim(&mut self, range: Range<usize>) {
        self.claimed.push(range);
    }
}

/// Scan `text`, which starts at document offset `base`, and emit decorations
/// for every construct that survives the occupancy and proximity gates.
pub fn scan_inline(
    base: usize,
    text: &str,
    policy: &RevealPolicy,
    occupancy: &mut Occupancy,
    out: &mut DecorationBuilder,
) {
    for kind in InlineKind::PRIORITY {
        for found in patterns::find_inline(kind, text) {
            // `[alt](src)` inside `![alt](src)` belongs to the image.
            if kind == InlineKind::Link && found.preceding == Some('!') {
                continue;
            }
            let range = base + found.range.start..base + found.range.end;
            if occupancy.overlaps(&range) || policy.reveals(&range) {
                continue;
            }
            occupancy.claim(range.clone());
            emit(kind, &found, range, out);
        }
    }
}

fn emit(kind: InlineKind, found: &InlineMatch<'_>, range: Range<usize>, out: &mut DecorationBuilder) {
    match kind {
        InlineKind::CodeSpan => delimited(range, kind.delimiter_len(), MarkStyle::InlineCode, out),
        InlineKind::Strong => delimited(range, kind.delimiter_len(), MarkStyle::Strong, out),
        InlineKind::Strikethrough => {
            delimited(range, kind.delimiter_len(), MarkStyle::Strikethrough, out)
        }
        InlineKind::Emphasis => delimited(range, kind.delimiter_len(), MarkStyle::Emphasis, out),
        InlineKind::Image => out.hide(
            range,
            RenderedForm::Image {
                src: SmolStr::new(found.target.unwrap_or_default()),
                alt: SmolStr::new(found.content),
            },
        ),
        InlineKind::Link => link(found, range, out),
    }
}

/// Hide both delimiters, style what's between.
fn delimited(range: Range<usize>, width: usize, style: MarkStyle, out: &mut DecorationBuilder) {
    out.hide_zero_width(range.start..range.start + width);
    out.hide_zero_width(range.end - width..range.end);
    out.mark(range.start + width..range.end - width, style);
}

fn link(found: &InlineMatch<'_>, range: Range<usize>, out: &mut DecorationBuilder) {
    let url = found.target.unwrap_or_default();
    let label = found.content;

    if label.is_empty() {
        if url.starts_with('#') {
            // `[](#anchor)` has nothing to show.
            out.hide_zero_width(range);
        } else {
            out.hide(
                range,
                RenderedForm::Text {
                    text: SmolStr::new(display_url(url)),
                    style: TextStyle::Link,
                },
            );
        }
        return;
    }

    let label_start = range.start + 1;
    let label_end = label_start + label.chars().count();
    out.hide_zero_width(range.start..label_start);
    out.hide_zero_width(label_end..range.end);
    out.mark(
        label_start..label_end,
        MarkStyle::Link {
            href: SmolStr::new(url),
        },
    );
}

/// URL as shown for a label-less link: scheme dropped.
pub fn display_url(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}
