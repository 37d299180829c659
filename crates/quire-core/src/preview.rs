//! Whole-document decoration pass.
//!
//! Fence pre-pass, then one left-to-right walk over the lines: the block
//! classifier decides line styles and marker hides, and the inline scanner
//! handles whatever text is left after the block markers. Everything is
//! recomputed from scratch on each call.

use crate::blocks::{LineClassifier, LineOutcome, code_block_ranges};
use crate::config::PreviewOptions;
use crate::decoration::{DecorationBuilder, DecorationSet};
use crate::inline::{Occupancy, scan_inline};
use crate::proximity::RevealPolicy;
use crate::text::LineSource;
use crate::types::Selection;

/// Compute the full, sorted decoration sequence for `doc` under `selection`.
pub fn compute_decorations<D: LineSource + ?Sized>(
    doc: &D,
    selection: Selection,
    options: &PreviewOptions,
) -> DecorationSet {
    let blocks = code_block_ranges(doc);
    let policy = RevealPolicy::new(selection, options.proximity_slack);
    let mut classifier = LineClassifier::new(&blocks, policy, options.block_reveal);
    let mut out = DecorationBuilder::new();

    let line_count = doc.line_count();
    for number in 1..=line_count {
        let Some(line) = doc.line(number) else {
            break;
        };
        let LineOutcome::Inline { start } = classifier.classify(&line, &mut out) else {
            continue;
        };
        let rest = skip_chars(&line.text, start);
        if rest.is_empty() {
            continue;
        }
        // Occupancy never carries over between lines.
        let mut occupancy = Occupancy::new();
        scan_inline(line.from + start, rest, &policy, &mut occupancy, &mut out);
    }

    let decorations = out.finish();
    tracing::debug!(
        target: "quire::preview",
        lines = line_count,
        code_blocks = blocks.len(),
        decorations = decorations.len(),
        ?selection,
        collapsed = selection.is_collapsed(),
        "computed decorations"
    );
    decorations
}

/// `text` without its first `n` chars.
fn skip_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte, _)) => &text[byte..],
        None => "",
    }
}

/// Holds the decorations for a view and decides when to recompute them.
#[derive(Debug, Clone, Default)]
pub struct LivePreview {
    options: PreviewOptions,
    decorations: DecorationSet,
}

impl LivePreview {
    /// Create a preview and compute the initial decorations.
    pub fn new<D: LineSource + ?Sized>(doc: &D, selection: Selection, options: PreviewOptions) -> Self {
        let decorations = compute_decorations(doc, selection, &options);
        Self {
            options,
            decorations,
        }
    }

    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Recompute unconditionally.
    pub fn refresh<D: LineSource + ?Sized>(&mut self, doc: &D, selection: Selection) -> &DecorationSet {
        self.decorations = compute_decorations(doc, selection, &self.options);
        &self.decorations
    }

    /// Host update hook. Recomputes only when the text changed or a
    /// selection was explicitly set; returns whether it did.
    pub fn on_update<D: LineSource + ?Sized>(
        &mut self,
        doc: &D,
        selection: Selection,
        doc_changed: bool,
        selection_set: bool,
    ) -> bool {
        if !doc_changed && !selection_set {
            return false;
        }
        self.refresh(doc, selection);
        true
    }

    /// Swap options (e.g. a slack change from settings) and recompute.
    pub fn set_options<D: LineSource + ?Sized>(
        &mut self,
        options: PreviewOptions,
        doc: &D,
        selection: Selection,
    ) {
        self.options = options;
        self.refresh(doc, selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockReveal;
    use crate::decoration::{Decoration, LineStyle, MarkStyle, RangeAction, RenderedForm};
    use crate::text::EditorRope;

    fn decorate(source: &str, caret: usize) -> Vec<Decoration> {
        let doc = EditorRope::from(source);
        compute_decorations(&doc, Selection::collapsed(caret), &PreviewOptions::default()).into_vec()
    }

    #[test]
    fn test_skip_chars_multibyte() {
        assert_eq!(skip_chars("é> x", 1), "> x");
        assert_eq!(skip_chars("ab", 2), "");
        assert_eq!(skip_chars("ab", 5), "");
    }

    #[test]
    fn test_heading_inline_offsets_are_absolute() {
        // Line 2 starts at 6; strong after the `## ` marker.
        let decos = decorate("intro\n## **big**", 0);
        assert!(decos.contains(&Decoration::Line {
            at: 6,
            style: LineStyle::Heading { level: 2 }
        }));
        assert!(decos.contains(&Decoration::Range {
            range: 11..14,
            action: RangeAction::Mark(MarkStyle::Strong)
        }));
    }

    #[test]
    fn test_occupancy_resets_per_line() {
        let decos = decorate("`a`\n`b`\n\n\n", 9);
        let code_marks = decos
            .iter()
            .filter(|d| {
                matches!(
                    d,
                    Decoration::Range {
                        action: RangeAction::Mark(MarkStyle::InlineCode),
                        ..
                    }
                )
            })
            .count();
        assert_eq!(code_marks, 2);
    }

    #[test]
    fn test_code_lines_not_scanned() {
        let decos = decorate("```\n**not bold**\n```\n\n\nend", 26);
        assert!(!decos.iter().any(|d| matches!(
            d,
            Decoration::Range {
                action: RangeAction::Mark(MarkStyle::Strong),
                ..
            }
        )));
    }

    #[test]
    fn test_crlf_offsets() {
        let decos = decorate("a\r\n*b*", 0);
        assert!(decos.contains(&Decoration::Range {
            range: 3..4,
            action: RangeAction::Hide(RenderedForm::ZeroWidth)
        }));
        assert!(decos.contains(&Decoration::Range {
            range: 4..5,
            action: RangeAction::Mark(MarkStyle::Emphasis)
        }));
    }

    #[test]
    fn test_empty_document() {
        assert!(decorate("", 0).is_empty());
    }

    #[test]
    fn test_on_update_gates_recompute() {
        let doc = EditorRope::from("**bold** text");
        let mut preview = LivePreview::new(&doc, Selection::collapsed(13), PreviewOptions::default());
        assert_eq!(preview.decorations().len(), 3);

        // Selection moved next to the strong run, but nothing reported it.
        assert!(!preview.on_update(&doc, Selection::collapsed(8), false, false));
        assert_eq!(preview.decorations().len(), 3);

        assert!(preview.on_update(&doc, Selection::collapsed(8), false, true));
        assert!(preview.decorations().is_empty());
    }

    #[test]
    fn test_set_options_recomputes() {
        let doc = EditorRope::from("> quote here");
        let mut preview = LivePreview::new(&doc, Selection::collapsed(11), PreviewOptions::default());
        assert!(preview.decorations().iter().any(Decoration::is_hide));

        preview.set_options(
            PreviewOptions {
                block_reveal: BlockReveal::Line,
                ..PreviewOptions::default()
            },
            &doc,
            Selection::collapsed(11),
        );
        assert_eq!(preview.options().block_reveal, BlockReveal::Line);
        assert!(!preview.decorations().iter().any(Decoration::is_hide));
    }
}
