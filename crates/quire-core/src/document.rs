//! Core editor document trait and implementations.
//!
//! Defines the `EditorDocument` trait so hosts with different storage
//! strategies (plain fields, reactive signals) can share the preview logic:
//! decoration recompute on change and applying click effects.

use std::ops::Range;

use smol_str::SmolStr;

use crate::config::PreviewOptions;
use crate::decoration::DecorationSet;
use crate::error::PreviewError;
use crate::interaction::HostEffect;
use crate::platform::PreviewHost;
use crate::preview::compute_decorations;
use crate::text::{LineSource, TextBuffer};
use crate::types::Selection;

/// Core trait for editor documents.
pub trait EditorDocument {
    /// The buffer type used for text storage.
    type Buffer: TextBuffer + LineSource;

    // === Required: Buffer access ===

    /// Get a reference to the underlying buffer.
    fn buffer(&self) -> &Self::Buffer;

    /// Get a mutable reference to the underlying buffer.
    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    // === Required: Selection state ===

    /// Get the primary selection.
    fn selection(&self) -> Selection;

    /// Set the primary selection.
    fn set_selection(&mut self, selection: Selection);

    // === Provided: Convenience accessors ===

    /// Get the full content as a String.
    fn content_string(&self) -> String {
        self.buffer().to_string()
    }

    /// Get length in characters.
    fn len_chars(&self) -> usize {
        self.buffer().len_chars()
    }

    /// Get a slice of the content.
    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.buffer().slice(range)
    }

    /// Decorations for the current text and selection.
    fn decorations(&self, options: &PreviewOptions) -> DecorationSet {
        compute_decorations(self.buffer(), self.selection(), options)
    }

    // === Provided: Host effects ===

    /// Replace a range, keeping the selection inside the document.
    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), PreviewError> {
        self.check_range(&range)?;
        self.buffer_mut().replace(range, text);
        let len = self.len_chars();
        let sel = self.selection();
        self.set_selection(Selection::new(sel.anchor.min(len), sel.head.min(len)));
        Ok(())
    }

    /// Apply a click effect. URL opening is delegated to `host`.
    fn apply_effect<H: PreviewHost>(
        &mut self,
        effect: &HostEffect,
        host: &H,
    ) -> Result<(), PreviewError> {
        match effect {
            HostEffect::ReplaceText { range, insert } => {
                tracing::debug!(target: "quire::interaction", ?range, %insert, "replace text");
                self.replace(range.clone(), insert)
            }
            HostEffect::SetSelection(selection) => {
                self.check_range(&selection.to_range())?;
                self.set_selection(*selection);
                Ok(())
            }
            HostEffect::OpenUrl(url) => {
                tracing::debug!(target: "quire::interaction", %url, "open url");
                host.open_url(url)?;
                Ok(())
            }
        }
    }

    /// Error unless `range` lies within the document.
    fn check_range(&self, range: &Range<usize>) -> Result<(), PreviewError> {
        let len = self.len_chars();
        if range.start > range.end || range.end > len {
            return Err(PreviewError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }
}

/// Simple field-based document.
#[derive(Debug, Clone, Default)]
pub struct PlainEditor<T> {
    buffer: T,
    selection: Selection,
}

impl<T> PlainEditor<T> {
    /// Create an editor with the caret at the start.
    pub fn new(buffer: T) -> Self {
        Self {
            buffer,
            selection: Selection::default(),
        }
    }

    pub fn with_selection(buffer: T, selection: Selection) -> Self {
        Self { buffer, selection }
    }
}

impl<T: TextBuffer + LineSource> EditorDocument for PlainEditor<T> {
    type Buffer = T;

    fn buffer(&self) -> &T {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut T {
        &mut self.buffer
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::interaction::{Modifiers, click_at};
    use crate::platform::PlatformError;
    use crate::text::EditorRope;

    #[derive(Default)]
    struct RecordingHost {
        opened: RefCell<Vec<String>>,
    }

    impl PreviewHost for RecordingHost {
        fn open_url(&self, url: &str) -> Result<(), PlatformError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_checkbox_round_trip_through_effects() {
        let mut editor =
            PlainEditor::with_selection(EditorRope::from("- [x] done\n\nelsewhere"), Selection::collapsed(15));
        let decos = editor.decorations(&PreviewOptions::default());

        let effect = click_at(&decos, 1, Modifiers::NONE).unwrap();
        editor.apply_effect(&effect, &()).unwrap();
        assert_eq!(editor.content_string(), "- [ ] done\n\nelsewhere");

        let decos = editor.decorations(&PreviewOptions::default());
        let effect = click_at(&decos, 1, Modifiers::NONE).unwrap();
        editor.apply_effect(&effect, &()).unwrap();
        assert_eq!(editor.content_string(), "- [x] done\n\nelsewhere");
    }

    #[test]
    fn test_open_url_goes_to_host() {
        let mut editor = PlainEditor::new(EditorRope::from("x"));
        let host = RecordingHost::default();
        editor
            .apply_effect(&HostEffect::OpenUrl(SmolStr::new("https://a.b")), &host)
            .unwrap();
        assert_eq!(host.opened.borrow().as_slice(), ["https://a.b"]);
    }

    #[test]
    fn test_out_of_bounds_edit_rejected() {
        let mut editor = PlainEditor::new(EditorRope::from("abc"));
        let err = editor
            .apply_effect(
                &HostEffect::ReplaceText {
                    range: 2..6,
                    insert: SmolStr::new("[x]"),
                },
                &(),
            )
            .unwrap_err();
        assert!(matches!(err, PreviewError::OutOfBounds { len: 3, .. }));
        assert_eq!(editor.content_string(), "abc");
    }

    #[test]
    fn test_selection_effect() {
        let mut editor = PlainEditor::new(EditorRope::from("abc"));
        editor
            .apply_effect(&HostEffect::SetSelection(Selection::new(3, 1)), &())
            .unwrap();
        assert_eq!(editor.selection(), Selection::new(3, 1));
        assert!(
            editor
                .apply_effect(&HostEffect::SetSelection(Selection::collapsed(4)), &())
                .is_err()
        );
    }

    #[test]
    fn test_replace_clamps_selection() {
        let mut editor = PlainEditor::with_selection(EditorRope::from("abcdef"), Selection::collapsed(6));
        editor.replace(2..6, "").unwrap();
        assert_eq!(editor.selection(), Selection::collapsed(2));
    }
}
