//! Pointer interaction with the rendered preview.
//!
//! Pointer-down is handled in two phases. [`capture_pointer_down`] runs
//! synchronously inside the host's event handler and only records what the
//! user meant; the resulting [`CursorIntent`] goes into a [`TickQueue`] that
//! the host drains on its next rendering tick, after its own native click
//! handling (focus, caret placement) has settled. Selection changes made
//! there trigger the decoration recompute, so reveal/hide never races the
//! host's click side effects.
//!
//! Clicks on rendered affordances (link labels, task checkboxes) map to
//! [`HostEffect`]s directly.

use std::collections::VecDeque;
use std::ops::Range;

use smol_str::SmolStr;

use crate::decoration::{Affordance, DecorationSet};
use crate::document::EditorDocument;
use crate::patterns;
use crate::text::Line;
use crate::types::Selection;

pub const UNCHECKED_TOKEN: &str = "[ ]";
pub const CHECKED_TOKEN: &str = "[x]";

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    /// Ctrl (or Cmd) click follows links; a plain click never navigates away.
    pub fn follows_links(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer-down, already resolved to a document offset by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    /// Offset under the pointer, or None when no character is there.
    pub hit: Option<usize>,
    pub modifiers: Modifiers,
}

/// Selection change decided at pointer-down, applied on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorIntent {
    Collapse { at: usize },
    /// Shift-click: keep the anchor captured at pointer-down, move the head.
    Extend { anchor: usize, head: usize },
}

impl CursorIntent {
    /// Resolve against the document as it is when the tick runs. The
    /// document may have shrunk since the click; an intent with any offset
    /// past the end is stale and resolves to None.
    pub fn resolve(&self, doc_len: usize) -> Option<Selection> {
        let selection = match *self {
            CursorIntent::Collapse { at } => Selection::collapsed(at),
            CursorIntent::Extend { anchor, head } => Selection::new(anchor, head),
        };
        (selection.end() <= doc_len).then_some(selection)
    }
}

/// Phase one: decide what a pointer-down means, without touching the document.
pub fn capture_pointer_down(
    doc_len: usize,
    current: Selection,
    event: &PointerDown,
) -> Option<CursorIntent> {
    let intent = match event.hit {
        // Clicking the blank surface of an empty document still places a caret.
        None if doc_len == 0 => Some(CursorIntent::Collapse { at: 0 }),
        None => None,
        Some(head) if event.modifiers.shift => Some(CursorIntent::Extend {
            anchor: current.anchor,
            head,
        }),
        Some(at) => Some(CursorIntent::Collapse { at }),
    };
    tracing::trace!(target: "quire::interaction", ?event, ?intent, "pointer down");
    intent
}

/// Phase two: intents waiting for the next rendering tick.
///
/// Intents are independent. Each applies, in capture order, to whatever the
/// document and selection are when the tick runs; a later click simply wins.
#[derive(Debug, Default)]
pub struct TickQueue {
    pending: VecDeque<CursorIntent>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, intent: CursorIntent) {
        self.pending.push_back(intent);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every pending intent to `doc`. Returns the selections actually set.
    pub fn run_tick<D: EditorDocument>(&mut self, doc: &mut D) -> Vec<Selection> {
        let mut applied = Vec::with_capacity(self.pending.len());
        while let Some(intent) = self.pending.pop_front() {
            match intent.resolve(doc.len_chars()) {
                Some(selection) => {
                    doc.set_selection(selection);
                    applied.push(selection);
                }
                None => {
                    tracing::debug!(target: "quire::interaction", ?intent, "dropping stale cursor intent");
                }
            }
        }
        applied
    }
}

/// Something the host should do in response to a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    /// Replace a range of document text.
    ReplaceText { range: Range<usize>, insert: SmolStr },
    SetSelection(Selection),
    /// Open a link target outside the editor.
    OpenUrl(SmolStr),
}

/// Edit that flips a task checkbox token.
pub fn toggle_task(checked: bool, token: Range<usize>) -> HostEffect {
    let insert = if checked {
        UNCHECKED_TOKEN
    } else {
        CHECKED_TOKEN
    };
    HostEffect::ReplaceText {
        range: token,
        insert: SmolStr::new_static(insert),
    }
}

/// Map a click on a rendered affordance to its effect.
pub fn click(affordance: &Affordance, modifiers: Modifiers) -> Option<HostEffect> {
    match affordance {
        Affordance::Link { href } if modifiers.follows_links() => {
            Some(HostEffect::OpenUrl(href.clone()))
        }
        Affordance::Link { .. } => None,
        Affordance::Checkbox { checked, toggle } => Some(toggle_task(*checked, toggle.clone())),
    }
}

/// Click at a document offset: find the affordance there, then map it.
pub fn click_at(
    decorations: &DecorationSet,
    offset: usize,
    modifiers: Modifiers,
) -> Option<HostEffect> {
    let affordance = decorations.affordance_at(offset)?;
    let effect = click(&affordance, modifiers);
    tracing::debug!(target: "quire::interaction", offset, ?affordance, ?effect, "click");
    effect
}

/// Checkbox toggle for a task line, independent of whether its widget is
/// currently rendered.
pub fn toggle_task_on_line(line: &Line<'_>) -> Option<HostEffect> {
    let task = patterns::task(&line.text)?;
    Some(toggle_task(
        task.checked,
        line.from + task.token.start..line.from + task.token.end,
    ))
}
