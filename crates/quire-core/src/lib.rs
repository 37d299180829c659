//! quire-core: live-preview decorations for markdown, without a UI framework.
//!
//! This crate provides:
//! - `TextBuffer` / `LineSource` traits and the ropey-backed `EditorRope`
//! - `compute_decorations`, which turns text + selection into a sorted
//!   sequence of hide/mark instructions, revealing raw syntax near the cursor
//! - `EditorDocument` and `PlainEditor` for applying click effects
//! - Pointer handling split into capture and next-tick application
//! - Reference HTML rendering of the decorated text

pub mod blocks;
pub mod config;
pub mod decoration;
pub mod document;
pub mod error;
pub mod inline;
pub mod interaction;
pub mod patterns;
pub mod platform;
pub mod preview;
pub mod proximity;
pub mod render;
pub mod text;
pub mod types;

pub use blocks::{FenceState, LineClassifier, LineOutcome, code_block_ranges};
pub use config::{BlockReveal, PreviewOptions};
pub use decoration::{
    Affordance, Decoration, DecorationBuilder, DecorationSet, LineStyle, MarkStyle, RangeAction,
    RenderedForm, TextStyle,
};
pub use document::{EditorDocument, PlainEditor};
pub use error::PreviewError;
pub use inline::{Occupancy, scan_inline};
pub use interaction::{
    CursorIntent, HostEffect, Modifiers, PointerDown, TickQueue, capture_pointer_down, click,
    click_at, toggle_task, toggle_task_on_line,
};
pub use platform::{PlatformError, PreviewHost};
pub use preview::{LivePreview, compute_decorations};
pub use proximity::{PROXIMITY_SLACK, RevealPolicy, should_reveal};
pub use render::render_html;
pub use smol_str::SmolStr;
pub use text::{EditorRope, Line, LineSource, TextBuffer};
pub use types::{CodeBlockRange, Selection};
