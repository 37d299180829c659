//! Decoration instructions and the compositor that orders them.
//!
//! A decoration is either a zero-width line marker (block styling) or a range
//! instruction that hides a span behind a rendered form or styles it in place.
//! Renderers expect ranges sorted and non-overlapping, so everything the
//! passes emit goes through [`DecorationBuilder::finish`], which fixes the
//! order: start offset, then line markers before ranges, then end offset.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use serde::Serialize;
use smol_str::{SmolStr, format_smolstr};

/// Block-level style attached to the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineStyle {
    /// An opening or closing ```` ``` ```` line. `editing` is set while the
    /// selection is in or near the block.
    CodeFence { editing: bool },
    CodeLine,
    Heading { level: u8 },
    Blockquote,
    ListItem,
    TaskItem,
}

impl LineStyle {
    /// CSS classes for the line element.
    pub fn class(&self) -> SmolStr {
        match self {
            LineStyle::CodeFence { editing: false } => SmolStr::new_static("md-code-fence-line"),
            LineStyle::CodeFence { editing: true } => {
                SmolStr::new_static("md-code-fence-line md-fence-editing")
            }
            LineStyle::CodeLine => SmolStr::new_static("md-code-line"),
            LineStyle::Heading { level } => format_smolstr!("md-heading-line md-h{}", level),
            LineStyle::Blockquote => SmolStr::new_static("md-blockquote-line"),
            LineStyle::ListItem => SmolStr::new_static("md-list-line"),
            LineStyle::TaskItem => SmolStr::new_static("md-list-line md-task-line"),
        }
    }
}

/// In-place styling of a range that stays visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkStyle {
    /// Raw fence shown while editing its block.
    FenceSyntax,
    /// Fence squashed to minimal height; text kept so offsets stay valid.
    FenceCollapsed,
    /// Raw `---` shown muted while the selection is on it.
    RuleSyntax,
    InlineCode,
    /// Link label, carrying the target for click-to-open and hover titles.
    Link { href: SmolStr },
    Strong,
    Strikethrough,
    Emphasis,
}

impl MarkStyle {
    pub fn class(&self) -> &'static str {
        match self {
            MarkStyle::FenceSyntax => "md-fence-syntax",
            MarkStyle::FenceCollapsed => "md-fence-collapsed",
            MarkStyle::RuleSyntax => "md-hr-syntax",
            MarkStyle::InlineCode => "md-inline-code",
            MarkStyle::Link { .. } => "md-link",
            MarkStyle::Strong => "md-strong",
            MarkStyle::Strikethrough => "md-strike",
            MarkStyle::Emphasis => "md-em",
        }
    }

    /// Extra element attributes, as `(name, value)` pairs.
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        match self {
            MarkStyle::Link { href } => vec![("data-href", href.as_str()), ("title", href.as_str())],
            _ => Vec::new(),
        }
    }
}

/// Style of a text widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Link,
    ListNumber,
    ListBullet,
}

impl TextStyle {
    pub fn class(&self) -> &'static str {
        match self {
            TextStyle::Link => "md-link",
            TextStyle::ListNumber => "md-list-number",
            TextStyle::ListBullet => "md-list-bullet",
        }
    }
}

/// What a hidden range is replaced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum RenderedForm {
    /// Invisible, but still occupies a position in the text flow so caret
    /// math around hidden syntax stays correct.
    ZeroWidth,
    Text { text: SmolStr, style: TextStyle },
    Image { src: SmolStr, alt: SmolStr },
    HorizontalRule,
    /// Task checkbox. `toggle` is the exact `[ ]`/`[x]` token to rewrite on click.
    Checkbox { checked: bool, toggle: Range<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RangeAction {
    Hide(RenderedForm),
    Mark(MarkStyle),
}

/// One rendering instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoration {
    Line { at: usize, style: LineStyle },
    Range { range: Range<usize>, action: RangeAction },
}

impl Decoration {
    pub fn from(&self) -> usize {
        match self {
            Decoration::Line { at, .. } => *at,
            Decoration::Range { range, .. } => range.start,
        }
    }

    /// Line decorations are zero-width, so `to == from`.
    pub fn to(&self) -> usize {
        match self {
            Decoration::Line { at, .. } => *at,
            Decoration::Range { range, .. } => range.end,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Decoration::Line { .. })
    }

    pub fn is_hide(&self) -> bool {
        matches!(
            self,
            Decoration::Range {
                action: RangeAction::Hide(_),
                ..
            }
        )
    }

    pub fn range(&self) -> Range<usize> {
        self.from()..self.to()
    }

    /// Clickable affordance carried by this decoration, if any.
    pub fn affordance(&self) -> Option<Affordance> {
        match self {
            Decoration::Range {
                action: RangeAction::Mark(MarkStyle::Link { href }),
                ..
            } => Some(Affordance::Link { href: href.clone() }),
            Decoration::Range {
                action: RangeAction::Hide(RenderedForm::Checkbox { checked, toggle }),
                ..
            } => Some(Affordance::Checkbox {
                checked: *checked,
                toggle: toggle.clone(),
            }),
            _ => None,
        }
    }

    /// Compositor ordering: start, line before range, end.
    fn compose_order(&self, other: &Self) -> Ordering {
        self.from()
            .cmp(&other.from())
            .then_with(|| other.is_line().cmp(&self.is_line()))
            .then_with(|| self.to().cmp(&other.to()))
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoration::Line { at, style } => write!(f, "{at} line {}", style.class()),
            Decoration::Range { range, action } => {
                write!(f, "{}..{} ", range.start, range.end)?;
                match action {
                    RangeAction::Mark(style) => {
                        write!(f, "mark {}", style.class())?;
                        for (name, value) in style.attributes() {
                            write!(f, " {name}={value:?}")?;
                        }
                        Ok(())
                    }
                    RangeAction::Hide(RenderedForm::ZeroWidth) => write!(f, "hide zero-width"),
                    RangeAction::Hide(RenderedForm::Text { text, style }) => {
                        write!(f, "hide text {text:?} {}", style.class())
                    }
                    RangeAction::Hide(RenderedForm::Image { src, alt }) => {
                        write!(f, "hide image src={src:?} alt={alt:?}")
                    }
                    RangeAction::Hide(RenderedForm::HorizontalRule) => write!(f, "hide rule"),
                    RangeAction::Hide(RenderedForm::Checkbox { checked, toggle }) => write!(
                        f,
                        "hide checkbox checked={checked} toggle={}..{}",
                        toggle.start, toggle.end
                    ),
                }
            }
        }
    }
}

/// Something the user can click in the rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    Link { href: SmolStr },
    Checkbox { checked: bool, toggle: Range<usize> },
}

/// Collects decorations in emission order.
#[derive(Debug, Default)]
pub struct DecorationBuilder {
    lines: Vec<Decoration>,
    ranges: Vec<Decoration>,
}

impl DecorationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, at: usize, style: LineStyle) {
        self.lines.push(Decoration::Line { at, style });
    }

    pub fn hide(&mut self, range: Range<usize>, form: RenderedForm) {
        tracing::trace!(target: "quire::preview", ?range, ?form, "hide");
        self.ranges.push(Decoration::Range {
            range,
            action: RangeAction::Hide(form),
        });
    }

    pub fn hide_zero_width(&mut self, range: Range<usize>) {
        self.hide(range, RenderedForm::ZeroWidth);
    }

    pub fn mark(&mut self, range: Range<usize>, style: MarkStyle) {
        tracing::trace!(target: "quire::preview", ?range, ?style, "mark");
        self.ranges.push(Decoration::Range {
            range,
            action: RangeAction::Mark(style),
        });
    }

    /// Merge and sort into the final sequence.
    ///
    /// The sort is stable, so decorations that tie on every key keep their
    /// emission order and repeated runs produce identical output.
    pub fn finish(self) -> DecorationSet {
        let mut decorations = self.lines;
        decorations.extend(self.ranges);
        decorations.sort_by(Decoration::compose_order);
        DecorationSet { decorations }
    }
}

/// Ordered, non-overlapping decorations for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn into_vec(self) -> Vec<Decoration> {
        self.decorations
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Range decorations only.
    pub fn ranges(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter().filter(|d| !d.is_line())
    }

    /// Line styles attached at `line_start`.
    pub fn line_styles_at(&self, line_start: usize) -> impl Iterator<Item = &LineStyle> {
        self.decorations.iter().filter_map(move |d| match d {
            Decoration::Line { at, style } if *at == line_start => Some(style),
            _ => None,
        })
    }

    /// The clickable affordance covering `offset`, if any.
    pub fn affordance_at(&self, offset: usize) -> Option<Affordance> {
        self.ranges()
            .filter(|d| d.from() <= offset && offset < d.to())
            .find_map(Decoration::affordance)
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}
