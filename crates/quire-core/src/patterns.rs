//! Block and inline markdown matchers.
//!
//! Every matcher works on a single line (or the inline tail of one) and
//! reports positions in chars relative to the text it was given. The regexes
//! are deliberately simple: anything they don't recognize stays plain text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use smol_str::SmolStr;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+").unwrap());
static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\*{3,}|-{3,}|_{3,})\s*$").unwrap());
static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s?").unwrap());
static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+\[( |x|X)\]\s+").unwrap());
static ORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([0-9]+)\.\s+").unwrap());
static UNORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([-*+])\s+").unwrap());

static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*").unwrap());
static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~([^~\n]+)~~").unwrap());
// Opening `*` must not start a `**` run: the first content char is neither `*` nor space.
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*\S)?)\*").unwrap());

const FENCE: &str = "```";

/// Char count of a string slice.
fn chars(s: &str) -> usize {
    s.chars().count()
}

/// A fence line opens or closes a fenced code block. An info string
/// (```` ```rust ````) may follow the backticks.
pub fn is_fence(text: &str) -> bool {
    text.starts_with(FENCE)
}

/// A thematic break: three or more of one of `*`, `-`, `_` and nothing else.
pub fn is_rule(text: &str) -> bool {
    RULE_RE.is_match(text)
}

/// `#` through `######` followed by whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMarker {
    pub level: u8,
    /// Hashes plus trailing whitespace.
    pub len: usize,
}

pub fn heading(text: &str) -> Option<HeadingMarker> {
    let caps = HEADING_RE.captures(text)?;
    Some(HeadingMarker {
        level: caps[1].len() as u8,
        len: chars(&caps[0]),
    })
}

/// Length of a `>` marker and its optional single space.
pub fn blockquote(text: &str) -> Option<usize> {
    BLOCKQUOTE_RE.find(text).map(|m| chars(m.as_str()))
}

/// Leading indentation and the full list marker length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub indent: usize,
    /// Indentation through the whitespace after the marker.
    pub len: usize,
}

impl ListMarker {
    /// The marker itself, indentation excluded.
    pub fn marker_range(&self) -> Range<usize> {
        self.indent..self.len
    }

    fn from_caps(caps: &Captures<'_>) -> Self {
        Self {
            indent: chars(&caps[1]),
            len: chars(&caps[0]),
        }
    }
}

/// `- [ ] ` / `* [x] ` style task item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMarker {
    pub marker: ListMarker,
    pub checked: bool,
    /// The three-char `[ ]` / `[x]` token, relative to line start.
    pub token: Range<usize>,
}

pub fn task(text: &str) -> Option<TaskMarker> {
    let caps = TASK_RE.captures(text)?;
    let state = caps.get(2)?;
    let token_start = chars(&text[..state.start()]) - 1;
    Some(TaskMarker {
        marker: ListMarker::from_caps(&caps),
        checked: state.as_str().eq_ignore_ascii_case("x"),
        token: token_start..token_start + 3,
    })
}

/// `1. ` style ordered item, with its number kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMarker {
    pub marker: ListMarker,
    pub number: SmolStr,
}

pub fn ordered(text: &str) -> Option<OrderedMarker> {
    let caps = ORDERED_RE.captures(text)?;
    Some(OrderedMarker {
        marker: ListMarker::from_caps(&caps),
        number: SmolStr::new(&caps[2]),
    })
}

pub fn unordered(text: &str) -> Option<ListMarker> {
    UNORDERED_RE
        .captures(text)
        .map(|caps| ListMarker::from_caps(&caps))
}

/// Inline constructs, in the order they claim text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    CodeSpan,
    Image,
    Link,
    Strong,
    Strikethrough,
    Emphasis,
}

impl InlineKind {
    /// Highest priority first. Earlier kinds own any text later kinds overlap.
    pub const PRIORITY: [InlineKind; 6] = [
        InlineKind::CodeSpan,
        InlineKind::Image,
        InlineKind::Link,
        InlineKind::Strong,
        InlineKind::Strikethrough,
        InlineKind::Emphasis,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            InlineKind::CodeSpan => &*CODE_SPAN_RE,
            InlineKind::Image => &*IMAGE_RE,
            InlineKind::Link => &*LINK_RE,
            InlineKind::Strong => &*STRONG_RE,
            InlineKind::Strikethrough => &*STRIKE_RE,
            InlineKind::Emphasis => &*EMPHASIS_RE,
        }
    }

    /// Width of the opening/closing delimiter for symmetric constructs.
    pub fn delimiter_len(self) -> usize {
        match self {
            InlineKind::CodeSpan | InlineKind::Emphasis => 1,
            InlineKind::Strong | InlineKind::Strikethrough => 2,
            InlineKind::Image | InlineKind::Link => 0,
        }
    }
}

/// One inline match, positioned in chars relative to the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch<'t> {
    pub range: Range<usize>,
    /// Inner text: code/strong/... content, or the alt/label of images and links.
    pub content: &'t str,
    /// Image source or link target.
    pub target: Option<&'t str>,
    /// The char right before the match, if any.
    pub preceding: Option<char>,
}

/// Find every non-overlapping match of one construct, left to right.
pub fn find_inline(kind: InlineKind, text: &str) -> Vec<InlineMatch<'_>> {
    let mut out = Vec::new();
    // Matches come back in ascending order, so char positions can be
    // counted incrementally instead of rescanning from the start each time.
    let mut byte_pos = 0;
    let mut char_pos = 0;
    for caps in kind.regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        char_pos += chars(&text[byte_pos..whole.start()]);
        let start = char_pos;
        char_pos += chars(whole.as_str());
        byte_pos = whole.end();

        out.push(InlineMatch {
            range: start..char_pos,
            content: caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
            target: caps.get(2).map(|m| m.as_str()),
            preceding: text[..whole.start()].chars().next_back(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_and_rule() {
        assert!(is_fence("```"));
        assert!(is_fence("```rust"));
        assert!(!is_fence("``"));
        assert!(!is_fence(" ```"));

        assert!(is_rule("---"));
        assert!(is_rule("*****  "));
        assert!(is_rule("___"));
        assert!(!is_rule("--"));
        assert!(!is_rule("-*-"));
        assert!(!is_rule("--- x"));
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading("# Hello"), Some(HeadingMarker { level: 1, len: 2 }));
        assert_eq!(
            heading("###   Deep"),
            Some(HeadingMarker { level: 3, len: 6 })
        );
        assert_eq!(heading("####### seven"), None);
        assert_eq!(heading("#nospace"), None);
    }

    #[test]
    fn test_blockquote_marker() {
        assert_eq!(blockquote("> quoted"), Some(2));
        assert_eq!(blockquote(">tight"), Some(1));
        assert_eq!(blockquote("not > quoted"), None);
    }

    #[test]
    fn test_task_marker() {
        let task = task("  - [X] ship it").unwrap();
        assert!(task.checked);
        assert_eq!(task.marker.indent, 2);
        assert_eq!(task.marker.len, 8);
        assert_eq!(task.token, 4..7);

        let open = super::task("* [ ] todo").unwrap();
        assert!(!open.checked);
        assert_eq!(open.token, 2..5);

        assert!(super::task("- [y] nope").is_none());
        assert!(super::task("- [x]").is_none());
    }

    #[test]
    fn test_list_markers() {
        let item = ordered("12. twelve").unwrap();
        assert_eq!(item.number, "12");
        assert_eq!(item.marker.marker_range(), 0..4);

        let bullet = unordered("    + nested").unwrap();
        assert_eq!(bullet.indent, 4);
        assert_eq!(bullet.marker_range(), 4..6);

        assert!(ordered("1 not a list").is_none());
        assert!(unordered("-not a list").is_none());
    }

    #[test]
    fn test_emphasis_rejects_strong_opening() {
        let matches = find_inline(InlineKind::Emphasis, "**bold**");
        // The regex still finds a run inside the strong span; occupancy keeps it out.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].range, 1..8);

        assert!(find_inline(InlineKind::Emphasis, "* not emphasis *").is_empty());
        assert_eq!(find_inline(InlineKind::Emphasis, "*a*")[0].content, "a");
    }

    #[test]
    fn test_link_reports_preceding_char() {
        let matches = find_inline(InlineKind::Link, "see ![alt](a.png) and [x](y)");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].preceding, Some('!'));
        assert_eq!(matches[1].content, "x");
        assert_eq!(matches[1].target, Some("y"));
        assert_eq!(matches[1].range, 22..28);
    }

    #[test]
    fn test_inline_offsets_are_chars() {
        let matches = find_inline(InlineKind::Strong, "héllo **wörld** **x**");
        assert_eq!(matches[0].range, 6..15);
        assert_eq!(matches[1].range, 16..21);
    }
}
