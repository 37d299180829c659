//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait covers the edits the preview needs to push back
//! into the document (checkbox toggles), and `LineSource` is the read side
//! the decoration passes walk. `EditorRope` implements both on top of ropey.

use std::borrow::Cow;
use std::ops::Range;

use ropey::RopeSlice;
use smol_str::{SmolStr, ToSmolStr};

/// A text buffer that supports editing by char offset.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;
}

/// One line of a document, without its line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Char offset of the first character of the line.
    pub from: usize,
    /// Char offset just past the last character (line break excluded).
    pub to: usize,
    pub text: Cow<'a, str>,
}

impl Line<'_> {
    pub fn len_chars(&self) -> usize {
        self.to - self.from
    }

    pub fn char_range(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// Line-oriented read access to a document.
pub trait LineSource {
    /// Number of lines. An empty document has one empty line, and a trailing
    /// line break opens a final empty line.
    fn line_count(&self) -> usize;

    /// Get a line by 1-based number. Returns None if out of range.
    fn line(&self, number: usize) -> Option<Line<'_>>;

    /// Total length in chars.
    fn doc_len(&self) -> usize;
}

/// Ropey-backed text buffer for local editing.
///
/// Provides O(log n) editing operations and line lookups.
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl LineSource for EditorRope {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, number: usize) -> Option<Line<'_>> {
        if number == 0 || number > self.rope.len_lines() {
            return None;
        }
        let index = number - 1;
        let from = self.rope.line_to_char(index);
        let text = strip_line_break(self.rope.line(index));
        let to = from + text.chars().count();
        Some(Line {
            number,
            from,
            to,
            text,
        })
    }

    fn doc_len(&self) -> usize {
        self.rope.len_chars()
    }
}

/// Borrow the line contents when ropey hands back a single chunk.
fn strip_line_break(slice: RopeSlice<'_>) -> Cow<'_, str> {
    let text: Cow<'_, str> = match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    };
    let trimmed_len = {
        let full: &str = &text;
        let t = full.strip_suffix('\n').unwrap_or(full);
        let t = t.strip_suffix('\r').unwrap_or(t);
        t.len()
    };
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(&s[..trimmed_len]),
        Cow::Owned(mut s) => {
            s.truncate(trimmed_len);
            Cow::Owned(s)
        }
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}
