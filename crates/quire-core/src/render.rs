//! Static HTML for rendered forms and whole documents.
//!
//! Hosts with a live DOM materialize widgets themselves; this is the
//! reference rendering used for snapshots of a preview (the CLI's html
//! output) and as the canonical element/class layout.

use std::fmt;

use pulldown_cmark_escape::{FmtWriter, StrWrite, escape_href, escape_html};

use crate::decoration::{Decoration, DecorationSet, MarkStyle, RangeAction, RenderedForm};
use crate::text::LineSource;

const ZERO_WIDTH_SPACE: &str = "\u{200B}";

impl RenderedForm {
    /// Write the element that replaces a hidden range.
    pub fn write_html<W: StrWrite>(&self, w: &mut W) -> Result<(), W::Error> {
        match self {
            RenderedForm::ZeroWidth => {
                w.write_str("<span class=\"md-zero-width\">")?;
                w.write_str(ZERO_WIDTH_SPACE)?;
                w.write_str("</span>")
            }
            RenderedForm::Text { text, style } => {
                w.write_str("<span class=\"")?;
                w.write_str(style.class())?;
                w.write_str("\">")?;
                escape_html(&mut *w, text)?;
                w.write_str("</span>")
            }
            RenderedForm::Image { src, alt } => {
                w.write_str("<span class=\"md-image-wrap\"><img src=\"")?;
                escape_href(&mut *w, src)?;
                w.write_str("\" alt=\"")?;
                escape_html(&mut *w, alt)?;
                w.write_str("\">")?;
                if !alt.is_empty() {
                    w.write_str("<span class=\"md-image-caption\">")?;
                    escape_html(&mut *w, alt)?;
                    w.write_str("</span>")?;
                }
                w.write_str("</span>")
            }
            RenderedForm::HorizontalRule => w.write_str("<hr class=\"md-hr\">"),
            RenderedForm::Checkbox { checked, toggle } => {
                write!(
                    w,
                    "<span class=\"md-checkbox\" data-task-from=\"{}\" data-task-to=\"{}\" data-task-checked=\"{}\">",
                    toggle.start, toggle.end, checked
                )?;
                w.write_str("<span class=\"md-checkbox-box\">")?;
                w.write_str(if *checked { "☑" } else { "☐" })?;
                w.write_str("</span></span>")
            }
        }
    }
}

fn write_mark<W: StrWrite>(w: &mut W, style: &MarkStyle, text: &str) -> Result<(), W::Error> {
    w.write_str("<span class=\"")?;
    w.write_str(style.class())?;
    w.write_str("\"")?;
    for (name, value) in style.attributes() {
        w.write_str(" ")?;
        w.write_str(name)?;
        w.write_str("=\"")?;
        escape_html(&mut *w, value)?;
        w.write_str("\"")?;
    }
    w.write_str(">")?;
    escape_html(&mut *w, text)?;
    w.write_str("</span>")
}

/// Char-offset slice of a line's text.
fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
    let start = indices.nth(from).unwrap_or(text.len());
    let end = if to > from {
        indices.nth(to - from - 1).unwrap_or(text.len())
    } else {
        start
    };
    &text[start..end]
}

/// Render `doc` with `decorations` applied, one `div` per line.
pub fn render_html<D: LineSource + ?Sized>(
    doc: &D,
    decorations: &DecorationSet,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mut w = FmtWriter(&mut out);
    let ranges: Vec<&Decoration> = decorations.ranges().collect();
    let mut next = 0;

    for number in 1..=doc.line_count() {
        let Some(line) = doc.line(number) else {
            break;
        };

        w.write_str("<div class=\"md-line")?;
        for style in decorations.line_styles_at(line.from) {
            w.write_str(" ")?;
            w.write_str(&style.class())?;
        }
        w.write_str("\">")?;

        let mut cursor = line.from;
        while let Some(deco) = ranges.get(next) {
            if deco.from() > line.to || (deco.from() == line.to && deco.to() > line.to) {
                break;
            }
            next += 1;
            let Decoration::Range { range, action } = deco else {
                continue;
            };
            escape_html(&mut w, char_slice(&line.text, cursor - line.from, range.start - line.from))?;
            match action {
                RangeAction::Hide(form) => form.write_html(&mut w)?,
                RangeAction::Mark(style) => write_mark(
                    &mut w,
                    style,
                    char_slice(&line.text, range.start - line.from, range.end - line.from),
                )?,
            }
            cursor = range.end;
        }
        escape_html(&mut w, char_slice(&line.text, cursor - line.from, line.len_chars()))?;
        w.write_str("</div>\n")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use smol_str::SmolStr;

    use super::*;
    use crate::config::PreviewOptions;
    use crate::decoration::TextStyle;
    use crate::preview::compute_decorations;
    use crate::text::EditorRope;
    use crate::types::Selection;

    fn form_html(form: RenderedForm) -> String {
        let mut out = String::new();
        form.write_html(&mut FmtWriter(&mut out)).unwrap();
        out
    }

    fn render(source: &str, caret: usize) -> String {
        let doc = EditorRope::from(source);
        let decos = compute_decorations(&doc, Selection::collapsed(caret), &PreviewOptions::default());
        render_html(&doc, &decos).unwrap()
    }

    #[test]
    fn test_char_slice() {
        assert_eq!(char_slice("héllo", 1, 3), "él");
        assert_eq!(char_slice("héllo", 0, 0), "");
        assert_eq!(char_slice("héllo", 4, 5), "o");
        assert_eq!(char_slice("héllo", 5, 5), "");
    }

    #[test]
    fn test_forms() {
        assert_eq!(
            form_html(RenderedForm::ZeroWidth),
            "<span class=\"md-zero-width\">\u{200B}</span>"
        );
        assert_eq!(
            form_html(RenderedForm::Text {
                text: SmolStr::new("a<b"),
                style: TextStyle::Link
            }),
            "<span class=\"md-link\">a&lt;b</span>"
        );
        assert_eq!(form_html(RenderedForm::HorizontalRule), "<hr class=\"md-hr\">");
        assert_eq!(
            form_html(RenderedForm::Checkbox {
                checked: false,
                toggle: 2..5
            }),
            "<span class=\"md-checkbox\" data-task-from=\"2\" data-task-to=\"5\" data-task-checked=\"false\"><span class=\"md-checkbox-box\">☐</span></span>"
        );
    }

    #[test]
    fn test_image_caption_only_with_alt() {
        let with_alt = form_html(RenderedForm::Image {
            src: SmolStr::new("cat.png"),
            alt: SmolStr::new("cat"),
        });
        assert!(with_alt.contains("<span class=\"md-image-caption\">cat</span>"));

        let without = form_html(RenderedForm::Image {
            src: SmolStr::new("cat.png"),
            alt: SmolStr::new(""),
        });
        assert!(!without.contains("md-image-caption"));
    }

    #[test]
    fn test_render_document() {
        let html = render("# Title\n\nsome **bold** & more", 0);
        assert_eq!(
            html,
            "<div class=\"md-line md-heading-line md-h1\"># Title</div>\n\
             <div class=\"md-line\"></div>\n\
             <div class=\"md-line\">some <span class=\"md-zero-width\">\u{200B}</span>\
             <span class=\"md-strong\">bold</span>\
             <span class=\"md-zero-width\">\u{200B}</span> &amp; more</div>\n"
        );
    }

    #[test]
    fn test_render_task_document() {
        let html = render("# Title\n\n- [ ] task & more", 0);
        insta::assert_snapshot!(html, @r#"
        <div class="md-line md-heading-line md-h1"># Title</div>
        <div class="md-line"></div>
        <div class="md-line md-list-line md-task-line"><span class="md-checkbox" data-task-from="11" data-task-to="14" data-task-checked="false"><span class="md-checkbox-box">☐</span></span>task &amp; more</div>
        "#);
    }

    #[test]
    fn test_render_link_attributes() {
        let html = render("\n\n[a](https://x.y/?q=\"1\")", 0);
        assert!(html.contains(
            "<span class=\"md-link\" data-href=\"https://x.y/?q=&quot;1&quot;\" title=\"https://x.y/?q=&quot;1&quot;\">a</span>"
        ));
    }
}
