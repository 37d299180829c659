//! End-to-end behaviour of the decoration engine on small documents.

use quire_core::{
    Decoration, EditorDocument, EditorRope, HostEffect, MarkStyle, Modifiers,
    PlainEditor, PreviewOptions, RangeAction, RenderedForm, Selection, SmolStr, click_at,
    compute_decorations,
};

fn decorate(source: &str, selection: Selection) -> Vec<Decoration> {
    let doc = EditorRope::from(source);
    compute_decorations(&doc, selection, &PreviewOptions::default()).into_vec()
}

#[test]
fn bold_away_from_cursor_is_rendered() {
    let decos = decorate("x **bold** y", Selection::collapsed(12));
    insta::assert_yaml_snapshot!(decos, @r"
    - kind: range
      range:
        start: 2
        end: 4
      action:
        action: hide
        form: zero_width
    - kind: range
      range:
        start: 4
        end: 8
      action:
        action: mark
        type: strong
    - kind: range
      range:
        start: 8
        end: 10
      action:
        action: hide
        form: zero_width
    ");
}

#[test]
fn selection_touching_span_end_reveals_it() {
    let decos = decorate("x **bold** y", Selection::new(10, 12));
    assert!(decos.iter().all(|d| !d.is_hide()));
    assert!(decos.is_empty());
}

#[test]
fn code_span_content_never_emphasized() {
    let decos = decorate("see `a*b*c` here", Selection::collapsed(16));
    assert!(!decos.iter().any(|d| matches!(
        d,
        Decoration::Range {
            action: RangeAction::Mark(MarkStyle::Emphasis),
            ..
        }
    )));
    assert!(decos.contains(&Decoration::Range {
        range: 5..10,
        action: RangeAction::Mark(MarkStyle::InlineCode)
    }));
}

#[test]
fn computation_is_idempotent() {
    let source = "# Title\n\n> a *quote* with [link](https://a.b)\n\n```rust\nfn main() {}\n```\n\n- [ ] task\n1. one\n---\n![img](i.png) ~~old~~";
    let doc = EditorRope::from(source);
    let options = PreviewOptions::default();
    for caret in [0, 5, 20, 60, 90, source.chars().count()] {
        let first = compute_decorations(&doc, Selection::collapsed(caret), &options);
        let second = compute_decorations(&doc, Selection::collapsed(caret), &options);
        assert_eq!(first, second);
    }
}

#[test]
fn output_is_sorted_and_ranges_disjoint() {
    let source = "## **Head** `code`\n> - [x] done *now*\n3. [](https://example.com)\n\n***\n\nplain ~~s~~ and [](#top)";
    let doc = EditorRope::from(source);
    let len = source.chars().count();
    for caret in 0..=len {
        let decos = compute_decorations(&doc, Selection::collapsed(caret), &PreviewOptions::default());
        let all = decos.as_slice();
        for pair in all.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.from() <= b.from(), "caret {caret}: {a} before {b}");
            if a.from() == b.from() && a.is_line() != b.is_line() {
                assert!(a.is_line(), "caret {caret}: line marker must come first at {}", a.from());
            }
            if a.from() == b.from() && a.is_line() == b.is_line() {
                assert!(a.to() <= b.to(), "caret {caret}: {a} before {b}");
            }
        }
        let ranges: Vec<_> = decos.ranges().collect();
        for pair in ranges.windows(2) {
            assert!(
                pair[0].to() <= pair[1].from(),
                "caret {caret}: {} overlaps {}",
                pair[0],
                pair[1]
            );
        }
        assert!(ranges.iter().all(|d| d.to() <= len));
    }
}

#[test]
fn heading_marker_revealed_at_line_start() {
    let decos = decorate("# Hello", Selection::collapsed(0));
    insta::assert_yaml_snapshot!(decos, @r"
    - kind: line
      at: 0
      style:
        type: heading
        level: 1
    ");
}

#[test]
fn heading_marker_hidden_at_line_end() {
    let decos = decorate("# Hello", Selection::collapsed(7));
    insta::assert_yaml_snapshot!(decos, @r"
    - kind: line
      at: 0
      style:
        type: heading
        level: 1
    - kind: range
      range:
        start: 0
        end: 2
      action:
        action: hide
        form: zero_width
    ");
}

#[test]
fn quote_and_list_away_from_cursor() {
    let source = "intro\n> a *quote* [go](https://a.b)\n3. three\n\n\nend";
    let decos = decorate(source, Selection::collapsed(source.chars().count()));
    let listing: Vec<String> = decos.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(listing.join("\n"), @r#"
    6 line md-blockquote-line
    6..8 hide zero-width
    10..11 hide zero-width
    11..16 mark md-em
    16..17 hide zero-width
    18..19 hide zero-width
    19..21 mark md-link data-href="https://a.b" title="https://a.b"
    21..35 hide zero-width
    36 line md-list-line
    36..39 hide text "3." md-list-number
    "#);
}

#[test]
fn task_checkbox_renders_and_toggles() {
    let source = "- [x] done\n\nother";
    let decos = decorate(source, Selection::collapsed(17));
    let checkboxes: Vec<_> = decos
        .iter()
        .filter(|d| {
            matches!(
                d,
                Decoration::Range {
                    action: RangeAction::Hide(RenderedForm::Checkbox { .. }),
                    ..
                }
            )
        })
        .collect();
    assert_eq!(
        checkboxes,
        vec![&Decoration::Range {
            range: 0..6,
            action: RangeAction::Hide(RenderedForm::Checkbox {
                checked: true,
                toggle: 2..5
            })
        }]
    );

    let mut editor = PlainEditor::with_selection(EditorRope::from(source), Selection::collapsed(17));
    let set = editor.decorations(&PreviewOptions::default());
    let effect = click_at(&set, 3, Modifiers::NONE).unwrap();
    assert_eq!(
        effect,
        HostEffect::ReplaceText {
            range: 2..5,
            insert: SmolStr::new("[ ]")
        }
    );
    editor.apply_effect(&effect, &()).unwrap();
    assert_eq!(editor.content_string(), "- [ ] done\n\nother");
}

#[test]
fn link_opens_only_with_modifier() {
    let mut editor = PlainEditor::with_selection(
        EditorRope::from("go [there](https://x.y) now"),
        Selection::collapsed(27),
    );
    let set = editor.decorations(&PreviewOptions::default());
    assert_eq!(click_at(&set, 5, Modifiers::NONE), None);

    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    let effect = click_at(&set, 5, ctrl).unwrap();
    assert_eq!(effect, HostEffect::OpenUrl(SmolStr::new("https://x.y")));
    // The unit host can't open anything.
    assert!(editor.apply_effect(&effect, &()).is_err());
}
