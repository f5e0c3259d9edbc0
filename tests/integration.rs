use std::path::PathBuf;

use bracewise::driver::{Host, HostMessage};
use bracewise::{
    load_settings, Document, Editor, EditorConfig, Key, Settings, Span, Style, SuggestionItem,
    TextBuffer,
};
use expect_test::expect;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render the buffer with template highlights as `<v>…</v>`, bold as
/// `<b>…</b>` and the caret as `|`, followed by a line describing the
/// suggestion session.
fn render(host: &Host) -> String {
    let summary = host.summary();
    let chars: Vec<char> = summary.text.chars().collect();
    let starts = |spans: &[Span], i: usize| spans.iter().any(|s| s.start == i);
    let ends = |spans: &[Span], i: usize| spans.iter().any(|s| s.end == i);

    let mut out = String::new();
    for i in 0..=chars.len() {
        if ends(&summary.bold, i) {
            out.push_str("</b>");
        }
        if ends(&summary.highlights, i) {
            out.push_str("</v>");
        }
        if summary.caret == Some(i) {
            out.push('|');
        }
        if starts(&summary.highlights, i) {
            out.push_str("<v>");
        }
        if starts(&summary.bold, i) {
            out.push_str("<b>");
        }
        if let Some(c) = chars.get(i) {
            out.push(*c);
        }
    }

    let session = &summary.session;
    let state = if session.open {
        format!(
            "open {:?} [{}] selected={}",
            session.query,
            session.items.join(", "),
            session.selected
        )
    } else {
        "closed".to_string()
    };
    format!("{}\nsession: {}", out, state)
}

fn host_with(items: Vec<SuggestionItem>, buffer: TextBuffer) -> Host {
    let config = EditorConfig::with_suggestions(items).unwrap();
    Host::new(Editor::new(config), buffer)
}

/// The two comparison functions used throughout.
fn host() -> Host {
    host_with(
        vec![
            SuggestionItem::new(1, "eq(a,b)", "eq(a, b)"),
            SuggestionItem::new(2, "gt(a,b)", "gt(a, b)"),
        ],
        TextBuffer::new(),
    )
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Apply messages in order, then flush every pending step.
fn play(host: &mut Host, messages: Vec<HostMessage>) {
    let now = Instant::now();
    for message in messages {
        host.apply(message, now);
    }
    host.apply(HostMessage::Flush, now);
}

fn text(value: &str) -> HostMessage {
    HostMessage::Text {
        value: value.to_string(),
    }
}

fn key(key: Key) -> HostMessage {
    HostMessage::Key { key }
}

// ---------------------------------------------------------------------------
// Tests: highlighting
// ---------------------------------------------------------------------------

#[test]
fn highlights_complete_templates_only() {
    let mut host = host();
    play(&mut host, vec![text("Hi {{name}} and {{x")]);
    let expected = expect![[r#"
        Hi <v>{{name}}</v> and {{x|
        session: open "x" [] selected=0"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn highlight_repaint_is_idempotent() {
    let mut host = host();
    play(&mut host, vec![text("{{a}} {{b}}")]);
    let first = render(&host);
    play(&mut host, vec![HostMessage::Flush]);
    assert_eq!(render(&host), first);
    assert_eq!(
        host.buffer.style_spans(Style::Variable),
        vec![Span::new(0, 5), Span::new(6, 11)]
    );
}

#[test]
fn breaking_a_template_clears_its_highlight() {
    let mut host = host();
    play(
        &mut host,
        vec![text("{{a}} {{b}}"), HostMessage::Backspace],
    );
    let expected = expect![[r#"
        <v>{{a}}</v> {{b}|
        session: open "b}" [] selected=0"#]];
    expected.assert_eq(&render(&host));
}

// ---------------------------------------------------------------------------
// Tests: suggestion sessions
// ---------------------------------------------------------------------------

#[test]
fn typing_a_complete_template_leaves_session_closed() {
    let mut host = host();
    play(&mut host, vec![text("{{ab}}")]);
    let expected = expect![[r#"
        <v>{{ab}}</v>|
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn query_filters_suggestions() {
    let mut host = host();
    play(&mut host, vec![text("{{e")]);
    let expected = expect![[r#"
        {{e|
        session: open "e" [eq(a,b)] selected=0"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn enter_inserts_selected_suggestion() {
    let mut host = host();
    play(&mut host, vec![text("{{e"), key(Key::Enter)]);
    let expected = expect![[r#"
        <v>{{eq(a, b)}}</v>|
        session: closed"#]];
    expected.assert_eq(&render(&host));
    assert_eq!(host.buffer.selection().map(|s| s.index), Some(12));
}

#[test]
fn pointer_pick_inserts_by_id() {
    let mut host = host();
    play(
        &mut host,
        vec![
            text("x {{"),
            HostMessage::Blur { suggestions: true },
            HostMessage::Hover { index: 1 },
            HostMessage::Pick { id: 2.into() },
        ],
    );
    let expected = expect![[r#"
        x <v>{{gt(a, b)}}</v>|
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn arrow_down_is_clamped_at_last_item() {
    let mut host = host();
    play(
        &mut host,
        vec![
            text("{{"),
            key(Key::ArrowDown),
            key(Key::ArrowDown),
            key(Key::ArrowDown),
        ],
    );
    let expected = expect![[r#"
        {{|
        session: open "" [eq(a,b), gt(a,b)] selected=1"#]];
    expected.assert_eq(&render(&host));

    play(&mut host, vec![key(Key::ArrowUp), key(Key::ArrowUp)]);
    assert_eq!(host.editor.session().selected_index, 0);
}

#[test]
fn escape_closes_without_editing() {
    let mut host = host();
    play(&mut host, vec![text("{{e"), key(Key::Escape)]);
    let expected = expect![[r#"
        {{e|
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn reopening_same_query_restores_selection() {
    let mut host = host();
    play(
        &mut host,
        vec![text("{{"), key(Key::ArrowDown), key(Key::Escape)],
    );
    assert!(!host.editor.session().is_open);

    play(&mut host, vec![HostMessage::Select { index: 2, length: 0 }]);
    assert!(host.editor.session().is_open);
    assert_eq!(host.editor.session().selected_index, 1);

    play(&mut host, vec![text("g")]);
    let expected = expect![[r#"
        {{g|
        session: open "g" [gt(a,b)] selected=0"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn blurring_elsewhere_closes_session() {
    let mut host = host();
    play(
        &mut host,
        vec![text("{{"), HostMessage::Blur { suggestions: false }],
    );
    assert!(!host.editor.session().is_open);
    assert_eq!(host.buffer.text(), "{{");
}

#[test]
fn host_deleting_the_trigger_closes_session() {
    let mut host = host();
    play(&mut host, vec![text("abc {{e")]);
    assert!(host.editor.session().is_open);

    host.buffer.delete_text(0, 7).unwrap();
    play(&mut host, vec![]);
    let expected = expect![[r#"
        |
        session: closed"#]];
    expected.assert_eq(&render(&host));
    assert_eq!(host.editor.session().trigger_start, None);
}

#[test]
fn caret_inside_typed_closing_keeps_session_closed() {
    let mut host = host();
    play(
        &mut host,
        vec![text("{{e}}"), HostMessage::Select { index: 4, length: 0 }],
    );
    let expected = expect![[r#"
        <v>{{e}|}</v>
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn enter_passes_through_when_closed() {
    let mut host = host();
    play(&mut host, vec![text("ab"), key(Key::Enter)]);
    assert_eq!(host.buffer.text(), "ab\n");
}

// ---------------------------------------------------------------------------
// Tests: markdown shortcuts
// ---------------------------------------------------------------------------

#[test]
fn typing_asterisk_pair_bolds_interior() {
    let mut host = host();
    play(&mut host, vec![text("*bold*")]);
    let expected = expect![[r#"
        *<b>bold</b>*|
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn deleting_delimiter_keeps_manual_bold() {
    let mut buffer = TextBuffer::with_text("manual ");
    buffer.format_range(0, 6, Style::Bold, true).unwrap();
    let mut host = host_with(Vec::new(), buffer);

    play(&mut host, vec![text("*bold*")]);
    let expected = expect![[r#"
        <b>manual</b> *<b>bold</b>*|
        session: closed"#]];
    expected.assert_eq(&render(&host));

    play(&mut host, vec![HostMessage::Backspace]);
    let expected = expect![[r#"
        <b>manual</b> *bold|
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn asterisk_wraps_selection() {
    let mut host = host_with(Vec::new(), TextBuffer::with_text("make this bold"));
    play(
        &mut host,
        vec![
            HostMessage::Select {
                index: 5,
                length: 4,
            },
            text("*"),
        ],
    );
    let expected = expect![[r#"
        make *<b>this</b>*| bold
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

// ---------------------------------------------------------------------------
// Tests: configuration
// ---------------------------------------------------------------------------

#[test]
fn fixture_settings_drive_custom_delimiters() {
    let settings = load_settings(&fixture("basic").join("bracewise.toml")).unwrap();
    let config = settings.into_config().unwrap();
    assert_eq!(config.trigger(), "<<");
    let mut host = Host::new(Editor::new(config), TextBuffer::new());

    play(&mut host, vec![text("Hi <<fir")]);
    let expected = expect![[r#"
        Hi <<fir|
        session: open "fir" [First name] selected=0"#]];
    expected.assert_eq(&render(&host));

    play(&mut host, vec![key(Key::Tab)]);
    let expected = expect![[r#"
        Hi <v><<CONTACT.first_name>></v>|
        session: closed"#]];
    expected.assert_eq(&render(&host));
}

#[test]
fn builtin_catalog_is_opt_in() {
    let settings = Settings::from_toml("[suggestions]\ninclude_builtins = true\n").unwrap();
    let mut host = Host::new(
        Editor::new(settings.into_config().unwrap()),
        TextBuffer::new(),
    );

    play(&mut host, vec![text("{{upperc"), key(Key::Enter)]);
    let expected = expect![[r#"
        <v>{{uppercase(str)}}</v>|
        session: closed"#]];
    expected.assert_eq(&render(&host));

    let plain = Settings::default().into_config().unwrap();
    assert!(plain.suggestions().is_empty());
}

#[test]
fn missing_settings_file_uses_defaults() {
    let settings = load_settings(&fixture("missing").join("bracewise.toml")).unwrap();
    let config = settings.into_config().unwrap();
    assert_eq!(config.trigger(), "{{");
    assert_eq!(config.closing(), "}}");
}
