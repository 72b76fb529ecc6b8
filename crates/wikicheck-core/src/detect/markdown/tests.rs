use super::*;

fn detect(text: &str) -> Vec<Link> {
    MarkdownLinkDetector::new().detect(text)
}

fn assert_single_link(text: &str, expected_text: &str, expected_path: &str) {
    let links = detect(text);
    assert_eq!(
        links.len(),
        1,
        "expected one link in {text:?}, got {links:?}"
    );
    assert_eq!(links[0].text(), expected_text);
    assert_eq!(links[0].path(), expected_path);
}

// --- Reference links ---

#[test]
fn test_reference_link() {
    assert_single_link(
        "[Test][1]\n\n[1]: http://example.org",
        "Test",
        "http://example.org",
    );
}

#[test]
fn test_reference_link_angle_brackets() {
    assert_single_link(
        "[Test][1]\n\n[1]: <http://example.org>",
        "Test",
        "http://example.org",
    );
}

#[test]
fn test_reference_definition_indented_three_spaces() {
    assert_single_link(
        "[Test][1]\n\n   [1]: http://example.org",
        "Test",
        "http://example.org",
    );
}

#[test]
fn test_reference_definition_indented_three_tabs() {
    assert_single_link(
        "[Test][1]\n\n\t\t\t[1]: http://example.org",
        "Test",
        "http://example.org",
    );
}

#[test]
fn test_reference_definition_indented_four_spaces_is_code() {
    assert!(detect("[Test][1]\n\n    [1]: http://example.org").is_empty());
}

#[test]
fn test_reference_definition_titles() {
    for title in ["\"title\"", "'title'", "(title)"] {
        let text = format!("[Test][1]\n\n[1]: http://example.org {title}");
        assert_single_link(&text, "Test", "http://example.org");
    }
}

#[test]
fn test_reference_link_without_definition() {
    assert!(detect("[Test][2]\n\n[1]: http://example.org").is_empty());
}

#[test]
fn test_reference_link_named_reference() {
    assert_single_link(
        "[Test][test-ref]\n\n[test-ref]: http://example.org",
        "Test",
        "http://example.org",
    );
}

#[test]
fn test_reference_link_implicit_reference() {
    assert_single_link(
        "[Test][]\n\n[Test]: http://example.org",
        "Test",
        "http://example.org",
    );
}

#[test]
fn test_reference_labels_ignore_case() {
    assert_single_link(
        "[Test][REF]\n\n[ref]: http://example.org",
        "Test",
        "http://example.org",
    );
}

#[test]
fn test_reference_link_position() {
    let links = detect("Intro\n\nRead [the guide][g] first.\n\n[g]: Guide");
    assert_eq!(links.len(), 1);
    assert_eq!((links[0].line(), links[0].column()), (3, 6));
    assert_eq!(links[0].path(), "Guide");
    assert!(links[0].is_wiki_link());
}

// --- Inline links ---

#[test]
fn test_inline_link() {
    assert_single_link("[Test](http://example.org)", "Test", "http://example.org");
}

#[test]
fn test_inline_link_titles() {
    for title in ["\"title\"", "'title'", "(title)"] {
        let text = format!("[Test](http://example.org {title})");
        assert_single_link(&text, "Test", "http://example.org");
    }
}

#[test]
fn test_inline_link_position() {
    let links = detect("Intro\n\nSee [Test](http://example.org)");
    assert_eq!(links.len(), 1);
    assert_eq!((links[0].line(), links[0].column()), (3, 5));
}

#[test]
fn test_inline_links_on_code_line_ignored() {
    assert!(detect("Intro\n\n    [Test](http://example.org)").is_empty());
}

// --- Autolinks ---

#[test]
fn test_autolink() {
    let links = detect("Visit <http://example.org> today");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].path(), "http://example.org");
    assert!(!links[0].has_friendly_text());
    assert_eq!(links[0].column(), 7);
}

#[test]
fn test_html_tags_are_not_autolinks() {
    assert!(detect("<div>Plain</div> <br/>").is_empty());
}

#[test]
fn test_autolink_on_reference_line_not_double_counted() {
    let links = detect("[Test][1]\n\n[1]: <http://example.org>\n\n<mailto:dev@example.org>");
    assert_eq!(links.len(), 2);
    assert!(links.iter().any(|l| l.path() == "http://example.org" && l.text() == "Test"));
    assert!(links.iter().any(|l| l.is_mail_link()));
}

// --- Escapes ---

#[test]
fn test_escaped_opening_bracket_voids_reference_link() {
    assert!(detect("\\[Test][1]\n\n[1]: http://example.org").is_empty());
}

#[test]
fn test_escaped_backslash_keeps_link() {
    let links = detect("\\\\[Test][1]\n\n[1]: http://example.org");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].text(), "Test");
    assert_eq!((links[0].line(), links[0].column()), (1, 3));
}

#[test]
fn test_escaped_closing_bracket_does_not_end_link() {
    assert_single_link(
        "[Te\\]st](http://example.org)",
        "Te]st",
        "http://example.org",
    );
}

#[test]
fn test_escaped_parenthesis_voids_inline_link() {
    assert!(detect("[Test]\\(http://example.org)").is_empty());
}

// --- Code ---

#[test]
fn test_fenced_code_block_ignored() {
    let links = detect("```\n[a](http://a.example)\n```\n\n[b](http://b.example)");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].path(), "http://b.example");
}

#[test]
fn test_code_span_ignored() {
    let links = detect("Write `[a](http://a.example)` to get [b](http://b.example)");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].path(), "http://b.example");
}

#[test]
fn test_mixed_document() {
    let text = "\
# Home

See [Setup](docs/Setup) and [the FAQ][faq].
Questions go to <mailto:dev@example.org>.

[faq]: https://example.org/faq \"FAQ\"
";
    let links = detect(text);
    assert_eq!(links.len(), 3);
    assert!(links.iter().any(|l| l.path() == "docs/Setup" && l.text() == "Setup"));
    assert!(links.iter().any(|l| l.path() == "https://example.org/faq" && l.text() == "the FAQ"));
    assert!(links.iter().any(|l| l.path() == "mailto:dev@example.org"));
}
