//! Export tests for HTML format (Markup tree → HTML)

use insta::assert_snapshot;
use quill_babel::format::Format;
use quill_babel::formats::html::HtmlFormat;
use quill_babel::formats::markdown::MarkdownFormat;
use std::collections::HashMap;

fn md_to_html(md: &str) -> String {
    let doc = MarkdownFormat::default().parse(md).unwrap();
    HtmlFormat::default().serialize(&doc).unwrap()
}

#[test]
fn test_paragraph_simple() {
    assert_snapshot!(
        md_to_html("This is a simple paragraph.\n"),
        @"<p>This is a simple paragraph.</p>"
    );
}

#[test]
fn test_nested_list() {
    assert_snapshot!(md_to_html("- a\n  - b\n- c\n"), @r"
<ul>
<li>a
<ul>
<li>b</li>
</ul></li>
<li>c</li>
</ul>
");
}

#[test]
fn test_code_and_math_are_escaped_once() {
    let html = md_to_html("```html\n<b>&amp;</b>\n```\n\nand $a<b$\n");
    assert!(
        html.contains("<code class=\"language-html\">&lt;b&gt;&amp;amp;&lt;/b&gt;\n</code>"),
        "{html}"
    );
    assert!(
        html.contains("<span class=\"math math-inline\">a&lt;b</span>"),
        "{html}"
    );
}

#[test]
fn test_kitchensink_export() {
    let html = md_to_html(include_str!("../fixtures/kitchensink.md"));

    assert!(!html.contains("title: Kitchen Sink"), "frontmatter is dropped");
    assert!(html.starts_with("<h1>Kitchen Sink</h1>"));
    assert!(html.contains("<a href=\"https://example.com\" title=\"Example\">link</a>"));
    assert!(html.contains("<img src=\"logo.png\" alt=\"logo\">"));
    assert!(html.contains("Entities like &amp; and © decode."));
    assert!(html.contains("<ol>\n<li>\n<p>one</p>\n</li>"));
    assert!(html.contains("<pre><code class=\"language-rust\" data-meta=\"title=&quot;main.rs&quot;\">"));
    assert!(html.contains("<pre><code>indented code\nstays verbatim\n</code></pre>"));
    assert!(html.contains("<div class=\"math math-display\">\\int_0^1 x^2 \\, dx</div>"));
    assert!(html.contains("<div class=\"note\">\nraw html block\n</div>"));
    assert!(html.contains("hard break<br>\nand the rest."));
    assert!(html.contains("<hr>"));
}

#[test]
fn test_standalone_document() {
    let doc = MarkdownFormat::default()
        .parse("# A & B\n\ntext\n")
        .unwrap();
    let mut options = HashMap::new();
    options.insert("standalone".to_string(), "true".to_string());
    let html = HtmlFormat::default()
        .serialize_with_options(&doc, &options)
        .unwrap();
    assert!(html.starts_with("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>A &amp; B</title></head>"), "{html}");
    assert!(html.ends_with("</body></html>\n"), "{html}");
}
