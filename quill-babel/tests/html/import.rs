//! Import tests for HTML format (HTML → Markup tree)

use quill_babel::format::Format;
use quill_babel::formats::html::HtmlFormat;
use quill_babel::formats::markdown::MarkdownFormat;
use quill_babel::options::{HypertextOptions, TransformOptions};
use quill_babel::tree::markup::{Document, Node, NodeKind};

fn html_to_md(html: &str) -> String {
    let doc = HtmlFormat::default().parse(html).unwrap();
    MarkdownFormat::default().serialize(&doc).unwrap()
}

fn kitchensink() -> Document {
    let format = HtmlFormat::new(
        HypertextOptions {
            fragment: false,
            ..HypertextOptions::default()
        },
        TransformOptions::default(),
    );
    format
        .parse(include_str!("../fixtures/kitchensink.html"))
        .unwrap()
}

#[test]
fn test_kitchensink_block_structure() {
    let doc = kitchensink();
    let kinds: Vec<NodeKind> = doc.children.iter().map(Node::kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Html,
            NodeKind::Heading,
            NodeKind::Paragraph,
            NodeKind::Paragraph,
            NodeKind::List,
            NodeKind::List,
            NodeKind::CodeBlock,
            NodeKind::Html,
            NodeKind::Html,
            NodeKind::BlockQuote,
            NodeKind::Paragraph,
            NodeKind::MathBlock,
            NodeKind::Paragraph,
            NodeKind::Paragraph,
            NodeKind::ThematicBreak,
        ]
    );
}

#[test]
fn test_kitchensink_details() {
    let doc = kitchensink();

    let Node::Html(head) = &doc.children[0] else {
        panic!("expected head passthrough");
    };
    assert_eq!(head.value, "<head><title>Kitchen Sink</title></head>");

    let Node::Paragraph(loose) = &doc.children[2] else {
        panic!("expected paragraph");
    };
    assert_eq!(
        loose.children,
        vec![Node::text("Loose text in a section with a span.")]
    );

    let Node::List(ordered) = &doc.children[5] else {
        panic!("expected ordered list");
    };
    assert_eq!(ordered.start, Some(5));
    assert!(!ordered.tight);

    let Node::CodeBlock(code) = &doc.children[6] else {
        panic!("expected code block");
    };
    assert_eq!(code.lang(), Some("python"));
    assert_eq!(code.value, "print(\"hi\")\n");

    let Node::Html(comment) = &doc.children[8] else {
        panic!("expected comment passthrough");
    };
    assert_eq!(comment.value, "<!-- a comment -->");
}

#[test]
fn test_kitchensink_to_markdown() {
    let doc = kitchensink();
    let md = MarkdownFormat::default().serialize(&doc).unwrap();
    assert!(md.contains("# Kitchen *Sink*"), "{md}");
    assert!(md.contains("*italic*, **bold**, `Ctrl` and a [link](/x \"X\")."), "{md}");
    assert!(md.contains("```python\nprint(\"hi\")\n```"), "{md}");
    assert!(md.contains("![A cat](cat.png)"), "{md}");
    assert!(md.contains("$x^2$"), "{md}");
}

#[test]
fn test_plain_paragraph_round_trip() {
    let md = "Just a plain paragraph of text.\n";
    let doc = MarkdownFormat::default().parse(md).unwrap();
    let html = HtmlFormat::default().serialize(&doc).unwrap();
    assert_eq!(html_to_md(&html), md);
}

#[test]
fn test_malformed_html_is_repaired() {
    assert_eq!(html_to_md("<p>one<p>two <b>bold"), "one\n\ntwo **bold**\n");
}

#[test]
fn test_unknown_entities_pass_through() {
    let md = html_to_md("<p>a &bogus; b</p>");
    assert!(md.contains("a &bogus; b") || md.contains("a \\&bogus; b"), "{md}");
}

#[test]
fn test_document_head_is_not_prose() {
    let md = html_to_md(
        "<!DOCTYPE html><html><head><title>Doc</title><style>p{}</style></head><body><p>x</p></body></html>",
    );
    assert!(md.starts_with("<head><title>Doc</title><style>p{}</style></head>"), "{md}");
    assert!(md.ends_with("\n\nx\n"), "{md}");
    assert!(!md.lines().any(|line| line == "Doc"), "{md}");
}

#[test]
fn test_stray_title_is_not_prose() {
    let doc = HtmlFormat::default()
        .parse("<title>Doc</title><p>x</p>")
        .unwrap();
    let kinds: Vec<NodeKind> = doc.children.iter().map(Node::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Html, NodeKind::Paragraph]);
}

#[test]
fn test_heading_break_stays_in_heading() {
    let md = html_to_md("<h1>a<br>b</h1>");
    assert_eq!(md, "# a b\n");
    let doc = MarkdownFormat::default().parse(&md).unwrap();
    let kinds: Vec<NodeKind> = doc.children.iter().map(Node::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Heading]);
}

#[test]
fn test_dollars_in_prose_stay_text() {
    let md = html_to_md("<p>pay $x$ now</p>");
    let doc = MarkdownFormat::default().parse(&md).unwrap();
    assert!(
        !doc.descendants().any(|n| n.kind() == NodeKind::InlineMath),
        "{md}"
    );
    assert_eq!(quill_babel::tree::markup::plain_text(&doc.children), "pay $x$ now");
}
