//! Import tests for Markdown format (Markdown → Markup tree)

use quill_babel::format::Format;
use quill_babel::formats::markdown::MarkdownFormat;
use quill_babel::tree::markup::{Document, Node, NodeKind};

fn kitchensink() -> (&'static str, Document) {
    let source = include_str!("../fixtures/kitchensink.md");
    let doc = MarkdownFormat::default()
        .parse(source)
        .expect("kitchensink should parse");
    (source, doc)
}

#[test]
fn test_kitchensink_block_structure() {
    let (_, doc) = kitchensink();
    let kinds: Vec<NodeKind> = doc.children.iter().map(Node::kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Frontmatter,
            NodeKind::Heading,
            NodeKind::Paragraph,
            NodeKind::Heading,
            NodeKind::List,
            NodeKind::List,
            NodeKind::BlockQuote,
            NodeKind::CodeBlock,
            NodeKind::CodeBlock,
            NodeKind::Paragraph,
            NodeKind::MathBlock,
            NodeKind::Html,
            NodeKind::Paragraph,
            NodeKind::ThematicBreak,
            NodeKind::Paragraph,
        ]
    );
}

#[test]
fn test_kitchensink_lists() {
    let (_, doc) = kitchensink();
    let Node::List(bullets) = &doc.children[4] else {
        panic!("expected bullet list");
    };
    assert!(!bullets.ordered);
    assert!(bullets.tight);
    assert_eq!(bullets.children.len(), 3);
    let Node::ListItem(second) = &bullets.children[1] else {
        panic!("expected list item");
    };
    assert!(second
        .children
        .iter()
        .any(|child| child.kind() == NodeKind::List));

    let Node::List(numbers) = &doc.children[5] else {
        panic!("expected ordered list");
    };
    assert!(numbers.ordered);
    assert!(!numbers.tight);
    assert_eq!(numbers.start, Some(1));
}

#[test]
fn test_kitchensink_code_blocks() {
    let (source, doc) = kitchensink();
    let Node::CodeBlock(fenced) = &doc.children[7] else {
        panic!("expected fenced code block");
    };
    assert!(fenced.is_fenced());
    assert_eq!(fenced.lang(), Some("rust"));
    let info = fenced.info.as_ref().unwrap();
    assert_eq!(info.meta(), Some("title=\"main.rs\""));
    assert_eq!(&source[info.span.unwrap().range()], "rust title=\"main.rs\"");
    assert!(fenced.value.contains("println!(\"hello\");"));

    let Node::CodeBlock(indented) = &doc.children[8] else {
        panic!("expected indented code block");
    };
    assert!(!indented.is_fenced());
    assert_eq!(indented.value, "indented code\nstays verbatim\n");
}

#[test]
fn test_kitchensink_inlines() {
    let (_, doc) = kitchensink();
    let Node::Paragraph(para) = &doc.children[2] else {
        panic!("expected paragraph");
    };
    let kinds: Vec<NodeKind> = para.children.iter().map(Node::kind).collect();
    for kind in [
        NodeKind::Emphasis,
        NodeKind::Strong,
        NodeKind::InlineCode,
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::CharacterReference,
        NodeKind::SoftBreak,
    ] {
        assert!(kinds.contains(&kind), "missing {kind} in {kinds:?}");
    }

    let link = para
        .children
        .iter()
        .find_map(|n| match n {
            Node::Link(link) => Some(link),
            _ => None,
        })
        .unwrap();
    assert_eq!(link.url, "https://example.com");
    assert_eq!(link.title.as_deref(), Some("Example"));

    let references: Vec<&str> = para
        .children
        .iter()
        .filter(|n| n.kind() == NodeKind::CharacterReference)
        .filter_map(Node::value)
        .collect();
    assert_eq!(references, vec!["&", "©"]);
}

#[test]
fn test_kitchensink_math() {
    let (_, doc) = kitchensink();
    let Node::Paragraph(para) = &doc.children[9] else {
        panic!("expected paragraph");
    };
    assert!(para
        .children
        .iter()
        .any(|n| matches!(n, Node::InlineMath(m) if m.value == "e^{i\\pi} + 1 = 0")));

    let Node::MathBlock(block) = &doc.children[10] else {
        panic!("expected math block");
    };
    assert!(block.value.contains("\\int_0^1 x^2 \\, dx"));
}

#[test]
fn test_kitchensink_spans_are_ordered_and_nested() {
    let (source, doc) = kitchensink();
    let mut previous_end = 0;
    for child in &doc.children {
        let span = child.span().expect("parsed nodes carry spans");
        assert!(span.start >= previous_end, "{:?} overlaps its sibling", child.kind());
        assert!(span.end <= source.len());
        previous_end = span.end;
        if let Some(children) = child.children() {
            for inner in children {
                if let Some(inner_span) = inner.span() {
                    assert!(span.contains(inner_span));
                }
            }
        }
    }
}

#[test]
fn test_text_values_match_source() {
    let (source, doc) = kitchensink();
    for node in doc.descendants() {
        if let Node::Text(text) = node {
            let span = text.span.unwrap();
            assert_eq!(&source[span.range()], text.value);
        }
    }
}

#[test]
fn test_setext_heading() {
    let doc = MarkdownFormat::default()
        .parse("Title\n=====\n\nSub\n---\n")
        .unwrap();
    let depths: Vec<u8> = doc
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Heading(h) => Some(h.depth),
            _ => None,
        })
        .collect();
    assert_eq!(depths, vec![1, 2]);
}

#[test]
fn test_unclosed_constructs_become_text() {
    let doc = MarkdownFormat::default()
        .parse("*not closed and [not a link\n")
        .unwrap();
    let Node::Paragraph(para) = &doc.children[0] else {
        panic!("expected paragraph");
    };
    assert!(para.children.iter().all(|n| n.kind() == NodeKind::Text));
}
