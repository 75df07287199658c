//! Export tests for Markdown format (Markup tree → Markdown)
//!
//! Output is checked by re-parsing it: comrak's formatting choices may change, the structure
//! they express must not.

use insta::assert_snapshot;
use quill_babel::format::Format;
use quill_babel::formats::markdown::MarkdownFormat;
use quill_babel::tree::markup::{Document, Node, NodeKind};

fn round_trip(source: &str) -> (Document, String, Document) {
    let format = MarkdownFormat::default();
    let first = format.parse(source).unwrap();
    let output = format.serialize(&first).unwrap();
    let second = format.parse(&output).unwrap();
    (first, output, second)
}

fn kinds(doc: &Document) -> Vec<NodeKind> {
    doc.descendants().map(Node::kind).collect()
}

#[test]
fn test_simple_document() {
    let (_, output, _) = round_trip("# Title\n\nSome *emphasis* and **strong**.\n");
    assert_snapshot!(output, @r"
# Title

Some *emphasis* and **strong**.
");
}

#[test]
fn test_kitchensink_structure_survives() {
    let (first, output, second) = round_trip(include_str!("../fixtures/kitchensink.md"));
    let top = |doc: &Document| doc.children.iter().map(Node::kind).collect::<Vec<_>>();
    assert_eq!(top(&first), top(&second), "output was:\n{output}");
}

#[test]
fn test_math_is_written_raw() {
    let (_, output, second) = round_trip("Cost is $a_1 * b_2$.\n\n$$\nx_1 * y_1\n$$\n");
    assert!(output.contains("$a_1 * b_2$"), "{output}");
    assert!(output.contains("$$\nx_1 * y_1\n$$"), "{output}");
    assert!(kinds(&second).contains(&NodeKind::InlineMath));
    assert!(kinds(&second).contains(&NodeKind::MathBlock));
}

#[test]
fn test_special_characters_are_escaped() {
    let (first, output, second) = round_trip("a \\*literal\\* star and 1\\. not a list\n");
    assert!(!kinds(&second).contains(&NodeKind::Emphasis), "{output}");
    assert_eq!(
        quill_babel::tree::markup::plain_text(&first.children),
        quill_babel::tree::markup::plain_text(&second.children)
    );
}

#[test]
fn test_adjacent_lists_stay_separate() {
    let (first, output, second) = round_trip("- a\n- b\n\n1. c\n2. d\n");
    assert!(!output.contains("end list"), "{output}");
    assert_eq!(first.children.len(), second.children.len());
}

#[test]
fn test_fence_outgrows_inner_backticks() {
    let (_, output, second) = round_trip("````md\n```\ninner\n```\n````\n");
    assert!(output.contains("````"), "{output}");
    let Node::CodeBlock(code) = &second.children[0] else {
        panic!("expected code block");
    };
    assert_eq!(code.value, "```\ninner\n```\n");
}

#[test]
fn test_literal_dollars_stay_text() {
    let (first, output, second) = round_trip("price \\$x\\$ ok\n");
    assert_eq!(kinds(&first), kinds(&second), "{output}");
    assert!(!kinds(&second).contains(&NodeKind::InlineMath), "{output}");
    assert_eq!(
        quill_babel::tree::markup::plain_text(&second.children),
        "price $x$ ok"
    );
}
