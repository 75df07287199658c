use quill_babel::format::Format;
use quill_babel::formats::markdown::MarkdownFormat;
use quill_babel::options::MarkupOptions;
use quill_babel::tree::markup::NodeKind;

#[test]
fn test_frontmatter_import() {
    let md = r#"---
title: My Document
author: Me
---

# Content
Start of document.
"#;

    let doc = MarkdownFormat::default()
        .parse(md)
        .expect("Failed to parse markdown");
    let fm = doc.frontmatter().expect("frontmatter block");
    assert!(fm.value.contains("title: My Document"));
    assert!(fm.value.contains("author: Me"));
    assert_eq!(doc.children[1].kind(), NodeKind::Heading);
}

#[test]
fn test_frontmatter_export() {
    let md = r#"---
title: Export Test
tags: [a, b]
---

Content.
"#;

    let format = MarkdownFormat::default();
    let doc = format.parse(md).expect("Failed to parse markdown");
    let output = format.serialize(&doc).expect("Failed to serialize markdown");

    assert!(output.starts_with("---\n"));
    assert!(output.contains("title: Export Test"));
    assert!(output.contains("tags: [a, b]"));
    assert!(output.contains("---\n\nContent."));
}

#[test]
fn test_dotted_closer_is_exported_with_dashes() {
    let format = MarkdownFormat::default();
    let doc = format.parse("---\ntitle: x\n...\n\nBody\n").unwrap();
    let output = format.serialize(&doc).unwrap();
    assert!(output.starts_with("---\ntitle: x\n---\n"), "{output}");
}

#[test]
fn test_frontmatter_can_be_disabled() {
    let format = MarkdownFormat::new(MarkupOptions {
        frontmatter: false,
        ..MarkupOptions::default()
    });
    let doc = format.parse("---\ntitle: x\n---\n\nBody\n").unwrap();
    assert!(doc.frontmatter().is_none());
    assert_eq!(doc.children[0].kind(), NodeKind::ThematicBreak);
}
