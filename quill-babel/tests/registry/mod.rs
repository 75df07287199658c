//! Registry-level conversion tests

use quill_babel::{FormatError, FormatRegistry};
use std::collections::HashMap;

#[test]
fn test_markdown_to_html_and_back() {
    let registry = FormatRegistry::default();
    let doc = registry.parse("# Title\n\n- a\n- b\n", "markdown").unwrap();
    let html = registry.serialize(&doc, "html").unwrap();
    assert_eq!(html, "<h1>Title</h1>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>");

    let back = registry.parse(&html, "html").unwrap();
    assert_eq!(
        registry.serialize(&back, "markdown").unwrap(),
        "# Title\n\n- a\n- b\n"
    );
}

#[test]
fn test_detect_and_convert() {
    let registry = FormatRegistry::default();
    let from = registry.detect_format_from_filename("page.html").unwrap();
    let doc = registry.parse("<p>hi</p>", &from).unwrap();
    let tree = registry.serialize(&doc, "treeviz").unwrap();
    assert!(tree.starts_with("⧉ Document (1 items)\n"), "{tree}");
}

#[test]
fn test_extra_parameters_reach_the_format() {
    let registry = FormatRegistry::default();
    let doc = registry.parse("x\n", "markdown").unwrap();
    let mut options = HashMap::new();
    options.insert("compact".to_string(), "true".to_string());
    let json = registry
        .serialize_with_options(&doc, "json", &options)
        .unwrap();
    assert!(!json.contains('\n'));
}

#[test]
fn test_unknown_format() {
    let registry = FormatRegistry::default();
    let err = registry.parse("x", "docx").unwrap_err();
    assert_eq!(err, FormatError::FormatNotFound("docx".to_string()));
    assert_eq!(err.to_string(), "Format 'docx' not found");
}
