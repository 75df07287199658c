//! HTML serialization (Hypertext tree → HTML)
//!
//! A direct writer over the owned tree. Text and attribute values are escaped with
//! `html-escape`; the content of `script` and `style` is written as-is, and raw passthrough
//! nodes are copied verbatim wherever they sit in the tree.

use crate::error::FormatError;
use crate::tree::hypertext::{is_void, Element, Node, Root, RAW_TEXT_ELEMENTS};

/// Serialize a Hypertext tree to an HTML string
pub fn serialize_hypertext(root: &Root) -> Result<String, FormatError> {
    let mut out = String::new();
    for node in &root.children {
        write_node(node, &mut out, false);
    }
    tracing::debug!(bytes = out.len(), "serialized html");
    Ok(out)
}

/// Serialize a single element with its subtree.
pub fn serialize_element(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String, raw_text: bool) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(text) if raw_text => out.push_str(&text.value),
        Node::Text(text) => out.push_str(&html_escape::encode_text(&text.value)),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.value);
            out.push_str("-->");
        }
        Node::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push('>');
        }
        Node::Raw(raw) => out.push_str(&raw.value),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for attr in &el.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
        out.push('"');
    }
    out.push('>');

    if is_void(&el.tag) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&el.tag.as_str());
    for child in &el.children {
        write_node(child, out, raw_text);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}
