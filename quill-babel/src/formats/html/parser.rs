//! HTML parsing (HTML → Hypertext tree)
//!
//! Pipeline: HTML string → html5ever RcDom → Hypertext tree
//!
//! html5ever repairs malformed markup the way a browser does, so parsing itself cannot fail.
//! The DOM is converted into the owned tree immediately and dropped; it never leaves this
//! module. The only error is nesting deeper than the configured limit.

use crate::error::{Dialect, FormatError, ParseError};
use crate::options::HypertextOptions;
use crate::tree::hypertext::{Attribute, Doctype, Element, Node, Root, RootKind, Text};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse HTML source into a Hypertext tree.
///
/// In fragment mode the input is treated as body content and the root holds the children of
/// the synthesized `body`. In document mode the root holds the doctype and `html` element.
/// Input that opens with a doctype, `<html>` or `<head>` is always parsed as a document.
pub fn parse_hypertext(source: &str, options: &HypertextOptions) -> Result<Root, FormatError> {
    let root = if options.fragment && !is_whole_document(source) {
        let dom = parse_html(&format!(
            "<!DOCTYPE html><html><head></head><body>{source}</body></html>"
        ));
        let children = match find_first_element(&dom.document, "body") {
            Some(body) => convert_children(&body, 0, options.max_depth)?,
            None => Vec::new(),
        };
        Root {
            kind: RootKind::Fragment,
            children,
        }
    } else {
        let dom = parse_html(source);
        Root {
            kind: RootKind::Document,
            children: convert_children(&dom.document, 0, options.max_depth)?,
        }
    };

    tracing::debug!(
        bytes = source.len(),
        nodes = root.node_count(),
        fragment = options.fragment,
        "parsed html"
    );
    Ok(root)
}

fn is_whole_document(source: &str) -> bool {
    let start = source.trim_start();
    ["<!doctype", "<html", "<head"].iter().any(|prefix| {
        start
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: ref qname, .. } = handle.data {
        if qname.local.as_ref() == name {
            return Some(handle.clone());
        }
    }

    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_first_element(child, name))
}

fn convert_children(
    handle: &Handle,
    depth: usize,
    max_depth: usize,
) -> Result<Vec<Node>, FormatError> {
    let mut nodes = Vec::new();
    for child in handle.children.borrow().iter() {
        if let Some(node) = convert_node(child, depth, max_depth)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn convert_node(
    handle: &Handle,
    depth: usize,
    max_depth: usize,
) -> Result<Option<Node>, FormatError> {
    let node = match handle.data {
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            if depth >= max_depth {
                return Err(ParseError::depth_exceeded(Dialect::Hypertext, None, max_depth).into());
            }
            let attributes = attrs
                .borrow()
                .iter()
                .map(|attr| Attribute {
                    name: attr.name.local.to_string(),
                    value: attr.value.to_string(),
                })
                .collect();
            Node::Element(Element {
                tag: name.local.to_string(),
                attributes,
                children: convert_children(handle, depth + 1, max_depth)?,
                span: None,
            })
        }
        NodeData::Text { ref contents } => Node::Text(Text {
            value: contents.borrow().to_string(),
            span: None,
        }),
        NodeData::Comment { ref contents } => Node::Comment(Text {
            value: contents.to_string(),
            span: None,
        }),
        NodeData::Doctype { ref name, .. } => Node::Doctype(Doctype {
            name: name.to_string(),
        }),
        NodeData::Document | NodeData::ProcessingInstruction { .. } => return Ok(None),
    };
    Ok(Some(node))
}
