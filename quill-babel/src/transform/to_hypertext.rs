//! Markup tree → Hypertext tree
//!
//! Every Markup kind has an element or text mapping; frontmatter is the only kind that can
//! disappear, and only when passthrough is off. Block siblings are separated by newline text
//! nodes so the serialized HTML keeps one block per line.

use crate::options::TransformOptions;
use crate::tree::hypertext::{self as hast, Element, Root, RootKind};
use crate::tree::markup::{self as mdast, plain_text, CodeBlock, Document, List, Node};

/// Convert a Markup tree into a Hypertext fragment.
pub fn markup_to_hypertext(doc: &Document, options: &TransformOptions) -> Root {
    let root = Root::fragment(blocks(&doc.children, options));
    tracing::debug!(nodes = root.node_count(), "transformed markup to hypertext");
    root
}

/// Wrap a fragment into a complete document with a title.
pub fn wrap_document(fragment: Root, title: &str) -> Root {
    let head = Element::new("head").with_children(vec![
        Element::new("meta").with_attr("charset", "utf-8").into(),
        Element::new("title")
            .with_children(vec![hast::Node::text(title)])
            .into(),
    ]);
    let mut body_children = vec![hast::Node::text("\n")];
    body_children.extend(fragment.children);
    body_children.push(hast::Node::text("\n"));

    let html = Element::new("html").with_children(vec![
        head.into(),
        hast::Node::text("\n"),
        Element::new("body").with_children(body_children).into(),
    ]);
    Root {
        kind: RootKind::Document,
        children: vec![
            hast::Node::Doctype(hast::Doctype {
                name: "html".to_string(),
            }),
            hast::Node::text("\n"),
            html.into(),
            hast::Node::text("\n"),
        ],
    }
}

/// Text of the first heading, used as a standalone document title.
pub fn document_title(doc: &Document) -> Option<String> {
    doc.descendants().find_map(|node| match node {
        Node::Heading(h) => Some(plain_text(&h.children)),
        _ => None,
    })
}

/// Converts a block sequence, separating siblings with newlines.
fn blocks(nodes: &[Node], options: &TransformOptions) -> Vec<hast::Node> {
    let mut out = Vec::with_capacity(nodes.len() * 2);
    for node in nodes {
        let converted = convert(node, options, false);
        if converted.is_empty() {
            continue;
        }
        if !out.is_empty() && node.is_block() {
            out.push(hast::Node::text("\n"));
        }
        out.extend(converted);
    }
    out
}

/// Blocks wrapped in leading and trailing newlines, as inside `blockquote` and loose `li`.
fn padded_blocks(nodes: &[Node], options: &TransformOptions) -> Vec<hast::Node> {
    let inner = blocks(nodes, options);
    if inner.is_empty() {
        return inner;
    }
    let mut out = Vec::with_capacity(inner.len() + 2);
    out.push(hast::Node::text("\n"));
    out.extend(inner);
    out.push(hast::Node::text("\n"));
    out
}

fn inlines(nodes: &[Node], options: &TransformOptions) -> Vec<hast::Node> {
    nodes
        .iter()
        .flat_map(|node| convert(node, options, false))
        .collect()
}

fn element(tag: &str, children: Vec<hast::Node>) -> hast::Node {
    Element::new(tag).with_children(children).into()
}

fn convert(node: &Node, options: &TransformOptions, tight: bool) -> Vec<hast::Node> {
    match node {
        Node::Frontmatter(fm) if options.keep_frontmatter => vec![Element::new("script")
            .with_attr("type", "application/yaml")
            .with_attr("data-frontmatter", "")
            .with_children(vec![hast::Node::text(fm.value.clone())])
            .into()],
        Node::Frontmatter(_) => Vec::new(),
        Node::Paragraph(p) if tight => inlines(&p.children, options),
        Node::Paragraph(p) => vec![element("p", inlines(&p.children, options))],
        Node::Heading(h) => {
            let tag = format!("h{}", h.depth.clamp(1, 6));
            vec![element(&tag, inlines(&h.children, options))]
        }
        Node::ThematicBreak(_) => vec![element("hr", Vec::new())],
        Node::BlockQuote(q) => vec![element("blockquote", padded_blocks(&q.children, options))],
        Node::List(list) => vec![convert_list(list, options)],
        Node::ListItem(item) => vec![list_item(item, options, false)],
        Node::CodeBlock(code) => vec![code_block(code)],
        Node::MathBlock(math) => vec![Element::new("div")
            .with_attr("class", "math math-display")
            .with_children(vec![hast::Node::text(math.value.trim_matches('\n'))])
            .into()],
        Node::Html(html) => vec![hast::Node::raw(html.value.trim_end_matches('\n'))],
        Node::Text(text) | Node::CharacterReference(text) => {
            vec![hast::Node::text(text.value.clone())]
        }
        Node::Emphasis(e) => vec![element("em", inlines(&e.children, options))],
        Node::Strong(s) => vec![element("strong", inlines(&s.children, options))],
        Node::InlineCode(code) => vec![element("code", vec![hast::Node::text(code.value.clone())])],
        Node::InlineMath(math) => {
            let class = if math.display {
                "math math-display"
            } else {
                "math math-inline"
            };
            vec![Element::new("span")
                .with_attr("class", class)
                .with_children(vec![hast::Node::text(math.value.clone())])
                .into()]
        }
        Node::InlineHtml(html) => vec![hast::Node::raw(html.value.clone())],
        Node::SoftBreak(_) => vec![hast::Node::text("\n")],
        Node::Break(_) => vec![element("br", Vec::new()), hast::Node::text("\n")],
        Node::Link(link) => {
            let mut a = Element::new("a").with_attr("href", link.url.clone());
            if let Some(title) = &link.title {
                a = a.with_attr("title", title.clone());
            }
            vec![a.with_children(inlines(&link.children, options)).into()]
        }
        Node::Image(image) => {
            let mut img = Element::new("img")
                .with_attr("src", image.url.clone())
                .with_attr("alt", image.alt.clone());
            if let Some(title) = &image.title {
                img = img.with_attr("title", title.clone());
            }
            vec![img.into()]
        }
    }
}

fn convert_list(list: &List, options: &TransformOptions) -> hast::Node {
    let mut el = Element::new(if list.ordered { "ol" } else { "ul" });
    if let Some(start) = list.start.filter(|s| list.ordered && *s != 1) {
        el = el.with_attr("start", start.to_string());
    }

    let mut children = vec![hast::Node::text("\n")];
    for child in &list.children {
        match child {
            Node::ListItem(item) => children.push(list_item(item, options, list.tight)),
            other => children.push(element("li", convert(other, options, list.tight))),
        }
        children.push(hast::Node::text("\n"));
    }
    el.with_children(children).into()
}

fn list_item(item: &mdast::Parent, options: &TransformOptions, tight: bool) -> hast::Node {
    if !tight {
        return element("li", padded_blocks(&item.children, options));
    }

    // Tight items drop their paragraph wrappers
    let mut children = Vec::new();
    for (index, child) in item.children.iter().enumerate() {
        if index > 0 {
            children.push(hast::Node::text("\n"));
        }
        children.extend(convert(child, options, true));
    }
    element("li", children)
}

fn code_block(code: &CodeBlock) -> hast::Node {
    let mut el = Element::new("code");
    if let Some(lang) = code.lang() {
        el = el.with_attr("class", format!("language-{lang}"));
    }
    if let Some(meta) = code.info.as_ref().and_then(|info| info.meta()) {
        el = el.with_attr("data-meta", meta);
    }

    let mut value = code.value.clone();
    if !value.is_empty() && !value.ends_with('\n') {
        value.push('\n');
    }
    element("pre", vec![el.with_children(vec![hast::Node::text(value)]).into()])
}
