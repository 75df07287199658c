//! Hypertext tree → Markup tree
//!
//! Elements fall into four groups:
//!
//! - direct equivalents (`p`, `hN`, `em`, `a`, `pre > code`, ...)
//! - transparent containers such as `div` and `section`, whose content is kept and whose loose
//!   inline runs become paragraphs
//! - unknown inline elements such as `span`, which are dropped in favor of their content
//! - unrepresentable elements (tables, scripts, media, forms, a non-empty `head`, document
//!   metadata, comments), which are written back out as raw html
//!
//! Only doctypes and whitespace between blocks disappear.

use std::mem;

use crate::common::whitespace::{collapse, is_html_whitespace};
use crate::formats::html::serializer::serialize_element;
use crate::tree::hypertext::{self as hast, is_void, Element, Root};
use crate::tree::markup::{
    CodeBlock, Document, Fence, Heading, Image, InfoString, InlineMath, Leaf, Link, List, Literal,
    Node, Parent,
};

/// Generic grouping elements with no Markup counterpart of their own.
const CONTAINERS: &[&str] = &[
    "html",
    "body",
    "div",
    "section",
    "article",
    "main",
    "header",
    "footer",
    "nav",
    "aside",
    "figure",
    "figcaption",
    "address",
    "details",
    "summary",
    "hgroup",
    "search",
    "center",
    "dl",
    "dt",
    "dd",
    "li",
];

/// Unrepresentable elements that stand on their own line.
const RAW_BLOCKS: &[&str] = &[
    "head", "title", "meta", "link", "base", "table", "script", "style", "video", "audio",
    "iframe", "object", "canvas", "form", "fieldset", "noscript", "template", "dialog", "svg",
    "math", "picture", "map",
];

/// Unrepresentable elements that sit inside running text.
const RAW_INLINES: &[&str] = &["embed", "select", "textarea", "input", "button", "label"];

/// Convert a Hypertext tree into a Markup tree.
pub fn hypertext_to_markup(root: &Root) -> Document {
    let doc = Document::new(convert_blocks(&root.children));
    tracing::debug!(nodes = doc.node_count(), "transformed hypertext to markup");
    doc
}

fn literal(value: impl Into<String>) -> Literal {
    Literal {
        value: value.into(),
        span: None,
    }
}

fn parent(children: Vec<Node>) -> Parent {
    Parent {
        children,
        span: None,
    }
}

/// Block sequence under construction, with the inline run not yet closed into a paragraph.
#[derive(Default)]
struct Blocks {
    blocks: Vec<Node>,
    run: Vec<Node>,
}

impl Blocks {
    fn push_block(&mut self, node: Node) {
        self.flush();
        self.blocks.push(node);
    }

    fn flush(&mut self) {
        let inlines = tidy(mem::take(&mut self.run));
        if !inlines.is_empty() {
            self.blocks.push(Node::paragraph(inlines));
        }
    }

    /// Whether the open run has anything besides whitespace.
    fn run_has_content(&self) -> bool {
        self.run.iter().any(|node| match node {
            Node::Text(text) => !text.value.trim().is_empty(),
            _ => true,
        })
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush();
        self.blocks
    }
}

fn convert_blocks(nodes: &[hast::Node]) -> Vec<Node> {
    let mut out = Blocks::default();
    for node in nodes {
        block(node, &mut out);
    }
    out.finish()
}

fn block(node: &hast::Node, out: &mut Blocks) {
    match node {
        hast::Node::Doctype(_) => {}
        hast::Node::Text(_) => inline(node, &mut out.run),
        hast::Node::Comment(comment) => {
            let html = format!("<!--{}-->", comment.value);
            if out.run_has_content() {
                out.run.push(Node::InlineHtml(literal(html)));
            } else {
                out.push_block(Node::Html(literal(html)));
            }
        }
        hast::Node::Raw(raw) => out.push_block(Node::Html(literal(raw.value.clone()))),
        hast::Node::Element(el) => element_block(el, node, out),
    }
}

fn element_block(el: &Element, node: &hast::Node, out: &mut Blocks) {
    let tag = el.tag.as_str();
    match tag {
        "p" => {
            out.flush();
            let inlines = tidy(inline_children(&el.children));
            if !inlines.is_empty() {
                out.push_block(Node::paragraph(inlines));
            }
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => out.push_block(Node::Heading(Heading {
            depth: heading_depth(tag),
            children: tidy(flatten_breaks(inline_children(&el.children))),
            span: None,
        })),
        "hr" => out.push_block(Node::ThematicBreak(Leaf::default())),
        "blockquote" => out.push_block(Node::BlockQuote(parent(convert_blocks(&el.children)))),
        "ul" | "ol" | "menu" => out.push_block(list(el)),
        "pre" => out.push_block(Node::CodeBlock(code_block(el))),
        "head" if el.is_blank() => {}
        "div" if el.has_class("math-display") => {
            out.push_block(Node::MathBlock(literal(el.text_content())))
        }
        "script" if el.has_attr("data-frontmatter") => {
            out.push_block(Node::Frontmatter(literal(el.text_content())))
        }
        _ if CONTAINERS.contains(&tag) => container(el, out),
        _ if RAW_BLOCKS.contains(&tag) => {
            out.push_block(Node::Html(literal(serialize_element(el))))
        }
        _ if contains_block(el) => container(el, out),
        _ => inline(node, &mut out.run),
    }
}

fn container(el: &Element, out: &mut Blocks) {
    out.flush();
    for child in &el.children {
        block(child, out);
    }
    out.flush();
}

fn heading_depth(tag: &str) -> u8 {
    tag.strip_prefix('h')
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hr" | "blockquote" | "ul" | "ol" | "menu"
            | "pre"
    ) || CONTAINERS.contains(&tag)
        || RAW_BLOCKS.contains(&tag)
}

fn contains_block(el: &Element) -> bool {
    el.children.iter().any(|child| match child {
        hast::Node::Element(inner) => is_block_tag(&inner.tag) || contains_block(inner),
        _ => false,
    })
}

fn list(el: &Element) -> Node {
    let ordered = el.tag == "ol";
    let start = ordered.then(|| {
        el.attr("start")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1)
    });

    let mut tight = true;
    let mut items = Vec::new();
    for child in &el.children {
        match child {
            hast::Node::Element(li) if li.tag == "li" => {
                if li
                    .children
                    .iter()
                    .any(|c| matches!(c.as_element(), Some(p) if p.tag == "p"))
                {
                    tight = false;
                }
                items.push(Node::ListItem(parent(convert_blocks(&li.children))));
            }
            other if other.is_whitespace() => {}
            other => {
                let children = convert_blocks(std::slice::from_ref(other));
                if !children.is_empty() {
                    items.push(Node::ListItem(parent(children)));
                }
            }
        }
    }

    Node::List(List {
        ordered,
        start,
        tight,
        children: items,
        span: None,
    })
}

fn code_block(pre: &Element) -> CodeBlock {
    let code = pre
        .children
        .iter()
        .filter_map(hast::Node::as_element)
        .find(|el| el.tag == "code");

    let lang = code.and_then(language).or_else(|| language(pre));
    let meta = code
        .and_then(|el| el.attr("data-meta"))
        .or_else(|| pre.attr("data-meta"));
    let info = match (lang, meta) {
        (Some(lang), Some(meta)) => Some(format!("{lang} {meta}")),
        (Some(lang), None) => Some(lang.to_string()),
        (None, _) => None,
    };

    let mut value = pre.text_content();
    if !value.is_empty() && !value.ends_with('\n') {
        value.push('\n');
    }

    CodeBlock {
        fence: Some(Fence {
            marker: '`',
            length: 3,
        }),
        info: info.map(|value| InfoString { value, span: None }),
        value,
        span: None,
    }
}

fn language(el: &Element) -> Option<&str> {
    el.classes().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
    })
}

fn inline_children(nodes: &[hast::Node]) -> Vec<Node> {
    let mut run = Vec::new();
    for node in nodes {
        inline(node, &mut run);
    }
    run
}

fn inline(node: &hast::Node, run: &mut Vec<Node>) {
    match node {
        hast::Node::Doctype(_) => {}
        hast::Node::Text(text) => run.push(Node::text(collapse(&text.value))),
        hast::Node::Comment(comment) => {
            run.push(Node::InlineHtml(literal(format!("<!--{}-->", comment.value))))
        }
        hast::Node::Raw(raw) => run.push(Node::InlineHtml(literal(raw.value.clone()))),
        hast::Node::Element(el) => inline_element(el, run),
    }
}

fn inline_element(el: &Element, run: &mut Vec<Node>) {
    let tag = el.tag.as_str();
    match tag {
        "em" | "i" | "cite" | "dfn" | "var" => {
            run.push(Node::Emphasis(parent(inline_children(&el.children))))
        }
        "strong" | "b" => run.push(Node::Strong(parent(inline_children(&el.children)))),
        "code" | "kbd" | "samp" | "tt" => run.push(Node::InlineCode(literal(
            el.text_content().replace('\n', " "),
        ))),
        "a" if el.has_attr("href") => run.push(Node::Link(Link {
            url: el.attr("href").unwrap_or_default().to_string(),
            title: el.attr("title").map(str::to_string),
            children: inline_children(&el.children),
            span: None,
        })),
        "img" => run.push(Node::Image(Image {
            url: el.attr("src").unwrap_or_default().to_string(),
            title: el.attr("title").map(str::to_string),
            alt: el.attr("alt").unwrap_or_default().to_string(),
            span: None,
        })),
        "br" => run.push(Node::Break(Leaf::default())),
        "span" | "div" if el.has_class("math-inline") || el.has_class("math-display") => {
            run.push(Node::InlineMath(InlineMath {
                value: el.text_content(),
                display: el.has_class("math-display"),
                span: None,
            }))
        }
        _ if RAW_BLOCKS.contains(&tag) || RAW_INLINES.contains(&tag) || is_void(tag) => {
            run.push(Node::InlineHtml(literal(serialize_element(el))))
        }
        _ => {
            for child in &el.children {
                inline(child, run);
            }
        }
    }
}

/// Replaces hard breaks with spaces. A Markdown heading is a single line.
fn flatten_breaks(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Break(_) => Node::text(" "),
            Node::Emphasis(p) => Node::Emphasis(parent(flatten_breaks(p.children))),
            Node::Strong(p) => Node::Strong(parent(flatten_breaks(p.children))),
            Node::Link(link) => Node::Link(Link {
                children: flatten_breaks(link.children),
                ..link
            }),
            other => other,
        })
        .collect()
}

/// Normalizes whitespace in an inline run so it reads as Markdown would parse it.
fn tidy(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = hoist_whitespace(nodes);
    trim_around_breaks(&mut out);
    strip_leading(&mut out);
    strip_trailing(&mut out);
    while matches!(out.last(), Some(Node::Break(_))) {
        out.pop();
        strip_trailing(&mut out);
    }
    out
}

/// Moves edge whitespace out of emphasis, strong and links, merging adjacent text.
fn hoist_whitespace(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Emphasis(p) => hoist(p.children, &mut out, false, |children| {
                Node::Emphasis(parent(children))
            }),
            Node::Strong(p) => hoist(p.children, &mut out, false, |children| {
                Node::Strong(parent(children))
            }),
            Node::Link(link) => {
                let Link {
                    url,
                    title,
                    children,
                    span,
                } = link;
                hoist(children, &mut out, true, move |children| {
                    Node::Link(Link {
                        url,
                        title,
                        children,
                        span,
                    })
                })
            }
            other => push_inline(&mut out, other),
        }
    }
    out
}

fn hoist(
    children: Vec<Node>,
    out: &mut Vec<Node>,
    keep_empty: bool,
    rebuild: impl FnOnce(Vec<Node>) -> Node,
) {
    let mut children = hoist_whitespace(children);
    let leading = strip_leading(&mut children);
    let trailing = strip_trailing(&mut children);
    if leading {
        push_inline(out, Node::text(" "));
    }
    if keep_empty || !children.is_empty() {
        out.push(rebuild(children));
    }
    if trailing {
        push_inline(out, Node::text(" "));
    }
}

fn push_inline(out: &mut Vec<Node>, node: Node) {
    if let Node::Text(text) = &node {
        if text.value.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = out.last_mut() {
            last.value = collapse(&format!("{}{}", last.value, text.value));
            return;
        }
    }
    out.push(node);
}

/// Removes leading whitespace; true when something was removed.
fn strip_leading(nodes: &mut Vec<Node>) -> bool {
    let Some(Node::Text(text)) = nodes.first_mut() else {
        return false;
    };
    let trimmed = text.value.trim_start_matches(is_html_whitespace);
    if trimmed.len() == text.value.len() {
        return false;
    }
    if trimmed.is_empty() {
        nodes.remove(0);
    } else {
        text.value = trimmed.to_string();
    }
    true
}

/// Removes trailing whitespace; true when something was removed.
fn strip_trailing(nodes: &mut Vec<Node>) -> bool {
    let Some(Node::Text(text)) = nodes.last_mut() else {
        return false;
    };
    let trimmed_len = text.value.trim_end_matches(is_html_whitespace).len();
    if trimmed_len == text.value.len() {
        return false;
    }
    if trimmed_len == 0 {
        nodes.pop();
    } else {
        text.value.truncate(trimmed_len);
    }
    true
}

fn trim_around_breaks(nodes: &mut Vec<Node>) {
    for i in 0..nodes.len() {
        if !matches!(nodes[i], Node::Break(_)) {
            continue;
        }
        if i > 0 {
            if let Node::Text(text) = &mut nodes[i - 1] {
                let len = text.value.trim_end_matches(is_html_whitespace).len();
                text.value.truncate(len);
            }
        }
        if let Some(Node::Text(text)) = nodes.get_mut(i + 1) {
            text.value = text
                .value
                .trim_start_matches(is_html_whitespace)
                .to_string();
        }
    }
    nodes.retain(|node| !matches!(node, Node::Text(text) if text.value.is_empty()));
}
