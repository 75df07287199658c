//! Markdown serialization (Markup tree → Markdown)
//!
//! Pipeline: Markup tree → Comrak AST → Markdown string
//!
//! Rendering is left to comrak's CommonMark formatter. Math and raw HTML are lowered to comrak
//! raw HTML nodes so they are written byte-for-byte instead of being escaped as text.

use crate::error::FormatError;
use crate::tree::markup::{CodeBlock, Document, List, Node};
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeValue,
};
use comrak::{format_commonmark, Arena, ComrakOptions};
use std::cell::RefCell;

/// Serialize a Markup tree to CommonMark Markdown
pub fn serialize_markup(doc: &Document) -> Result<String, FormatError> {
    let arena = Arena::new();
    let root = alloc(&arena, NodeValue::Document);
    for child in &doc.children {
        lower_node(&arena, root, child);
    }

    let mut output = Vec::new();
    let options = default_comrak_options();
    format_commonmark(root, &options, &mut output)
        .map_err(|e| FormatError::Serialization(format!("Comrak serialization failed: {e}")))?;

    let markdown = String::from_utf8(output)
        .map_err(|e| FormatError::Serialization(format!("UTF-8 conversion failed: {e}")))?;

    // Comrak separates adjacent lists with this marker
    let cleaned = markdown.replace("<!-- end list -->\n\n", "");
    tracing::debug!(bytes = cleaned.len(), "serialized markdown");
    Ok(cleaned)
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.front_matter_delimiter = Some("---".to_string());
    // Raw HTML and math are emitted verbatim
    options.render.unsafe_ = true;
    options
}

fn alloc<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn append<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    value: NodeValue,
) -> &'a AstNode<'a> {
    let node = alloc(arena, value);
    parent.append(node);
    node
}

fn lower_children<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, children: &[Node]) {
    for child in children {
        lower_node(arena, parent, child);
    }
}

fn lower_node<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, node: &Node) {
    match node {
        Node::Frontmatter(fm) => {
            let mut yaml = String::from("---\n");
            yaml.push_str(&fm.value);
            if !fm.value.is_empty() && !fm.value.ends_with('\n') {
                yaml.push('\n');
            }
            yaml.push_str("---\n\n");
            append(arena, parent, NodeValue::FrontMatter(yaml));
        }
        Node::Paragraph(p) => {
            let para = append(arena, parent, NodeValue::Paragraph);
            lower_children(arena, para, &p.children);
        }
        Node::Heading(h) => {
            let heading = append(
                arena,
                parent,
                NodeValue::Heading(NodeHeading {
                    level: h.depth.clamp(1, 6),
                    setext: false,
                }),
            );
            lower_children(arena, heading, &h.children);
        }
        Node::ThematicBreak(_) => {
            append(arena, parent, NodeValue::ThematicBreak);
        }
        Node::BlockQuote(q) => {
            let quote = append(arena, parent, NodeValue::BlockQuote);
            lower_children(arena, quote, &q.children);
        }
        Node::List(list) => lower_list(arena, parent, list),
        Node::ListItem(item) => {
            // Stray item outside a list: keep its content
            lower_children(arena, parent, &item.children);
        }
        Node::CodeBlock(code) => {
            append(arena, parent, NodeValue::CodeBlock(code_block(code)));
        }
        Node::MathBlock(math) => {
            let formula = math.value.trim_matches('\n');
            append(arena, parent, html_block(format!("$$\n{formula}\n$$\n")));
        }
        Node::Html(html) => {
            append(arena, parent, html_block(html.value.clone()));
        }
        Node::Text(text) | Node::CharacterReference(text) => {
            lower_text(arena, parent, &text.value.replace('\n', " "));
        }
        Node::Emphasis(e) => {
            let emph = append(arena, parent, NodeValue::Emph);
            lower_children(arena, emph, &e.children);
        }
        Node::Strong(s) => {
            let strong = append(arena, parent, NodeValue::Strong);
            lower_children(arena, strong, &s.children);
        }
        Node::InlineCode(code) => {
            append(
                arena,
                parent,
                NodeValue::Code(NodeCode {
                    num_backticks: longest_run(&code.value, '`') + 1,
                    literal: code.value.clone(),
                }),
            );
        }
        Node::InlineMath(math) => {
            let delimiter = if math.display { "$$" } else { "$" };
            append(
                arena,
                parent,
                NodeValue::HtmlInline(format!("{delimiter}{}{delimiter}", math.value)),
            );
        }
        Node::InlineHtml(html) => {
            append(arena, parent, NodeValue::HtmlInline(html.value.clone()));
        }
        Node::SoftBreak(_) => {
            append(arena, parent, NodeValue::SoftBreak);
        }
        Node::Break(_) => {
            append(arena, parent, NodeValue::LineBreak);
        }
        Node::Link(link) => {
            let node = append(
                arena,
                parent,
                NodeValue::Link(NodeLink {
                    url: link.url.clone(),
                    title: link.title.clone().unwrap_or_default(),
                }),
            );
            lower_children(arena, node, &link.children);
        }
        Node::Image(image) => {
            let node = append(
                arena,
                parent,
                NodeValue::Image(NodeLink {
                    url: image.url.clone(),
                    title: image.title.clone().unwrap_or_default(),
                }),
            );
            append(arena, node, NodeValue::Text(image.alt.clone()));
        }
    }
}

/// Lower literal text. comrak writes `$` bare, which would re-parse as math, so each one is
/// emitted as a raw `\$` escape between text segments.
fn lower_text<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, text: &str) {
    for (i, segment) in text.split('$').enumerate() {
        if i > 0 {
            append(arena, parent, NodeValue::HtmlInline("\\$".to_string()));
        }
        if !segment.is_empty() {
            append(arena, parent, NodeValue::Text(segment.to_string()));
        }
    }
}

fn lower_list<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, list: &List) {
    let list_node = append(arena, parent, NodeValue::List(list_data(list)));
    for child in &list.children {
        let item = append(arena, list_node, NodeValue::Item(list_data(list)));
        match child {
            Node::ListItem(li) => lower_children(arena, item, &li.children),
            other => lower_node(arena, item, other),
        }
    }
}

fn list_data(list: &List) -> NodeList {
    NodeList {
        list_type: if list.ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start: list.start.unwrap_or(1) as usize,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: list.tight,
    }
}

fn code_block(code: &CodeBlock) -> NodeCodeBlock {
    let mut literal = code.value.clone();
    if !literal.is_empty() && !literal.ends_with('\n') {
        literal.push('\n');
    }
    let (fence_char, fence_length) = match code.fence {
        Some(fence) => {
            let marker = if fence.marker == '~' { '~' } else { '`' };
            let needed = longest_run(&literal, marker) + 1;
            (marker as u8, fence.length.max(needed).max(3))
        }
        None => (b'`', (longest_run(&literal, '`') + 1).max(3)),
    };
    NodeCodeBlock {
        fenced: code.fence.is_some() || code.info.is_some(),
        fence_char,
        fence_length,
        fence_offset: 0,
        info: code
            .info
            .as_ref()
            .map(|info| info.value.clone())
            .unwrap_or_default(),
        literal,
    }
}

fn html_block(literal: String) -> NodeValue {
    NodeValue::HtmlBlock(NodeHtmlBlock {
        block_type: 0,
        literal,
    })
}

/// Longest run of `c` in `text`.
fn longest_run(text: &str, c: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
