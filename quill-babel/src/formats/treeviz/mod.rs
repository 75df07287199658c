//! Treeviz formatter for Markup trees
//!
//! Treeviz is a visual representation of the Markup tree, one node per line. Nesting is drawn
//! with box characters, each node shows its icon and a label truncated to 30 characters.
//!
//! Example:
//!
//! ```text
//! ⧉ Document (2 items)
//! ├─ § h1 Title
//! │ └─ ◦ Title
//! └─ ¶ Hello world
//!   ├─ ◦ Hello
//!   └─ 𝐼 world
//!     └─ ◦ world
//! ```
//!
//! With `show-spans=true` every node with a source span gets a `[start..end)` suffix.

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::tree::markup::{plain_text, Document, Node, NodeKind};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

fn label(node: &Node) -> String {
    let text = match node {
        Node::Heading(h) => format!("h{} {}", h.depth, plain_text(&h.children)),
        Node::Paragraph(p) | Node::Emphasis(p) | Node::Strong(p) => plain_text(&p.children),
        Node::ListItem(item) => plain_text(&item.children),
        Node::List(list) => {
            let kind = if list.ordered { "ordered" } else { "bullet" };
            let spacing = if list.tight { "tight" } else { "loose" };
            format!("{} items, {kind}, {spacing}", list.children.len())
        }
        Node::BlockQuote(q) => format!("{} blocks", q.children.len()),
        Node::CodeBlock(code) => match &code.info {
            Some(info) => info.value.clone(),
            None => "(indented)".to_string(),
        },
        Node::ThematicBreak(_) => "---".to_string(),
        Node::Link(link) => link.url.clone(),
        Node::Image(image) => image.alt.clone(),
        Node::InlineMath(math) => math.value.clone(),
        Node::SoftBreak(_) | Node::Break(_) => String::new(),
        _ => node.value().unwrap_or_default().to_string(),
    };
    truncate(text.replace('\n', " ").trim())
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= LABEL_WIDTH {
        return text.to_string();
    }
    let mut out: String = text.chars().take(LABEL_WIDTH - 1).collect();
    out.push('…');
    out
}

fn format_node(node: &Node, prefix: &str, is_last: bool, show_spans: bool, out: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    out.push_str(prefix);
    out.push_str(connector);
    out.push(' ');
    out.push_str(get_icon(node.kind()));

    let label = label(node);
    if !label.is_empty() {
        out.push(' ');
        out.push_str(&label);
    }
    if show_spans {
        if let Some(span) = node.span() {
            out.push_str(&format!(" [{span})"));
        }
    }
    out.push('\n');

    if let Some(children) = node.children() {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        format_children(children, &child_prefix, show_spans, out);
    }
}

fn format_children(children: &[Node], prefix: &str, show_spans: bool, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        format_node(child, prefix, i == children.len() - 1, show_spans, out);
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    render(doc, false)
}

fn render(doc: &Document, show_spans: bool) -> String {
    let mut output = format!(
        "{} Document ({} items)\n",
        get_icon(NodeKind::Document),
        doc.children.len()
    );
    format_children(&doc.children, "", show_spans, &mut output);
    output
}

/// Format implementation for treeviz format
#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(to_treeviz_str(doc))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if let Some(key) = options.keys().find(|key| *key != "show-spans") {
            return Err(FormatError::NotSupported(format!(
                "Unknown treeviz parameter '{key}'"
            )));
        }
        let show_spans = bool_option(options, "show-spans")?.unwrap_or(false);
        Ok(render(doc, show_spans))
    }
}
