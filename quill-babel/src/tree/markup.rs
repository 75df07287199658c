//! Markup tree: the parsed form of a CommonMark document.
//!
//! Block nodes hold blocks or inlines, inlines hold inlines, and the terminal kinds carry a
//! `value`. Text nodes are only produced when their value is byte-for-byte the source slice
//! under their span; anything the parser decoded (entities, numeric references) becomes a
//! [`Node::CharacterReference`] instead.

use super::Span;
use serde::Serialize;
use std::fmt;

/// Root of a Markup tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// One node of a Markup tree, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    // Blocks
    Frontmatter(Literal),
    Paragraph(Parent),
    Heading(Heading),
    ThematicBreak(Leaf),
    BlockQuote(Parent),
    List(List),
    ListItem(Parent),
    CodeBlock(CodeBlock),
    MathBlock(Literal),
    Html(Literal),
    // Inlines
    Text(Literal),
    CharacterReference(Literal),
    Emphasis(Parent),
    Strong(Parent),
    InlineCode(Literal),
    InlineMath(InlineMath),
    InlineHtml(Literal),
    SoftBreak(Leaf),
    Break(Leaf),
    Link(Link),
    Image(Image),
}

/// Discriminant of a [`Node`], used for logging, visualization and dispatch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Frontmatter,
    Paragraph,
    Heading,
    ThematicBreak,
    BlockQuote,
    List,
    ListItem,
    CodeBlock,
    MathBlock,
    Html,
    Text,
    CharacterReference,
    Emphasis,
    Strong,
    InlineCode,
    InlineMath,
    InlineHtml,
    SoftBreak,
    Break,
    Link,
    Image,
}

impl NodeKind {
    /// Every node kind a Markup tree can contain below the document root.
    pub const ALL: [NodeKind; 21] = [
        NodeKind::Frontmatter,
        NodeKind::Paragraph,
        NodeKind::Heading,
        NodeKind::ThematicBreak,
        NodeKind::BlockQuote,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::CodeBlock,
        NodeKind::MathBlock,
        NodeKind::Html,
        NodeKind::Text,
        NodeKind::CharacterReference,
        NodeKind::Emphasis,
        NodeKind::Strong,
        NodeKind::InlineCode,
        NodeKind::InlineMath,
        NodeKind::InlineHtml,
        NodeKind::SoftBreak,
        NodeKind::Break,
        NodeKind::Link,
        NodeKind::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Frontmatter => "frontmatter",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::ThematicBreak => "thematic-break",
            NodeKind::BlockQuote => "block-quote",
            NodeKind::List => "list",
            NodeKind::ListItem => "list-item",
            NodeKind::CodeBlock => "code-block",
            NodeKind::MathBlock => "math-block",
            NodeKind::Html => "html",
            NodeKind::Text => "text",
            NodeKind::CharacterReference => "character-reference",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::InlineCode => "inline-code",
            NodeKind::InlineMath => "inline-math",
            NodeKind::InlineHtml => "inline-html",
            NodeKind::SoftBreak => "soft-break",
            NodeKind::Break => "break",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal node carrying a raw text payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// Container node with no attributes of its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Parent {
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// Terminal node with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Leaf {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    /// 1 through 6.
    pub depth: u8,
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub ordered: bool,
    /// Number of the first item for ordered lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// Tight lists render their items without paragraph wrappers.
    pub tight: bool,
    /// Always [`Node::ListItem`]s.
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// The opening fence of a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fence {
    /// '`' or '~'
    pub marker: char,
    pub length: usize,
}

/// Text following the opening fence, such as `rust ignore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoString {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl InfoString {
    /// First whitespace-separated token, conventionally the language.
    pub fn lang(&self) -> Option<&str> {
        self.value.split_whitespace().next()
    }

    /// Everything after the language token, trimmed.
    pub fn meta(&self) -> Option<&str> {
        let lang = self.lang()?;
        let rest = self.value.trim_start()[lang.len()..].trim();
        (!rest.is_empty()).then_some(rest)
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    /// `None` for indented code blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fence: Option<Fence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoString>,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl CodeBlock {
    pub fn is_fenced(&self) -> bool {
        self.fence.is_some()
    }

    pub fn lang(&self) -> Option<&str> {
        self.info.as_ref().and_then(InfoString::lang)
    }
}

/// `$…$` or `$$…$$` inside running text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineMath {
    pub value: String,
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Frontmatter(_) => NodeKind::Frontmatter,
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Heading(_) => NodeKind::Heading,
            Node::ThematicBreak(_) => NodeKind::ThematicBreak,
            Node::BlockQuote(_) => NodeKind::BlockQuote,
            Node::List(_) => NodeKind::List,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::CodeBlock(_) => NodeKind::CodeBlock,
            Node::MathBlock(_) => NodeKind::MathBlock,
            Node::Html(_) => NodeKind::Html,
            Node::Text(_) => NodeKind::Text,
            Node::CharacterReference(_) => NodeKind::CharacterReference,
            Node::Emphasis(_) => NodeKind::Emphasis,
            Node::Strong(_) => NodeKind::Strong,
            Node::InlineCode(_) => NodeKind::InlineCode,
            Node::InlineMath(_) => NodeKind::InlineMath,
            Node::InlineHtml(_) => NodeKind::InlineHtml,
            Node::SoftBreak(_) => NodeKind::SoftBreak,
            Node::Break(_) => NodeKind::Break,
            Node::Link(_) => NodeKind::Link,
            Node::Image(_) => NodeKind::Image,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Node::Frontmatter(n)
            | Node::MathBlock(n)
            | Node::Html(n)
            | Node::Text(n)
            | Node::CharacterReference(n)
            | Node::InlineCode(n)
            | Node::InlineHtml(n) => n.span,
            Node::Paragraph(n)
            | Node::BlockQuote(n)
            | Node::ListItem(n)
            | Node::Emphasis(n)
            | Node::Strong(n) => n.span,
            Node::ThematicBreak(n) | Node::SoftBreak(n) | Node::Break(n) => n.span,
            Node::Heading(n) => n.span,
            Node::List(n) => n.span,
            Node::CodeBlock(n) => n.span,
            Node::InlineMath(n) => n.span,
            Node::Link(n) => n.span,
            Node::Image(n) => n.span,
        }
    }

    /// Child nodes, or `None` for terminal kinds.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Paragraph(n)
            | Node::BlockQuote(n)
            | Node::ListItem(n)
            | Node::Emphasis(n)
            | Node::Strong(n) => Some(&n.children),
            Node::Heading(n) => Some(&n.children),
            Node::List(n) => Some(&n.children),
            Node::Link(n) => Some(&n.children),
            _ => None,
        }
    }

    /// Raw payload of terminal text-bearing kinds.
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Frontmatter(n)
            | Node::MathBlock(n)
            | Node::Html(n)
            | Node::Text(n)
            | Node::CharacterReference(n)
            | Node::InlineCode(n)
            | Node::InlineHtml(n) => Some(&n.value),
            Node::CodeBlock(n) => Some(&n.value),
            Node::InlineMath(n) => Some(&n.value),
            _ => None,
        }
    }

    /// Code and formula nodes, whose contents are never interpreted as prose.
    pub fn is_verbatim(&self) -> bool {
        matches!(
            self,
            Node::CodeBlock(_) | Node::MathBlock(_) | Node::InlineMath(_)
        )
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Node::Text(_)
                | Node::CharacterReference(_)
                | Node::Emphasis(_)
                | Node::Strong(_)
                | Node::InlineCode(_)
                | Node::InlineMath(_)
                | Node::InlineHtml(_)
                | Node::SoftBreak(_)
                | Node::Break(_)
                | Node::Link(_)
                | Node::Image(_)
        )
    }

    pub fn is_block(&self) -> bool {
        !self.is_inline()
    }

    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(Literal {
            value: value.into(),
            span: None,
        })
    }

    pub fn paragraph(children: Vec<Node>) -> Node {
        Node::Paragraph(Parent {
            children,
            span: None,
        })
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            span: None,
        }
    }

    /// Pre-order walk over every node below the root.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.descendants().count()
    }

    /// The frontmatter block, if the document starts with one.
    pub fn frontmatter(&self) -> Option<&Literal> {
        match self.children.first() {
            Some(Node::Frontmatter(fm)) => Some(fm),
            _ => None,
        }
    }
}

/// Rendered text of inline content without markup, as used for image alt text and titles.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    let mut stack: Vec<&Node> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            Node::SoftBreak(_) | Node::Break(_) => out.push(' '),
            Node::Image(image) => out.push_str(&image.alt),
            _ => match node.children() {
                Some(inner) => stack.extend(inner.iter().rev()),
                None => out.push_str(node.value().unwrap_or_default()),
            },
        }
    }
    out
}

/// Depth-first, document-order iterator over a tree, driven by an explicit stack.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    if let Some(children) = node.children() {
                        self.stack.push(children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
