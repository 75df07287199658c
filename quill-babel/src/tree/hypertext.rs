//! Hypertext tree: an owned HTML element tree.
//!
//! Built from the html5ever DOM by the HTML parser, or directly by the Markup-to-Hypertext
//! transform. Unlike the DOM it is `Send` and can cross await points in the pipeline.

use super::Span;
use serde::Serialize;

/// Whether a root stands for a whole document or a body fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootKind {
    Document,
    #[default]
    Fragment,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Root {
    pub kind: RootKind,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Text),
    Doctype(Doctype),
    /// Markup written verbatim by the serializer.
    Raw(Text),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// Lowercase local name.
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doctype {
    pub name: String,
}

/// Elements that never have content or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is not escaped.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

impl Root {
    pub fn fragment(children: Vec<Node>) -> Self {
        Self {
            kind: RootKind::Fragment,
            children,
        }
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Node> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            if let Node::Element(el) = node {
                stack.extend(el.children.iter());
            }
        }
        count
    }

    /// First element with the given tag, searching depth-first.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        find_in(&self.children, tag)
    }
}

fn find_in<'a>(nodes: &'a [Node], tag: &str) -> Option<&'a Element> {
    nodes.iter().find_map(|node| match node {
        Node::Element(el) if el.tag == tag => Some(el),
        Node::Element(el) => find_in(&el.children, tag),
        _ => None,
    })
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            span: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Whether the element has nothing but whitespace text inside.
    pub fn is_blank(&self) -> bool {
        self.children.iter().all(|child| match child {
            Node::Text(text) => text.value.trim().is_empty(),
            _ => false,
        })
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&text.value),
            Node::Element(el) => collect_text(&el.children, out),
            _ => {}
        }
    }
}

impl Node {
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(Text {
            value: value.into(),
            span: None,
        })
    }

    pub fn raw(value: impl Into<String>) -> Node {
        Node::Raw(Text {
            value: value.into(),
            span: None,
        })
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Text node holding only whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(text) if text.value.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_lookup() {
        let el = Element::new("div").with_attr("class", "math  math-display");
        assert!(el.has_class("math"));
        assert!(el.has_class("math-display"));
        assert!(!el.has_class("math-inline"));
    }

    #[test]
    fn text_content_is_recursive() {
        let el = Element::new("p").with_children(vec![
            Node::text("a "),
            Element::new("em")
                .with_children(vec![Node::text("b")])
                .into(),
            Node::Comment(Text {
                value: "skip".into(),
                span: None,
            }),
        ]);
        assert_eq!(el.text_content(), "a b");
    }

    #[test]
    fn find_descends_into_elements() {
        let root = Root::fragment(vec![Element::new("div")
            .with_children(vec![Element::new("pre").into()])
            .into()]);
        assert!(root.find("pre").is_some());
        assert!(root.find("table").is_none());
        assert_eq!(root.node_count(), 2);
    }
}
