//! Text extraction from Markup trees
//!
//! Yields every prose text run of a document, in document order, with the byte span it came
//! from. Code blocks, math blocks and inline math are skipped entirely, at any depth, so a
//! consumer such as a spell checker only sees prose. Only `text` nodes are emitted: their value
//! is always the exact source slice under their span, so `&source[span]` gives back the value.
//!
//! The walk uses an explicit stack, so deeply nested documents cannot exhaust the native stack.

use crate::common::frontmatter;
use crate::error::FormatError;
use crate::formats::markdown::parser::parse_markup;
use crate::options::MarkupOptions;
use crate::tree::markup::{Document, Node};
use crate::tree::Span;
use serde::Serialize;

/// A run of plain text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFragment {
    pub value: String,
    /// None for nodes built without a source, e.g. by the HTML transform.
    pub span: Option<Span>,
}

/// What to extract from: Markdown source, or an already parsed tree.
#[derive(Debug, Clone, Copy)]
pub enum ExtractInput<'a> {
    Source(&'a str),
    Tree(&'a Document),
}

impl<'a> From<&'a str> for ExtractInput<'a> {
    fn from(source: &'a str) -> Self {
        ExtractInput::Source(source)
    }
}

impl<'a> From<&'a String> for ExtractInput<'a> {
    fn from(source: &'a String) -> Self {
        ExtractInput::Source(source)
    }
}

impl<'a> From<&'a Document> for ExtractInput<'a> {
    fn from(doc: &'a Document) -> Self {
        ExtractInput::Tree(doc)
    }
}

/// Extract text fragments with the default Markdown options.
///
/// ```ignore
/// let fragments = extract_text("Hello\n\n```\ncode\n```\n")?;
/// assert_eq!(fragments.len(), 1);
/// ```
pub fn extract_text<'a>(
    input: impl Into<ExtractInput<'a>>,
) -> Result<Vec<TextFragment>, FormatError> {
    extract_text_with(input, &MarkupOptions::default())
}

/// Extract text fragments, parsing string input with `options`.
///
/// Tree input never fails. String input fails only when parsing does.
pub fn extract_text_with<'a>(
    input: impl Into<ExtractInput<'a>>,
    options: &MarkupOptions,
) -> Result<Vec<TextFragment>, FormatError> {
    let fragments: Vec<TextFragment> = match input.into() {
        ExtractInput::Tree(doc) => fragments(doc).collect(),
        ExtractInput::Source(source) => {
            let doc = if options.normalize_frontmatter {
                parse_markup(&frontmatter::normalize(source), options)?
            } else {
                parse_markup(source, options)?
            };
            fragments(&doc).collect()
        }
    };
    tracing::debug!(fragments = fragments.len(), "extracted text");
    Ok(fragments)
}

/// Lazy fragment iterator over a tree.
pub fn fragments(doc: &Document) -> TextFragments<'_> {
    TextFragments {
        stack: vec![doc.children.iter()],
    }
}

/// Depth-first iterator over the prose text of a tree.
pub struct TextFragments<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl Iterator for TextFragments<'_> {
    type Item = TextFragment;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = match self.stack.last_mut()?.next() {
                Some(node) => node,
                None => {
                    self.stack.pop();
                    continue;
                }
            };
            if node.is_verbatim() {
                continue;
            }
            match node {
                Node::Text(text) => {
                    return Some(TextFragment {
                        value: text.value.clone(),
                        span: text.span,
                    })
                }
                _ => {
                    if let Some(children) = node.children() {
                        self.stack.push(children.iter());
                    }
                }
            }
        }
    }
}
