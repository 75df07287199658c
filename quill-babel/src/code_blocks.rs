//! Fenced code block queries, for editors and renderers that treat code blocks specially.
//!
//! The library does not render anything here. It lists fenced blocks with the position of
//! their info string, and answers whether a given range is a code block of some language.

use crate::tree::markup::{CodeBlock, Document, Fence, Node};
use crate::tree::Span;
use serde::Serialize;

/// A fenced code block and where its parts sit in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FencedCodeBlock {
    pub fence: Fence,
    /// Full info string, empty when the fence has none.
    pub info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_span: Option<Span>,
    pub info_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl FencedCodeBlock {
    fn from_code_block(code: &CodeBlock, fence: Fence) -> Self {
        let info = code.info.as_ref();
        FencedCodeBlock {
            fence,
            info: info.map(|i| i.value.clone()).unwrap_or_default(),
            lang: code.lang().map(str::to_string),
            info_span: info.and_then(|i| i.span),
            info_len: info.map(|i| i.len()).unwrap_or(0),
            span: code.span,
        }
    }
}

/// Every fenced code block in document order, including nested ones.
pub fn fenced_code_blocks(doc: &Document) -> Vec<FencedCodeBlock> {
    doc.descendants()
        .filter_map(|node| match node {
            Node::CodeBlock(code) => code
                .fence
                .map(|fence| FencedCodeBlock::from_code_block(code, fence)),
            _ => None,
        })
        .collect()
}

/// The code block whose span is exactly `span`.
pub fn code_block_at(doc: &Document, span: Span) -> Option<&CodeBlock> {
    doc.descendants().find_map(|node| match node {
        Node::CodeBlock(code) if code.span == Some(span) => Some(code),
        _ => None,
    })
}

/// Whether the node at `span` is a code block whose language token equals `token`.
pub fn is_code_block_at(doc: &Document, span: Span, token: &str) -> bool {
    code_block_at(doc, span).is_some_and(|code| code.lang() == Some(token))
}
