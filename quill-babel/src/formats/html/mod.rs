//! HTML format implementation
//!
//! This module implements bidirectional conversion between HTML5 and the Markup tree, going
//! through the Hypertext tree in both directions.
//!
//! # Library Choice
//!
//! - `html5ever` + `markup5ever_rcdom` parse, with browser-grade error recovery.
//! - `html-escape` escapes text and attributes in our own small writer. Raw passthrough nodes
//!   must be written byte-for-byte wherever they sit, which an RcDom round-trip cannot do.
//!
//! # Element Mapping Table
//!
//! | Markup node        | HTML                                                   | Import also accepts              |
//! |--------------------|--------------------------------------------------------|----------------------------------|
//! | Heading            | `<hN>`                                                 |                                  |
//! | Paragraph          | `<p>`                                                  | loose text in containers         |
//! | List               | `<ul>` / `<ol start>`                                  | `<menu>`                         |
//! | CodeBlock          | `<pre><code class="language-x" data-meta="...">`       | `lang-x`                         |
//! | MathBlock          | `<div class="math math-display">`                      |                                  |
//! | InlineMath         | `<span class="math math-inline">`                      |                                  |
//! | Emphasis / Strong  | `<em>` / `<strong>`                                    | `<i>`, `<cite>` / `<b>`          |
//! | InlineCode         | `<code>`                                               | `<kbd>`, `<samp>`, `<tt>`        |
//! | Html / InlineHtml  | written verbatim                                       | tables, media, forms, comments   |
//! | Frontmatter        | dropped, or `<script type="application/yaml" data-frontmatter>` |                         |
//!
//! # Lossy Conversions
//!
//! - Whitespace outside `pre` is collapsed.
//! - Generic containers (`div`, `section`, ...) and unknown inline elements are flattened.
//! - Attributes other than the ones above are only kept on passthrough elements.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::options::{HypertextOptions, TransformOptions};
use crate::transform::{document_title, hypertext_to_markup, markup_to_hypertext, wrap_document};
use crate::tree::markup::Document;
use std::collections::HashMap;

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: HypertextOptions,
    transform: TransformOptions,
}

impl HtmlFormat {
    pub fn new(options: HypertextOptions, transform: TransformOptions) -> Self {
        Self { options, transform }
    }

    fn render(
        &self,
        doc: &Document,
        transform: &TransformOptions,
        standalone: bool,
    ) -> Result<String, FormatError> {
        let mut root = markup_to_hypertext(doc, transform);
        if standalone {
            let title = document_title(doc).unwrap_or_default();
            root = wrap_document(root, &title);
        }
        serializer::serialize_hypertext(&root)
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML5 fragments or documents"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        let root = parser::parse_hypertext(source, &self.options)?;
        Ok(hypertext_to_markup(&root))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        self.render(doc, &self.transform, self.options.standalone)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if let Some(key) = options
            .keys()
            .find(|key| !matches!(key.as_str(), "keep-frontmatter" | "standalone"))
        {
            return Err(FormatError::NotSupported(format!(
                "Unknown html parameter '{key}'"
            )));
        }

        let transform = TransformOptions {
            keep_frontmatter: bool_option(options, "keep-frontmatter")?
                .unwrap_or(self.transform.keep_frontmatter),
        };
        let standalone = bool_option(options, "standalone")?.unwrap_or(self.options.standalone);
        self.render(doc, &transform, standalone)
    }
}
