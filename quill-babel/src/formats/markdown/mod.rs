//! Markdown format implementation
//!
//! This module implements conversion between CommonMark Markdown and the Markup tree.
//!
//! # Library Choice
//!
//! Parsing and serialization use different crates:
//! - `pulldown-cmark` parses, because its offset iterator gives a byte range for every event,
//!   which is what text extraction needs to point back into the source.
//! - `comrak` serializes, through its CommonMark formatter.
//!
//! # Element Mapping Table
//!
//! | Markup node          | Markdown                      | Notes                                   |
//! |----------------------|-------------------------------|-----------------------------------------|
//! | Frontmatter          | `---` YAML `---`              | Leading block only; `...` closer fixed  |
//! | Heading              | `#`..`######`                 | Setext headings parse, ATX is written   |
//! | Paragraph            | Paragraph                     |                                         |
//! | List / ListItem      | `-` or `1.`                   | Tightness and start number preserved    |
//! | CodeBlock            | Fenced or indented code       | Fence marker and info string kept       |
//! | MathBlock            | `$$` alone in a paragraph     | Written raw, never escaped              |
//! | Html                 | HTML block                    | Written raw                             |
//! | Text                 | Text                          | Value always equals its source slice    |
//! | CharacterReference   | `&amp;`, `&#35;`              | Decoded value; written as text          |
//! | InlineMath           | `$…$` / `$$…$$`               | Written raw                             |
//!
//! # Lossy Conversions
//!
//! - Reference-style links are written inline.
//! - Setext headings become ATX headings.
//! - Escapes are re-derived by comrak, not copied from the source.

pub mod parser;
pub mod serializer;

use crate::common::frontmatter;
use crate::error::FormatError;
use crate::format::Format;
use crate::options::MarkupOptions;
use crate::tree::markup::Document;

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: MarkupOptions,
}

impl MarkdownFormat {
    pub fn new(options: MarkupOptions) -> Self {
        Self { options }
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with frontmatter and math"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        if self.options.normalize_frontmatter {
            parser::parse_markup(&frontmatter::normalize(source), &self.options)
        } else {
            parser::parse_markup(source, &self.options)
        }
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_markup(doc)
    }
}
