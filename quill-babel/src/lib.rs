//! Markdown and HTML interoperability with position-preserving text extraction
//!
//!     This crate converts between CommonMark Markdown (with frontmatter and math) and HTML5, and
//!     extracts the prose of a Markdown document together with the byte offsets it came from.
//!
//!     TLDR:
//!         - Parsing and serialization are delegated to format libraries: pulldown-cmark and
//!           comrak for Markdown, html5ever for HTML. This crate owns the trees in between.
//!         - Each dialect has its own owned tree (./tree). Cross-dialect work is a pure function
//!           from one tree to the other (./transform).
//!         - Text extraction walks the Markdown tree and never looks at HTML.
//!
//! Architecture
//!
//!     This is a pure lib: no printing, no environment, no files. The quill-cli crate is the
//!     shell around it.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # FormatError and ParseError
//!     ├── options.rs              # Parse / transform / serialize options
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── pipeline.rs             # Async Transpiler and the string-to-string conversions
//!     ├── extract.rs              # Text fragments with spans
//!     ├── code_blocks.rs          # Fenced code block queries
//!     ├── tree                    # Markup and Hypertext trees, Span
//!     ├── transform               # Markup ⇄ Hypertext
//!     ├── common                  # Frontmatter normalizer, whitespace
//!     └── formats
//!         ├── <format>
//!         │   ├── parser.rs
//!         │   ├── serializer.rs
//!         │   └── mod.rs
//!         ├── treeviz             # Serialize-only tree view
//!         └── json                # Serialize-only tree dump
//!
//! Core Algorithms
//!
//!     Markdown parsing consumes pulldown-cmark's offset iterator and builds the Markup tree with
//!     an explicit stack of open containers. Text nodes are only created when the event text is
//!     the exact source slice, which is what lets extraction promise `&source[span] == value`.
//!
//!     Frontmatter closed with `...` is rewritten to `---` before parsing. The rewrite has the
//!     same length, so spans stay valid offsets into the caller's original text.
//!
//!     HTML → Markdown flattens what Markdown cannot express: generic containers disappear,
//!     their loose inline text becomes paragraphs, and anything that truly has no Markdown form
//!     (tables, media, forms, comments) is kept as raw HTML.
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Rust does not discover tests in subdirectories, so tests/lib.rs includes them as modules.
//!
pub mod code_blocks;
pub mod common;
pub mod error;
pub mod extract;
pub mod format;
pub mod formats;
pub mod options;
pub mod pipeline;
pub mod registry;
pub mod transform;
pub mod tree;

pub use code_blocks::{code_block_at, fenced_code_blocks, is_code_block_at, FencedCodeBlock};
pub use common::frontmatter::normalize as normalize_frontmatter;
pub use error::{Dialect, FormatError, ParseError};
pub use extract::{extract_text, extract_text_with, ExtractInput, TextFragment};
pub use format::Format;
pub use formats::html::parser::parse_hypertext;
pub use formats::html::serializer::serialize_hypertext;
pub use formats::markdown::parser::parse_markup;
pub use formats::markdown::serializer::serialize_markup;
pub use options::{HypertextOptions, MarkupOptions, Options, TransformOptions};
pub use pipeline::{
    hypertext_to_markup_string, markup_to_hypertext_string, HypertextPass, Transpiler,
};
pub use registry::FormatRegistry;
pub use transform::{hypertext_to_markup, markup_to_hypertext};
pub use tree::Span;
