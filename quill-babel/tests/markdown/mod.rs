//! Markdown format tests
//!
//! Tests for Markdown → Markup tree parsing and Markup tree → Markdown serialization.

mod export;
mod frontmatter;
mod import;
