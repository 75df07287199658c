//! HTML format tests
//!
//! Tests for both directions between HTML and the Markup tree.

mod export;
mod import;
