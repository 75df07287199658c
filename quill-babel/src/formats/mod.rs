//! Format implementations
//!
//! Each format converts between a text representation and the Markup tree. Markdown and HTML
//! go both ways; treeviz and json are serialize-only views for inspection.

pub mod html;
pub mod icons;
pub mod json;
pub mod markdown;
pub mod treeviz;

pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
pub use treeviz::TreevizFormat;
