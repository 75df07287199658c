//! Cross-dialect transforms between the Markup and Hypertext trees.
//!
//! Both directions are pure functions from one borrowed tree to a new owned tree. They never
//! fail: anything without a direct equivalent maps to a structural analog or to raw html.

mod to_hypertext;
mod to_markup;

pub use to_hypertext::{document_title, markup_to_hypertext, wrap_document};
pub use to_markup::hypertext_to_markup;
