//! Text-level helpers shared by the parsers and transforms.

pub mod frontmatter;
pub mod whitespace;
