//! Icon mapping for the tree visualization format

use crate::tree::markup::NodeKind;

/// Get the Unicode icon for a Markup node kind
///
/// Returns a single Unicode character that visually represents the node kind, for quick
/// identification when scanning a printed tree.
pub fn get_icon(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Document => "⧉",
        NodeKind::Frontmatter => "⚙",
        NodeKind::Paragraph => "¶",
        NodeKind::Heading => "§",
        NodeKind::ThematicBreak => "⎯",
        NodeKind::BlockQuote => "\"",
        NodeKind::List => "☰",
        NodeKind::ListItem => "•",
        NodeKind::CodeBlock => "𝒱",
        NodeKind::MathBlock | NodeKind::InlineMath => "√",
        NodeKind::Html | NodeKind::InlineHtml => "⟨⟩",
        NodeKind::Text => "◦",
        NodeKind::CharacterReference => "&",
        NodeKind::Emphasis => "𝐼",
        NodeKind::Strong => "𝐁",
        NodeKind::InlineCode => "ƒ",
        NodeKind::SoftBreak | NodeKind::Break => "↵",
        NodeKind::Link => "⊕",
        NodeKind::Image => "▣",
    }
}
