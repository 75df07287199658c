//! Frontmatter delimiter normalization.
//!
//!     YAML allows a document to be closed with `...` instead of `---`. CommonMark frontmatter
//!     parsers only recognize the dashed form, so a block closed with dots would be read as a
//!     thematic break followed by a paragraph. This pre-pass rewrites the first dotted closer
//!     into a dashed one.
//!
//!     Rules, applied to the raw source before parsing:
//!         - The line ending is the first `\r\n` in the text, else the first `\n\r`, else `\n`.
//!         - Nothing happens unless the text starts with `---` followed by that line ending.
//!         - Lines after the opener are scanned in order. A `---` line means the block is
//!           already well formed. A `...` line is replaced by `---` and scanning stops.
//!         - An unterminated block is passed through untouched.
//!
//!     The replacement swaps three bytes for three bytes, so any offset computed against the
//!     normalized text is also an offset into the original text.

use std::borrow::Cow;

const FENCE: &str = "---";
const YAML_END: &str = "...";

/// Line ending used by `source`.
pub fn detect_eol(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else if source.contains("\n\r") {
        "\n\r"
    } else {
        "\n"
    }
}

/// Rewrites a `...` frontmatter closer to `---`. Borrows when nothing changes.
pub fn normalize(source: &str) -> Cow<'_, str> {
    let eol = detect_eol(source);
    let Some(body) = source
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_prefix(eol))
    else {
        return Cow::Borrowed(source);
    };

    let mut line_start = source.len() - body.len();
    for line in body.split(eol) {
        if line == FENCE {
            return Cow::Borrowed(source);
        }
        if line == YAML_END {
            tracing::debug!(offset = line_start, "rewriting frontmatter closer");
            let mut out = String::with_capacity(source.len());
            out.push_str(&source[..line_start]);
            out.push_str(FENCE);
            out.push_str(&source[line_start + YAML_END.len()..]);
            return Cow::Owned(out);
        }
        line_start += line.len() + eol.len();
    }

    Cow::Borrowed(source)
}
