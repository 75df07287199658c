//! Inspect transforms
//!
//! Each transform prints one internal representation of an input document:
//!
//! - `markup-json`: the Markup tree as JSON
//! - `hypertext-json`: the Hypertext tree as JSON. HTML input is shown as parsed, Markdown input
//!   after the Markup → Hypertext transform
//! - `treeviz`: the Markup tree drawn with box characters (default)
//! - `fragments`: extracted text fragments, in the configured extract format
//!
//! Input in any parseable registry format is accepted. Only Markdown input yields fragments with
//! spans, since trees built from HTML have no Markdown source to point into.
//!
//! ## Extra Parameters
//!
//! `--extra-<name> [value]` parameters reach the format behind the transform:
//!
//! - `show-spans`: treeviz appends `[start..end)` to nodes read from source
//! - `compact`: markup-json prints on one line
//!
//! Example: `quill inspect notes.md treeviz --extra-show-spans`

use quill_babel::formats::{JsonFormat, TreevizFormat};
use quill_babel::tree::hypertext::Root;
use quill_babel::tree::markup::Document;
use quill_babel::{
    extract_text, extract_text_with, markup_to_hypertext, parse_hypertext, Format,
    FormatRegistry, Options, TextFragment,
};
use quill_config::ExtractFormat;
use std::collections::HashMap;

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["markup-json", "hypertext-json", "treeviz", "fragments"];

pub const DEFAULT_TRANSFORM: &str = "treeviz";

/// Everything a transform needs besides the source text.
pub struct TransformContext<'a> {
    /// Registry format name of the input.
    pub from: &'a str,
    pub options: &'a Options,
    pub extract_format: ExtractFormat,
    pub extra_params: &'a HashMap<String, String>,
}

/// Execute a named transform on a source file.
///
/// Returns the transformed output, or an error message for the user.
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    ctx: &TransformContext<'_>,
) -> Result<String, String> {
    match transform_name {
        "markup-json" => {
            let doc = markup_tree(source, ctx)?;
            let mut json = JsonFormat
                .serialize_with_options(&doc, ctx.extra_params)
                .map_err(|e| e.to_string())?;
            json.push('\n');
            Ok(json)
        }
        "hypertext-json" => {
            let root = hypertext_tree(source, ctx)?;
            let mut json = serde_json::to_string_pretty(&root).map_err(|e| e.to_string())?;
            json.push('\n');
            Ok(json)
        }
        "treeviz" => {
            let doc = markup_tree(source, ctx)?;
            TreevizFormat
                .serialize_with_options(&doc, ctx.extra_params)
                .map_err(|e| e.to_string())
        }
        "fragments" => {
            let fragments = if ctx.from == "markdown" {
                extract_text_with(source, &ctx.options.markup)
            } else {
                extract_text(&markup_tree(source, ctx)?)
            }
            .map_err(|e| e.to_string())?;
            render_fragments(&fragments, ctx.extract_format)
        }
        _ => Err(format!(
            "Unknown transform '{transform_name}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}

fn markup_tree(source: &str, ctx: &TransformContext<'_>) -> Result<Document, String> {
    FormatRegistry::with_options(ctx.options)
        .parse(source, ctx.from)
        .map_err(|e| e.to_string())
}

fn hypertext_tree(source: &str, ctx: &TransformContext<'_>) -> Result<Root, String> {
    if ctx.from == "html" {
        return parse_hypertext(source, &ctx.options.hypertext).map_err(|e| e.to_string());
    }
    let doc = markup_tree(source, ctx)?;
    Ok(markup_to_hypertext(&doc, &ctx.options.transform))
}

/// Render fragments one per line.
///
/// Plain lines are `start..end<TAB>value`, with `-` for a fragment without a span and the
/// value's backslashes, tabs and newlines escaped so every fragment stays on one line.
pub fn render_fragments(
    fragments: &[TextFragment],
    format: ExtractFormat,
) -> Result<String, String> {
    let mut out = String::new();
    for fragment in fragments {
        match format {
            ExtractFormat::Jsonl => {
                out.push_str(&serde_json::to_string(fragment).map_err(|e| e.to_string())?);
            }
            ExtractFormat::Plain => {
                match fragment.span {
                    Some(span) => out.push_str(&span.to_string()),
                    None => out.push('-'),
                }
                out.push('\t');
                out.push_str(&escape_plain(&fragment.value));
            }
        }
        out.push('\n');
    }
    Ok(out)
}

fn escape_plain(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
