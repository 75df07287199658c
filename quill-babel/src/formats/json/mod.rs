//! JSON dump of the Markup tree
//!
//! Serialize-only. Every node is an object tagged with `"type"` (the kebab-case node kind);
//! spans are `{"start": n, "end": m}` byte offsets and are omitted when unknown.

use crate::error::FormatError;
use crate::format::{bool_option, Format};
use crate::tree::markup::Document;
use std::collections::HashMap;

pub fn to_json_string(doc: &Document, pretty: bool) -> Result<String, FormatError> {
    let result = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    result.map_err(|e| FormatError::Serialization(format!("JSON serialization failed: {e}")))
}

/// Format implementation for the JSON tree dump
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Markup tree as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        to_json_string(doc, true)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        if let Some(key) = options.keys().find(|key| *key != "compact") {
            return Err(FormatError::NotSupported(format!(
                "Unknown json parameter '{key}'"
            )));
        }
        let compact = bool_option(options, "compact")?.unwrap_or(false);
        to_json_string(doc, !compact)
    }
}
