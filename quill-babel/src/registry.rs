//! Name and extension lookup over the built-in dialects
//!
//! `convert`, `inspect` and `list-formats` all resolve their `--from`/`--to` values here. A
//! registry is filled once at startup from [`Options`] and only read afterwards, so a shared
//! reference is enough for concurrent conversions.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::{HtmlFormat, JsonFormat, MarkdownFormat, TreevizFormat};
use crate::options::Options;
use crate::tree::markup::Document;
use std::collections::HashMap;
use std::path::Path;

/// Formats keyed by [`Format::name`].
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let doc = registry.parse("# Title", "markdown")?;
/// let html = registry.serialize(&doc, "html")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// A registry with nothing in it.
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Markdown, HTML, treeviz and JSON, each with default options.
    pub fn with_defaults() -> Self {
        Self::with_options(&Options::default())
    }

    /// The built-in formats, with Markdown and HTML configured from `options`.
    pub fn with_options(options: &Options) -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownFormat::new(options.markup.clone()));
        registry.register(HtmlFormat::new(
            options.hypertext.clone(),
            options.transform.clone(),
        ));
        registry.register(TreevizFormat);
        registry.register(JsonFormat);
        registry
    }

    /// Adds `format` under its own name. A later registration under the same name wins.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        match self.formats.get(name) {
            Some(format) => Ok(format.as_ref()),
            None => Err(FormatError::FormatNotFound(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names in alphabetical order.
    pub fn list_formats(&self) -> Vec<String> {
        self.formats().iter().map(|f| f.name().to_string()).collect()
    }

    /// Registered formats in alphabetical order of name.
    pub fn formats(&self) -> Vec<&dyn Format> {
        let mut formats: Vec<&dyn Format> = self.formats.values().map(|f| f.as_ref()).collect();
        formats.sort_by(|a, b| a.name().cmp(b.name()));
        formats
    }

    /// Name of the format claiming the file's extension. Matching ignores ASCII case.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();

        self.formats()
            .into_iter()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    /// Reads `source` as the named dialect.
    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        let reader = self.get(format)?;
        if !reader.supports_parsing() {
            return Err(unsupported(format, "parsing"));
        }
        let _span = tracing::debug_span!("parse", format).entered();
        reader.parse(source)
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(doc, format, &HashMap::new())
    }

    /// Writes `doc` in the named dialect. `options` are the CLI's `--extra-*` parameters and
    /// are checked by the format itself.
    pub fn serialize_with_options(
        &self,
        doc: &Document,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let writer = self.get(format)?;
        if !writer.supports_serialization() {
            return Err(unsupported(format, "serialization"));
        }
        let _span = tracing::debug_span!("serialize", format).entered();
        writer.serialize_with_options(doc, options)
    }
}

fn unsupported(format: &str, operation: &str) -> FormatError {
    FormatError::NotSupported(format!("Format '{format}' does not support {operation}"))
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{HypertextOptions, TransformOptions};
    use crate::tree::markup::{plain_text, Node};

    /// Reads any input as one paragraph and writes back the plain text.
    struct Plain;

    impl Format for Plain {
        fn name(&self) -> &str {
            "plain"
        }
        fn file_extensions(&self) -> &[&str] {
            &["txt"]
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, source: &str) -> Result<Document, FormatError> {
            Ok(Document::new(vec![Node::paragraph(vec![Node::text(source)])]))
        }
        fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
            Ok(plain_text(&doc.children))
        }
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = FormatRegistry::new();
        assert!(registry.list_formats().is_empty());
        assert!(!registry.has("markdown"));
        assert_eq!(registry.detect_format_from_filename("a.md"), None);
    }

    #[test]
    fn test_custom_format_dispatch() {
        let mut registry = FormatRegistry::new();
        registry.register(Plain);

        assert!(registry.has("plain"));
        assert_eq!(registry.get("plain").unwrap().name(), "plain");
        assert_eq!(
            registry.detect_format_from_filename("notes.TXT"),
            Some("plain".to_string())
        );

        let doc = registry.parse("hello", "plain").unwrap();
        assert_eq!(registry.serialize(&doc, "plain").unwrap(), "hello");
    }

    #[test]
    fn test_reregistering_keeps_one_entry() {
        let mut registry = FormatRegistry::new();
        registry.register(Plain);
        registry.register(Plain);
        assert_eq!(registry.list_formats(), vec!["plain"]);
    }

    #[test]
    fn test_unknown_name_is_reported() {
        let registry = FormatRegistry::new();
        match registry.parse("input", "rst").unwrap_err() {
            FormatError::FormatNotFound(name) => assert_eq!(name, "rst"),
            other => panic!("Expected FormatNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_parameters_reach_the_format() {
        let mut registry = FormatRegistry::new();
        registry.register(Plain);

        let mut options = HashMap::new();
        options.insert("wrap".to_string(), "80".to_string());
        assert!(registry
            .serialize_with_options(&Document::default(), "plain", &options)
            .is_err());
    }

    #[test]
    fn test_serialize_only_formats_reject_parsing() {
        let registry = FormatRegistry::with_defaults();
        let err = registry.parse("x", "treeviz").unwrap_err();
        assert!(matches!(err, FormatError::NotSupported(_)));
    }

    #[test]
    fn test_builtin_formats() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["html", "json", "markdown", "treeviz"]
        );
    }

    #[test]
    fn test_builtin_extensions() {
        let registry = FormatRegistry::with_defaults();
        let detect = |name: &str| registry.detect_format_from_filename(name);

        assert_eq!(detect("notes.md").as_deref(), Some("markdown"));
        assert_eq!(detect("/path/to/README.markdown").as_deref(), Some("markdown"));
        assert_eq!(detect("page.HTM").as_deref(), Some("html"));
        assert_eq!(detect("doc.tree").as_deref(), Some("treeviz"));
        assert_eq!(detect("doc.unknown"), None);
        assert_eq!(detect("doc"), None);
    }

    #[test]
    fn test_with_options_configures_formats() {
        let options = Options {
            hypertext: HypertextOptions {
                standalone: true,
                ..HypertextOptions::default()
            },
            transform: TransformOptions {
                keep_frontmatter: true,
            },
            ..Options::default()
        };
        let registry = FormatRegistry::with_options(&options);
        let doc = registry.parse("---\na: 1\n---\n\n# Hi\n", "markdown").unwrap();
        let html = registry.serialize(&doc, "html").unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
        assert!(html.contains("data-frontmatter"), "{html}");
    }
}
