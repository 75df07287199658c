//! Async conversion pipelines between Markdown and HTML source.
//!
//!     markdown → normalize → parse → transform → passes → serialize → html
//!     html → parse → passes → transform → serialize → markdown
//!
//! Every stage but the passes is synchronous. Passes are the extension point for work that may
//! suspend (resolving citations, fetching link titles, ...). They run one at a time, in the order
//! they were added, over the owned Hypertext tree, which is `Send`: the html5ever DOM is confined
//! to the parser and never lives across an await point.
//!
//! A [`Transpiler`] holds only configuration, so one instance can serve any number of
//! conversions concurrently. Dropping a conversion future abandons it without side effects.

use crate::common::frontmatter;
use crate::error::FormatError;
use crate::formats::html::parser::parse_hypertext;
use crate::formats::html::serializer::serialize_hypertext;
use crate::formats::markdown::parser::parse_markup;
use crate::formats::markdown::serializer::serialize_markup;
use crate::options::Options;
use crate::transform::{document_title, hypertext_to_markup, markup_to_hypertext, wrap_document};
use crate::tree::hypertext::Root;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// An async stage over the Hypertext tree.
///
/// ```ignore
/// struct Lowercase;
///
/// impl HypertextPass for Lowercase {
///     fn name(&self) -> &str {
///         "lowercase"
///     }
///
///     fn run<'a>(&'a self, root: Root) -> BoxFuture<'a, Result<Root, FormatError>> {
///         Box::pin(async move { Ok(root) })
///     }
/// }
/// ```
pub trait HypertextPass: Send + Sync {
    fn name(&self) -> &str;

    /// Consume the tree and produce the next one. Failures should use [`FormatError::Pass`].
    fn run<'a>(&'a self, root: Root) -> BoxFuture<'a, Result<Root, FormatError>>;
}

/// Reusable conversion configuration.
#[derive(Clone, Default)]
pub struct Transpiler {
    options: Options,
    passes: Vec<Arc<dyn HypertextPass>>,
}

impl fmt::Debug for Transpiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transpiler")
            .field("options", &self.options)
            .field(
                "passes",
                &self.passes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Transpiler {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            passes: Vec::new(),
        }
    }

    /// Append a pass; passes run in the order they were added.
    pub fn with_pass(mut self, pass: impl HypertextPass + 'static) -> Self {
        self.passes.push(Arc::new(pass));
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Convert Markdown source to HTML.
    pub async fn markup_to_hypertext(&self, source: &str) -> Result<String, FormatError> {
        let span = tracing::debug_span!("markup_to_hypertext", bytes = source.len());
        async move {
            let markup = &self.options.markup;
            let doc = if markup.normalize_frontmatter {
                parse_markup(&frontmatter::normalize(source), markup)?
            } else {
                parse_markup(source, markup)?
            };

            let title = self
                .options
                .hypertext
                .standalone
                .then(|| document_title(&doc).unwrap_or_default());
            let root = markup_to_hypertext(&doc, &self.options.transform);
            drop(doc);

            let mut root = self.run_passes(root).await?;
            if let Some(title) = title {
                root = wrap_document(root, &title);
            }
            serialize_hypertext(&root)
        }
        .instrument(span)
        .await
    }

    /// Convert HTML source to Markdown.
    pub async fn hypertext_to_markup(&self, source: &str) -> Result<String, FormatError> {
        let span = tracing::debug_span!("hypertext_to_markup", bytes = source.len());
        async move {
            let root = parse_hypertext(source, &self.options.hypertext)?;
            let root = self.run_passes(root).await?;
            serialize_markup(&hypertext_to_markup(&root))
        }
        .instrument(span)
        .await
    }

    async fn run_passes(&self, mut root: Root) -> Result<Root, FormatError> {
        for pass in &self.passes {
            let span = tracing::debug_span!("pass", name = pass.name());
            root = pass.run(root).instrument(span).await?;
            tracing::trace!(pass = pass.name(), nodes = root.node_count(), "pass finished");
        }
        Ok(root)
    }
}

/// Convert Markdown source to an HTML fragment with default options.
pub async fn markup_to_hypertext_string(source: &str) -> Result<String, FormatError> {
    Transpiler::default().markup_to_hypertext(source).await
}

/// Convert HTML source to Markdown with default options.
pub async fn hypertext_to_markup_string(source: &str) -> Result<String, FormatError> {
    Transpiler::default().hypertext_to_markup(source).await
}
