//! Shared configuration loader for the quill toolchain.
//!
//! `defaults/quill.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuillConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use quill_babel::{HypertextOptions, MarkupOptions, Options, TransformOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/quill.default.toml");

/// Name of the per-project file picked up from the working directory.
pub const PROJECT_FILE: &str = "quill.toml";

/// Top-level configuration consumed by quill applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuillConfig {
    pub markup: MarkupConfig,
    pub hypertext: HypertextConfig,
    pub transform: TransformConfig,
    pub limits: LimitsConfig,
    pub extract: ExtractConfig,
}

/// Markdown parsing switches.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    pub math: bool,
    pub frontmatter: bool,
    pub normalize_frontmatter: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HypertextConfig {
    pub fragment: bool,
    pub standalone: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformConfig {
    pub keep_frontmatter: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    pub format: ExtractFormat,
}

/// How `quill extract` prints fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ExtractFormat {
    /// One JSON object per line.
    #[serde(rename = "jsonl")]
    Jsonl,
    /// `start..end<TAB>value`, with the value's newlines escaped.
    #[serde(rename = "plain")]
    Plain,
}

impl QuillConfig {
    pub fn markup_options(&self) -> MarkupOptions {
        MarkupOptions {
            math: self.markup.math,
            frontmatter: self.markup.frontmatter,
            normalize_frontmatter: self.markup.normalize_frontmatter,
            max_depth: self.limits.max_depth,
        }
    }

    pub fn hypertext_options(&self) -> HypertextOptions {
        HypertextOptions {
            fragment: self.hypertext.fragment,
            standalone: self.hypertext.standalone,
            max_depth: self.limits.max_depth,
        }
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            keep_frontmatter: self.transform.keep_frontmatter,
        }
    }
}

impl From<&QuillConfig> for Options {
    fn from(config: &QuillConfig) -> Self {
        Options {
            markup: config.markup_options(),
            hypertext: config.hypertext_options(),
            transform: config.transform_options(),
        }
    }
}

impl From<QuillConfig> for Options {
    fn from(config: QuillConfig) -> Self {
        Options::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `quill.toml` from `dir` if there is one.
    pub fn with_project_file(self, dir: impl AsRef<Path>) -> Self {
        self.with_optional_file(dir.as_ref().join(PROJECT_FILE))
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<QuillConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuillConfig, ConfigError> {
    Loader::new().build()
}
