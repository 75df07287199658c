//! Options for parsing, transforming and serializing.
//!
//! These are plain values. `quill-config` builds them from TOML, library callers can build them
//! directly or start from `Default`.

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Markdown parsing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Recognize `$…$` and `$$…$$`.
    pub math: bool,
    /// Recognize a leading `---` frontmatter block.
    pub frontmatter: bool,
    /// Rewrite a `...` frontmatter closer before parsing.
    pub normalize_frontmatter: bool,
    /// Deepest allowed nesting of block and inline containers.
    pub max_depth: usize,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            math: true,
            frontmatter: true,
            normalize_frontmatter: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// HTML parsing and serialization options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypertextOptions {
    /// Parse input as a body fragment rather than a full document.
    pub fragment: bool,
    /// Wrap serialized output in a full `<!doctype html>` document.
    pub standalone: bool,
    pub max_depth: usize,
}

impl Default for HypertextOptions {
    fn default() -> Self {
        Self {
            fragment: true,
            standalone: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Cross-dialect transform options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransformOptions {
    /// Carry frontmatter into HTML as `<script type="application/yaml" data-frontmatter>`.
    pub keep_frontmatter: bool,
}

/// Everything a conversion needs, grouped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub markup: MarkupOptions,
    pub hypertext: HypertextOptions,
    pub transform: TransformOptions,
}

impl Options {
    /// Applies one nesting limit to both dialects.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.markup.max_depth = max_depth;
        self.hypertext.max_depth = max_depth;
        self
    }
}
