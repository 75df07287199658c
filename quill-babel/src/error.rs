//! Error types for format operations

use std::fmt;
use thiserror::Error;

/// Which grammar rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Markup,
    Hypertext,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Markup => f.write_str("markdown"),
            Dialect::Hypertext => f.write_str("html"),
        }
    }
}

/// Input that could not be turned into a tree.
///
/// Both grammars are permissive, so this only happens when a resource limit is hit.
/// `offset` is approximate and absent when the parser does not track positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub dialect: Dialect,
    pub offset: Option<usize>,
    pub expected: String,
    pub found: String,
}

impl ParseError {
    pub(crate) fn depth_exceeded(dialect: Dialect, offset: Option<usize>, max_depth: usize) -> Self {
        ParseError {
            dialect,
            offset,
            expected: format!("nesting depth of at most {max_depth}"),
            found: format!("nesting depth {}", max_depth + 1),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parse error", self.dialect)?;
        if let Some(offset) = self.offset {
            write!(f, " at byte {offset}")?;
        }
        write!(f, ": expected {}, found {}", self.expected, self.found)
    }
}

impl std::error::Error for ParseError {}

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// A pipeline pass rejected the tree
    #[error("Pass '{pass}' failed: {message}")]
    Pass { pass: String, message: String },
}
