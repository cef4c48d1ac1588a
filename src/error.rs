//! Error types for reloc.
//!
//! Uses thiserror for derive macros. Most variants are recoverable inside the
//! pipeline (logged, pattern dropped); they only surface to the caller in
//! strict mode or from configuration and I/O boundaries.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for reloc operations.
#[derive(Error, Debug)]
pub enum RelocError {
    /// A string could not be parsed as an image reference.
    #[error("invalid image reference '{value}': {reason}")]
    UnparseableReference { value: String, reason: String },

    /// A path strategy could not produce a repository path.
    #[error("cannot generate repository path for '{reference}': {reason}")]
    PathGeneration { reference: String, reason: String },

    /// Detection reported structures that cannot be rewritten.
    #[error("strict mode: {count} unsupported structure(s) found: [{}]", .paths.join(", "))]
    UnsupportedStructure { count: usize, paths: Vec<String> },

    /// An include/exclude glob failed to compile.
    #[error("invalid filter pattern '{pattern}': {reason}")]
    InvalidFilterPattern { pattern: String, reason: String },

    /// A per-pattern failure promoted to a fatal error by strict mode.
    #[error("strict mode: failed to process image at '{path}': {source}")]
    Strict {
        path: String,
        #[source]
        source: Box<RelocError>,
    },

    /// A value could not be written into the override tree.
    #[error("cannot write override at '{path}': {reason}")]
    OverrideWrite { path: String, reason: String },

    /// Invalid configuration or command-line arguments.
    #[error("{0}")]
    Config(String),

    /// The configuration bundle could not be loaded.
    #[error("failed to load '{path}': {reason}")]
    Load { path: String, reason: String },

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl RelocError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RelocError::UnparseableReference { .. }
            | RelocError::PathGeneration { .. }
            | RelocError::Strict { .. }
            | RelocError::OverrideWrite { .. } => exit_codes::IMAGE_PROCESSING_FAILURE,
            RelocError::UnsupportedStructure { .. } => exit_codes::UNSUPPORTED_STRUCTURE,
            RelocError::InvalidFilterPattern { .. } | RelocError::Config(_) => {
                exit_codes::CONFIG_ERROR
            }
            RelocError::Load { .. } => exit_codes::BUNDLE_LOAD_FAILURE,
            RelocError::Io(_) => exit_codes::IO_FAILURE,
        }
    }

    /// Wrap a recoverable error as the strict-mode abort for `path`.
    pub fn strict(path: impl Into<String>, source: RelocError) -> Self {
        RelocError::Strict {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for reloc operations.
pub type Result<T> = std::result::Result<T, RelocError>;
