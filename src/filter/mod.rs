//! Include/exclude glob filtering of tree paths.
//!
//! Patterns use `.` as the hierarchy separator: `*` stays inside one segment,
//! `**` spans segments. Internally both patterns and paths are rewritten to
//! `/`-separated form so globset's separator handling applies.


use crate::error::{RelocError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::{Span, warn};

/// Include and exclude glob lists, evaluated against raw paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl FilterConfig {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }
}

/// Compiled path filter.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: GlobSet,
    include_active: bool,
    exclude: GlobSet,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl PathFilter {
    /// A filter that accepts every path.
    pub fn accept_all() -> Self {
        Self {
            include: GlobSet::empty(),
            include_active: false,
            exclude: GlobSet::empty(),
        }
    }

    /// Build a filter, skipping invalid patterns with a warning.
    pub fn new(config: &FilterConfig, span: &Span) -> Self {
        let (include, include_errors) = compile_globs(&config.include);
        let (exclude, exclude_errors) = compile_globs(&config.exclude);
        for err in include_errors.iter().chain(&exclude_errors) {
            warn!(parent: span, error = %err, "skipping invalid filter pattern");
        }

        Self {
            include,
            include_active: !config.include.is_empty(),
            exclude,
        }
    }

    /// Build a filter, failing on the first invalid pattern.
    pub fn compile(config: &FilterConfig) -> Result<Self> {
        let (include, include_errors) = compile_globs(&config.include);
        let (exclude, exclude_errors) = compile_globs(&config.exclude);
        if let Some(err) = include_errors.into_iter().chain(exclude_errors).next() {
            return Err(err);
        }

        Ok(Self {
            include,
            include_active: !config.include.is_empty(),
            exclude,
        })
    }

    /// Whether `raw_path` passes the filter. Excludes are checked first.
    pub fn matches(&self, raw_path: &str) -> bool {
        let path = to_glob_form(raw_path);
        if self.exclude.is_match(&path) {
            return false;
        }
        !self.include_active || self.include.is_match(&path)
    }
}

fn to_glob_form(dotted: &str) -> String {
    dotted.replace('.', "/")
}

/// Compile each pattern, collecting the ones that fail.
fn compile_globs(patterns: &[String]) -> (GlobSet, Vec<RelocError>) {
    let mut builder = GlobSetBuilder::new();
    let mut errors = Vec::new();

    for pattern in patterns {
        let glob = GlobBuilder::new(&to_glob_form(pattern))
            .literal_separator(true)
            .build();
        match glob {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => errors.push(RelocError::InvalidFilterPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            }),
        }
    }

    match builder.build() {
        Ok(set) => (set, errors),
        Err(e) => {
            errors.push(RelocError::InvalidFilterPattern {
                pattern: patterns.join(", "),
                reason: e.to_string(),
            });
            (GlobSet::empty(), errors)
        }
    }
}
