//! Image reference detection over configuration trees.
//!
//! The detector walks a tree, decides which strings and small maps are image
//! references, and reports them as [`ImagePattern`]s tagged with the
//! sub-document they came from. Detection never fails: anything that does
//! not look like an image is left out. Values the generator cannot rewrite
//! are additionally reported as [`UnsupportedStructure`]s.

mod aggregate;
mod walk;


pub use aggregate::aggregate;

use crate::filter::{FilterConfig, PathFilter};
use crate::values::{ConfigValue, TreePath};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{Span, debug};

/// Origin of values that belong to the root document.
pub const ROOT_ORIGIN: &str = ".";

/// Root-level key to origin alias, for values merged in from sub-documents.
pub type OriginMap = BTreeMap<String, String>;

/// How an image reference was expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    String,
    Map,
    Template,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PatternType::String => "string",
            PatternType::Map => "map",
            PatternType::Template => "template",
        })
    }
}

/// Decomposed fields of a map-style image reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImageStructure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Text after an `@` found inside the `tag` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_suffix: Option<String>,
}

/// One detected image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePattern {
    /// Location with the origin prefix applied.
    pub path: String,
    /// Location relative to the value's own document.
    pub raw_path: String,
    pub origin: String,
    /// Exact tree location, used for writing overrides.
    #[serde(skip)]
    pub location: TreePath,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<ImageStructure>,
    pub count: usize,
}

/// Why a value was reported as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsupportedKind {
    /// A string carrying `{{ ... }}` template markers.
    Template,
    /// A map whose `repository` is not a string.
    RepositoryNotString,
    /// A map `tag` with an `@` suffix.
    DigestInTag,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnsupportedKind::Template => "template",
            UnsupportedKind::RepositoryNotString => "repository-not-string",
            UnsupportedKind::DigestInTag => "digest-in-tag",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsupportedStructure {
    pub path: String,
    pub kind: UnsupportedKind,
    pub detail: String,
}

/// Aggregated detection result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub patterns: Vec<ImagePattern>,
    pub unsupported: Vec<UnsupportedStructure>,
}

/// Filter and log span used during a detection run.
#[derive(Debug, Clone)]
pub struct DetectContext {
    pub filter: PathFilter,
    pub span: Span,
}

impl Default for DetectContext {
    fn default() -> Self {
        Self {
            filter: PathFilter::accept_all(),
            span: Span::none(),
        }
    }
}

impl DetectContext {
    pub fn new(filter: PathFilter, span: Span) -> Self {
        Self { filter, span }
    }

    /// Build a context from an optional filter config; `None` accepts all paths.
    pub fn from_config(config: Option<&FilterConfig>, span: Span) -> Self {
        let filter = config
            .map(|c| PathFilter::new(c, &span))
            .unwrap_or_default();
        Self { filter, span }
    }
}

/// Walks configuration trees looking for image references.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    context: DetectContext,
}

impl Detector {
    pub fn new(context: DetectContext) -> Self {
        Self { context }
    }

    /// Raw, unaggregated findings.
    pub fn detect(&self, tree: &ConfigValue, origins: &OriginMap) -> Vec<ImagePattern> {
        walk::walk(tree, origins, &self.context).patterns
    }

    /// Detect, aggregate, and sort by path then value.
    pub fn analyze(&self, tree: &ConfigValue, origins: &OriginMap) -> Analysis {
        let raw = walk::walk(tree, origins, &self.context);
        let raw_count = raw.patterns.len();

        let mut patterns = aggregate(raw.patterns);
        patterns.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.value.cmp(&b.value)));

        let mut unsupported = raw.unsupported;
        unsupported.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.kind.cmp(&b.kind)));
        unsupported.dedup_by(|a, b| a.path == b.path && a.kind == b.kind);

        debug!(
            parent: &self.context.span,
            raw = raw_count,
            aggregated = patterns.len(),
            unsupported = unsupported.len(),
            "analysis complete"
        );

        Analysis {
            patterns,
            unsupported,
        }
    }
}

/// Join a raw path with its origin.
pub(crate) fn origin_path(origin: &str, raw_path: &str) -> String {
    if origin == ROOT_ORIGIN || origin.is_empty() {
        raw_path.to_string()
    } else if raw_path.is_empty() {
        origin.to_string()
    } else {
        format!("{}.{}", origin, raw_path)
    }
}
