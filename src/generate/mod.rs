//! Override tree generation.
//!
//! Each detected pattern is turned into an override block
//! (`registry`/`repository`/`tag|digest`) written at the pattern's location.
//! Patterns are processed in parallel; the tree sits behind a single mutex
//! and the kube-state-metrics pass runs after all writes have joined.

mod ksm;


pub use ksm::KSM_KEY;

use crate::detect::{Analysis, ImagePattern, PatternType};
use crate::error::{RelocError, Result};
use crate::reference::{DEFAULT_TAG, Reference, parse_image_reference};
use crate::registry::{RegistryResolver, normalize_registry};
use crate::strategy::PathStrategy;
use crate::values::{ConfigValue, Segment, TreePath};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{Span, debug, info, warn};

/// Trailing path segments that name a field of an image block.
const SENTINEL_KEYS: &[&str] = &["repository", "tag", "registry", "digest"];

/// A pattern that could not be rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationFailure {
    pub path: String,
    pub reason: String,
}

/// Counts from one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: Vec<GenerationFailure>,
    /// Path of the kube-state-metrics image that was relocated, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ksm_relocated: Option<String>,
}

/// Final override tree plus its report.
#[derive(Debug, Clone)]
pub struct Generated {
    pub overrides: ConfigValue,
    pub report: GenerationReport,
}

enum Outcome {
    Written,
    Skipped,
    Failed(String, RelocError),
}

/// Converts detected patterns into an override tree.
pub struct Generator<'a> {
    strategy: &'a dyn PathStrategy,
    resolver: RegistryResolver,
    source_registries: Vec<String>,
    exclude_registries: Vec<String>,
    strict: bool,
    span: Span,
}

impl<'a> Generator<'a> {
    pub fn new(strategy: &'a dyn PathStrategy, resolver: RegistryResolver) -> Self {
        Self {
            strategy,
            resolver,
            source_registries: Vec::new(),
            exclude_registries: Vec::new(),
            strict: false,
            span: Span::none(),
        }
    }

    /// Only rewrite references from these registries. Empty means all.
    pub fn source_registries(mut self, registries: Vec<String>) -> Self {
        self.source_registries = registries.iter().map(|r| normalize_registry(r)).collect();
        self
    }

    /// Never rewrite references from these registries.
    pub fn exclude_registries(mut self, registries: Vec<String>) -> Self {
        self.exclude_registries = registries.iter().map(|r| normalize_registry(r)).collect();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Generate overrides for an analysis.
    ///
    /// In strict mode any reported unsupported structure fails the run
    /// before anything is written.
    pub fn generate(&self, analysis: &Analysis) -> Result<Generated> {
        if self.strict && !analysis.unsupported.is_empty() {
            let paths: Vec<String> = analysis
                .unsupported
                .iter()
                .map(|u| format!("{} ({})", u.path, u.kind))
                .collect();
            return Err(RelocError::UnsupportedStructure {
                count: paths.len(),
                paths,
            });
        }
        self.generate_patterns(&analysis.patterns)
    }

    /// Generate overrides for a pattern list, then apply the
    /// kube-state-metrics relocation.
    pub fn generate_patterns(&self, patterns: &[ImagePattern]) -> Result<Generated> {
        let mut ordered: Vec<&ImagePattern> = patterns.iter().collect();
        ordered.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.value.cmp(&b.value)));

        let tree = Mutex::new(ConfigValue::mapping());
        let outcomes: Vec<Outcome> = ordered
            .par_iter()
            .map(|pattern| self.process(pattern, &tree))
            .collect();

        let mut report = GenerationReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Written => report.processed += 1,
                Outcome::Skipped => report.skipped += 1,
                Outcome::Failed(path, err) => {
                    if self.strict {
                        return Err(RelocError::strict(path, err));
                    }
                    warn!(parent: &self.span, path = %path, error = %err, "skipping image");
                    report.failed.push(GenerationFailure {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let mut overrides = tree.into_inner();
        report.ksm_relocated = ksm::normalize(self, &ordered, &mut overrides)?;

        info!(
            parent: &self.span,
            processed = report.processed,
            skipped = report.skipped,
            failed = report.failed.len(),
            "override generation finished"
        );

        Ok(Generated { overrides, report })
    }

    fn process(&self, pattern: &ImagePattern, tree: &Mutex<ConfigValue>) -> Outcome {
        match self.override_block(pattern) {
            Ok(Some((dest, block))) => match tree.lock().set_path(&dest, block) {
                Ok(()) => Outcome::Written,
                Err(e) => Outcome::Failed(pattern.path.clone(), e),
            },
            Ok(None) => Outcome::Skipped,
            Err(e) => Outcome::Failed(pattern.path.clone(), e),
        }
    }

    /// Destination path and override block for a pattern.
    ///
    /// `Ok(None)` means the pattern's registry is not eligible for rewriting.
    fn override_block(&self, pattern: &ImagePattern) -> Result<Option<(TreePath, ConfigValue)>> {
        let reference = reference_for(pattern)?;

        if !self.is_eligible(&reference.registry) {
            debug!(
                parent: &self.span,
                path = %pattern.path,
                registry = %reference.registry,
                "registry not selected for rewriting"
            );
            return Ok(None);
        }

        let target = self.resolver.resolve_target(&reference.registry);
        let repository = self.strategy.generate_path(&reference, &target)?;

        let mut block = BTreeMap::new();
        block.insert("repository".to_string(), ConfigValue::string(repository));

        // Without a target, only a registry the source actually wrote is kept.
        let registry = match target.host() {
            Some(host) => Some(host.to_string()),
            None if reference.explicit_registry => Some(reference.registry.clone()),
            None => None,
        };
        if let Some(registry) = registry {
            block.insert("registry".to_string(), ConfigValue::string(registry));
        }

        if let Some(digest) = &reference.digest {
            block.insert("digest".to_string(), ConfigValue::string(digest.as_str()));
        } else if let Some(tag) = &reference.tag {
            // Map blocks leave a default tag to the consumer's own default.
            let defers_to_default = pattern.pattern_type == PatternType::Map && tag == DEFAULT_TAG;
            if !defers_to_default {
                block.insert("tag".to_string(), ConfigValue::string(tag.as_str()));
            }
        }

        Ok(Some((destination(&pattern.location), ConfigValue::Mapping(block))))
    }

    fn is_eligible(&self, registry: &str) -> bool {
        let registry = normalize_registry(registry);
        if self.exclude_registries.contains(&registry) {
            return false;
        }
        self.source_registries.is_empty() || self.source_registries.contains(&registry)
    }
}

/// Rebuild the reference a pattern describes.
fn reference_for(pattern: &ImagePattern) -> Result<Reference> {
    match (pattern.pattern_type, &pattern.structure) {
        (PatternType::Map, Some(s)) => Ok(Reference::from_parts(
            s.registry.as_deref(),
            &s.repository,
            s.tag.as_deref(),
            s.digest.as_deref(),
        )),
        (PatternType::Map, None) => Err(RelocError::UnparseableReference {
            value: pattern.value.clone(),
            reason: "map pattern has no decomposed structure".to_string(),
        }),
        (PatternType::String | PatternType::Template, _) => parse_image_reference(&pattern.value),
    }
}

/// Override location for a pattern, minus a trailing field name.
fn destination(location: &TreePath) -> TreePath {
    let mut dest = location.clone();
    if let Some(Segment::Key(last)) = dest.last()
        && SENTINEL_KEYS.contains(&last.as_str())
    {
        dest.pop();
    }
    dest
}
