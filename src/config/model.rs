//! Config struct definition and default implementation.

use super::types::*;
use crate::strategy::PathStrategyKind;
use serde::{Deserialize, Serialize};

/// Configuration for a relocation run.
///
/// This struct represents the contents of `reloc.yaml`. Command-line flags
/// are layered on top of it by the commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelocConfig {
    // =========================================================================
    // Detection
    // =========================================================================
    /// Globs a raw path must match to be considered (empty means all).
    pub include_patterns: Vec<String>,

    /// Globs that exclude a raw path. Checked before includes.
    pub exclude_patterns: Vec<String>,

    // =========================================================================
    // Generation
    // =========================================================================
    /// Only rewrite images from these registries (empty means all).
    pub source_registries: Vec<String>,

    /// Never rewrite images from these registries.
    pub exclude_registries: Vec<String>,

    /// Abort on the first image that cannot be rewritten.
    pub strict: bool,

    pub path_strategy: PathStrategyKind,

    /// Fallback target for registries without a mapping entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_registry: Option<String>,

    /// Ordered `source -> target` rewrites; the first match wins.
    #[serde(deserialize_with = "deserialize_mappings")]
    pub registry_mappings: Vec<MappingEntry>,
}
