//! Registry hostname normalization and target lookup.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

/// Hostnames that all mean Docker Hub.
const DOCKER_HUB_ALIASES: &[&str] = &["docker.io", "index.docker.io", "registry.hub.docker.com"];

pub const DOCKER_HUB: &str = "docker.io";

/// Canonical form of a registry hostname used for comparisons.
///
/// Trims whitespace, lower-cases, drops a trailing `/`, and collapses the
/// Docker Hub aliases (including the empty registry) to `docker.io`.
pub fn normalize_registry(registry: &str) -> String {
    let normalized = registry.trim().trim_end_matches('/').to_ascii_lowercase();
    if normalized.is_empty() || DOCKER_HUB_ALIASES.contains(&normalized.as_str()) {
        DOCKER_HUB.to_string()
    } else {
        normalized
    }
}

pub fn is_docker_hub(registry: &str) -> bool {
    normalize_registry(registry) == DOCKER_HUB
}

/// One `source -> target` rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMapping {
    pub source: String,
    pub target: String,
}

impl RegistryMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Where a source registry should be rewritten to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// An explicit mapping entry matched.
    Mapped(String),
    /// No entry matched; the configured fallback target applies.
    Default(String),
    Unmapped,
}

impl ResolvedTarget {
    pub fn target(&self) -> Option<&str> {
        match self {
            ResolvedTarget::Mapped(t) | ResolvedTarget::Default(t) => Some(t),
            ResolvedTarget::Unmapped => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, ResolvedTarget::Mapped(_))
    }

    /// Registry host of the target, i.e. everything before the first `/`.
    pub fn host(&self) -> Option<&str> {
        self.target().map(|t| t.split_once('/').map_or(t, |(host, _)| host))
    }

    /// Repository namespace carried by the target after its host, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.target()
            .and_then(|t| t.split_once('/'))
            .map(|(_, ns)| ns)
            .filter(|ns| !ns.is_empty())
    }
}

/// Ordered mapping table with an optional fallback target.
#[derive(Debug, Clone, Default)]
pub struct RegistryResolver {
    mappings: Vec<RegistryMapping>,
    default_target: Option<String>,
}

impl RegistryResolver {
    pub fn new(mappings: Vec<RegistryMapping>) -> Self {
        Self {
            mappings,
            default_target: None,
        }
    }

    /// Use `target` when no mapping entry matches.
    pub fn with_default_target(mut self, target: Option<String>) -> Self {
        self.default_target = target
            .map(|t| clean_target(&t))
            .filter(|t| !t.is_empty());
        self
    }

    /// Mapped target for `source`, or an empty string when no entry matches.
    pub fn resolve(&self, source: &str) -> String {
        let key = normalize_registry(source);
        self.mappings
            .iter()
            .find(|m| normalize_registry(&m.source) == key)
            .map(|m| clean_target(&m.target))
            .unwrap_or_default()
    }

    /// Mapped target, falling back to the default target.
    pub fn resolve_target(&self, source: &str) -> ResolvedTarget {
        let mapped = self.resolve(source);
        if !mapped.is_empty() {
            return ResolvedTarget::Mapped(mapped);
        }
        match &self.default_target {
            Some(target) => ResolvedTarget::Default(target.clone()),
            None => ResolvedTarget::Unmapped,
        }
    }
}

fn clean_target(target: &str) -> String {
    target.trim().trim_end_matches('/').to_string()
}
