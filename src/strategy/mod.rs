//! Repository path rewrite strategies.
//!
//! A strategy maps a source reference plus its resolved target to the new
//! repository path. Strategies are pure; tag and digest are never part of the
//! returned path.


use crate::error::{RelocError, Result};
use crate::reference::Reference;
use crate::registry::{ResolvedTarget, is_docker_hub};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Computes the rewritten repository path for a reference.
pub trait PathStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn generate_path(&self, reference: &Reference, target: &ResolvedTarget) -> Result<String>;
}

/// `namespace/sanitizedregistry/repository`, dropping the registry token
/// when the target came from an explicit mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixSourceRegistry;

impl PathStrategy for PrefixSourceRegistry {
    fn name(&self) -> &'static str {
        "prefix-source-registry"
    }

    fn generate_path(&self, reference: &Reference, target: &ResolvedTarget) -> Result<String> {
        let repository = source_repository(reference)?;
        let registry_token = if target.is_mapped() {
            String::new()
        } else {
            sanitize_registry(&reference.registry)
        };

        Ok(join_path(&[
            target.namespace().unwrap_or_default(),
            &registry_token,
            &repository,
        ]))
    }
}

/// `namespace/sanitizedregistry-repo-with-dashes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flat;

impl PathStrategy for Flat {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn generate_path(&self, reference: &Reference, target: &ResolvedTarget) -> Result<String> {
        let repository = source_repository(reference)?;
        let registry_token = sanitize_registry(&reference.registry);
        let flattened = repository.replace('/', "-");
        let leaf = if registry_token.is_empty() {
            flattened
        } else {
            format!("{}-{}", registry_token, flattened)
        };

        Ok(join_path(&[target.namespace().unwrap_or_default(), &leaf]))
    }
}

/// Strategy selector used by configuration and the CLI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PathStrategyKind {
    #[default]
    PrefixSourceRegistry,
    Flat,
}

impl PathStrategyKind {
    pub fn strategy(self) -> &'static dyn PathStrategy {
        match self {
            PathStrategyKind::PrefixSourceRegistry => &PrefixSourceRegistry,
            PathStrategyKind::Flat => &Flat,
        }
    }
}

impl fmt::Display for PathStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

impl FromStr for PathStrategyKind {
    type Err = RelocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "prefix-source-registry" => Ok(PathStrategyKind::PrefixSourceRegistry),
            "flat" => Ok(PathStrategyKind::Flat),
            other => Err(RelocError::Config(format!(
                "unknown path strategy '{}' (expected 'prefix-source-registry' or 'flat')",
                other
            ))),
        }
    }
}

/// Make a registry hostname usable as a single path segment.
///
/// Docker Hub becomes `dockerio`, a numeric port is dropped, and everything
/// outside `[a-z0-9_-]` is removed.
pub fn sanitize_registry(registry: &str) -> String {
    if is_docker_hub(registry) {
        return "dockerio".to_string();
    }

    let host = match registry.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => registry,
    };

    host.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// The source repository with a redundant registry prefix stripped and the
/// Docker Hub `library/` namespace filled in.
fn source_repository(reference: &Reference) -> Result<String> {
    let fail = |reason: &str| RelocError::PathGeneration {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };

    let mut repository = reference.repository.as_str();
    if !reference.registry.is_empty()
        && let Some(rest) = repository.strip_prefix(&format!("{}/", reference.registry))
    {
        repository = rest;
    }

    if repository.is_empty() {
        return Err(fail("repository is empty"));
    }
    if repository.chars().any(char::is_whitespace) {
        return Err(fail("repository contains whitespace"));
    }
    for segment in repository.split('/') {
        if segment.is_empty() {
            return Err(fail("repository contains an empty path segment"));
        }
        if segment == ".." {
            return Err(fail("repository contains '..'"));
        }
    }

    if !repository.contains('/') && is_docker_hub(&reference.registry) {
        Ok(format!("library/{}", repository))
    } else {
        Ok(repository.to_string())
    }
}

fn join_path(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
