//! Container image reference parsing.
//!
//! Accepts `[domain/]path[:tag][@digest]` following the distribution
//! reference grammar. The repository is kept exactly as written; Docker Hub
//! `library/` expansion is left to the path strategies.

#[cfg(test)]
mod tests;

use crate::error::{RelocError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Registry assumed when a reference names no domain.
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Tag assumed when a reference carries neither tag nor digest.
pub const DEFAULT_TAG: &str = "latest";

static PATH_COMPONENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*$").expect("Invalid path component regex")
});

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)(?:\.(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?))*(?::[0-9]+)?$",
    )
    .expect("Invalid domain regex")
});

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w][\w.-]{0,127}$").expect("Invalid tag regex"));

static DIGEST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:[.+_-][a-z0-9]+)*:[a-fA-F0-9]{32,}$").expect("Invalid digest regex")
});

/// A parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Registry host, possibly with a port. Defaults to `docker.io`.
    pub registry: String,
    pub repository: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
    /// True when the registry was written out rather than defaulted.
    pub explicit_registry: bool,
}

impl Reference {
    /// Assemble a reference from already-separated parts.
    ///
    /// Without a registry, a leading domain in `repository` is split off
    /// (`quay.io/org/app`); otherwise the registry is `docker.io`. A missing
    /// tag with no digest becomes `latest`.
    pub fn from_parts(
        registry: Option<&str>,
        repository: &str,
        tag: Option<&str>,
        digest: Option<&str>,
    ) -> Self {
        let (registry, repository) = match registry.map(str::trim).filter(|r| !r.is_empty()) {
            Some(registry) => (Some(registry), repository),
            None => split_domain(repository),
        };
        let digest = digest.filter(|d| !d.is_empty()).map(str::to_string);
        let tag = match tag.filter(|t| !t.is_empty()) {
            Some(tag) => Some(tag.to_string()),
            None if digest.is_none() => Some(DEFAULT_TAG.to_string()),
            None => None,
        };

        Self {
            registry: registry.unwrap_or(DEFAULT_REGISTRY).to_string(),
            repository: repository.to_string(),
            tag,
            digest,
            explicit_registry: registry.is_some(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry, self.repository)?;
        if let Some(digest) = &self.digest {
            write!(f, "@{}", digest)
        } else if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)
        } else {
            Ok(())
        }
    }
}

/// Parse an image reference string.
pub fn parse_image_reference(value: &str) -> Result<Reference> {
    let fail = |reason: &str| RelocError::UnparseableReference {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(fail("empty reference"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(fail("contains whitespace"));
    }

    let (name_and_tag, digest) = match value.split_once('@') {
        Some((name, digest)) => {
            if !DIGEST_REGEX.is_match(digest) {
                return Err(fail("invalid digest"));
            }
            (name, Some(digest))
        }
        None => (value, None),
    };

    // A tag colon must come after the last slash; earlier colons are ports.
    let last_slash = name_and_tag.rfind('/').map_or(0, |i| i + 1);
    let (name, tag) = match name_and_tag[last_slash..].find(':') {
        Some(i) => {
            let split = last_slash + i;
            let tag = &name_and_tag[split + 1..];
            if tag.is_empty() {
                return Err(fail("trailing ':' without tag"));
            }
            if !TAG_REGEX.is_match(tag) {
                return Err(fail("invalid tag"));
            }
            (&name_and_tag[..split], Some(tag))
        }
        None => (name_and_tag, None),
    };

    let (domain, path) = split_domain(name);
    if let Some(domain) = domain
        && !DOMAIN_REGEX.is_match(domain)
    {
        return Err(fail("invalid registry domain"));
    }

    if path.is_empty() {
        return Err(fail("empty repository"));
    }
    for component in path.split('/') {
        if component.is_empty() {
            return Err(fail("empty path component"));
        }
        if !PATH_COMPONENT_REGEX.is_match(component) {
            return Err(fail("invalid repository path component"));
        }
    }

    Ok(Reference::from_parts(domain, path, tag, digest))
}

/// Split off a leading registry domain when the first component looks like one.
fn split_domain(name: &str) -> (Option<&str>, &str) {
    match name.split_once('/') {
        Some((first, rest))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            (Some(first), rest)
        }
        _ => (None, name),
    }
}
