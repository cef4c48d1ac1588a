//! Config loading, validation, and conversion into runtime components.

use super::model::RelocConfig;
use crate::error::{RelocError, Result};
use crate::filter::{FilterConfig, PathFilter};
use crate::registry::{RegistryMapping, RegistryResolver};
use std::path::Path;

impl RelocConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            RelocError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RelocConfig = serde_yaml::from_str(yaml)
            .map_err(|e| RelocError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RelocError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Rejects mappings with an empty source or target, targets containing
    /// whitespace, and filter globs that do not compile.
    pub fn validate(&self) -> Result<()> {
        for (i, entry) in self.registry_mappings.iter().enumerate() {
            if entry.source.trim().is_empty() {
                return Err(RelocError::Config(format!(
                    "config validation failed: registry_mappings[{}] has an empty source",
                    i
                )));
            }
            if entry.target.trim().is_empty() {
                return Err(RelocError::Config(format!(
                    "config validation failed: registry_mappings[{}] ('{}') has an empty target",
                    i, entry.source
                )));
            }
            check_target(&entry.target, &format!("registry_mappings[{}].target", i))?;
        }

        if let Some(target) = &self.target_registry {
            check_target(target, "target_registry")?;
        }

        PathFilter::compile(&self.filter_config()).map(|_| ())
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::new(self.include_patterns.clone(), self.exclude_patterns.clone())
    }

    /// Resolver over the enabled mapping entries, in file order.
    pub fn resolver(&self) -> RegistryResolver {
        let mappings = self
            .registry_mappings
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| RegistryMapping::new(entry.source.trim(), entry.target.trim()))
            .collect();
        RegistryResolver::new(mappings).with_default_target(self.target_registry.clone())
    }
}

fn check_target(target: &str, field: &str) -> Result<()> {
    if target.trim().chars().any(char::is_whitespace) {
        return Err(RelocError::Config(format!(
            "config validation failed: {} '{}' must not contain whitespace",
            field, target
        )));
    }
    Ok(())
}
