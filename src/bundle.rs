//! Loading of configuration bundles from disk.
//!
//! A bundle directory holds a primary `values.yaml` and optional
//! sub-documents at `charts/<alias>/values.yaml`. Sub-document defaults are
//! placed under their alias with the primary document's values merged over
//! them, and each alias is recorded as an origin.

use crate::detect::OriginMap;
use crate::error::{RelocError, Result};
use crate::values::ConfigValue;
use std::fs;
use std::path::Path;

const VALUES_FILE: &str = "values.yaml";
const SUBDOCUMENT_DIR: &str = "charts";

/// Merged tree plus the origin of each sub-document key.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub values: ConfigValue,
    pub origins: OriginMap,
}

/// Load a bundle directory, or a single YAML file as a root-only tree.
pub fn load_bundle(path: &Path) -> Result<Bundle> {
    if path.is_file() {
        return Ok(Bundle {
            values: read_document(path)?,
            origins: OriginMap::new(),
        });
    }
    if !path.is_dir() {
        return Err(RelocError::Load {
            path: path.display().to_string(),
            reason: "no such file or directory".to_string(),
        });
    }

    let primary_path = path.join(VALUES_FILE);
    let primary = if primary_path.is_file() {
        read_document(&primary_path)?
    } else {
        ConfigValue::mapping()
    };
    let ConfigValue::Mapping(mut root) = primary else {
        return Err(RelocError::Load {
            path: primary_path.display().to_string(),
            reason: "top-level document must be a mapping".to_string(),
        });
    };

    let mut origins = OriginMap::new();
    for alias in subdocument_aliases(&path.join(SUBDOCUMENT_DIR))? {
        let sub_path = path.join(SUBDOCUMENT_DIR).join(&alias).join(VALUES_FILE);
        let mut merged = read_document(&sub_path)?;
        if let Some(parent_values) = root.remove(&alias) {
            merged.merge(parent_values);
        }
        root.insert(alias.clone(), merged);
        origins.insert(alias.clone(), alias);
    }

    Ok(Bundle {
        values: ConfigValue::Mapping(root),
        origins,
    })
}

/// Sorted names of sub-document directories that carry a values file.
fn subdocument_aliases(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| load_error(dir, e))?;
    let mut aliases = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| load_error(dir, e))?;
        let entry_path = entry.path();
        if entry_path.join(VALUES_FILE).is_file()
            && let Some(name) = entry_path.file_name().and_then(|n| n.to_str())
        {
            aliases.push(name.to_string());
        }
    }
    aliases.sort();
    Ok(aliases)
}

fn read_document(path: &Path) -> Result<ConfigValue> {
    let contents = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
    if contents.trim().is_empty() {
        return Ok(ConfigValue::mapping());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(|e| load_error(path, e))?;
    match ConfigValue::from(value) {
        doc if doc.is_null() => Ok(ConfigValue::mapping()),
        doc => Ok(doc),
    }
}

fn load_error(path: &Path, e: impl std::fmt::Display) -> RelocError {
    RelocError::Load {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
