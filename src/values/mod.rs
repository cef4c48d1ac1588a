//! Configuration value model.
//!
//! `ConfigValue` is the tagged tree that both the input configuration and the
//! generated override tree are expressed in. Input trees are decoded from
//! YAML or JSON once and never mutated; override trees are built with the
//! path-addressed writes in [`tree`].

mod path;
mod tree;


pub use path::{Segment, TreePath};

use crate::error::{RelocError, Result};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{}", i),
            // Debug keeps the fractional part, so `8.0` stays `8.0`.
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => f.write_str("null"),
        }
    }
}

/// A node in a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Mapping(BTreeMap<String, ConfigValue>),
    Sequence(Vec<ConfigValue>),
    Scalar(Scalar),
}

impl Default for ConfigValue {
    fn default() -> Self {
        ConfigValue::Mapping(BTreeMap::new())
    }
}

impl ConfigValue {
    /// An empty mapping.
    pub fn mapping() -> Self {
        ConfigValue::Mapping(BTreeMap::new())
    }

    pub fn string(s: impl Into<String>) -> Self {
        ConfigValue::Scalar(Scalar::String(s.into()))
    }

    pub fn null() -> Self {
        ConfigValue::Scalar(Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Scalar(Scalar::Null))
    }

    /// Look up a direct child of a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Parse a YAML document into a tree.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)
            .map_err(|e| RelocError::Config(format!("failed to parse YAML: {}", e)))?;
        Ok(Self::from(value))
    }

    /// Serialize the tree as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RelocError::Io(format!("failed to serialize overrides to YAML: {}", e)))
    }

    /// Serialize the tree as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RelocError::Io(format!("failed to serialize overrides to JSON: {}", e)))
    }
}

impl From<serde_yaml::Value> for ConfigValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => ConfigValue::null(),
            Value::Bool(b) => ConfigValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => ConfigValue::Scalar(yaml_number(&n)),
            Value::String(s) => ConfigValue::string(s),
            Value::Sequence(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            Value::Mapping(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), ConfigValue::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => ConfigValue::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ConfigValue::null(),
            Value::Bool(b) => ConfigValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => ConfigValue::Scalar(match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => ConfigValue::string(s),
            Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            Value::Object(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ConfigValue::from(v)))
                    .collect(),
            ),
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Mapping keys are strings in the tree; other key types are stringified.
fn yaml_key(key: serde_yaml::Value) -> String {
    match ConfigValue::from(key) {
        ConfigValue::Scalar(scalar) => scalar.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Null => serializer.serialize_unit(),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            ConfigValue::Sequence(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            ConfigValue::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}
