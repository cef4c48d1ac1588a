//! Configuration types and defaults for reloc.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// File name looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "reloc.yaml";

/// One registry mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub source: String,
    pub target: String,
    /// Disabled entries are kept in the file but never matched.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl MappingEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            enabled: true,
        }
    }
}

/// Accepted shapes of `registry_mappings`.
#[derive(Deserialize)]
#[serde(untagged)]
enum MappingsRepr {
    List(Vec<MappingEntry>),
    /// Legacy `source: target` map.
    Legacy(OrderedPairs),
}

/// `source: target` pairs in the order they were written.
struct OrderedPairs(Vec<(String, String)>);

impl<'de> Deserialize<'de> for OrderedPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = OrderedPairs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of source registry to target registry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<OrderedPairs, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((source, target)) = access.next_entry::<String, String>()? {
                    pairs.push((source, target));
                }
                Ok(OrderedPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

/// Deserialize either the entry list or the legacy flat map.
pub(super) fn deserialize_mappings<'de, D>(deserializer: D) -> Result<Vec<MappingEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<MappingsRepr>::deserialize(deserializer)?;
    Ok(match repr {
        Some(MappingsRepr::List(entries)) => entries,
        Some(MappingsRepr::Legacy(OrderedPairs(pairs))) => pairs
            .into_iter()
            .map(|(source, target)| MappingEntry::new(source, target))
            .collect(),
        None => Vec::new(),
    })
}

pub fn default_true() -> bool {
    true
}
