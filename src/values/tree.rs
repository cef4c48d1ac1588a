//! Path-addressed reads and writes on a `ConfigValue` tree.

use super::{ConfigValue, Segment, TreePath};
use crate::error::{RelocError, Result};

impl ConfigValue {
    /// Read the node at `path`, if every step exists.
    pub fn get_path(&self, path: &TreePath) -> Option<&ConfigValue> {
        let mut node = self;
        for segment in path.segments() {
            node = match (node, segment) {
                (ConfigValue::Mapping(map), Segment::Key(key)) => map.get(key)?,
                (ConfigValue::Sequence(items), Segment::Index(idx)) => items.get(*idx)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Write `value` at `path`, creating intermediate containers.
    ///
    /// When both the existing node and `value` are mappings they are deep
    /// merged; any other collision is overwritten.
    pub fn set_path(&mut self, path: &TreePath, value: ConfigValue) -> Result<()> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            return Err(write_error(path, "empty path"));
        };

        let mut node = self;
        for (i, segment) in parents.iter().enumerate() {
            let next_is_index = matches!(segments[i + 1], Segment::Index(_));
            node = node
                .child_mut(segment, next_is_index)
                .ok_or_else(|| write_error(path, "cannot traverse through a scalar value"))?;
        }

        node.put(last, value)
            .ok_or_else(|| write_error(path, "parent is not a container"))
    }

    /// Remove the node at `path` and prune ancestors left empty.
    ///
    /// Returns whether anything was removed. Sequence elements are nulled
    /// rather than shifted so sibling indices stay stable.
    pub fn remove_path(&mut self, path: &TreePath) -> bool {
        remove_segments(self, path.segments())
    }

    /// Deep merge `other` into `self`.
    pub fn merge(&mut self, other: ConfigValue) {
        match (self, other) {
            (ConfigValue::Mapping(dst), ConfigValue::Mapping(src)) => {
                for (key, value) in src {
                    match dst.get_mut(&key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            dst.insert(key, value);
                        }
                    }
                }
            }
            (dst, src) => *dst = src,
        }
    }

    fn child_mut(&mut self, segment: &Segment, next_is_index: bool) -> Option<&mut ConfigValue> {
        match segment {
            Segment::Key(key) => {
                if self.is_null() {
                    *self = ConfigValue::mapping();
                }
                let ConfigValue::Mapping(map) = self else {
                    return None;
                };
                let child = map
                    .entry(key.clone())
                    .or_insert_with(|| empty_container(next_is_index));
                if child.is_null() {
                    *child = empty_container(next_is_index);
                }
                Some(child)
            }
            Segment::Index(idx) => {
                if self.is_null() {
                    *self = ConfigValue::Sequence(Vec::new());
                }
                let ConfigValue::Sequence(items) = self else {
                    return None;
                };
                if items.len() <= *idx {
                    items.resize(*idx + 1, ConfigValue::null());
                }
                let child = &mut items[*idx];
                if child.is_null() {
                    *child = empty_container(next_is_index);
                }
                Some(child)
            }
        }
    }

    fn put(&mut self, segment: &Segment, value: ConfigValue) -> Option<()> {
        let slot = self.child_mut(segment, false)?;
        if slot.as_mapping().is_some_and(|m| m.is_empty()) {
            *slot = value;
        } else {
            slot.merge(value);
        }
        Some(())
    }

    fn is_prunable(&self) -> bool {
        match self {
            ConfigValue::Mapping(map) => map.is_empty(),
            ConfigValue::Sequence(items) => items.iter().all(ConfigValue::is_null),
            ConfigValue::Scalar(_) => false,
        }
    }
}

fn empty_container(index: bool) -> ConfigValue {
    if index {
        ConfigValue::Sequence(Vec::new())
    } else {
        ConfigValue::mapping()
    }
}

fn write_error(path: &TreePath, reason: &str) -> RelocError {
    RelocError::OverrideWrite {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn remove_segments(node: &mut ConfigValue, segments: &[Segment]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };

    match (node, first) {
        (ConfigValue::Mapping(map), Segment::Key(key)) => {
            if rest.is_empty() {
                return map.remove(key).is_some();
            }
            let Some(child) = map.get_mut(key) else {
                return false;
            };
            let removed = remove_segments(child, rest);
            if removed && child.is_prunable() {
                map.remove(key);
            }
            removed
        }
        (ConfigValue::Sequence(items), Segment::Index(idx)) => {
            let Some(child) = items.get_mut(*idx) else {
                return false;
            };
            if rest.is_empty() {
                let existed = !child.is_null();
                *child = ConfigValue::null();
                return existed;
            }
            let removed = remove_segments(child, rest);
            if removed && child.is_prunable() {
                *child = ConfigValue::null();
            }
            removed
        }
        _ => false,
    }
}
