//! Iterative depth-first walk that classifies tree nodes.

use super::{
    DetectContext, ImagePattern, ImageStructure, OriginMap, PatternType, ROOT_ORIGIN,
    UnsupportedKind, UnsupportedStructure, origin_path,
};
use crate::reference::{DEFAULT_TAG, parse_image_reference};
use crate::values::{ConfigValue, Scalar, TreePath};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Raw walk output.
pub(super) struct Findings {
    pub patterns: Vec<ImagePattern>,
    pub unsupported: Vec<UnsupportedStructure>,
}

struct Frame<'a> {
    node: &'a ConfigValue,
    raw_path: String,
    origin: &'a str,
    /// Segments from the tree root; keys may themselves contain dots.
    location: TreePath,
}

impl Frame<'_> {
    fn path(&self) -> String {
        origin_path(self.origin, &self.raw_path)
    }
}

pub(super) fn walk(tree: &ConfigValue, origins: &OriginMap, ctx: &DetectContext) -> Findings {
    let mut out = Findings {
        patterns: Vec::new(),
        unsupported: Vec::new(),
    };
    let mut stack = vec![Frame {
        node: tree,
        raw_path: String::new(),
        origin: ROOT_ORIGIN,
        location: TreePath::default(),
    }];

    while let Some(frame) = stack.pop() {
        match frame.node {
            ConfigValue::Mapping(map) => {
                match map.get("repository") {
                    Some(ConfigValue::Scalar(Scalar::String(repository))) => {
                        // The whole map is one candidate; its children are not visited.
                        out.image_map(&frame, map, repository, ctx);
                        continue;
                    }
                    Some(other) => out.repository_not_string(&frame, other, ctx),
                    None => {}
                }

                // Reverse so the stack pops children in key order.
                for (key, child) in map.iter().rev() {
                    stack.push(child_frame(&frame, key, child, origins));
                }
            }
            ConfigValue::Sequence(items) => {
                for (idx, item) in items.iter().enumerate().rev() {
                    let mut location = frame.location.clone();
                    location.push_index(idx);
                    stack.push(Frame {
                        node: item,
                        raw_path: format!("{}[{}]", frame.raw_path, idx),
                        origin: frame.origin,
                        location,
                    });
                }
            }
            ConfigValue::Scalar(Scalar::String(value)) => out.string_value(&frame, value, ctx),
            ConfigValue::Scalar(_) => {}
        }
    }

    out
}

/// Frame for a mapping child, switching origin at a top-level sub-document key.
///
/// Entering a sub-document restarts the raw path so it stays relative to
/// that document; the origin prefix restores the full location.
fn child_frame<'a>(
    parent: &Frame<'a>,
    key: &str,
    child: &'a ConfigValue,
    origins: &'a OriginMap,
) -> Frame<'a> {
    let mut location = parent.location.clone();
    location.push_key(key);

    if parent.origin == ROOT_ORIGIN
        && parent.raw_path.is_empty()
        && let Some(origin) = origins.get(key)
    {
        return Frame {
            node: child,
            raw_path: String::new(),
            origin: origin.as_str(),
            location,
        };
    }

    Frame {
        node: child,
        raw_path: join_key(&parent.raw_path, key),
        origin: parent.origin,
        location,
    }
}

fn join_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

impl Findings {
    fn image_map(
        &mut self,
        frame: &Frame<'_>,
        map: &BTreeMap<String, ConfigValue>,
        repository: &str,
        ctx: &DetectContext,
    ) {
        if !ctx.filter.matches(&frame.raw_path) {
            trace!(parent: &ctx.span, raw_path = %frame.raw_path, "image map filtered out");
            return;
        }

        let path = frame.path();
        let mut structure = ImageStructure {
            repository: repository.to_string(),
            registry: string_field(map, "registry"),
            digest: string_field(map, "digest"),
            ..Default::default()
        };

        if let Some(tag) = tag_field(map) {
            match tag.split_once('@') {
                Some((tag, suffix)) => {
                    warn!(
                        parent: &ctx.span,
                        path = %path,
                        tag = %tag,
                        suffix = %suffix,
                        "found '@' inside an image tag field; keeping the tag part only"
                    );
                    self.unsupported.push(UnsupportedStructure {
                        path: path.clone(),
                        kind: UnsupportedKind::DigestInTag,
                        detail: format!("{}@{}", tag, suffix),
                    });
                    let tag = tag.trim();
                    structure.tag = (!tag.is_empty()).then(|| tag.to_string());
                    structure.tag_suffix = Some(suffix.trim().to_string());
                }
                None => structure.tag = Some(tag.clone()),
            }
        }

        let mut parts = vec![format!("repository={}", structure.repository)];
        if let Some(registry) = &structure.registry {
            parts.push(format!("registry={}", registry));
        }
        if let Some(tag) = &structure.tag {
            parts.push(format!("tag={}", tag));
        }
        if let Some(digest) = &structure.digest {
            parts.push(format!("digest={}", digest));
        }

        debug!(parent: &ctx.span, path = %path, origin = frame.origin, "found image map");
        self.patterns.push(ImagePattern {
            path,
            raw_path: frame.raw_path.clone(),
            origin: frame.origin.to_string(),
            location: frame.location.clone(),
            pattern_type: PatternType::Map,
            value: parts.join(","),
            structure: Some(structure),
            count: 1,
        });
    }

    fn repository_not_string(&mut self, frame: &Frame<'_>, value: &ConfigValue, ctx: &DetectContext) {
        if !ctx.filter.matches(&frame.raw_path) {
            return;
        }
        let path = frame.path();
        debug!(parent: &ctx.span, path = %path, "map has a non-string repository");
        self.unsupported.push(UnsupportedStructure {
            path,
            kind: UnsupportedKind::RepositoryNotString,
            detail: format!("repository is a {}", kind_name(value)),
        });
    }

    fn string_value(&mut self, frame: &Frame<'_>, value: &str, ctx: &DetectContext) {
        if value.is_empty() {
            return;
        }
        if !ctx.filter.matches(&frame.raw_path) {
            trace!(parent: &ctx.span, raw_path = %frame.raw_path, "string filtered out");
            return;
        }

        let path = frame.path();
        if value.contains("{{") && value.contains("}}") {
            debug!(parent: &ctx.span, path = %path, "found templated image value");
            self.unsupported.push(UnsupportedStructure {
                path: path.clone(),
                kind: UnsupportedKind::Template,
                detail: value.to_string(),
            });
            self.push_string(frame, path, value, PatternType::Template);
            return;
        }

        let reference = match parse_image_reference(value) {
            Ok(reference) => reference,
            Err(e) => {
                trace!(parent: &ctx.span, path = %path, error = %e, "not an image reference");
                return;
            }
        };

        let likely_image = value.contains(':')
            || value.contains('@')
            || reference.tag.as_deref() != Some(DEFAULT_TAG)
            || reference.digest.is_some();
        if !likely_image {
            trace!(parent: &ctx.span, path = %path, value, "parsed but too ambiguous to rewrite");
            return;
        }

        debug!(parent: &ctx.span, path = %path, value, "found image string");
        self.push_string(frame, path, value, PatternType::String);
    }

    fn push_string(&mut self, frame: &Frame<'_>, path: String, value: &str, pattern_type: PatternType) {
        self.patterns.push(ImagePattern {
            path,
            raw_path: frame.raw_path.clone(),
            origin: frame.origin.to_string(),
            location: frame.location.clone(),
            pattern_type,
            value: value.to_string(),
            structure: None,
            count: 1,
        });
    }
}

fn string_field(map: &BTreeMap<String, ConfigValue>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(ConfigValue::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Tags may be decoded as numbers (`tag: 8.0`); those keep their text.
fn tag_field(map: &BTreeMap<String, ConfigValue>) -> Option<String> {
    match map.get("tag")? {
        ConfigValue::Scalar(Scalar::String(s)) if !s.is_empty() => Some(s.clone()),
        ConfigValue::Scalar(scalar @ (Scalar::Int(_) | Scalar::Float(_))) => Some(scalar.to_string()),
        _ => None,
    }
}

fn kind_name(value: &ConfigValue) -> &'static str {
    match value {
        ConfigValue::Mapping(_) => "mapping",
        ConfigValue::Sequence(_) => "sequence",
        ConfigValue::Scalar(Scalar::String(_)) => "string",
        ConfigValue::Scalar(Scalar::Int(_) | Scalar::Float(_)) => "number",
        ConfigValue::Scalar(Scalar::Bool(_)) => "bool",
        ConfigValue::Scalar(Scalar::Null) => "null",
    }
}
