//! kube-state-metrics image relocation.
//!
//! Charts expect this image block at `kube-state-metrics.image` no matter
//! where it was detected. Only the first matching pattern is moved.

use super::{Generator, reference_for};
use crate::detect::ImagePattern;
use crate::error::{RelocError, Result};
use crate::values::{ConfigValue, TreePath};
use tracing::{debug, info, warn};

pub const KSM_KEY: &str = "kube-state-metrics";

/// Move the first kube-state-metrics override to its canonical location.
///
/// `patterns` must already be in path order. Returns the original path of
/// the relocated pattern.
pub(super) fn normalize(
    generator: &Generator<'_>,
    patterns: &[&ImagePattern],
    tree: &mut ConfigValue,
) -> Result<Option<String>> {
    let Some(pattern) = patterns.iter().find(|p| {
        reference_for(p)
            .map(|r| r.repository.contains(KSM_KEY))
            .unwrap_or(false)
    }) else {
        return Ok(None);
    };

    let (dest, block) = match generator.override_block(pattern) {
        Ok(Some(found)) => found,
        Ok(None) => {
            debug!(parent: &generator.span, path = %pattern.path, "kube-state-metrics image not eligible");
            return Ok(None);
        }
        Err(e) => {
            debug!(parent: &generator.span, path = %pattern.path, error = %e, "kube-state-metrics image not rewritable");
            return Ok(None);
        }
    };

    let mut canonical = TreePath::default();
    canonical.push_key(KSM_KEY);
    canonical.push_key("image");
    if let Err(e) = tree.set_path(&canonical, block) {
        if generator.strict {
            return Err(RelocError::strict(pattern.path.clone(), e));
        }
        warn!(parent: &generator.span, path = %pattern.path, error = %e, "cannot relocate kube-state-metrics image");
        return Ok(None);
    }

    if dest.first_key() != Some(KSM_KEY) {
        tree.remove_path(&dest);
    }

    info!(
        parent: &generator.span,
        from = %pattern.path,
        to = %canonical,
        "relocated kube-state-metrics image"
    );
    Ok(Some(pattern.path.clone()))
}
