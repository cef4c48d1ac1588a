//! Implementation of the `reloc inspect` command.

use super::load_config;
use crate::cli::InspectArgs;
use reloc::bundle::load_bundle;
use reloc::detect::{Analysis, DetectContext, Detector};
use reloc::error::Result;
use reloc::filter::{FilterConfig, PathFilter};
use reloc::output::{emit, render};
use std::path::Path;
use tracing::info_span;

/// Execute the `reloc inspect` command.
///
/// Prints the aggregated patterns and unsupported structures without
/// generating anything.
pub fn cmd_inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = load_config(&args.source, cwd)?;
    let analysis = analyze_bundle(&args.source.bundle, &config.filter_config())?;
    emit(&render(&analysis, args.output_format)?, None)
}

pub(crate) fn analyze_bundle(bundle_path: &Path, filter: &FilterConfig) -> Result<Analysis> {
    let span = info_span!("inspect", bundle = %bundle_path.display());
    let bundle = load_bundle(bundle_path)?;
    let detector = Detector::new(DetectContext::new(PathFilter::compile(filter)?, span));
    Ok(detector.analyze(&bundle.values, &bundle.origins))
}
