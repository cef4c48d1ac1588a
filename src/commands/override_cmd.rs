//! Implementation of the `reloc override` command.
//!
//! Loads the bundle, detects image references, generates the override tree,
//! and writes it to stdout or `--output-file`.

use super::{apply_override_flags, load_config};
use crate::cli::OverrideArgs;
use reloc::bundle::load_bundle;
use reloc::config::RelocConfig;
use reloc::detect::{DetectContext, Detector};
use reloc::error::Result;
use reloc::filter::PathFilter;
use reloc::generate::{Generated, Generator};
use reloc::output::{emit, render};
use std::path::Path;
use tracing::{info, info_span};

/// Execute the `reloc override` command.
pub fn cmd_override(args: OverrideArgs, cwd: &Path) -> Result<()> {
    let mut config = load_config(&args.source, cwd)?;
    apply_override_flags(&mut config, &args)?;

    let generated = build_overrides(&args.source.bundle, &config)?;
    let rendered = render(&generated.overrides, args.output_format)?;

    let target = if args.dry_run {
        if let Some(path) = &args.output_file {
            info!(path = %path.display(), "dry run, not writing output file");
        }
        None
    } else {
        args.output_file.as_deref()
    };
    emit(&rendered, target)
}

/// Run detection and generation for one bundle.
pub(crate) fn build_overrides(bundle_path: &Path, config: &RelocConfig) -> Result<Generated> {
    let span = info_span!("override", bundle = %bundle_path.display());

    let bundle = load_bundle(bundle_path)?;
    let filter = PathFilter::compile(&config.filter_config())?;
    let detector = Detector::new(DetectContext::new(filter, span.clone()));
    let analysis = detector.analyze(&bundle.values, &bundle.origins);

    let generator = Generator::new(config.path_strategy.strategy(), config.resolver())
        .source_registries(config.source_registries.clone())
        .exclude_registries(config.exclude_registries.clone())
        .strict(config.strict)
        .span(span.clone());
    let generated = generator.generate(&analysis)?;

    info!(
        parent: &span,
        strategy = %config.path_strategy,
        patterns = analysis.patterns.len(),
        unsupported = analysis.unsupported.len(),
        "bundle processed"
    );
    Ok(generated)
}
