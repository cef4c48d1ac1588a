//! Command implementations for reloc.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the config resolution shared by every command.

mod inspect;
mod override_cmd;

use crate::cli::{Command, OverrideArgs, SourceArgs};
use reloc::config::{DEFAULT_CONFIG_FILE, RelocConfig};
use reloc::error::{RelocError, Result};
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    let cwd = std::env::current_dir()
        .map_err(|e| RelocError::Io(format!("failed to read working directory: {}", e)))?;

    match command {
        Command::Override(args) => override_cmd::cmd_override(args, &cwd),
        Command::Inspect(args) => inspect::cmd_inspect(args, &cwd),
    }
}

/// Load the config named by `--config`, else `reloc.yaml` in `cwd` if it
/// exists, else the defaults. Pattern flags replace the file's lists when
/// given.
pub(crate) fn load_config(source: &SourceArgs, cwd: &Path) -> Result<RelocConfig> {
    let mut config = match &source.config {
        Some(path) => RelocConfig::load(path)?,
        None => {
            let discovered = cwd.join(DEFAULT_CONFIG_FILE);
            if discovered.is_file() {
                RelocConfig::load(discovered)?
            } else {
                RelocConfig::default()
            }
        }
    };

    replace_if_given(&mut config.include_patterns, &source.include_patterns);
    replace_if_given(&mut config.exclude_patterns, &source.exclude_patterns);
    config.validate()?;
    Ok(config)
}

/// Layer the `override` flags over a loaded config.
pub(crate) fn apply_override_flags(config: &mut RelocConfig, args: &OverrideArgs) -> Result<()> {
    replace_if_given(&mut config.source_registries, &args.source_registries);
    replace_if_given(&mut config.exclude_registries, &args.exclude_registries);
    if let Some(target) = &args.target_registry {
        config.target_registry = Some(target.clone());
    }
    if let Some(kind) = args.path_strategy {
        config.path_strategy = kind;
    }
    config.strict |= args.strict;
    config.validate()
}

fn replace_if_given(field: &mut Vec<String>, flag: &[String]) {
    if !flag.is_empty() {
        *field = flag.to_vec();
    }
}
