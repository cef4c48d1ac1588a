//! CLI argument parsing for reloc.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use reloc::output::OutputFormat;
use reloc::strategy::PathStrategyKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// reloc: rewrite container image references in layered configuration
/// trees so they point at a different registry.
///
/// Reads a bundle (a primary `values.yaml` plus `charts/<alias>/values.yaml`
/// sub-documents), finds image references, and emits an override document
/// that redirects them.
#[derive(Parser, Debug)]
#[command(name = "reloc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log filter directive (e.g. `debug`, `reloc=trace`). Falls back to
    /// `RELOC_LOG`, then `warn`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Shorthand for `--log-level debug`.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for reloc.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an override document that relocates detected images.
    Override(OverrideArgs),

    /// Print the detected image references without generating overrides.
    Inspect(InspectArgs),
}

/// Input selection shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Bundle directory or single values file.
    #[arg(long)]
    pub bundle: PathBuf,

    /// Config file (defaults to `reloc.yaml` in the working directory if present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only consider paths matching these globs (`.`-separated).
    #[arg(long = "include-pattern", value_delimiter = ',')]
    pub include_patterns: Vec<String>,

    /// Ignore paths matching these globs.
    #[arg(long = "exclude-pattern", value_delimiter = ',')]
    pub exclude_patterns: Vec<String>,
}

/// Arguments for the `override` command.
#[derive(Args, Debug, Clone)]
pub struct OverrideArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Fallback registry (optionally with a namespace) for unmapped sources.
    #[arg(long)]
    pub target_registry: Option<String>,

    /// Only rewrite images from these registries.
    #[arg(long, value_delimiter = ',')]
    pub source_registries: Vec<String>,

    /// Never rewrite images from these registries.
    #[arg(long, value_delimiter = ',')]
    pub exclude_registries: Vec<String>,

    /// Repository path strategy.
    #[arg(long, value_enum)]
    pub path_strategy: Option<PathStrategyKind>,

    /// Fail on the first image that cannot be rewritten.
    #[arg(long)]
    pub strict: bool,

    /// Write overrides to this file instead of stdout.
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Print overrides to stdout without writing `--output-file`.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `inspect` command.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
