//! Rendering and writing of command output.
//!
//! Files are written atomically: content goes to `.{name}.tmp` beside the
//! target, is synced, and then renamed over the target. A crash can leave
//! the temporary file behind but never a truncated target.

use crate::error::{RelocError, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serialization format for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Serialize `value` in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| RelocError::Io(format!("failed to serialize output as YAML: {}", e))),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| RelocError::Io(format!("failed to serialize output as JSON: {}", e))),
    }
}

/// Write `content` to `path`, or to stdout when `path` is `None`.
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => atomic_write(path, content.as_bytes()),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| RelocError::Io(format!("failed to write to stdout: {}", e)))
        }
    }
}

/// Atomically replace `path` with `content`.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            RelocError::Io(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        RelocError::Io(format!("failed to replace '{}': {}", path.display(), e))
    })
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RelocError::Io(format!("invalid output path '{}'", target.display())))?;
    let parent = target.parent().unwrap_or(Path::new("."));
    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        RelocError::Io(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(path);
            RelocError::Io(format!("failed to write temporary file: {}", e))
        })
}
