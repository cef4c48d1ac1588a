//! Tracing subscriber setup for the `reloc` binary.
//!
//! Library code never installs a subscriber; it only emits events under the
//! span handed to it by the caller.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no level is given on the command line.
pub const LOG_ENV: &str = "RELOC_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Pick the filter directive.
///
/// Precedence: explicit `--log-level`, then `--verbose` (debug), then the
/// `RELOC_LOG` value, then `warn`.
pub fn filter_directive(log_level: Option<&str>, verbose: bool, env: Option<String>) -> String {
    if let Some(level) = log_level.map(str::trim).filter(|l| !l.is_empty()) {
        return level.to_string();
    }
    if verbose {
        return "debug".to_string();
    }
    env.map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Install the global fmt subscriber writing to stderr.
///
/// Stdout is reserved for command output. An unparseable directive falls
/// back to `warn`.
pub fn init(log_level: Option<&str>, verbose: bool) {
    let directive = filter_directive(log_level, verbose, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_warn() {
        assert_eq!(filter_directive(None, false, None), "warn");
        assert_eq!(filter_directive(None, false, Some("  ".into())), "warn");
    }

    #[test]
    fn test_env_used_without_flags() {
        assert_eq!(
            filter_directive(None, false, Some("reloc=trace".into())),
            "reloc=trace"
        );
    }

    #[test]
    fn test_verbose_beats_env() {
        assert_eq!(filter_directive(None, true, Some("error".into())), "debug");
    }

    #[test]
    fn test_log_level_beats_everything() {
        assert_eq!(
            filter_directive(Some("info"), true, Some("error".into())),
            "info"
        );
        assert_eq!(filter_directive(Some(""), true, None), "debug");
    }
}
