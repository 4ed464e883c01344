//! Logging setup
//!
//! `RUST_LOG` wins when it holds a valid filter. Otherwise the CLI's
//! `--verbose` flag picks between `info` and `debug`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::utils::error::{OncoDataError, Result};

/// Default directive when `RUST_LOG` is unset or invalid
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Build the filter from an optional `RUST_LOG` value
pub fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber
pub fn init_logging(verbose: bool) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), verbose);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbose).with_thread_ids(verbose))
        .with(filter)
        .try_init()
        .map_err(|e| OncoDataError::Configuration(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives(filter: EnvFilter) -> String {
        filter.to_string().to_lowercase()
    }

    #[test]
    fn test_verbose_fallback() {
        assert_eq!(directives(build_filter(None, false)), "info");
        assert_eq!(directives(build_filter(None, true)), "debug");
        assert_eq!(directives(build_filter(Some("  "), true)), "debug");
    }

    #[test]
    fn test_rust_log_wins() {
        assert_eq!(directives(build_filter(Some("warn"), true)), "warn");
        assert_eq!(
            directives(build_filter(Some("oncodata=trace"), false)),
            "oncodata=trace"
        );
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        assert_eq!(
            directives(build_filter(Some("oncodata=loudest"), false)),
            "info"
        );
    }
}
