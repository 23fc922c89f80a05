//! Tracing subscriber setup.
//!
//! The harness emits `tracing` events for every send, match and child
//! lifecycle step. These helpers install a subscriber filtered by the
//! `ASKPTY_LOG` variable (same syntax as `RUST_LOG`, default `warn`).
//! Output goes to stderr, which keeps it off any pty a program prints to.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::EnvConfig;
use crate::error::{ConsoleError, Result};

/// Variable holding the filter directives.
pub const LOG_ENV: &str = "ASKPTY_LOG";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Read `ASKPTY_LOG_FORMAT` (`json` or anything else for pretty).
    #[must_use]
    pub fn from_env(env: &EnvConfig) -> Self {
        match env.get("log_format").as_deref() {
            Some("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber, writing to stderr.
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<()> {
    init_with(LogFormat::from_env(&EnvConfig::default()))
}

/// Install the global subscriber with an explicit format.
pub fn init_with(format: LogFormat) -> Result<()> {
    let registry = tracing_subscriber::registry().with(filter());
    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| ConsoleError::config(format!("logging already initialized: {e}")))
}

/// Install a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn format_from_env() {
        let json = EnvConfig::from_map(
            "ASKPTY",
            HashMap::from([("ASKPTY_LOG_FORMAT".to_string(), "json".to_string())]),
        );
        assert_eq!(LogFormat::from_env(&json), LogFormat::Json);

        let unset = EnvConfig::from_map("ASKPTY", HashMap::new());
        assert_eq!(LogFormat::from_env(&unset), LogFormat::Pretty);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_for_tests();
        init_for_tests();
        tracing::debug!("still fine");
    }
}
