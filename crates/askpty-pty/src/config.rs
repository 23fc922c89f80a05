//! Configuration types for spawning programs on a pseudo-terminal.
//!
//! [`PtyConfig`] describes the child's environment and terminal geometry,
//! [`PtySignal`] names the signals a harness sends to a child.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{PtyError, Result};

/// Configuration for a child process started on the slave side.
///
/// # Example
///
/// ```
/// use askpty_pty::PtyConfig;
///
/// let config = PtyConfig::builder()
///     .working_directory("/tmp")
///     .env("TERM", "xterm-256color")
///     .window_size(80, 24)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Working directory for the child process.
    pub working_directory: Option<PathBuf>,

    /// Complete environment for the child process.
    /// If None, inherits from the parent process.
    pub env: Option<HashMap<OsString, OsString>>,

    /// Additional environment variables (merged over the base environment).
    pub env_add: HashMap<OsString, OsString>,

    /// Environment variables removed from the base environment.
    pub env_remove: Vec<OsString>,

    /// Terminal geometry.
    pub window_size: WindowSize,

    /// Start a new session and make the slave the controlling terminal.
    pub controlling_terminal: bool,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            working_directory: None,
            env: None,
            env_add: HashMap::new(),
            env_remove: Vec::new(),
            window_size: WindowSize::default(),
            controlling_terminal: true,
        }
    }
}

impl PtyConfig {
    /// Create a new builder for `PtyConfig`.
    #[must_use]
    pub fn builder() -> PtyConfigBuilder {
        PtyConfigBuilder::new()
    }

    /// Get the effective environment for the child process.
    ///
    /// Starts from the explicit or inherited environment, applies
    /// `env_add`, then drops every key in `env_remove`.
    #[must_use]
    pub fn effective_env(&self) -> HashMap<OsString, OsString> {
        let mut env = self
            .env
            .clone()
            .unwrap_or_else(|| std::env::vars_os().collect());

        env.extend(self.env_add.clone());

        for key in &self.env_remove {
            env.remove(key);
        }

        env
    }
}

/// Builder for [`PtyConfig`].
#[derive(Debug, Clone, Default)]
pub struct PtyConfigBuilder {
    config: PtyConfig,
}

impl PtyConfigBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory for the child process.
    #[must_use]
    pub fn working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.working_directory = Some(path.into());
        self
    }

    /// Start from an empty environment instead of the inherited one.
    #[must_use]
    pub fn env_clear(mut self) -> Self {
        self.config.env = Some(HashMap::new());
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.config.env_add.insert(key.into(), value.into());
        self
    }

    /// Remove an environment variable.
    #[must_use]
    pub fn env_remove(mut self, key: impl Into<OsString>) -> Self {
        self.config.env_remove.push(key.into());
        self
    }

    /// Set the terminal geometry.
    #[must_use]
    pub const fn window_size(mut self, cols: u16, rows: u16) -> Self {
        self.config.window_size = WindowSize::new(cols, rows);
        self
    }

    /// Set whether the child gets the slave as its controlling terminal.
    #[must_use]
    pub const fn controlling_terminal(mut self, value: bool) -> Self {
        self.config.controlling_terminal = value;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> PtyConfig {
        self.config
    }
}

/// Signals a harness may deliver to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PtySignal {
    /// SIGINT (Ctrl+C).
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// SIGKILL, cannot be caught.
    Kill,
    /// SIGHUP, terminal closed.
    Hangup,
}

impl PtySignal {
    /// The Unix signal number.
    #[cfg(unix)]
    #[must_use]
    pub const fn as_unix_signal(self) -> i32 {
        match self {
            Self::Interrupt => libc::SIGINT,
            Self::Terminate => libc::SIGTERM,
            Self::Kill => libc::SIGKILL,
            Self::Hangup => libc::SIGHUP,
        }
    }
}

/// Window size of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    /// Number of columns (characters per line).
    pub cols: u16,
    /// Number of rows (lines).
    pub rows: u16,
}

impl WindowSize {
    /// Create a new window size with the given dimensions.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Reject geometries with a zero dimension.
    pub const fn validate(self) -> Result<Self> {
        if self.cols == 0 || self.rows == 0 {
            return Err(PtyError::InvalidWindowSize {
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(self)
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl From<(u16, u16)> for WindowSize {
    fn from((cols, rows): (u16, u16)) -> Self {
        Self::new(cols, rows)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn config_builder() {
        let config = PtyConfig::builder()
            .working_directory("/tmp")
            .env("FOO", "bar")
            .window_size(120, 40)
            .controlling_terminal(false)
            .build();

        assert_eq!(config.working_directory, Some(PathBuf::from("/tmp")));
        assert_eq!(config.window_size, WindowSize::new(120, 40));
        assert!(config.env_add.contains_key(&OsString::from("FOO")));
        assert!(!config.controlling_terminal);
    }

    #[test]
    fn effective_env_applies_add_then_remove() {
        let config = PtyConfig::builder()
            .env_clear()
            .env("KEEP", "1")
            .env("DROP", "2")
            .env_remove("DROP")
            .build();

        let env = config.effective_env();
        assert_eq!(env.len(), 1);
        assert_eq!(env.get(&OsString::from("KEEP")), Some(&OsString::from("1")));
    }

    #[test]
    fn zero_sized_window_rejected() {
        assert!(WindowSize::new(0, 24).validate().is_err());
        assert!(WindowSize::new(80, 24).validate().is_ok());
    }

    proptest! {
        #[test]
        fn removal_wins_over_addition(
            added in proptest::collection::vec(("[A-D]{1,2}", "[a-z]{0,3}"), 0..12),
            removed in proptest::collection::vec("[A-D]{1,2}", 0..6),
        ) {
            let mut builder = PtyConfig::builder().env_clear();
            for (key, value) in &added {
                builder = builder.env(key.as_str(), value.as_str());
            }
            for key in &removed {
                builder = builder.env_remove(key.as_str());
            }
            let env = builder.build().effective_env();

            let removed: HashSet<&String> = removed.iter().collect();
            for (key, _) in &added {
                let last = added.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v);
                let got = env.get(&OsString::from(key));
                if removed.contains(key) {
                    prop_assert!(got.is_none());
                } else {
                    let expected = last.map(OsString::from);
                    prop_assert_eq!(got, expected.as_ref());
                }
            }
            prop_assert!(env.keys().all(|k| added.iter().any(|(a, _)| OsString::from(a) == *k)));
        }
    }
}
