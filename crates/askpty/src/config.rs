//! Console configuration.
//!
//! [`ConsoleConfig`] controls the virtual terminal: its size, how long an
//! expect waits, how lines are terminated and how much output is retained.
//! Values come from defaults, then an optional TOML/JSON file, then
//! `ASKPTY_*` environment variables.

mod env;
mod file;

use std::path::Path;
use std::time::Duration;

use askpty_pty::WindowSize;
use serde::{Deserialize, Serialize};

pub use env::{DEFAULT_PREFIX, EnvConfig};
pub use file::ConfigFormat;

use crate::error::{ConsoleError, Result};

/// Default timeout for expect operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default terminal width in columns.
pub const DEFAULT_TERMINAL_WIDTH: u16 = 80;

/// Default terminal height in rows.
pub const DEFAULT_TERMINAL_HEIGHT: u16 = 24;

/// Default TERM value for spawned programs.
pub const DEFAULT_TERM: &str = "xterm-256color";

/// Default cap on unconsumed output kept for matching.
pub const DEFAULT_MAX_BUFFER: usize = 1024 * 1024;

/// Line ending appended by `send_line`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix-style line ending (LF).
    #[default]
    Lf,
    /// Windows-style line ending (CRLF).
    CrLf,
    /// Carriage return, what the Enter key sends.
    Cr,
}

impl LineEnding {
    /// Get the line ending as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Get the line ending as bytes.
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

/// Configuration for a [`VirtualConsole`](crate::VirtualConsole).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Terminal width in columns.
    pub cols: u16,
    /// Terminal height in rows.
    pub rows: u16,
    /// Expect timeout in milliseconds.
    pub expect_timeout_ms: u64,
    /// Terminator appended by `send_line`.
    pub line_ending: LineEnding,
    /// TERM value given to spawned programs.
    pub term: String,
    /// Answer cursor-position and status queries from the program.
    pub answer_queries: bool,
    /// Mirror everything the program prints to the trace log.
    pub log_output: bool,
    /// Maximum unconsumed output retained, in bytes.
    pub max_buffer: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_TERMINAL_WIDTH,
            rows: DEFAULT_TERMINAL_HEIGHT,
            expect_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            line_ending: LineEnding::default(),
            term: DEFAULT_TERM.to_string(),
            answer_queries: true,
            log_output: false,
            max_buffer: DEFAULT_MAX_BUFFER,
        }
    }
}

impl ConsoleConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, then the file named by `ASKPTY_CONFIG` (if set), then
    /// `ASKPTY_*` overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&EnvConfig::default())
    }

    /// Like [`load`](Self::load) with an explicit environment source.
    pub fn load_from(env: &EnvConfig) -> Result<Self> {
        let base = match env.get("config") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(env).validate()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ConsoleError::config(e.to_string()))
    }

    /// Load from a TOML or JSON file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        file::load(path.as_ref())
    }

    /// Apply environment overrides.
    #[must_use]
    pub fn with_env(mut self, env: &EnvConfig) -> Self {
        if let Some(cols) = env.parse("cols") {
            self.cols = cols;
        }
        if let Some(rows) = env.parse("rows") {
            self.rows = rows;
        }
        if let Some(ms) = env.parse("timeout_ms") {
            self.expect_timeout_ms = ms;
        }
        if let Some(term) = env.get("term") {
            self.term = term;
        }
        if let Some(log) = env.bool("log_output") {
            self.log_output = log;
        }
        self
    }

    /// Reject values the console cannot work with.
    pub fn validate(self) -> Result<Self> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConsoleError::config(format!(
                "terminal size must be non-zero, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.max_buffer == 0 {
            return Err(ConsoleError::config("max_buffer must be non-zero"));
        }
        Ok(self)
    }

    /// Set the terminal dimensions.
    #[must_use]
    pub const fn dimensions(mut self, cols: u16, rows: u16) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    /// Set the expect timeout.
    #[must_use]
    pub fn expect_timeout(mut self, timeout: Duration) -> Self {
        self.expect_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the line ending used by `send_line`.
    #[must_use]
    pub const fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Set the TERM value for spawned programs.
    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Enable or disable answering terminal queries.
    #[must_use]
    pub const fn answer_queries(mut self, enabled: bool) -> Self {
        self.answer_queries = enabled;
        self
    }

    /// Enable or disable output mirroring to the log.
    #[must_use]
    pub const fn log_output(mut self, enabled: bool) -> Self {
        self.log_output = enabled;
        self
    }

    /// Set the retained output cap.
    #[must_use]
    pub const fn max_buffer(mut self, bytes: usize) -> Self {
        self.max_buffer = bytes;
        self
    }

    /// The configured expect timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.expect_timeout_ms)
    }

    /// The configured terminal geometry.
    #[must_use]
    pub const fn window_size(&self) -> WindowSize {
        WindowSize::new(self.cols, self.rows)
    }
}
