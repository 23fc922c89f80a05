//! Error types for askpty.
//!
//! Errors that come out of expect operations carry the unconsumed output
//! so a failing test shows what the program actually printed.

use std::time::Duration;

use askpty_pty::{ExitStatus, PtyError};
use thiserror::Error;

/// Maximum length of buffer content to display in error messages.
const MAX_BUFFER_DISPLAY: usize = 500;

/// Lines kept when a long buffer is truncated.
const TAIL_LINES: usize = 6;

/// Format buffer content for display, keeping the tail of long buffers.
fn format_buffer_snippet(buffer: &str) -> String {
    if buffer.is_empty() {
        return "(empty buffer)".to_string();
    }

    let escaped = escape_controls(buffer);
    let lines: Vec<&str> = escaped.lines().collect();

    if buffer.len() <= MAX_BUFFER_DISPLAY || lines.len() <= TAIL_LINES {
        return format!(
            "┌─ output ({} bytes) ──────────────────────\n│ {}\n└────────────────────────────────────────",
            buffer.len(),
            lines.join("\n│ ")
        );
    }

    let tail = &lines[lines.len() - TAIL_LINES..];
    format!(
        "┌─ output ({} bytes, {} lines) ─────────────\n│ ... ({} lines hidden)\n│ {}\n└────────────────────────────────────────",
        buffer.len(),
        lines.len(),
        lines.len() - tail.len(),
        tail.join("\n│ ")
    )
}

/// Make escape sequences and carriage returns visible.
fn escape_controls(buffer: &str) -> String {
    let mut out = String::with_capacity(buffer.len());
    for c in buffer.chars() {
        match c {
            '\x1b' => out.push_str("\\e"),
            '\r' => out.push_str("\\r"),
            '\n' | '\t' => out.push(c),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn format_timeout_error(duration: Duration, pattern: &str, buffer: &str) -> String {
    format!(
        "timeout after {duration:?} waiting for '{pattern}'\n\
         \n\
         {}\n\
         \n\
         Tip: the program never printed the expected text. Check the prompt wording \
         and that every earlier answer was accepted.",
        format_buffer_snippet(buffer)
    )
}

fn format_pattern_not_found_error(pattern: &str, buffer: &str) -> String {
    format!(
        "terminal closed before '{pattern}' appeared\n\
         \n\
         {}",
        format_buffer_snippet(buffer)
    )
}

/// The main error type for console and dialogue operations.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Pseudo-terminal failure.
    #[error(transparent)]
    Pty(#[from] PtyError),

    /// Timeout waiting for pattern match.
    #[error("{}", format_timeout_error(*duration, pattern, buffer))]
    Timeout {
        /// The timeout duration that elapsed.
        duration: Duration,
        /// The pattern that was being searched for.
        pattern: String,
        /// Unconsumed output at the time of timeout.
        buffer: String,
    },

    /// The terminal reached end-of-file before the pattern appeared.
    #[error("{}", format_pattern_not_found_error(pattern, buffer))]
    PatternNotFound {
        /// The pattern that was being searched for.
        pattern: String,
        /// Unconsumed output when end-of-file was reached.
        buffer: String,
    },

    /// A pattern that cannot be used.
    #[error("invalid pattern: {message}")]
    InvalidPattern {
        /// What is wrong with the pattern.
        message: String,
    },

    /// Invalid regex pattern.
    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The tty handle was already closed.
    #[error("tty is closed")]
    TtyClosed,

    /// The background driver ended without reporting a result.
    #[error("dialogue driver stopped without reporting (panicked or cancelled)")]
    DriverLost,

    /// The program under test ended badly.
    #[error("process failed: {status}")]
    ProcessFailed {
        /// How the process ended.
        status: ExitStatus,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Result type for askpty operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

impl ConsoleError {
    /// Create a timeout error.
    pub fn timeout(
        duration: Duration,
        pattern: impl Into<String>,
        buffer: impl Into<String>,
    ) -> Self {
        Self::Timeout {
            duration,
            pattern: pattern.into(),
            buffer: buffer.into(),
        }
    }

    /// Create a pattern not found error.
    pub fn pattern_not_found(pattern: impl Into<String>, buffer: impl Into<String>) -> Self {
        Self::PatternNotFound {
            pattern: pattern.into(),
            buffer: buffer.into(),
        }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Wrap an I/O result with context.
    pub fn with_io_context<T>(result: std::io::Result<T>, context: impl Into<String>) -> Result<T> {
        result.map_err(|e| Self::io_context(context, e))
    }

    /// Check if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Get the captured output if this error carries it.
    #[must_use]
    pub fn buffer(&self) -> Option<&str> {
        match self {
            Self::Timeout { buffer, .. } | Self::PatternNotFound { buffer, .. } => Some(buffer),
            _ => None,
        }
    }
}
