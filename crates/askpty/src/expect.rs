//! Pattern matching over program output.
//!
//! Output is accumulated in an [`ExpectBuffer`]; an expect searches the
//! unconsumed text for a [`Pattern`] and, on success, consumes everything
//! up to the end of the match and returns it as a [`Match`].

mod buffer;
mod pattern;

use std::fmt;

pub use buffer::ExpectBuffer;
pub use pattern::{Pattern, PatternMatch};

/// A successful expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The text that matched.
    pub matched: String,
    /// Capture groups, for regex patterns.
    pub captures: Vec<String>,
    /// Unconsumed output that preceded the match.
    pub before: String,
}

impl Match {
    /// Create a match without captures.
    #[must_use]
    pub fn new(matched: impl Into<String>, before: impl Into<String>) -> Self {
        Self {
            matched: matched.into(),
            captures: Vec::new(),
            before: before.into(),
        }
    }

    /// Attach capture groups.
    #[must_use]
    pub fn with_captures(mut self, captures: Vec<String>) -> Self {
        self.captures = captures;
        self
    }

    /// Get a capture group. Index 0 is the first group, not the whole match.
    #[must_use]
    pub fn capture(&self, index: usize) -> Option<&str> {
        self.captures.get(index).map(String::as_str)
    }

    /// The matched text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.matched
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.matched)
    }
}
