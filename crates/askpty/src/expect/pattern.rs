//! Patterns an expect can wait for.

use std::fmt;

use regex::Regex;

use crate::error::Result;

/// What an expect waits for.
#[derive(Clone)]
pub enum Pattern {
    /// An exact substring.
    Literal(String),
    /// A regular expression.
    Regex(Regex),
    /// End of file: every slave descriptor has been closed.
    Eof,
}

impl Pattern {
    /// Create a literal pattern.
    #[must_use]
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into())
    }

    /// Compile a regex pattern.
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    /// The pattern as written, for messages.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) => s,
            Self::Regex(r) => r.as_str(),
            Self::Eof => "<EOF>",
        }
    }

    /// Whether this is the end-of-file pattern.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Find the first match in `text`.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<PatternMatch> {
        match self {
            Self::Literal(s) => text.find(s.as_str()).map(|start| PatternMatch {
                start,
                end: start + s.len(),
                captures: Vec::new(),
            }),
            Self::Regex(r) => r.captures(text).and_then(|caps| {
                let whole = caps.get(0)?;
                Some(PatternMatch {
                    start: whole.start(),
                    end: whole.end(),
                    captures: caps
                        .iter()
                        .skip(1)
                        .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                        .collect(),
                })
            }),
            Self::Eof => None,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "Literal({s:?})"),
            Self::Regex(r) => write!(f, "Regex({:?})", r.as_str()),
            Self::Eof => write!(f, "Eof"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            (Self::Eof, Self::Eof) => true,
            _ => false,
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<Regex> for Pattern {
    fn from(r: Regex) -> Self {
        Self::Regex(r)
    }
}

/// Location of a match within the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Byte offset of the match start.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// Capture groups; unmatched optional groups are empty strings.
    pub captures: Vec<String>,
}

impl PatternMatch {
    /// The matched slice of `text`.
    #[must_use]
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_match() {
        let m = Pattern::literal("color").find("? Choose a color: ").unwrap();
        assert_eq!((m.start, m.end), (11, 16));
    }

    #[test]
    fn regex_captures() {
        let p = Pattern::regex(r"(\w+) chose (\w+)(, extras=(\w+))?").unwrap();
        let text = "Johnny chose blue.";
        let m = p.find(text).unwrap();
        assert_eq!(m.as_str(text), "Johnny chose blue");
        assert_eq!(m.captures, vec!["Johnny", "blue", "", ""]);
    }

    #[test]
    fn invalid_regex() {
        assert!(Pattern::regex("(unclosed").is_err());
    }

    #[test]
    fn eof_never_matches_text() {
        assert!(Pattern::Eof.find("anything").is_none());
        assert!(Pattern::Eof.is_eof());
        assert_eq!(Pattern::Eof.to_string(), "<EOF>");
    }
}
