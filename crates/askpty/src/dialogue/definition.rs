//! Dialogue definitions.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::Result;
use crate::expect::Pattern;
use crate::keys::Key;

/// One action in a dialogue.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Wait for a pattern. `timeout` overrides the dialogue's current one.
    Expect {
        /// What to wait for.
        pattern: Pattern,
        /// Per-step timeout.
        timeout: Option<Duration>,
    },
    /// Type text as-is.
    Send(String),
    /// Type text followed by the console's line ending.
    SendLine(String),
    /// Press a key.
    SendKey(Key),
    /// Pause.
    Wait(Duration),
    /// Change the timeout for the expects that follow.
    SetTimeout(Duration),
}

impl Step {
    /// Expect a literal string.
    #[must_use]
    pub fn expect(text: impl Into<String>) -> Self {
        Self::Expect {
            pattern: Pattern::literal(text),
            timeout: None,
        }
    }

    /// Expect the program side to close.
    #[must_use]
    pub const fn expect_eof() -> Self {
        Self::Expect {
            pattern: Pattern::Eof,
            timeout: None,
        }
    }

    /// Give this step its own timeout. Only expects use it.
    #[must_use]
    pub fn within(self, limit: Duration) -> Self {
        match self {
            Self::Expect { pattern, .. } => Self::Expect {
                pattern,
                timeout: Some(limit),
            },
            other => other,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expect { pattern, .. } if pattern.is_eof() => write!(f, "expect_eof"),
            Self::Expect {
                pattern: Pattern::Regex(re),
                ..
            } => write!(f, "expect_re {:?}", re.as_str()),
            Self::Expect { pattern, .. } => write!(f, "expect {:?}", pattern.as_str()),
            Self::Send(text) => write!(f, "send {text:?}"),
            Self::SendLine(text) => write!(f, "sendln {text:?}"),
            Self::SendKey(key) => write!(f, "key {key}"),
            Self::Wait(d) => write!(f, "wait {d:?}"),
            Self::SetTimeout(d) => write!(f, "timeout {d:?}"),
        }
    }
}

/// An ordered script of [`Step`]s.
///
/// `${name}` and `$name` in sent text and literal expects are replaced with
/// the dialogue's variables when it runs.
///
/// ```rust
/// use askpty::{Dialogue, Key};
///
/// let dialogue = Dialogue::named("pick blue")
///     .expect("Choose a color:")
///     .send_key(Key::ArrowDown)
///     .send_key(Key::Enter)
///     .expect_eof();
/// assert_eq!(dialogue.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dialogue {
    /// Name used in logs.
    pub name: String,
    /// Steps, run in order.
    pub steps: Vec<Step>,
    /// Values for `${name}` substitution.
    pub variables: HashMap<String, String>,
}

impl Dialogue {
    /// A dialogue made of `steps`.
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// An empty dialogue with a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Wait for a literal string.
    #[must_use]
    pub fn expect(self, text: impl Into<String>) -> Self {
        self.step(Step::expect(text))
    }

    /// Wait for a regular expression.
    pub fn expect_regex(self, pattern: &str) -> Result<Self> {
        Ok(self.step(Step::Expect {
            pattern: Pattern::regex(pattern)?,
            timeout: None,
        }))
    }

    /// Wait for the program side to close.
    #[must_use]
    pub fn expect_eof(self) -> Self {
        self.step(Step::expect_eof())
    }

    /// Type text.
    #[must_use]
    pub fn send(self, text: impl Into<String>) -> Self {
        self.step(Step::Send(text.into()))
    }

    /// Type a line.
    #[must_use]
    pub fn send_line(self, text: impl Into<String>) -> Self {
        self.step(Step::SendLine(text.into()))
    }

    /// Press a key.
    #[must_use]
    pub fn send_key(self, key: Key) -> Self {
        self.step(Step::SendKey(key))
    }

    /// Pause.
    #[must_use]
    pub fn wait(self, duration: Duration) -> Self {
        self.step(Step::Wait(duration))
    }

    /// Change the timeout for later expects.
    #[must_use]
    pub fn timeout(self, duration: Duration) -> Self {
        self.step(Step::SetTimeout(duration))
    }

    /// Define a substitution variable.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there are no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replace `${name}` and `$name` with variable values.
    ///
    /// The input is scanned once, so substituted values are never expanded
    /// again. A bare `$name` runs to the end of the identifier; unknown
    /// names are left as written.
    #[must_use]
    pub fn substitute(&self, s: &str) -> String {
        if self.variables.is_empty() || !s.contains('$') {
            return s.to_string();
        }

        let mut out = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(at) = rest.find('$') {
            out.push_str(&rest[..at]);
            let after = &rest[at + 1..];
            let (name, consumed) = match after.strip_prefix('{') {
                Some(braced) => braced
                    .find('}')
                    .map_or(("", 0), |end| (&braced[..end], end + 2)),
                None => {
                    let end = after
                        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                        .unwrap_or(after.len());
                    (&after[..end], end)
                }
            };

            match self.variables.get(name) {
                Some(value) if consumed > 0 => {
                    out.push_str(value);
                    rest = &after[consumed..];
                }
                _ => {
                    out.push('$');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl FromIterator<Step> for Dialogue {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
