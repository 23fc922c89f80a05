//! Dialogue execution.

use std::time::{Duration, Instant};

use super::definition::{Dialogue, Step};
use crate::console::VirtualConsole;
use crate::error::Result;
use crate::expect::Pattern;

/// What one step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Position in the dialogue.
    pub index: usize,
    /// The step, as written.
    pub description: String,
    /// Output consumed by an expect, including the match.
    pub output: String,
    /// Matched text, for expects.
    pub matched: Option<String>,
    /// How long the step took.
    pub elapsed: Duration,
}

/// Outcome of a completed dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueResult {
    /// Name of the dialogue.
    pub name: String,
    /// One record per step, in order.
    pub steps: Vec<StepRecord>,
    /// Everything the expects consumed, concatenated.
    pub output: String,
}

impl DialogueResult {
    /// The last record.
    #[must_use]
    pub fn last_step(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    /// Captured output with escape sequences and carriage returns removed.
    #[must_use]
    pub fn plain_output(&self) -> String {
        strip_controls(&self.output)
    }
}

/// Runs dialogues against a console.
#[derive(Debug, Clone, Default)]
pub struct DialogueExecutor {
    default_timeout: Option<Duration>,
}

impl DialogueExecutor {
    /// An executor that uses the console's configured timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `timeout` instead of the console's configured one.
    #[must_use]
    pub const fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Run every step in order. The first failing step ends the run and its
    /// error is returned.
    pub async fn run(
        &self,
        console: &mut VirtualConsole,
        dialogue: &Dialogue,
    ) -> Result<DialogueResult> {
        let mut timeout = self
            .default_timeout
            .unwrap_or_else(|| console.config().timeout());
        let mut result = DialogueResult {
            name: dialogue.name.clone(),
            ..DialogueResult::default()
        };

        tracing::debug!(dialogue = %dialogue.name, steps = dialogue.len(), "running dialogue");

        for (index, step) in dialogue.steps.iter().enumerate() {
            let started = Instant::now();
            let mut record = StepRecord {
                index,
                description: step.to_string(),
                output: String::new(),
                matched: None,
                elapsed: Duration::ZERO,
            };

            match step {
                Step::Expect {
                    pattern,
                    timeout: limit,
                } => {
                    let pattern = match pattern {
                        Pattern::Literal(text) => Pattern::Literal(dialogue.substitute(text)),
                        other => other.clone(),
                    };
                    let found = console
                        .expect_timeout(pattern, limit.unwrap_or(timeout))
                        .await
                        .inspect_err(|e| {
                            tracing::debug!(dialogue = %dialogue.name, index, error = %e, "step failed");
                        })?;
                    record.output = format!("{}{}", found.before, found.matched);
                    record.matched = Some(found.matched);
                }
                Step::Send(text) => console.send_str(&dialogue.substitute(text)).await?,
                Step::SendLine(text) => console.send_line(&dialogue.substitute(text)).await?,
                Step::SendKey(key) => console.send_key(*key).await?,
                Step::Wait(duration) => tokio::time::sleep(*duration).await,
                Step::SetTimeout(duration) => timeout = *duration,
            }

            record.elapsed = started.elapsed();
            result.output.push_str(&record.output);
            result.steps.push(record);
        }

        Ok(result)
    }
}

/// Remove CSI/OSC escape sequences and carriage returns.
pub(crate) fn strip_controls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.next() {
                Some('[') => {
                    while let Some(&n) = chars.peek() {
                        chars.next();
                        if ('@'..='~').contains(&n) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    while let Some(n) = chars.next() {
                        if n == '\x07' {
                            break;
                        }
                        if n == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}
