use super::{Prompt, frame};
use crate::answer::Answer;
use crate::error::Result;
use crate::keys::InputKey;
use crate::style;
use crate::terminal::Terminal;

/// A yes or no question.
#[derive(Debug, Clone, Default)]
pub struct Confirm {
    /// The question text.
    pub message: String,
    /// Answer for an empty reply.
    pub default: bool,
    /// Shown when the user types `?` on an empty line.
    pub help: Option<String>,
}

impl Confirm {
    /// A confirm prompt defaulting to no.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Set the answer for an empty reply.
    #[must_use]
    pub const fn default_value(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Set the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

fn parse(reply: &str) -> Option<bool> {
    match reply.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl Prompt for Confirm {
    fn message(&self) -> &str {
        &self.message
    }

    fn read_answer(&self, term: &mut Terminal<'_>, error: Option<&str>) -> Result<Answer> {
        let mut reply = String::new();
        let mut local_error: Option<String> = None;
        let mut show_help = false;

        loop {
            let shown_error = local_error.as_deref().or(error);
            let mut lines = frame(shown_error, self.help.as_deref().filter(|_| show_help));
            let mut header = style::question(&self.message);
            header.push_str(if self.default { "(Y/n) " } else { "(y/N) " });
            header.push_str(&reply);
            lines.push(header);
            term.draw(&lines, 0)?;

            match term.next_key()? {
                InputKey::Enter if reply.trim().is_empty() => return Ok(Answer::Bool(self.default)),
                InputKey::Enter => match parse(&reply) {
                    Some(answer) => return Ok(Answer::Bool(answer)),
                    None => {
                        local_error = Some(format!(
                            "\"{reply}\" is not a valid answer, please try again."
                        ));
                        reply.clear();
                    }
                },
                InputKey::Char('?') if self.help.is_some() && reply.is_empty() && !show_help => {
                    show_help = true;
                }
                InputKey::Char(c) => reply.push(c),
                InputKey::Backspace => {
                    reply.pop();
                }
                _ => {}
            }
        }
    }
}
