use super::input::LineEditor;
use super::{Prompt, frame};
use crate::answer::Answer;
use crate::error::Result;
use crate::keys::InputKey;
use crate::style;
use crate::terminal::Terminal;

/// Text entry that echoes `*` for every character.
#[derive(Debug, Clone, Default)]
pub struct Password {
    /// The question text.
    pub message: String,
    /// Shown when the user types `?` on an empty line.
    pub help: Option<String>,
}

impl Password {
    /// A masked prompt.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    /// Set the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl Prompt for Password {
    fn message(&self) -> &str {
        &self.message
    }

    fn read_answer(&self, term: &mut Terminal<'_>, error: Option<&str>) -> Result<Answer> {
        let mut line = LineEditor::default();
        let mut show_help = false;

        loop {
            let mut lines = frame(error, self.help.as_deref().filter(|_| show_help));
            let mut header = style::question(&self.message);
            header.push_str(&"*".repeat(line.len()));
            lines.push(header);
            term.draw(&lines, line.tail())?;

            match term.next_key()? {
                InputKey::Enter => return Ok(Answer::String(line.text())),
                InputKey::Char('?') if self.help.is_some() && line.is_empty() && !show_help => {
                    show_help = true;
                }
                key => {
                    line.apply(key);
                }
            }
        }
    }

    fn summary(&self, _answer: &Answer) -> String {
        String::new()
    }
}
