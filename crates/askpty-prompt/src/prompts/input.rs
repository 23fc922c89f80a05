use super::{Prompt, frame};
use crate::answer::Answer;
use crate::error::Result;
use crate::keys::InputKey;
use crate::style;
use crate::terminal::Terminal;

/// A line of free text.
#[derive(Debug, Clone, Default)]
pub struct Input {
    /// The question text.
    pub message: String,
    /// Answer used when the user submits an empty line.
    pub default: Option<String>,
    /// Shown when the user types `?` on an empty line.
    pub help: Option<String>,
}

impl Input {
    /// A text prompt.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Set the default answer.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Line editor state shared with [`Password`](super::Password).
#[derive(Debug, Default)]
pub(super) struct LineEditor {
    chars: Vec<char>,
    cursor: usize,
}

impl LineEditor {
    /// Apply a key. Returns false for keys the editor does not handle.
    pub(super) fn apply(&mut self, key: InputKey) -> bool {
        match key {
            InputKey::Char(c) => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            InputKey::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            InputKey::Delete if self.cursor < self.chars.len() => {
                self.chars.remove(self.cursor);
            }
            InputKey::Left => self.cursor = self.cursor.saturating_sub(1),
            InputKey::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            InputKey::Home => self.cursor = 0,
            InputKey::End => self.cursor = self.chars.len(),
            InputKey::Backspace | InputKey::Delete => {}
            _ => return false,
        }
        true
    }

    pub(super) fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub(super) fn len(&self) -> usize {
        self.chars.len()
    }

    /// Columns between the cursor and the end of the text.
    pub(super) fn tail(&self) -> usize {
        self.chars.len() - self.cursor
    }
}

impl Prompt for Input {
    fn message(&self) -> &str {
        &self.message
    }

    fn read_answer(&self, term: &mut Terminal<'_>, error: Option<&str>) -> Result<Answer> {
        let mut line = LineEditor::default();
        let mut show_help = false;

        loop {
            let mut lines = frame(error, self.help.as_deref().filter(|_| show_help));
            let mut header = style::question(&self.message);
            if self.help.is_some() && !show_help {
                header.push_str(&style::hint("? for help"));
                header.push(' ');
            }
            if let Some(default) = &self.default {
                header.push_str(&format!("({default}) "));
            }
            header.push_str(&line.text());
            lines.push(header);
            term.draw(&lines, line.tail())?;

            match term.next_key()? {
                InputKey::Enter => {
                    let text = line.text();
                    return Ok(Answer::String(match (&self.default, text.is_empty()) {
                        (Some(default), true) => default.clone(),
                        _ => text,
                    }));
                }
                InputKey::Char('?') if self.help.is_some() && line.is_empty() && !show_help => {
                    show_help = true;
                }
                key => {
                    line.apply(key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::tests::scripted;

    fn answer(prompt: &Input, keys: &[u8]) -> (Answer, String) {
        let (mut stdio, out) = scripted(keys);
        let answer = prompt.prompt(&mut stdio).unwrap();
        (answer, out.text())
    }

    #[test]
    fn typed_line() {
        let (answer, out) = answer(&Input::new("What is your name?"), b"Johnny\r");
        assert_eq!(answer, "Johnny");
        assert!(out.contains("What is your name?"));
    }

    #[test]
    fn editing_keys() {
        // five lefts put the cursor after J; End then drops the x
        let (answer, _) = answer(
            &Input::new("name"),
            b"Jhnnyx\x1b[D\x1b[D\x1b[D\x1b[D\x1b[Do\x1b[F\x7f\r",
        );
        assert_eq!(answer, "Johnny");
    }

    #[test]
    fn default_on_empty() {
        let prompt = Input::new("name").default_value("anonymous");
        assert_eq!(answer(&prompt, b"\n").0, "anonymous");
        assert_eq!(answer(&prompt, b"me\n").0, "me");
    }

    #[test]
    fn help_on_question_mark() {
        let prompt = Input::new("name").help("Your full name");
        let (answer, out) = answer(&prompt, b"?x\r");
        assert_eq!(answer, "x");
        assert!(out.contains("Your full name"));
    }

    #[test]
    fn line_editor_ignores_arrows_up_down() {
        let mut editor = LineEditor::default();
        assert!(!editor.apply(InputKey::Up));
        assert!(editor.apply(InputKey::Backspace));
        assert_eq!(editor.len(), 0);
    }
}
