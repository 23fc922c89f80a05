use super::{Prompt, filtered, frame, page_start};
use crate::answer::Answer;
use crate::error::{PromptError, Result};
use crate::keys::InputKey;
use crate::style;
use crate::terminal::Terminal;

/// Rows shown at once unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 7;

/// Pick one option from a list.
///
/// Arrow keys move the highlight and wrap around. Typing filters the list
/// (ignoring case) and moves the highlight back to the first match; so does
/// backspace. Enter takes the highlighted option.
#[derive(Debug, Clone)]
pub struct Select {
    /// The question text.
    pub message: String,
    /// Choices, in display order.
    pub options: Vec<String>,
    /// Option highlighted at the start.
    pub default: Option<String>,
    /// Rows shown at once.
    pub page_size: usize,
    /// Shown under the question when set.
    pub help: Option<String>,
}

impl Select {
    /// A select prompt over `options`.
    #[must_use]
    pub fn new<I, S>(message: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            options: options.into_iter().map(Into::into).collect(),
            default: None,
            page_size: DEFAULT_PAGE_SIZE,
            help: None,
        }
    }

    /// Highlight `option` initially.
    #[must_use]
    pub fn default_value(mut self, option: impl Into<String>) -> Self {
        self.default = Some(option.into());
        self
    }

    /// Set the number of visible rows.
    #[must_use]
    pub const fn page_size(mut self, rows: usize) -> Self {
        self.page_size = rows;
        self
    }

    /// Set the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Highlight and filter for one run of the prompt.
#[derive(Debug)]
struct SelectState {
    filter: String,
    index: usize,
}

impl SelectState {
    /// Apply a navigation or filter key. `visible` is the filtered count
    /// before the key.
    fn apply(&mut self, key: InputKey, visible: usize) {
        match key {
            InputKey::Up if visible > 0 => self.index = (self.index + visible - 1) % visible,
            InputKey::Down | InputKey::Tab if visible > 0 => self.index = (self.index + 1) % visible,
            InputKey::Char(c) => {
                self.filter.push(c);
                self.index = 0;
            }
            InputKey::Backspace => {
                self.filter.pop();
                self.index = 0;
            }
            _ => {}
        }
    }
}

impl Prompt for Select {
    fn message(&self) -> &str {
        &self.message
    }

    fn read_answer(&self, term: &mut Terminal<'_>, error: Option<&str>) -> Result<Answer> {
        if self.options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        let page_size = self.page_size.max(1);
        let mut state = SelectState {
            filter: String::new(),
            index: self
                .default
                .as_ref()
                .and_then(|d| self.options.iter().position(|o| o == d))
                .unwrap_or(0),
        };

        loop {
            let visible = filtered(&self.options, &state.filter);

            let mut lines = frame(error, None);
            let mut header = style::question(&self.message);
            if state.filter.is_empty() {
                header.push_str(&style::hint("Use arrows to move, type to filter"));
            } else {
                header.push_str(&state.filter);
            }
            lines.push(header);
            if let Some(help) = &self.help {
                lines.push(style::help(help));
            }
            let start = page_start(state.index, page_size);
            for (row, &option) in visible.iter().enumerate().skip(start).take(page_size) {
                lines.push(style::option(&self.options[option], row == state.index));
            }
            term.draw(&lines, 0)?;

            match term.next_key()? {
                InputKey::Enter => {
                    if let Some(&option) = visible.get(state.index) {
                        return Ok(Answer::String(self.options[option].clone()));
                    }
                }
                key => state.apply(key, visible.len()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::tests::scripted;

    fn colors() -> Select {
        Select::new("Choose a color:", ["red", "blue", "green"])
    }

    fn pick(prompt: &Select, keys: &[u8]) -> Result<Answer> {
        let (mut stdio, _) = scripted(keys);
        prompt.prompt(&mut stdio)
    }

    #[test]
    fn arrows_wrap() {
        assert_eq!(pick(&colors(), b"\x1b[B\r").unwrap(), "blue");
        assert_eq!(pick(&colors(), b"\x1b[A\r").unwrap(), "green");
        assert_eq!(pick(&colors(), b"\x1b[B\x1b[B\x1b[B\r").unwrap(), "red");
    }

    #[test]
    fn filter_then_backspace_resets() {
        assert_eq!(pick(&colors(), b"b\x7f\x1b[B\r").unwrap(), "blue");
    }

    #[test]
    fn typed_name_selects() {
        assert_eq!(pick(&colors(), b"blue\n").unwrap(), "blue");
        assert_eq!(pick(&colors(), b"GR\r").unwrap(), "green");
    }

    #[test]
    fn enter_on_empty_filter_ignored() {
        assert_eq!(pick(&colors(), b"xyz\r\x7f\x7f\x7f\r").unwrap(), "red");
    }

    #[test]
    fn default_highlighted() {
        assert_eq!(
            pick(&colors().default_value("green"), b"\r").unwrap(),
            "green"
        );
    }

    #[test]
    fn no_options() {
        let empty = Select::new("Choose:", Vec::<String>::new());
        assert!(matches!(pick(&empty, b"\r"), Err(PromptError::NoOptions)));
    }

    #[test]
    fn paging_shows_highlight() {
        let many = Select::new("n", (1..=10).map(|i| format!("opt{i}"))).page_size(3);
        let (mut stdio, out) = scripted(b"\x1b[B\x1b[B\x1b[B\x1b[B\r");
        assert_eq!(many.prompt(&mut stdio).unwrap(), "opt5");
        assert!(out.text().contains("opt5"));
    }

    #[test]
    fn summary_line() {
        let (mut stdio, out) = scripted(b"\x1b[B\r");
        colors().prompt(&mut stdio).unwrap();
        let out = out.text();
        assert!(out.ends_with("\r\n"));
        assert!(out.contains("blue"));
    }
}
