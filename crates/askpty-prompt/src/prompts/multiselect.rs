use super::select::DEFAULT_PAGE_SIZE;
use super::{Prompt, filtered, frame, page_start};
use crate::answer::Answer;
use crate::error::{PromptError, Result};
use crate::keys::InputKey;
use crate::style;
use crate::terminal::Terminal;

/// Check any number of options.
///
/// Navigation and filtering work as in [`Select`](super::Select). Space
/// toggles the highlighted option, right arrow checks every visible option
/// and left arrow clears them. Enter returns the checked options in
/// declaration order.
#[derive(Debug, Clone)]
pub struct MultiSelect {
    /// The question text.
    pub message: String,
    /// Choices, in display order.
    pub options: Vec<String>,
    /// Options checked at the start.
    pub defaults: Vec<String>,
    /// Rows shown at once.
    pub page_size: usize,
    /// Shown under the question when set.
    pub help: Option<String>,
}

impl MultiSelect {
    /// A multi-select prompt over `options`.
    #[must_use]
    pub fn new<I, S>(message: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            options: options.into_iter().map(Into::into).collect(),
            defaults: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            help: None,
        }
    }

    /// Check these options initially.
    #[must_use]
    pub fn defaults<I, S>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = defaults.into_iter().map(Into::into).collect();
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

impl Prompt for MultiSelect {
    fn message(&self) -> &str {
        &self.message
    }

    fn read_answer(&self, term: &mut Terminal<'_>, error: Option<&str>) -> Result<Answer> {
        if self.options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        let page_size = self.page_size.max(1);
        let mut checked: Vec<bool> = self
            .options
            .iter()
            .map(|o| self.defaults.contains(o))
            .collect();
        let mut filter = String::new();
        let mut index = 0usize;

        loop {
            let visible = filtered(&self.options, &filter);

            let mut lines = frame(error, None);
            let mut header = style::question(&self.message);
            if filter.is_empty() {
                header.push_str(&style::hint(
                    "Use arrows to move, space to select, type to filter",
                ));
            } else {
                header.push_str(&filter);
            }
            lines.push(header);
            if let Some(help) = &self.help {
                lines.push(style::help(help));
            }
            let start = page_start(index, page_size);
            for (row, &option) in visible.iter().enumerate().skip(start).take(page_size) {
                lines.push(style::checkbox(
                    &self.options[option],
                    checked[option],
                    row == index,
                ));
            }
            term.draw(&lines, 0)?;

            let count = visible.len();
            match term.next_key()? {
                InputKey::Enter => {
                    let chosen = self
                        .options
                        .iter()
                        .zip(&checked)
                        .filter(|(_, c)| **c)
                        .map(|(o, _)| o.clone())
                        .collect();
                    return Ok(Answer::List(chosen));
                }
                InputKey::Char(' ') => {
                    if let Some(&option) = visible.get(index) {
                        checked[option] = !checked[option];
                    }
                }
                InputKey::Right => visible.iter().for_each(|&o| checked[o] = true),
                InputKey::Left => visible.iter().for_each(|&o| checked[o] = false),
                InputKey::Up if count > 0 => index = (index + count - 1) % count,
                InputKey::Down | InputKey::Tab if count > 0 => index = (index + 1) % count,
                InputKey::Char(c) => {
                    filter.push(c);
                    index = 0;
                }
                InputKey::Backspace => {
                    filter.pop();
                    index = 0;
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::tests::scripted;

    fn toppings() -> MultiSelect {
        MultiSelect::new("Toppings:", ["bacon", "cheese", "pickles"])
    }

    fn pick(prompt: &MultiSelect, keys: &[u8]) -> Answer {
        let (mut stdio, _) = scripted(keys);
        prompt.prompt(&mut stdio).unwrap()
    }

    fn list(items: &[&str]) -> Answer {
        Answer::List(items.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn space_toggles_in_declaration_order() {
        assert_eq!(
            pick(&toppings(), b"\x1b[B\x1b[B \x1b[A\x1b[A \r"),
            list(&["bacon", "pickles"])
        );
        assert_eq!(pick(&toppings(), b"  \r"), list(&[]));
    }

    #[test]
    fn defaults_and_all_none() {
        let prompt = toppings().defaults(["cheese"]);
        assert_eq!(pick(&prompt, b"\r"), list(&["cheese"]));
        assert_eq!(pick(&prompt, b"\x1b[C\r"), list(&["bacon", "cheese", "pickles"]));
        assert_eq!(pick(&prompt, b"\x1b[D\r"), list(&[]));
    }

    #[test]
    fn filter_then_toggle() {
        assert_eq!(pick(&toppings(), b"pick \r"), list(&["pickles"]));
    }

    #[test]
    fn no_options() {
        let (mut stdio, _) = scripted(b"\r");
        let empty = MultiSelect::new("x", Vec::<String>::new());
        assert!(matches!(empty.prompt(&mut stdio), Err(PromptError::NoOptions)));
    }
}
