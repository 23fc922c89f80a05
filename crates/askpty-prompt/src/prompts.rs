//! The prompt kinds and what they share.

mod confirm;
mod input;
mod multiselect;
mod password;
mod select;

pub use confirm::Confirm;
pub use input::Input;
pub use multiselect::MultiSelect;
pub use password::Password;
pub use select::Select;

use crate::answer::Answer;
use crate::error::Result;
use crate::question::{Transformer, Validator};
use crate::stdio::Stdio;
use crate::style;
use crate::terminal::Terminal;

/// Something that can be asked.
pub trait Prompt {
    /// The question text.
    fn message(&self) -> &str;

    /// Interact until the user submits. `error` is shown above the prompt
    /// when a previous answer was rejected.
    fn read_answer(&self, term: &mut Terminal<'_>, error: Option<&str>) -> Result<Answer>;

    /// How the accepted answer is shown afterwards.
    fn summary(&self, answer: &Answer) -> String {
        answer.to_string()
    }

    /// Ask on `stdio` and return the answer.
    fn prompt(&self, stdio: &mut Stdio) -> Result<Answer> {
        let mut term = Terminal::new(stdio)?;
        run(self, &mut term, None, None)
    }
}

/// Ask `prompt` until `validator` accepts the answer, then apply
/// `transform` and leave the summary line on screen.
pub(crate) fn run<P: Prompt + ?Sized>(
    prompt: &P,
    term: &mut Terminal<'_>,
    validator: Option<&Validator>,
    transform: Option<&Transformer>,
) -> Result<Answer> {
    let mut error: Option<String> = None;
    loop {
        let answer = prompt.read_answer(term, error.as_deref())?;
        if let Some(validate) = validator {
            if let Err(message) = validate(&answer) {
                tracing::debug!(prompt = prompt.message(), %message, "answer rejected");
                error = Some(message);
                continue;
            }
        }

        let answer = match transform {
            Some(transform) => transform(answer),
            None => answer,
        };
        term.finish(&style::summary(prompt.message(), &prompt.summary(&answer)))?;
        return Ok(answer);
    }
}

/// Header line plus the optional error above it.
fn frame(error: Option<&str>, help: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(message) = error {
        lines.push(style::error(message));
    }
    if let Some(text) = help {
        lines.push(style::help(text));
    }
    lines
}

/// Indices of `options` containing `filter`, ignoring case.
fn filtered(options: &[String], filter: &str) -> Vec<usize> {
    let needle = filter.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, o)| o.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// First visible row of a page of `page_size` rows containing `index`.
const fn page_start(index: usize, page_size: usize) -> usize {
    if index < page_size {
        0
    } else {
        index + 1 - page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_ignores_case() {
        let options = ["Red", "blue", "Green"].map(String::from);
        assert_eq!(filtered(&options, "E"), [0, 1, 2]);
        assert_eq!(filtered(&options, "BL"), [1]);
        assert!(filtered(&options, "x").is_empty());
    }

    #[test]
    fn paging() {
        assert_eq!(page_start(0, 7), 0);
        assert_eq!(page_start(6, 7), 0);
        assert_eq!(page_start(7, 7), 1);
        assert_eq!(page_start(12, 7), 6);
    }
}
