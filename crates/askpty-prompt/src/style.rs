//! How prompt lines look.

use crossterm::style::Stylize;

pub(crate) const ERROR_PREFIX: &str = "Sorry, your reply was invalid: ";

/// `? message ` with the message kept contiguous.
pub(crate) fn question(message: &str) -> String {
    format!("{} {} ", "?".green().bold(), message.bold())
}

pub(crate) fn answer(text: &str) -> String {
    text.cyan().to_string()
}

pub(crate) fn hint(text: &str) -> String {
    format!("[{text}]").cyan().to_string()
}

pub(crate) fn error(message: &str) -> String {
    format!("✘ {ERROR_PREFIX}{message}").red().to_string()
}

pub(crate) fn help(text: &str) -> String {
    format!("ⓘ {text}").cyan().to_string()
}

pub(crate) fn option(text: &str, highlighted: bool) -> String {
    if highlighted {
        format!("> {text}").cyan().to_string()
    } else {
        format!("  {text}")
    }
}

pub(crate) fn checkbox(text: &str, checked: bool, highlighted: bool) -> String {
    let mark = if checked { "[x]" } else { "[ ]" };
    let body = format!("{mark} {text}");
    if highlighted {
        format!("> {body}").cyan().to_string()
    } else {
        format!("  {body}")
    }
}

/// Summary left on screen once a prompt is answered.
pub(crate) fn summary(message: &str, shown: &str) -> String {
    if shown.is_empty() {
        question(message).trim_end().to_string()
    } else {
        format!("{}{}", question(message), answer(shown))
    }
}
