//! Questions and setup shared by the demo programs.
//!
//! Each binary asks a few questions on the process terminal and prints one
//! line summarizing the answers. When asking fails the error message is
//! printed instead and the program stops.

use askpty_prompt::{Input, PromptError, Question, Select, transform, validate};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

/// Colors offered by every demo.
pub const COLORS: [&str; 3] = ["red", "blue", "green"];

/// Extras offered by the select variant.
pub const EXTRAS: [&str; 3] = ["bacon", "cheese", "pickles"];

/// Log to stderr, filtered by `ASKPTY_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("ASKPTY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Required name, title-cased.
#[must_use]
pub fn name_question() -> Question {
    Question::new("name", Input::new("What is your name?"))
        .validate(validate::required())
        .transform(transform::title())
}

/// Pick one of [`COLORS`].
#[must_use]
pub fn color_question() -> Question {
    Question::new("color", Select::new("Choose a color:", COLORS)).validate(validate::required())
}

/// Pick one of [`EXTRAS`].
#[must_use]
pub fn extras_select() -> Question {
    Question::new("extras", Select::new("Choose your extras:", EXTRAS))
        .validate(validate::required())
}

/// Free-text extras, title-cased.
#[must_use]
pub fn extras_input() -> Question {
    Question::new("extras", Input::new("Choose your extras (type it in):"))
        .validate(validate::required())
        .transform(transform::title())
}

/// Ask `questions` on the process terminal and decode the answers.
///
/// On failure the error is printed to stdout and `None` returned.
pub fn ask_or_report<T: DeserializeOwned>(questions: &[Question]) -> Option<T> {
    match askpty_prompt::ask_into(questions, vec![]) {
        Ok(answers) => Some(answers),
        Err(e) => {
            report(&e);
            None
        }
    }
}

fn report(error: &PromptError) {
    tracing::debug!(error = ?error, "asking failed");
    println!("{error}");
}
