//! Survey-style interactive prompts.
//!
//! Five prompt kinds ([`Input`], [`Password`], [`Confirm`], [`Select`] and
//! [`MultiSelect`]) draw on a terminal and read keys one at a time. They can
//! be asked directly, one at a time with [`ask_one`], or as a named
//! questionnaire with [`ask`] and [`ask_into`].
//!
//! # Example
//!
//! ```rust,no_run
//! use askpty_prompt::{Input, Question, Select, ask, transform, validate};
//!
//! let questions = [
//!     Question::new("name", Input::new("What is your name?"))
//!         .validate(validate::required())
//!         .transform(transform::title()),
//!     Question::new("color", Select::new("Choose a color:", ["red", "blue", "green"])),
//! ];
//! let answers = ask(&questions, vec![])?;
//! println!("{} chose {}.", answers["name"], answers["color"]);
//! # Ok::<(), askpty_prompt::PromptError>(())
//! ```
//!
//! Prompts talk to the process terminal unless given a [`Stdio`] through
//! [`with_stdio`]. Pointing one at the slave of a pseudo-terminal lets a
//! test drive it like a user would.

pub mod answer;
pub mod ask;
pub mod error;
pub mod keys;
pub mod prompts;
pub mod question;
pub mod stdio;
mod style;
pub mod terminal;

pub use answer::{Answer, Answers};
pub use ask::{AskOpt, AskOptions, ask, ask_into, ask_one, with_stdio};
pub use error::{PromptError, Result};
pub use prompts::{Confirm, Input, MultiSelect, Password, Prompt, Select};
pub use question::{Question, Transformer, Validator, transform, validate};
pub use stdio::Stdio;
