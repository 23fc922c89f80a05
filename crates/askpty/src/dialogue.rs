//! Scripted conversations with a program.
//!
//! A [`Dialogue`] is an ordered list of [`Step`]s: wait for some output,
//! type an answer, press a key. Scripts are built with the builder methods
//! on [`Dialogue`] or with the [`dialogue!`](crate::dialogue!) macro and run
//! by a [`DialogueExecutor`].

pub mod definition;
pub mod executor;

pub use definition::{Dialogue, Step};
pub use executor::{DialogueExecutor, DialogueResult, StepRecord};
