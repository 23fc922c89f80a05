//! Named questions with validation and answer transforms.

use std::fmt;

use crate::answer::Answer;
use crate::prompts::Prompt;

/// Checks an answer. `Err` carries the message shown before re-asking.
pub type Validator = Box<dyn Fn(&Answer) -> Result<(), String> + Send + Sync>;

/// Rewrites an accepted answer.
pub type Transformer = Box<dyn Fn(Answer) -> Answer + Send + Sync>;

/// One entry of a questionnaire.
///
/// ```rust
/// use askpty_prompt::{Input, Question, transform, validate};
///
/// let question = Question::new("name", Input::new("What is your name?"))
///     .validate(validate::required())
///     .transform(transform::title());
/// assert_eq!(question.name, "name");
/// ```
pub struct Question {
    /// Key of the answer in [`Answers`](crate::Answers).
    pub name: String,
    pub(crate) prompt: Box<dyn Prompt + Send + Sync>,
    pub(crate) validator: Option<Validator>,
    pub(crate) transform: Option<Transformer>,
}

impl Question {
    /// Ask `prompt` and store the answer under `name`.
    pub fn new(name: impl Into<String>, prompt: impl Prompt + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            prompt: Box::new(prompt),
            validator: None,
            transform: None,
        }
    }

    /// Re-ask until `validator` accepts the answer.
    #[must_use]
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Rewrite the validated answer.
    #[must_use]
    pub fn transform(mut self, transform: Transformer) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("name", &self.name)
            .field("message", &self.prompt.message())
            .field("validated", &self.validator.is_some())
            .field("transformed", &self.transform.is_some())
            .finish()
    }
}

fn text_len(answer: &Answer) -> usize {
    match answer {
        Answer::String(s) => s.chars().count(),
        Answer::List(items) => items.len(),
        Answer::Bool(_) => 1,
    }
}

/// Stock validators.
pub mod validate {
    use super::{Validator, text_len};
    use crate::answer::Answer;

    /// Reject empty strings and empty lists.
    #[must_use]
    pub fn required() -> Validator {
        Box::new(|answer| match answer {
            Answer::String(s) if s.is_empty() => Err("Value is required".to_string()),
            Answer::List(items) if items.is_empty() => Err("Value is required".to_string()),
            _ => Ok(()),
        })
    }

    /// Reject answers shorter than `min` characters (or items).
    #[must_use]
    pub fn min_length(min: usize) -> Validator {
        Box::new(move |answer| {
            if text_len(answer) < min {
                Err(format!("value is too short. Min length is {min}"))
            } else {
                Ok(())
            }
        })
    }

    /// Reject answers longer than `max` characters (or items).
    #[must_use]
    pub fn max_length(max: usize) -> Validator {
        Box::new(move |answer| {
            if text_len(answer) > max {
                Err(format!("value is too long. Max length is {max}"))
            } else {
                Ok(())
            }
        })
    }

    /// Run `validators` in order; the first failure wins.
    #[must_use]
    pub fn compose(validators: Vec<Validator>) -> Validator {
        Box::new(move |answer| validators.iter().try_for_each(|v| v(answer)))
    }
}

/// Stock transforms. Strings are rewritten directly; lists item by item;
/// booleans pass through.
pub mod transform {
    use super::Transformer;
    use crate::answer::Answer;

    fn map_text(f: fn(&str) -> String) -> Transformer {
        Box::new(move |answer| match answer {
            Answer::String(s) => Answer::String(f(&s)),
            Answer::List(items) => Answer::List(items.iter().map(|s| f(s)).collect()),
            other @ Answer::Bool(_) => other,
        })
    }

    /// Capitalize each word and lowercase the rest of it.
    pub(crate) fn title_case(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut word_start = true;
        for c in s.chars() {
            if c.is_alphanumeric() {
                if word_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.extend(c.to_lowercase());
                }
                word_start = false;
            } else {
                out.push(c);
                word_start = true;
            }
        }
        out
    }

    /// `"johnny APPLESEED"` becomes `"Johnny Appleseed"`.
    #[must_use]
    pub fn title() -> Transformer {
        map_text(title_case)
    }

    /// Lowercase.
    #[must_use]
    pub fn to_lower() -> Transformer {
        map_text(str::to_lowercase)
    }

    /// Uppercase.
    #[must_use]
    pub fn to_upper() -> Transformer {
        map_text(str::to_uppercase)
    }

    /// Apply `transforms` in order.
    #[must_use]
    pub fn compose(transforms: Vec<Transformer>) -> Transformer {
        Box::new(move |answer| transforms.iter().fold(answer, |acc, t| t(acc)))
    }
}
