//! Asking one prompt or a whole questionnaire.

use serde::de::DeserializeOwned;

use crate::answer::{Answer, Answers};
use crate::error::{PromptError, Result};
use crate::prompts::{self, Prompt};
use crate::question::Question;
use crate::stdio::Stdio;
use crate::terminal::Terminal;

/// Settings an [`AskOpt`] can change.
#[derive(Debug, Default)]
pub struct AskOptions {
    /// Where to read keys and draw. The process terminal when unset.
    pub stdio: Option<Stdio>,
}

/// A callback adjusting [`AskOptions`]. A failing callback aborts the ask
/// before anything is drawn.
pub type AskOpt = Box<dyn FnOnce(&mut AskOptions) -> Result<()> + Send>;

/// Read keys from and draw to `stdio`.
#[must_use]
pub fn with_stdio(stdio: Stdio) -> AskOpt {
    Box::new(move |options| {
        options.stdio = Some(stdio);
        Ok(())
    })
}

fn resolve(opts: Vec<AskOpt>) -> Result<Stdio> {
    let mut options = AskOptions::default();
    for opt in opts {
        opt(&mut options).map_err(|e| match e {
            e @ PromptError::Options(_) => e,
            other => PromptError::Options(other.to_string()),
        })?;
    }
    match options.stdio {
        Some(stdio) => Ok(stdio),
        None => Ok(Stdio::inherit()?),
    }
}

/// Ask a single prompt.
///
/// ```rust,no_run
/// use askpty_prompt::{Select, ask_one};
///
/// let color = ask_one(&Select::new("Choose a color:", ["red", "blue", "green"]), vec![])?;
/// println!("{color}");
/// # Ok::<(), askpty_prompt::PromptError>(())
/// ```
pub fn ask_one(prompt: &dyn Prompt, opts: Vec<AskOpt>) -> Result<Answer> {
    let mut stdio = resolve(opts)?;
    let mut term = Terminal::new(&mut stdio)?;
    prompts::run(prompt, &mut term, None, None)
}

/// Ask `questions` in order, collecting answers by name.
///
/// Stops at the first error; answers given so far are discarded.
pub fn ask(questions: &[Question], opts: Vec<AskOpt>) -> Result<Answers> {
    let mut stdio = resolve(opts)?;
    let mut term = Terminal::new(&mut stdio)?;
    let mut answers = Answers::new();

    for question in questions {
        tracing::debug!(name = %question.name, "asking");
        let answer = prompts::run(
            question.prompt.as_ref(),
            &mut term,
            question.validator.as_ref(),
            question.transform.as_ref(),
        )
        .inspect_err(|e| tracing::debug!(name = %question.name, error = %e, "question failed"))?;
        answers.insert(question.name.clone(), answer);
    }

    Ok(answers)
}

/// [`ask`], then decode the answers into `T` by field name.
///
/// ```rust,no_run
/// use askpty_prompt::{Input, Question, ask_into};
///
/// #[derive(serde::Deserialize)]
/// struct Reply {
///     name: String,
/// }
///
/// let reply: Reply = ask_into(&[Question::new("name", Input::new("Name?"))], vec![])?;
/// # Ok::<(), askpty_prompt::PromptError>(())
/// ```
pub fn ask_into<T: DeserializeOwned>(questions: &[Question], opts: Vec<AskOpt>) -> Result<T> {
    let answers = ask(questions, opts)?;
    let value = serde_json::to_value(&answers)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::prompts::{Confirm, Input, MultiSelect, Select};
    use crate::question::{transform, validate};
    use crate::terminal::tests::scripted;

    fn questions() -> Vec<Question> {
        vec![
            Question::new("name", Input::new("What is your name?"))
                .validate(validate::required())
                .transform(transform::title()),
            Question::new("color", Select::new("Choose a color:", ["red", "blue", "green"])),
            Question::new("extras", MultiSelect::new("Extras:", ["bacon", "cheese"])),
            Question::new("hungry", Confirm::new("Hungry?")),
        ]
    }

    #[test]
    fn collects_in_order() {
        let (stdio, out) = scripted(b"\rjohnny appleseed\r\x1b[B\r \ry\r");
        let answers = ask(&questions(), vec![with_stdio(stdio)]).unwrap();

        assert_eq!(answers.get("name"), Some(&Answer::from("Johnny Appleseed")));
        assert_eq!(answers.get("color"), Some(&Answer::from("blue")));
        assert_eq!(answers.get("extras"), Some(&Answer::List(vec!["bacon".into()])));
        assert_eq!(answers.get("hungry"), Some(&Answer::Bool(true)));
        assert!(out.text().contains("Sorry, your reply was invalid: Value is required"));
    }

    #[test]
    fn decodes_into_struct() {
        #[derive(Deserialize)]
        struct Order {
            name: String,
            color: String,
            extras: Vec<String>,
            hungry: bool,
        }

        let (stdio, _) = scripted(b"ann\r\r\x1b[C\rn\r");
        let order: Order = ask_into(&questions(), vec![with_stdio(stdio)]).unwrap();
        assert_eq!(order.name, "Ann");
        assert_eq!(order.color, "red");
        assert_eq!(order.extras, ["bacon", "cheese"]);
        assert!(!order.hungry);
    }

    #[test]
    fn mismatched_struct_is_decode_error() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrong {
            name: u32,
        }

        let (stdio, _) = scripted(b"ann\r");
        let err = ask_into::<Wrong>(
            &[Question::new("name", Input::new("Name?"))],
            vec![with_stdio(stdio)],
        )
        .unwrap_err();
        assert!(matches!(err, PromptError::Decode(_)));
    }

    #[test]
    fn failing_option_aborts() {
        let bad: AskOpt = Box::new(|_| Err(PromptError::Options("no terminal".into())));
        let err = ask_one(&Input::new("x"), vec![bad]).unwrap_err();
        assert_eq!(err.to_string(), "invalid ask option: no terminal");
    }

    #[test]
    fn interrupt_stops_questionnaire() {
        let (stdio, _) = scripted(b"ann\r\x03");
        let err = ask(&questions(), vec![with_stdio(stdio)]).unwrap_err();
        assert!(matches!(err, PromptError::Interrupted));
    }
}
