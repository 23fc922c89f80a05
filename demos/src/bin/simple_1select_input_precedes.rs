//! Two text inputs, then the select.

use askpty_demos::{ask_or_report, color_question, extras_input, init_logging, name_question};
use serde::Deserialize;

#[derive(Deserialize)]
struct Answers {
    name: String,
    color: String,
    extras: String,
}

fn main() {
    init_logging();

    let questions = [name_question(), extras_input(), color_question()];
    let Some(answers) = ask_or_report::<Answers>(&questions) else {
        return;
    };
    println!(
        "{} chose {}, extras={}",
        answers.name, answers.color, answers.extras
    );
}
