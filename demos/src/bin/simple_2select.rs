//! Asks for a name, then two selects: a color and an extra.

use askpty_demos::{ask_or_report, color_question, extras_select, init_logging, name_question};
use serde::Deserialize;

#[derive(Deserialize)]
struct Answers {
    name: String,
    color: String,
    extras: String,
}

fn main() {
    init_logging();

    let questions = [name_question(), color_question(), extras_select()];
    let Some(answers) = ask_or_report::<Answers>(&questions) else {
        return;
    };
    println!(
        "{} chose {}, extras={}",
        answers.name, answers.color, answers.extras
    );
}
