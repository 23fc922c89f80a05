//! Asks for a name and a color.

use askpty_demos::{ask_or_report, color_question, init_logging, name_question};
use serde::Deserialize;

#[derive(Deserialize)]
struct Answers {
    name: String,
    color: String,
}

fn main() {
    init_logging();

    let questions = [name_question(), color_question()];
    let Some(answers) = ask_or_report::<Answers>(&questions) else {
        return;
    };
    println!("{} chose {}.", answers.name, answers.color);
}
