//! Prompts driven through a virtual console in the same process.

use std::time::Duration;

use askpty::{ConsoleConfig, Dialogue, Harness, Key, dialogue};
use askpty_prompt::{
    Answer, Confirm, Input, MultiSelect, Password, Prompt, PromptError, Question, Select, Stdio,
    ask, ask_one, transform, validate, with_stdio,
};

fn harness() -> Harness {
    askpty::logging::init_for_tests();
    Harness::with_config(ConsoleConfig::default().expect_timeout(Duration::from_secs(10)))
}

fn colors() -> Select {
    Select::new("Choose a color:", ["red", "blue", "green"])
}

#[tokio::test(flavor = "multi_thread")]
async fn select_filter_then_arrow() {
    let dialogue = Dialogue::default()
        .expect("Choose a color")
        .send("b")
        .send_key(Key::Backspace)
        .send_key(Key::ArrowDown)
        .send_line("");

    let report = harness()
        .run_in_process(dialogue, |tty| {
            let mut stdio = Stdio::from_tty(tty.file().unwrap()).unwrap();
            colors().prompt(&mut stdio)
        })
        .await
        .unwrap();

    assert_eq!(report.value.unwrap(), "blue");
    assert!(report.screen.contains("Choose a color: blue"));
}

#[tokio::test(flavor = "multi_thread")]
async fn ask_one_typed_line() {
    let dialogue = dialogue! {
        expect "Choose a color";
        sendln "blue"
    };

    let report = harness()
        .run_in_process(dialogue, |tty| {
            let stdio = Stdio::from_tty(tty.file().unwrap()).unwrap();
            ask_one(&colors(), vec![with_stdio(stdio)])
        })
        .await
        .unwrap();

    assert_eq!(report.value.unwrap(), Answer::from("blue"));
}

#[tokio::test(flavor = "multi_thread")]
async fn questionnaire_with_validation() {
    let dialogue = dialogue! {
        expect "What is your name?";
        key Enter;
        expect "Sorry, your reply was invalid: Value is required";
        sendln "johnny appleseed";
        expect "Secret:";
        sendln "hunter2";
        expect "Toppings:";
        key Space;
        key ArrowDown;
        key ArrowDown;
        key Space;
        key Enter;
        expect "(y/N)";
        sendln "yes"
    };

    let report = harness()
        .run_in_process(dialogue, |tty| {
            let questions = [
                Question::new("name", Input::new("What is your name?"))
                    .validate(validate::required())
                    .transform(transform::title()),
                Question::new("secret", Password::new("Secret:")),
                Question::new(
                    "toppings",
                    MultiSelect::new("Toppings:", ["bacon", "cheese", "pickles"]),
                ),
                Question::new("agree", Confirm::new("Agree?")),
            ];
            let stdio = Stdio::from_tty(tty.file().unwrap()).unwrap();
            ask(&questions, vec![with_stdio(stdio)])
        })
        .await
        .unwrap();

    let answers = report.value.unwrap();
    assert_eq!(answers["name"], "Johnny Appleseed");
    assert_eq!(answers["secret"], "hunter2");
    assert_eq!(
        answers["toppings"],
        Answer::List(vec!["bacon".into(), "pickles".into()])
    );
    assert_eq!(answers["agree"], Answer::Bool(true));

    assert!(report.screen.contains("What is your name? Johnny Appleseed"));
    assert!(!report.screen.contains("hunter2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn interrupt_reaches_caller() {
    let dialogue = dialogue! {
        expect "Choose a color";
        ctrl 'c'
    };

    let report = harness()
        .run_in_process(dialogue, |tty| {
            let mut stdio = Stdio::from_tty(tty.file().unwrap()).unwrap();
            colors().prompt(&mut stdio)
        })
        .await
        .unwrap();

    assert!(matches!(report.value, Err(PromptError::Interrupted)));
}

#[tokio::test(flavor = "multi_thread")]
async fn raw_mode_restored_after_prompt() {
    let dialogue = dialogue! {
        expect "Name?";
        sendln "ann";
        expect "typed: ";
        sendln "cooked"
    };

    let report = harness()
        .run_in_process(dialogue, |tty| {
            use std::io::{BufRead, BufReader, Write};

            let file = tty.file().unwrap();
            let mut stdio = Stdio::from_tty(file.try_clone().unwrap()).unwrap();
            let name = Input::new("Name?").prompt(&mut stdio).unwrap();
            drop(stdio);

            // Canonical mode again: a whole line arrives with its newline.
            let mut out = file.try_clone().unwrap();
            out.write_all(b"typed: ").unwrap();
            let mut line = String::new();
            BufReader::new(file).read_line(&mut line).unwrap();
            (name, line)
        })
        .await
        .unwrap();

    let (name, line) = report.value;
    assert_eq!(name, "ann");
    assert_eq!(line, "cooked\n");
}
