//! Dialogues built by the macro and by hand agree.

use std::time::Duration;

use askpty::{Dialogue, Key, Pattern, Step, dialogue};

#[test]
fn macro_matches_builder() {
    let from_macro = dialogue! {
        timeout Duration::from_secs(3);
        expect "What is your name?";
        sendln "Johnny Appleseed";
        send "b";
        key Backspace;
        ctrl 'u';
        wait Duration::from_millis(10);
        expect_eof
    };

    let by_hand = Dialogue::default()
        .timeout(Duration::from_secs(3))
        .expect("What is your name?")
        .send_line("Johnny Appleseed")
        .send("b")
        .send_key(Key::Backspace)
        .send_key(Key::Control(0x15))
        .wait(Duration::from_millis(10))
        .expect_eof();

    assert_eq!(from_macro, by_hand);
}

#[test]
fn macro_regex_and_step_timeout() {
    let script = dialogue! {
        expect_re r"chose (\w+)", Duration::from_secs(2)
    };
    match &script.steps[0] {
        Step::Expect {
            pattern: Pattern::Regex(re),
            timeout,
        } => {
            assert_eq!(re.as_str(), r"chose (\w+)");
            assert_eq!(*timeout, Some(Duration::from_secs(2)));
        }
        other => panic!("unexpected step {other}"),
    }
}

#[test]
fn empty_macro() {
    let script = dialogue! {};
    assert!(script.is_empty());
}
