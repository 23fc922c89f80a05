//! Console behavior against real programs, without the harness.

#![cfg(unix)]

use std::time::Duration;

use askpty::{ConsoleConfig, PtyConfig, VirtualConsole};

fn console() -> VirtualConsole {
    askpty::logging::init_for_tests();
    VirtualConsole::with_config(ConsoleConfig::default().expect_timeout(Duration::from_secs(10)))
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn closing_tty_after_exit_reaches_eof() {
    let mut console = console();
    let tty = console.tty();
    let mut child = tty
        .spawn("sh", ["-c", "echo finished"], &PtyConfig::default())
        .unwrap();

    console.expect_string("finished").await.unwrap();
    assert!(child.wait().await.unwrap().success());

    tty.close();
    console.expect_eof().await.unwrap();
    assert!(console.is_eof());
}

#[tokio::test(flavor = "multi_thread")]
async fn screen_shows_redrawn_prompt() {
    let mut console = console();
    let tty = console.tty();
    let script = r"printf '? Choose:\r\n> red\r\n  blue\r\n'; printf '\033[3A\r\033[J? Choose: blue\r\n'";
    let mut child = tty.spawn("sh", ["-c", script], &PtyConfig::default()).unwrap();
    tty.close();

    console.expect_eof().await.unwrap();
    child.wait().await.unwrap();
    assert_eq!(console.screen().snapshot(), "? Choose: blue");
}

#[tokio::test(flavor = "multi_thread")]
async fn env_reaches_child() {
    let mut console = console();
    let tty = console.tty();
    let config = PtyConfig::builder().env("SURVEY_NAME", "Johnny").build();
    let _child = tty
        .spawn("sh", ["-c", "echo \"name=$SURVEY_NAME\""], &config)
        .unwrap();

    console.expect_string("name=Johnny").await.unwrap();
}
