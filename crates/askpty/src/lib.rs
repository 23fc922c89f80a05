//! askpty: drive interactive terminal programs from tests.
//!
//! A [`VirtualConsole`] owns one side of a pseudo-terminal. The program
//! under test (a child process, or prompt code running in the test itself)
//! gets the other side through a [`Tty`] and believes it is talking to a
//! person at an xterm. The test types with [`VirtualConsole::send_line`]
//! and [`VirtualConsole::send_key`], waits for output with
//! [`VirtualConsole::expect`], and inspects the rendered [`screen`].
//!
//! Because a prompting program blocks on its terminal, the typing side
//! usually runs in the background: a [`Dialogue`] is handed to a
//! [`Driver`], and a [`Harness`] ties the two together.
//!
//! # Example
//!
//! ```rust,no_run
//! use askpty::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     askpty::logging::init()?;
//!
//!     let report = Harness::new()
//!         .run_command("my-survey", std::iter::empty::<&str>(), dialogue! {
//!             expect "What is your name?";
//!             sendln "Johnny Appleseed";
//!             expect "Choose a color:";
//!             key ArrowDown;
//!             key Enter;
//!             expect_eof
//!         })
//!         .await?;
//!
//!     assert!(report.status.success());
//!     println!("{}", report.screen);
//!     Ok(())
//! }
//! ```

pub use askpty_macros::dialogue;
pub use askpty_pty::{ExitStatus, PtyChild, PtyConfig, PtySignal, WindowSize};

pub mod config;
pub mod console;
pub mod dialogue;
pub mod driver;
pub mod error;
pub mod expect;
pub mod harness;
pub mod keys;
pub mod logging;
pub mod prelude;
pub mod screen;
pub mod tty;

pub use config::{ConsoleConfig, EnvConfig, LineEnding};
pub use console::VirtualConsole;
pub use dialogue::{Dialogue, DialogueExecutor, DialogueResult, Step, StepRecord};
pub use driver::{Driver, DriverHandle};
pub use error::{ConsoleError, Result};
pub use expect::{ExpectBuffer, Match, Pattern};
pub use harness::{Harness, InProcessReport, RunReport};
pub use keys::Key;
pub use screen::{Screen, ScreenState, strip_trailing_empty_lines};
pub use tty::Tty;

/// Items used by code generated from [`dialogue!`].
#[doc(hidden)]
pub mod __private {
    pub use regex::Regex;
}
