//! The types most tests need, in one import.
//!
//! ```rust
//! use askpty::prelude::*;
//!
//! let steps = Dialogue::default().expect("name?").send_line("Johnny");
//! assert_eq!(steps.len(), 2);
//! ```

pub use crate::config::{ConsoleConfig, LineEnding};
pub use crate::console::VirtualConsole;
pub use crate::dialogue;
pub use crate::dialogue::{Dialogue, DialogueResult, Step};
pub use crate::driver::Driver;
pub use crate::error::{ConsoleError, Result};
pub use crate::expect::{Match, Pattern};
pub use crate::harness::{Harness, InProcessReport, RunReport};
pub use crate::keys::Key;
pub use crate::screen::ScreenState;
pub use crate::tty::Tty;
