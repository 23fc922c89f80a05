//! Unix implementation of the pseudo-terminal layer.
//!
//! - pair allocation via openpt/grantpt/unlockpt
//! - async master I/O through tokio's `AsyncFd`
//! - child processes with a new session and controlling terminal
//! - raw-mode switching for the slave side

mod child;
mod pty;
mod termios;

pub use child::{ExitStatus, PtyChild, spawn_child};
pub use pty::PtyMaster;
pub use termios::{RawMode, is_terminal};
