//! Where prompts read keys from and draw to.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::io::{AsFd, OwnedFd};

use askpty_pty::is_terminal;

/// Input and output for prompts.
///
/// When the input is a terminal, prompts switch it to raw mode while they
/// run so every key arrives as it is pressed.
pub struct Stdio {
    pub(crate) input: Box<dyn Read + Send>,
    pub(crate) output: Box<dyn Write + Send>,
    pub(crate) tty: Option<OwnedFd>,
}

impl Stdio {
    /// Arbitrary reader and writer. No terminal modes are touched.
    pub fn new(input: impl Read + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            tty: None,
        }
    }

    /// Read and write one terminal device, e.g. the slave of a pty.
    pub fn from_tty(tty: File) -> io::Result<Self> {
        let output = tty.try_clone()?;
        let mode_fd = tty.as_fd().try_clone_to_owned()?;
        Ok(Self {
            input: Box::new(tty),
            output: Box::new(output),
            tty: Some(mode_fd),
        })
    }

    /// The process's own stdin and stdout.
    pub fn inherit() -> io::Result<Self> {
        let stdin = io::stdin();
        let tty = if is_terminal(&stdin) {
            Some(stdin.as_fd().try_clone_to_owned()?)
        } else {
            None
        };
        Ok(Self {
            input: Box::new(stdin),
            output: Box::new(io::stdout()),
            tty,
        })
    }

    /// Whether raw mode will be applied.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.tty.is_some()
    }
}

impl fmt::Debug for Stdio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stdio")
            .field("terminal", &self.tty.is_some())
            .finish_non_exhaustive()
    }
}
