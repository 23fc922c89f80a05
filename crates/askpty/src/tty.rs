//! The program-facing end of a virtual console.

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::os::unix::io::OwnedFd;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use askpty_pty::{PtyChild, PtyConfig, spawn_child};

use crate::error::{ConsoleError, Result};

/// Shared handle to the slave side of a console's pseudo-terminal.
///
/// Clones refer to the same descriptor. Programs get duplicates of it,
/// either as a spawned child's stdio or as a [`File`] for in-process
/// prompts. The console sees end-of-file only after [`Tty::close`] has
/// been called and every duplicate handed out has been dropped.
#[derive(Debug, Clone)]
pub struct Tty {
    fd: Arc<Mutex<Option<OwnedFd>>>,
    path: Arc<str>,
    term: Arc<str>,
}

impl Tty {
    pub(crate) fn new(fd: OwnedFd, path: &str, term: &str) -> Self {
        Self {
            fd: Arc::new(Mutex::new(Some(fd))),
            path: Arc::from(path),
            term: Arc::from(term),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<OwnedFd>> {
        self.fd.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Device path, e.g. `/dev/pts/4`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Duplicate the descriptor.
    pub fn try_clone_fd(&self) -> Result<OwnedFd> {
        let guard = self.lock();
        let fd = guard.as_ref().ok_or(ConsoleError::TtyClosed)?;
        ConsoleError::with_io_context(fd.try_clone(), "duplicating tty descriptor")
    }

    /// Duplicate the descriptor as a file, for prompts read and written
    /// in-process.
    pub fn file(&self) -> Result<File> {
        self.try_clone_fd().map(File::from)
    }

    /// Start `program` with this terminal as its stdin, stdout and stderr.
    ///
    /// `TERM` is set to the console's configured value unless `config` adds one.
    pub fn spawn<S, I>(&self, program: S, args: I, config: &PtyConfig) -> Result<PtyChild>
    where
        S: AsRef<OsStr>,
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let mut config = config.clone();
        config
            .env_add
            .entry(OsString::from("TERM"))
            .or_insert_with(|| OsString::from(self.term.as_ref()));

        let guard = self.lock();
        let fd = guard.as_ref().ok_or(ConsoleError::TtyClosed)?;
        Ok(spawn_child(fd, program, args, &config)?)
    }

    /// Drop this handle's descriptor. Idempotent.
    pub fn close(&self) {
        if self.lock().take().is_some() {
            tracing::debug!(path = %self.path, "closed tty");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::VirtualConsole;

    #[tokio::test]
    async fn closed_tty_refuses_work() {
        let console = VirtualConsole::new().unwrap();
        let tty = console.tty();
        let other = tty.clone();

        tty.close();
        tty.close();
        assert!(other.is_closed());
        assert!(matches!(other.file(), Err(ConsoleError::TtyClosed)));
        assert!(matches!(
            other.spawn("true", std::iter::empty::<&str>(), &PtyConfig::default()),
            Err(ConsoleError::TtyClosed)
        ));
    }

    #[tokio::test]
    async fn file_writes_reach_console() {
        let mut console = VirtualConsole::new().unwrap();
        let tty = console.tty();
        assert!(tty.path().starts_with("/dev/"));

        let mut file = tty.file().unwrap();
        file.write_all(b"hello from the slave").unwrap();
        console.expect_string("from the slave").await.unwrap();
    }
}
