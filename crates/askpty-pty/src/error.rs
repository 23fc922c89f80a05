//! Error types for the askpty-pty crate.
//!
//! Every fallible operation in this crate returns [`PtyError`].

use std::io;

/// The error type for pseudo-terminal operations.
#[derive(Debug, thiserror::Error)]
pub enum PtyError {
    /// Failed to allocate the master/slave pair.
    #[error("failed to create PTY: {0}")]
    Create(#[source] io::Error),

    /// Failed to spawn a child process on the slave side.
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] io::Error),

    /// An I/O error occurred during PTY operations.
    #[error("PTY I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to set terminal attributes.
    #[error("failed to set terminal attributes: {0}")]
    SetAttributes(#[source] io::Error),

    /// Failed to get terminal attributes.
    #[error("failed to get terminal attributes: {0}")]
    GetAttributes(#[source] io::Error),

    /// Failed to resize the PTY.
    #[error("failed to resize PTY: {0}")]
    Resize(#[source] io::Error),

    /// The child process has already exited.
    #[error("child process already exited ({0})")]
    AlreadyExited(String),

    /// Failed to send a signal to the child process.
    #[error("failed to send signal: {0}")]
    Signal(#[source] io::Error),

    /// Failed to wait for the child process.
    #[error("failed to wait for child: {0}")]
    Wait(#[source] io::Error),

    /// Invalid window size specified.
    #[error("invalid window size: {cols}x{rows}")]
    InvalidWindowSize {
        /// The requested column count.
        cols: u16,
        /// The requested row count.
        rows: u16,
    },
}

/// A specialized Result type for PTY operations.
pub type Result<T> = std::result::Result<T, PtyError>;

#[cfg(unix)]
impl From<rustix::io::Errno> for PtyError {
    fn from(errno: rustix::io::Errno) -> Self {
        Self::Io(os_error(errno))
    }
}

/// Convert a rustix errno into a `std::io::Error`.
#[cfg(unix)]
pub(crate) fn os_error(errno: rustix::io::Errno) -> io::Error {
    io::Error::from_raw_os_error(errno.raw_os_error())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PtyError::InvalidWindowSize { cols: 0, rows: 24 };
        assert_eq!(err.to_string(), "invalid window size: 0x24");
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let pty_err: PtyError = io_err.into();
        assert!(matches!(pty_err, PtyError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn errno_keeps_os_code() {
        let err = os_error(rustix::io::Errno::IO);
        assert_eq!(err.raw_os_error(), Some(libc::EIO));
    }
}
