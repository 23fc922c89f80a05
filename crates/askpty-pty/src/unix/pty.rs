//! Pseudo-terminal pair allocation.
//!
//! The master side is what a harness reads and writes; the slave side is
//! handed to programs as their terminal.

use std::io;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use rustix::fs::{Mode, OFlags, fcntl_setfl, open};
use rustix::io::Errno;
use rustix::pty::{OpenptFlags, grantpt, openpt, ptsname, unlockpt};
use rustix::termios::{Winsize, tcgetwinsize, tcsetwinsize};
use tokio::io::unix::AsyncFd;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::config::WindowSize;
use crate::error::{PtyError, Result, os_error};

/// Master side of a pseudo-terminal.
///
/// Reads yield what programs write to the slave; writes arrive on the
/// slave as keyboard input. Once no slave descriptor remains open anywhere,
/// reads report end-of-file.
pub struct PtyMaster {
    async_fd: AsyncFd<OwnedFd>,
    slave_path: String,
}

impl std::fmt::Debug for PtyMaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyMaster")
            .field("fd", &self.async_fd.as_raw_fd())
            .field("slave", &self.slave_path)
            .finish()
    }
}

impl PtyMaster {
    /// Allocate a new pair and open its slave side.
    ///
    /// Must be called within a Tokio runtime. The slave is opened with
    /// `O_NOCTTY` so the calling process never acquires it as its own
    /// controlling terminal.
    pub fn open(size: WindowSize) -> Result<(Self, OwnedFd)> {
        let size = size.validate()?;
        let create = |e: Errno| PtyError::Create(os_error(e));

        let master_fd = openpt(OpenptFlags::RDWR | OpenptFlags::NOCTTY).map_err(create)?;
        grantpt(&master_fd).map_err(create)?;
        unlockpt(&master_fd).map_err(create)?;

        let slave_name = ptsname(&master_fd, Vec::new()).map_err(create)?;
        let slave_path = slave_name
            .to_str()
            .map_err(|_| {
                PtyError::Create(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "invalid slave path encoding",
                ))
            })?
            .to_string();

        let slave = open(
            Path::new(&slave_path),
            OFlags::RDWR | OFlags::NOCTTY | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(create)?;

        fcntl_setfl(&master_fd, OFlags::NONBLOCK).map_err(create)?;
        let async_fd = AsyncFd::new(master_fd).map_err(PtyError::Create)?;

        let master = Self {
            async_fd,
            slave_path,
        };
        master.set_window_size(size)?;

        tracing::debug!(slave = %master.slave_path, cols = size.cols, rows = size.rows, "allocated pty");
        Ok((master, slave))
    }

    /// Path of the slave device, e.g. `/dev/pts/3`.
    #[must_use]
    pub fn slave_path(&self) -> &str {
        &self.slave_path
    }

    /// Set the window size.
    pub fn set_window_size(&self, size: WindowSize) -> Result<()> {
        let size = size.validate()?;
        let winsize = Winsize {
            ws_col: size.cols,
            ws_row: size.rows,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };

        tcsetwinsize(self.async_fd.get_ref(), winsize).map_err(|e| PtyError::Resize(os_error(e)))
    }

    /// Get the current window size.
    pub fn window_size(&self) -> Result<WindowSize> {
        let winsize = tcgetwinsize(self.async_fd.get_ref())
            .map_err(|e| PtyError::GetAttributes(os_error(e)))?;

        Ok(WindowSize::new(winsize.ws_col, winsize.ws_row))
    }
}

impl AsRawFd for PtyMaster {
    fn as_raw_fd(&self) -> RawFd {
        self.async_fd.as_raw_fd()
    }
}

impl AsFd for PtyMaster {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.async_fd.get_ref().as_fd()
    }
}

impl AsyncRead for PtyMaster {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        loop {
            let mut guard = match self.async_fd.poll_read_ready(cx) {
                Poll::Ready(Ok(guard)) => guard,
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Pending => return Poll::Pending,
            };

            let unfilled = buf.initialize_unfilled();
            match rustix::io::read(self.async_fd.get_ref(), unfilled) {
                Ok(n) => {
                    buf.advance(n);
                    return Poll::Ready(Ok(()));
                }
                Err(Errno::AGAIN) => {
                    guard.clear_ready();
                }
                // Linux reports a hung-up slave as EIO on the master.
                Err(Errno::IO) => return Poll::Ready(Ok(())),
                Err(e) => return Poll::Ready(Err(os_error(e))),
            }
        }
    }
}

impl AsyncWrite for PtyMaster {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        loop {
            let mut guard = match self.async_fd.poll_write_ready(cx) {
                Poll::Ready(Ok(guard)) => guard,
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Pending => return Poll::Pending,
            };

            match rustix::io::write(self.async_fd.get_ref(), buf) {
                Ok(n) => return Poll::Ready(Ok(n)),
                Err(Errno::AGAIN) => {
                    guard.clear_ready();
                }
                Err(e) => return Poll::Ready(Err(os_error(e))),
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
