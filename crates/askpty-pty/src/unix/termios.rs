//! Terminal mode switching.

use std::os::unix::io::{AsFd, OwnedFd};

use rustix::termios::{OptionalActions, Termios, isatty, tcgetattr, tcsetattr};

use crate::error::{PtyError, Result, os_error};

/// Raw-mode guard for a terminal descriptor.
///
/// While alive, the terminal delivers every byte immediately, without echo,
/// line editing or signal generation. Dropping the guard restores the
/// attributes saved by [`RawMode::enable`].
#[derive(Debug)]
pub struct RawMode {
    fd: OwnedFd,
    saved: Termios,
}

impl RawMode {
    /// Switch `fd` to raw mode.
    ///
    /// The guard keeps its own duplicate of the descriptor, so the caller
    /// may close theirs first.
    pub fn enable(fd: impl AsFd) -> Result<Self> {
        let fd = fd.as_fd().try_clone_to_owned()?;
        let saved = tcgetattr(&fd).map_err(|e| PtyError::GetAttributes(os_error(e)))?;

        let mut raw = saved.clone();
        raw.make_raw();
        tcsetattr(&fd, OptionalActions::Now, &raw)
            .map_err(|e| PtyError::SetAttributes(os_error(e)))?;

        Ok(Self { fd, saved })
    }

    /// Restore the saved attributes without dropping the guard.
    pub fn restore(&self) -> Result<()> {
        tcsetattr(&self.fd, OptionalActions::Now, &self.saved)
            .map_err(|e| PtyError::SetAttributes(os_error(e)))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::debug!(error = %e, "failed to restore terminal attributes");
        }
    }
}

/// Whether `fd` refers to a terminal.
pub fn is_terminal(fd: impl AsFd) -> bool {
    isatty(fd)
}

#[cfg(test)]
mod tests {
    use rustix::termios::LocalModes;

    use super::*;
    use crate::{PtyMaster, WindowSize};

    #[tokio::test]
    async fn raw_mode_restores_on_drop() {
        let (_master, slave) = PtyMaster::open(WindowSize::default()).unwrap();
        assert!(tcgetattr(&slave).unwrap().local_modes.contains(LocalModes::ICANON));

        {
            let _raw = RawMode::enable(&slave).unwrap();
            let attrs = tcgetattr(&slave).unwrap();
            assert!(!attrs.local_modes.contains(LocalModes::ICANON));
            assert!(!attrs.local_modes.contains(LocalModes::ECHO));
        }

        assert!(tcgetattr(&slave).unwrap().local_modes.contains(LocalModes::ICANON));
    }

    #[tokio::test]
    async fn slave_is_a_terminal() {
        let (_master, slave) = PtyMaster::open(WindowSize::default()).unwrap();
        assert!(is_terminal(&slave));

        let file = std::fs::File::open("/dev/null").unwrap();
        assert!(!is_terminal(&file));
        assert!(RawMode::enable(&file).is_err());
    }
}
