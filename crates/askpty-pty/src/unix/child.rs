//! Child processes attached to the slave side of a pseudo-terminal.

use std::ffi::OsStr;
use std::io;
use std::os::unix::io::{AsFd, AsRawFd};
use std::process::Stdio;

use rustix::process::{Pid, Signal, kill_process};
use tokio::process::{Child as TokioChild, Command};

use crate::config::{PtyConfig, PtySignal};
use crate::error::{PtyError, Result, os_error};

/// Exit status of a child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The process exited normally with the given exit code.
    Exited(i32),
    /// The process was terminated by a signal.
    Signaled(i32),
}

impl ExitStatus {
    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    /// Get the exit code, if the process exited normally.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        match self {
            Self::Exited(code) => Some(*code),
            Self::Signaled(_) => None,
        }
    }

    /// Get the signal number that terminated the process.
    #[must_use]
    pub const fn signal(&self) -> Option<i32> {
        match self {
            Self::Signaled(sig) => Some(*sig),
            Self::Exited(_) => None,
        }
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with code {code}"),
            Self::Signaled(sig) => write!(f, "terminated by signal {sig}"),
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        if let Some(code) = status.code() {
            Self::Exited(code)
        } else if let Some(signal) = status.signal() {
            Self::Signaled(signal)
        } else {
            Self::Exited(-1)
        }
    }
}

/// Handle to a process running on a pseudo-terminal.
pub struct PtyChild {
    child: TokioChild,
    pid: u32,
    status: Option<ExitStatus>,
}

impl std::fmt::Debug for PtyChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyChild")
            .field("pid", &self.pid)
            .field("status", &self.status)
            .finish()
    }
}

impl PtyChild {
    fn new(child: TokioChild) -> Result<Self> {
        let pid = child.id().ok_or_else(|| {
            PtyError::Spawn(io::Error::other("child exited before its pid was read"))
        })?;
        Ok(Self {
            child,
            pid,
            status: None,
        })
    }

    /// Get the process ID.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Whether no exit status has been collected yet.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.status.is_none()
    }

    /// Wait for the child process to exit.
    ///
    /// The status is cached, so waiting twice returns the same value.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        if let Some(status) = self.status {
            return Ok(status);
        }

        let status = ExitStatus::from(self.child.wait().await.map_err(PtyError::Wait)?);
        tracing::debug!(pid = self.pid, %status, "child exited");
        self.status = Some(status);
        Ok(status)
    }

    /// Get the exit status without blocking.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        if self.status.is_some() {
            return Ok(self.status);
        }

        let status = self
            .child
            .try_wait()
            .map_err(PtyError::Wait)?
            .map(ExitStatus::from);
        self.status = status;
        Ok(status)
    }

    /// Send a signal to the child process.
    pub fn signal(&self, signal: PtySignal) -> Result<()> {
        if let Some(status) = self.status {
            return Err(PtyError::AlreadyExited(status.to_string()));
        }

        let pid = Pid::from_raw(self.pid as i32).ok_or_else(|| {
            PtyError::Signal(io::Error::new(io::ErrorKind::InvalidInput, "invalid pid"))
        })?;
        let sig = Signal::from_named_raw(signal.as_unix_signal()).ok_or_else(|| {
            PtyError::Signal(io::Error::new(io::ErrorKind::InvalidInput, "invalid signal"))
        })?;

        kill_process(pid, sig).map_err(|e| PtyError::Signal(os_error(e)))
    }

    /// Kill the child process (SIGKILL).
    pub fn kill(&self) -> Result<()> {
        self.signal(PtySignal::Kill)
    }
}

/// Spawn `program` with stdin, stdout and stderr attached to `slave`.
///
/// Must be called within a Tokio runtime. The command holding the stdio
/// duplicates is dropped before returning, so the only slave descriptors
/// left are the caller's and the child's.
pub fn spawn_child<S, I>(
    slave: &impl AsFd,
    program: S,
    args: I,
    config: &PtyConfig,
) -> Result<PtyChild>
where
    S: AsRef<OsStr>,
    I: IntoIterator,
    I::Item: AsRef<OsStr>,
{
    let slave = slave.as_fd();
    let stdio = || -> Result<Stdio> { Ok(Stdio::from(slave.try_clone_to_owned()?)) };

    let mut cmd = Command::new(program.as_ref());
    cmd.args(args)
        .env_clear()
        .envs(config.effective_env())
        .stdin(stdio()?)
        .stdout(stdio()?)
        .stderr(stdio()?)
        .kill_on_drop(true);

    if let Some(ref dir) = config.working_directory {
        cmd.current_dir(dir);
    }

    if config.controlling_terminal {
        // SAFETY: setsid and ioctl are async-signal-safe. Stdio has already
        // been duplicated onto fd 0 when pre_exec hooks run.
        #[allow(unsafe_code)]
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(io::Error::last_os_error());
                }
                if libc::ioctl(0, libc::TIOCSCTTY, 0) == -1 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }

    let child = cmd.spawn().map_err(PtyError::Spawn)?;
    drop(cmd);

    let child = PtyChild::new(child)?;
    tracing::info!(
        pid = child.pid(),
        program = %program.as_ref().to_string_lossy(),
        slave_fd = slave.as_raw_fd(),
        "spawned child on pty"
    );
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PtyMaster, WindowSize};

    #[test]
    fn exit_status_accessors() {
        assert!(ExitStatus::Exited(0).success());
        assert_eq!(ExitStatus::Exited(3).code(), Some(3));
        assert_eq!(ExitStatus::Signaled(9).code(), None);
        assert_eq!(ExitStatus::Signaled(9).signal(), Some(9));
        assert_eq!(ExitStatus::Exited(1).to_string(), "exited with code 1");
    }

    #[tokio::test]
    async fn exit_code_is_reported() {
        let (_master, slave) = PtyMaster::open(WindowSize::default()).unwrap();
        let mut child = spawn_child(&slave, "sh", ["-c", "exit 7"], &PtyConfig::default()).unwrap();

        let status = child.wait().await.unwrap();
        assert_eq!(status, ExitStatus::Exited(7));
        assert!(!child.is_running());
        assert_eq!(child.wait().await.unwrap(), status);
    }

    #[tokio::test]
    async fn child_sees_a_terminal() {
        let (_master, slave) = PtyMaster::open(WindowSize::default()).unwrap();
        let mut child =
            spawn_child(&slave, "sh", ["-c", "test -t 0 && test -t 1"], &PtyConfig::default())
                .unwrap();

        assert!(child.wait().await.unwrap().success());
    }

    #[tokio::test]
    async fn kill_running_child() {
        let (_master, slave) = PtyMaster::open(WindowSize::default()).unwrap();
        let mut child = spawn_child(&slave, "sleep", ["30"], &PtyConfig::default()).unwrap();

        child.kill().unwrap();
        let status = child.wait().await.unwrap();
        assert_eq!(status.signal(), Some(libc::SIGKILL));
        assert!(child.kill().is_err());
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let (_master, slave) = PtyMaster::open(WindowSize::default()).unwrap();
        let err = spawn_child(
            &slave,
            "/nonexistent/askpty-test-binary",
            std::iter::empty::<&str>(),
            &PtyConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PtyError::Spawn(_)));
    }
}
