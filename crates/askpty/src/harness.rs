//! Coordinating a program under test with its scripted user.

use std::ffi::OsStr;

use askpty_pty::{ExitStatus, PtyChild, PtyConfig, PtyError};
use tokio::task::JoinError;

use crate::config::ConsoleConfig;
use crate::console::VirtualConsole;
use crate::dialogue::{Dialogue, DialogueResult};
use crate::driver::Driver;
use crate::error::{ConsoleError, Result};
use crate::screen::ScreenState;

/// Outcome of [`Harness::run_command`].
#[derive(Debug)]
pub struct RunReport {
    /// How the program exited.
    pub status: ExitStatus,
    /// What the dialogue saw.
    pub dialogue: DialogueResult,
    /// Output left after the dialogue's last expect.
    pub tail: String,
    /// The final screen.
    pub screen: ScreenState,
}

impl RunReport {
    /// Fail with [`ConsoleError::ProcessFailed`] unless the program exited 0.
    pub fn success(self) -> Result<Self> {
        if self.status.success() {
            Ok(self)
        } else {
            Err(ConsoleError::ProcessFailed {
                status: self.status,
            })
        }
    }
}

/// Outcome of [`Harness::run_in_process`].
#[derive(Debug)]
pub struct InProcessReport<T> {
    /// What the closure returned.
    pub value: T,
    /// What the dialogue saw.
    pub dialogue: DialogueResult,
    /// Output left after the dialogue's last expect.
    pub tail: String,
    /// The final screen.
    pub screen: ScreenState,
}

/// Runs a program or a closure on a fresh console while a dialogue plays
/// the user.
///
/// ```rust,no_run
/// use askpty::{Harness, Key, dialogue};
///
/// # async fn demo() -> askpty::Result<()> {
/// let report = Harness::new()
///     .run_command("./simple", std::iter::empty::<&str>(), dialogue! {
///         expect "What is your name?";
///         sendln "Johnny";
///         expect "Choose a color:";
///         key Enter
///     })
///     .await?
///     .success()?;
/// assert!(report.tail.contains("Johnny chose red."));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Harness {
    console: ConsoleConfig,
    pty: PtyConfig,
}

enum FirstDone {
    Program(std::result::Result<ExitStatus, PtyError>),
    Dialogue(Result<(VirtualConsole, DialogueResult)>),
}

impl Harness {
    /// A harness with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for every console this harness opens.
    #[must_use]
    pub fn with_config(config: ConsoleConfig) -> Self {
        Self {
            console: config,
            pty: PtyConfig::default(),
        }
    }

    /// Environment and working directory for spawned programs.
    #[must_use]
    pub fn pty_config(mut self, pty: PtyConfig) -> Self {
        self.pty = pty;
        self
    }

    /// The console configuration.
    #[must_use]
    pub const fn config(&self) -> &ConsoleConfig {
        &self.console
    }

    /// Spawn `program` on a new console and play `dialogue` against it.
    ///
    /// Returns once the program has exited and its output has been read to
    /// end of file. If the dialogue fails first the program is killed and
    /// the dialogue's error returned. Once the dialogue is done the program
    /// gets the console's expect timeout to exit; past that it is killed and
    /// [`ConsoleError::Timeout`] returned.
    pub async fn run_command<S, I>(&self, program: S, args: I, dialogue: Dialogue) -> Result<RunReport>
    where
        S: AsRef<OsStr>,
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let program = program.as_ref().to_owned();
        let console = VirtualConsole::with_config(self.console.clone())?;
        let tty = console.tty();
        let screen = console.screen();

        let mut driver = Driver::spawn(console, dialogue);
        let mut child = tty.spawn(&program, args, &self.pty)?;
        // The child holds its own copies; ours would keep end of file away.
        tty.close();
        tracing::info!(program = ?program, pid = child.pid(), "spawned program");

        let first = tokio::select! {
            status = child.wait() => FirstDone::Program(status),
            outcome = &mut driver => FirstDone::Dialogue(outcome),
        };

        let (status, mut console, dialogue) = match first {
            FirstDone::Program(status) => {
                let status = status?;
                tracing::info!(%status, "program exited");
                let (console, dialogue) = driver.await?;
                (status, console, dialogue)
            }
            FirstDone::Dialogue(Err(e)) => {
                tracing::warn!(pid = child.pid(), error = %e, "dialogue failed; killing program");
                reap(&mut child).await;
                return Err(e);
            }
            FirstDone::Dialogue(Ok((mut console, dialogue))) => {
                let status = match wait_draining(&mut console, &mut child).await {
                    Ok(status) => status,
                    Err(e) => {
                        reap(&mut child).await;
                        return Err(e);
                    }
                };
                tracing::info!(%status, "program exited");
                (status, console, dialogue)
            }
        };

        let tail = console.expect_eof().await?;
        Ok(RunReport {
            status,
            dialogue,
            tail,
            screen,
        })
    }

    /// Run the blocking closure `f` with the console's terminal while
    /// `dialogue` plays the user.
    ///
    /// `f` runs on the blocking thread pool. It should drop every
    /// descriptor it opens from the [`Tty`](crate::Tty) before returning;
    /// the console is then read to end of file. If `f` is still running an
    /// expect timeout after the dialogue ends, the console is hung up and
    /// [`ConsoleError::Timeout`] returned.
    ///
    /// A panic in `f` is resumed on the caller.
    pub async fn run_in_process<F, T>(&self, dialogue: Dialogue, f: F) -> Result<InProcessReport<T>>
    where
        F: FnOnce(crate::Tty) -> T + Send + 'static,
        T: Send + 'static,
    {
        let console = VirtualConsole::with_config(self.console.clone())?;
        let tty = console.tty();
        let screen = console.screen();

        let mut driver = Driver::spawn(console, dialogue);
        let mut work = tokio::task::spawn_blocking({
            let tty = tty.clone();
            move || f(tty)
        });

        let first = tokio::select! {
            joined = &mut work => WorkDone::Closure(joined),
            outcome = &mut driver => WorkDone::Dialogue(outcome),
        };

        let (value, mut console, dialogue) = match first {
            WorkDone::Closure(joined) => {
                let value = closure_value(joined)?;
                tty.close();
                let (console, dialogue) = driver.await?;
                (value, console, dialogue)
            }
            WorkDone::Dialogue(Err(e)) => {
                // The console is gone, so the closure's terminal is hung up.
                closure_value(work.await)?;
                return Err(e);
            }
            WorkDone::Dialogue(Ok((mut console, dialogue))) => {
                let limit = console.config().timeout();
                let waited = console
                    .read_while(tokio::time::timeout(limit, &mut work))
                    .await?;
                let Ok(joined) = waited else {
                    tracing::warn!(?limit, "closure still running after dialogue; hanging up");
                    return Err(ConsoleError::timeout(limit, "closure return", console.pending()));
                };
                let value = closure_value(joined)?;
                tty.close();
                (value, console, dialogue)
            }
        };

        let tail = console.expect_eof().await?;

        Ok(InProcessReport {
            value,
            dialogue,
            tail,
            screen,
        })
    }
}

enum WorkDone<T> {
    Closure(std::result::Result<T, JoinError>),
    Dialogue(Result<(VirtualConsole, DialogueResult)>),
}

/// Wait for `child` to exit while its output keeps being read, for at most
/// the console's expect timeout.
async fn wait_draining(console: &mut VirtualConsole, child: &mut PtyChild) -> Result<ExitStatus> {
    let limit = console.config().timeout();
    match console.read_while(tokio::time::timeout(limit, child.wait())).await? {
        Ok(status) => Ok(status?),
        Err(_) => {
            tracing::warn!(pid = child.pid(), ?limit, "program outlived its dialogue; killing it");
            Err(ConsoleError::timeout(limit, "program exit", console.pending()))
        }
    }
}

/// Kill `child` and collect its status.
async fn reap(child: &mut PtyChild) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "kill failed");
    }
    let _ = child.wait().await;
}

fn closure_value<T>(joined: std::result::Result<T, JoinError>) -> Result<T> {
    match joined {
        Ok(value) => Ok(value),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            tracing::warn!(error = %e, "in-process work cancelled");
            Err(ConsoleError::DriverLost)
        }
    }
}
