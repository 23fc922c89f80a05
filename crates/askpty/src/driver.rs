//! Background execution of the scripted side.
//!
//! A program under test blocks on its terminal while it waits for input,
//! so the script that types that input has to run somewhere else. A
//! [`Driver`] moves the console into a tokio task and reports back through
//! a one-shot channel.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::console::VirtualConsole;
use crate::dialogue::{Dialogue, DialogueExecutor, DialogueResult};
use crate::error::{ConsoleError, Result};

/// Starts scripted sides in the background.
#[derive(Debug, Clone, Copy)]
pub struct Driver;

impl Driver {
    /// Run `dialogue` against `console` in a new task.
    ///
    /// On success the console comes back with the result so the caller can
    /// keep reading from it. On failure the console is dropped, which hangs
    /// up the terminal and unblocks the program.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(console: VirtualConsole, dialogue: Dialogue) -> DriverHandle<DialogueResult> {
        Self::spawn_with(console, move |mut console| async move {
            let result = DialogueExecutor::new().run(&mut console, &dialogue).await?;
            Ok((console, result))
        })
    }

    /// Run a hand-written script.
    ///
    /// `script` receives the console by value and hands it back on success;
    /// returning an error drops it.
    ///
    /// ```rust,no_run
    /// use askpty::{Driver, Key, VirtualConsole};
    ///
    /// # async fn demo() -> askpty::Result<()> {
    /// let console = VirtualConsole::new()?;
    /// let driver = Driver::spawn_with(console, |mut console| async move {
    ///     console.expect_string("Choose a color:").await?;
    ///     console.send_key(Key::Enter).await?;
    ///     Ok((console, ()))
    /// });
    /// let (_console, ()) = driver.await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn_with<F, Fut, T>(console: VirtualConsole, script: F) -> DriverHandle<T>
    where
        F: FnOnce(VirtualConsole) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(VirtualConsole, T)>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let tty = console.tty();

        let task = tokio::spawn(async move {
            let outcome = script(console).await;
            match &outcome {
                Ok(_) => tracing::debug!(tty = tty.path(), "driver finished"),
                Err(e) => tracing::debug!(tty = tty.path(), error = %e, "driver failed; console dropped"),
            }
            if tx.send(outcome).is_err() {
                tracing::trace!("driver handle gone before completion");
            }
        });

        DriverHandle { rx, task }
    }
}

/// Completion of a background script.
///
/// Awaiting it yields the console and the script's value. Dropping it
/// aborts the script.
#[derive(Debug)]
#[must_use = "dropping a DriverHandle aborts the script"]
pub struct DriverHandle<T> {
    rx: oneshot::Receiver<Result<(VirtualConsole, T)>>,
    task: JoinHandle<()>,
}

impl<T> DriverHandle<T> {
    /// Whether the script has stopped running.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Future for DriverHandle<T> {
    type Output = Result<(VirtualConsole, T)>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(ConsoleError::DriverLost)))
    }
}

impl<T> Drop for DriverHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
