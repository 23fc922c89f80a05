//! The test-facing end of a pseudo-terminal.

use std::time::Duration;

use askpty_pty::PtyMaster;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::Instant;

use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::expect::{ExpectBuffer, Match, Pattern};
use crate::keys::Key;
use crate::screen::ScreenState;
use crate::tty::Tty;

const READ_CHUNK: usize = 4096;

/// Saturates at roughly a year for timeouts too large to add to `now`.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(365 * 24 * 60 * 60))
}

/// A terminal a test can type into and read from.
///
/// The console owns the master side of a pty. Programs are attached to the
/// other side through [`tty`](Self::tty). Everything they print is decoded
/// into an [`ExpectBuffer`] for matching and fed to a [`ScreenState`] so the
/// rendered screen can be inspected.
///
/// # Example
///
/// ```rust,no_run
/// use askpty::{Key, VirtualConsole};
///
/// # async fn demo() -> askpty::Result<()> {
/// let mut console = VirtualConsole::new()?;
/// let child = console.tty().spawn("my-prompt", ["--color"], &Default::default())?;
///
/// console.expect_string("Choose a color:").await?;
/// console.send_key(Key::ArrowDown).await?;
/// console.send_key(Key::Enter).await?;
/// console.expect_eof().await?;
/// # drop(child);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VirtualConsole {
    master: PtyMaster,
    tty: Tty,
    screen: ScreenState,
    buffer: ExpectBuffer,
    config: ConsoleConfig,
    eof: bool,
}

impl VirtualConsole {
    /// Open a console with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ConsoleConfig::default())
    }

    /// Open a console.
    pub fn with_config(config: ConsoleConfig) -> Result<Self> {
        let config = config.validate()?;
        let (master, slave) = PtyMaster::open(config.window_size())?;
        let tty = Tty::new(slave, master.slave_path(), &config.term);
        let screen = ScreenState::new(usize::from(config.rows), usize::from(config.cols));

        tracing::debug!(
            tty = tty.path(),
            cols = config.cols,
            rows = config.rows,
            "opened virtual console"
        );

        Ok(Self {
            master,
            tty,
            screen,
            buffer: ExpectBuffer::new(config.max_buffer),
            config,
            eof: false,
        })
    }

    /// Handle to the program-facing end.
    #[must_use]
    pub fn tty(&self) -> Tty {
        self.tty.clone()
    }

    /// Handle to the emulated screen.
    #[must_use]
    pub fn screen(&self) -> ScreenState {
        self.screen.clone()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Whether the program side has been fully closed.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.eof
    }

    /// Output read but not yet consumed by an expect.
    #[must_use]
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }

    /// Write raw bytes as if typed.
    pub async fn send(&mut self, data: &[u8]) -> Result<()> {
        tracing::debug!(bytes = data.len(), "send");
        self.master
            .write_all(data)
            .await
            .map_err(|e| ConsoleError::io_context("writing to console", e))?;
        self.master
            .flush()
            .await
            .map_err(|e| ConsoleError::io_context("flushing console", e))
    }

    /// Type a string.
    pub async fn send_str(&mut self, s: &str) -> Result<()> {
        self.send(s.as_bytes()).await
    }

    /// Type a string followed by the configured line ending.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        let mut data = Vec::with_capacity(line.len() + 2);
        data.extend_from_slice(line.as_bytes());
        data.extend_from_slice(self.config.line_ending.as_bytes());
        self.send(&data).await
    }

    /// Press a key.
    pub async fn send_key(&mut self, key: Key) -> Result<()> {
        tracing::debug!(%key, "send key");
        self.send(&key.as_bytes()).await
    }

    /// Wait for `needle` to appear in the output.
    pub async fn expect_string(&mut self, needle: &str) -> Result<Match> {
        self.expect(Pattern::literal(needle)).await
    }

    /// Wait for `pattern` using the configured timeout.
    pub async fn expect(&mut self, pattern: impl Into<Pattern>) -> Result<Match> {
        let timeout = self.config.timeout();
        self.expect_timeout(pattern, timeout).await
    }

    /// Wait for `pattern`, giving up after `timeout`.
    ///
    /// On success the output up to the end of the match is consumed. For
    /// [`Pattern::Eof`] the whole remaining output is returned in
    /// [`Match::before`].
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Timeout`] if the deadline passes and
    /// [`ConsoleError::PatternNotFound`] if the program side closes first.
    /// Both carry the unconsumed output. An empty literal is rejected with
    /// [`ConsoleError::InvalidPattern`].
    pub async fn expect_timeout(
        &mut self,
        pattern: impl Into<Pattern>,
        timeout: Duration,
    ) -> Result<Match> {
        let pattern = pattern.into();
        if matches!(&pattern, Pattern::Literal(text) if text.is_empty()) {
            return Err(ConsoleError::invalid_pattern("empty literal"));
        }
        let deadline = deadline_after(timeout);
        tracing::debug!(%pattern, ?timeout, "expect");

        loop {
            if pattern.is_eof() {
                if self.eof {
                    return Ok(Match::new(String::new(), self.buffer.take_all()));
                }
            } else if let Some(found) = self.buffer.take_match(&pattern) {
                tracing::debug!(matched = %found.matched, "expect matched");
                return Ok(found);
            } else if self.eof {
                return Err(ConsoleError::pattern_not_found(
                    pattern.as_str(),
                    self.buffer.as_str(),
                ));
            }

            if Instant::now() >= deadline {
                return Err(ConsoleError::timeout(
                    timeout,
                    pattern.as_str(),
                    self.buffer.as_str(),
                ));
            }
            self.read_until(deadline).await?;
        }
    }

    /// Read until the program side is closed and return what was left.
    pub async fn expect_eof(&mut self) -> Result<String> {
        Ok(self.expect(Pattern::Eof).await?.before)
    }

    /// Keep reading output into the buffer and screen until `done` resolves.
    ///
    /// A program blocks once the pty's buffer fills, so anything waiting on
    /// it has to run while the console is read.
    pub async fn read_while<F: Future>(&mut self, done: F) -> Result<F::Output> {
        tokio::pin!(done);
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if self.eof {
                return Ok(done.await);
            }
            tokio::select! {
                out = &mut done => return Ok(out),
                read = self.master.read(&mut chunk) => match read {
                    Ok(0) => {
                        tracing::debug!(tty = self.tty.path(), "console reached end of file");
                        self.eof = true;
                    }
                    Ok(n) => self.absorb(&chunk[..n]).await?,
                    Err(e) => return Err(ConsoleError::io_context("reading from console", e)),
                },
            }
        }
    }

    /// One read from the master, stopping at `deadline`.
    async fn read_until(&mut self, deadline: Instant) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        let read = tokio::time::timeout_at(deadline, self.master.read(&mut chunk)).await;

        match read {
            Err(_) => Ok(()),
            Ok(Ok(0)) => {
                tracing::debug!(tty = self.tty.path(), "console reached end of file");
                self.eof = true;
                Ok(())
            }
            Ok(Ok(n)) => self.absorb(&chunk[..n]).await,
            Ok(Err(e)) => Err(ConsoleError::io_context("reading from console", e)),
        }
    }

    async fn absorb(&mut self, data: &[u8]) -> Result<()> {
        if self.config.log_output {
            tracing::debug!(target: "askpty::output", output = %String::from_utf8_lossy(data));
        }

        self.buffer.push(data);
        let replies = {
            let mut screen = self.screen.lock();
            screen.process(data);
            screen.take_replies()
        };

        if self.config.answer_queries && !replies.is_empty() {
            tracing::trace!(bytes = replies.len(), "answering terminal query");
            self.send(&replies).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn quick() -> ConsoleConfig {
        ConsoleConfig::default().expect_timeout(Duration::from_millis(300))
    }

    #[tokio::test]
    async fn expect_consumes_through_match() {
        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let mut file = console.tty().file().unwrap();
        file.write_all(b"? What is your name? ? Choose a color:").unwrap();

        let m = console.expect_string("name?").await.unwrap();
        assert_eq!(m.before, "? What is your ");

        console.expect_string("color:").await.unwrap();
    }

    #[tokio::test]
    async fn timeout_carries_buffer() {
        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let mut file = console.tty().file().unwrap();
        file.write_all(b"partial output").unwrap();

        let err = console.expect_string("never").await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.buffer(), Some("partial output"));
    }

    #[tokio::test]
    async fn eof_before_match() {
        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let tty = console.tty();
        let mut file = tty.file().unwrap();
        file.write_all(b"bye").unwrap();
        drop(file);
        tty.close();

        let err = console.expect_string("hello").await.unwrap_err();
        assert!(matches!(err, ConsoleError::PatternNotFound { .. }));
        assert_eq!(err.buffer(), Some("bye"));
        assert!(console.is_eof());
    }

    #[tokio::test]
    async fn expect_eof_returns_tail() {
        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let tty = console.tty();
        let mut file = tty.file().unwrap();
        file.write_all(b"first\nlast").unwrap();
        drop(file);
        tty.close();

        console.expect_string("first").await.unwrap();
        let tail = console.expect_eof().await.unwrap();
        assert_eq!(tail, "\r\nlast");
        assert_eq!(console.screen().snapshot(), "first\nlast");
    }

    #[tokio::test]
    async fn empty_literal_rejected() {
        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let err = console.expect_string("").await.unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidPattern { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn read_while_keeps_writer_moving() {
        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let mut file = console.tty().file().unwrap();
        let writer = tokio::task::spawn_blocking(move || {
            file.write_all(&vec![b'a'; 200_000]).unwrap();
            file.write_all(b"done").unwrap();
        });

        console.read_while(writer).await.unwrap().unwrap();
        console.expect_string("done").await.unwrap();
        assert!(console.screen().contains("done"));
    }

    #[tokio::test]
    async fn regex_expect() {
        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let mut file = console.tty().file().unwrap();
        file.write_all(b"Johnny chose blue.").unwrap();

        let m = console
            .expect(Pattern::regex(r"(\w+) chose (\w+)").unwrap())
            .await
            .unwrap();
        assert_eq!(m.capture(1), Some("blue"));
    }

    #[tokio::test]
    async fn send_line_reaches_program() {
        use std::io::Read;

        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let tty = console.tty();
        let raw_fd = tty.try_clone_fd().unwrap();
        let _raw = askpty_pty::RawMode::enable(&raw_fd).unwrap();
        let mut file = std::fs::File::from(raw_fd.try_clone().unwrap());

        console.send_line("blue").await.unwrap();
        let mut buf = [0u8; 5];
        file.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"blue\n");
    }

    #[tokio::test]
    async fn cursor_query_answered() {
        use std::io::Read;

        let mut console = VirtualConsole::with_config(quick()).unwrap();
        let tty = console.tty();
        let raw_fd = tty.try_clone_fd().unwrap();
        let _raw = askpty_pty::RawMode::enable(&raw_fd).unwrap();
        let mut file = std::fs::File::from(raw_fd.try_clone().unwrap());

        file.write_all(b"abc\x1b[6n").unwrap();
        console.expect_string("abc").await.unwrap();
        // the query may arrive in a later chunk than the text
        let _ = console
            .expect_timeout("never", Duration::from_millis(100))
            .await;

        let mut reply = [0u8; 6];
        file.read_exact(&mut reply).unwrap();
        assert_eq!(&reply, b"\x1b[1;4R");
    }
}
