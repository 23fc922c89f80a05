//! Virtual terminal screen emulation.
//!
//! Everything a program prints through the pty is also fed to a [`Screen`],
//! so a test can look at what a user would see once redraws, cursor jumps
//! and line clears have been applied.
//!
//! # Example
//!
//! ```rust
//! use askpty::screen::Screen;
//!
//! let mut screen = Screen::new(24, 80);
//! screen.process(b"? Choose a color:\r\n> red\r\n  blue\r\n\x1b[3A\r\x1b[J? Choose a color: blue\r\n");
//! assert_eq!(screen.snapshot(), "? Choose a color: blue");
//! ```

pub mod buffer;
mod parser;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use buffer::{Attributes, Cell, Color, Cursor, ScreenBuffer};

/// Remove blank lines (and trailing whitespace on them) from the end.
#[must_use]
pub fn strip_trailing_empty_lines(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// A virtual terminal screen.
pub struct Screen {
    buffer: ScreenBuffer,
    parser: vte::Parser,
}

impl Screen {
    /// Create a blank screen.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            buffer: ScreenBuffer::new(rows, cols),
            parser: vte::Parser::new(),
        }
    }

    /// Get the screen buffer.
    #[must_use]
    pub const fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    /// Get the cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.buffer.cursor()
    }

    /// Feed program output. Partial escape sequences carry over to the
    /// next call.
    pub fn process(&mut self, data: &[u8]) {
        self.parser.advance(&mut self.buffer, data);
    }

    /// Text of one row, trailing blanks removed.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        self.buffer.row_text(row)
    }

    /// The cell at `row`, `col`, if on screen.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.buffer.cell(row, col)
    }

    /// Answers to queries the program made (cursor position, status).
    pub fn take_replies(&mut self) -> Vec<u8> {
        self.buffer.take_replies()
    }

    /// Full screen text, one line per row.
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Screen text without the blank rows at the bottom.
    #[must_use]
    pub fn snapshot(&self) -> String {
        strip_trailing_empty_lines(&self.buffer.text())
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("rows", &self.buffer.rows())
            .field("cols", &self.buffer.cols())
            .field("cursor", &self.buffer.cursor())
            .finish()
    }
}

/// Shared handle to the screen a console feeds.
///
/// The console keeps writing into it from the driver task; clones can be
/// read from anywhere, including after the console is gone.
#[derive(Debug, Clone)]
pub struct ScreenState {
    inner: Arc<Mutex<Screen>>,
}

impl ScreenState {
    /// Wrap a fresh screen.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Screen::new(rows, cols))),
        }
    }

    /// Lock the screen.
    pub fn lock(&self) -> MutexGuard<'_, Screen> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Screen text without trailing blank rows.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.lock().snapshot()
    }

    /// Whether any row shows `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().text().contains(needle)
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.lock().cursor()
    }
}

impl std::fmt::Display for ScreenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn strip_trailing() {
        assert_eq!(strip_trailing_empty_lines("a\nb\n\n  \n"), "a\nb");
        assert_eq!(strip_trailing_empty_lines("\n\n"), "");
        assert_eq!(strip_trailing_empty_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn split_escape_sequence() {
        let mut screen = Screen::new(3, 20);
        screen.process(b"abc\x1b[");
        screen.process(b"2Dx");
        assert_eq!(screen.snapshot(), "axc");
        assert_eq!(screen.row_text(0), "axc");
        assert_eq!(screen.cell(0, 1).map(|c| c.ch), Some('x'));
        assert!(screen.cell(3, 0).is_none());
    }

    #[test]
    fn split_utf8() {
        let mut screen = Screen::new(3, 20);
        let bytes = "✔ done".as_bytes();
        screen.process(&bytes[..1]);
        screen.process(&bytes[1..]);
        assert_eq!(screen.snapshot(), "✔ done");
    }

    #[test]
    fn shared_state() {
        let state = ScreenState::new(5, 40);
        let writer = state.clone();
        writer.lock().process(b"What is your name? ");

        assert!(state.contains("What is your name?"));
        assert_eq!(state.cursor(), Cursor { row: 0, col: 19 });
        assert_eq!(state.to_string(), "What is your name?");
    }

    proptest! {
        #[test]
        fn cursor_stays_on_screen(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let mut screen = Screen::new(4, 10);
            screen.process(&data);
            let cursor = screen.cursor();
            prop_assert!(cursor.row < 4);
            prop_assert!(cursor.col <= 10);
        }

        #[test]
        fn chunking_does_not_change_screen(
            text in "[ -~é✔\r\n\x1b]{0,200}",
            split in 0usize..256,
        ) {
            let data = text.as_bytes();
            let split = split.min(data.len());
            let mut whole = Screen::new(5, 20);
            whole.process(data);
            let mut parts = Screen::new(5, 20);
            parts.process(&data[..split]);
            parts.process(&data[split..]);
            prop_assert_eq!(whole.text(), parts.text());
        }
    }
}
