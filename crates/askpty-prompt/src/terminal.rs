//! A prompt's view of the terminal while it runs.

use std::io::Write;

use askpty_pty::RawMode;
use crossterm::cursor::{MoveLeft, MoveUp};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::error::{PromptError, Result};
use crate::keys::{InputKey, KeyDecoder};
use crate::stdio::Stdio;

/// Raw-mode terminal session for one or more prompts.
///
/// Prompts draw a block of lines and redraw it in place on every key:
/// the cursor moves back to the block's first line, clears downward and
/// writes the new block. [`finish`](Self::finish) replaces the block with a
/// one-line summary. Lines are separated by `\r\n` since raw mode turns off
/// output translation.
pub struct Terminal<'a> {
    stdio: &'a mut Stdio,
    decoder: KeyDecoder,
    drawn: usize,
    _raw: Option<RawMode>,
}

impl<'a> Terminal<'a> {
    /// Take over `stdio`, entering raw mode if it is a terminal.
    pub fn new(stdio: &'a mut Stdio) -> Result<Self> {
        let raw = stdio.tty.as_ref().map(RawMode::enable).transpose()?;
        Ok(Self {
            stdio,
            decoder: KeyDecoder::new(),
            drawn: 0,
            _raw: raw,
        })
    }

    /// Next key. Ctrl-C and end of input become errors.
    pub fn next_key(&mut self) -> Result<InputKey> {
        match self.decoder.read_key(&mut *self.stdio.input)? {
            InputKey::Interrupt => {
                self.abandon()?;
                Err(PromptError::Interrupted)
            }
            InputKey::Eof => {
                self.abandon()?;
                Err(PromptError::Eof)
            }
            key => Ok(key),
        }
    }

    /// Replace the drawn block with `lines`, leaving the cursor `back`
    /// columns before the end of the last line.
    pub fn draw(&mut self, lines: &[String], back: usize) -> Result<()> {
        self.erase()?;
        let out = &mut self.stdio.output;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                queue!(out, Print("\r\n"))?;
            }
            queue!(out, Print(line))?;
        }
        if back > 0 {
            queue!(out, MoveLeft(u16::try_from(back).unwrap_or(u16::MAX)))?;
        }
        self.drawn = lines.len();
        out.flush()?;
        Ok(())
    }

    /// Replace the drawn block with `line` and move to a fresh line.
    pub fn finish(&mut self, line: &str) -> Result<()> {
        self.erase()?;
        let out = &mut self.stdio.output;
        queue!(out, Print(line), Print("\r\n"))?;
        self.drawn = 0;
        out.flush()?;
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        if self.drawn == 0 {
            return Ok(());
        }
        let out = &mut self.stdio.output;
        if self.drawn > 1 {
            queue!(out, MoveUp(u16::try_from(self.drawn - 1).unwrap_or(u16::MAX)))?;
        }
        queue!(out, Print("\r"), Clear(ClearType::FromCursorDown))?;
        Ok(())
    }

    /// Leave the block on screen and step past it.
    fn abandon(&mut self) -> Result<()> {
        if self.drawn > 0 {
            self.drawn = 0;
            self.stdio.output.write_all(b"\r\n")?;
            self.stdio.output.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Terminal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("drawn", &self.drawn)
            .field("raw", &self._raw.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};

    use super::*;

    /// Output sink the test can read back.
    #[derive(Clone, Default)]
    pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        pub(crate) fn text(&self) -> String {
            let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A `Stdio` fed from `input`, with output captured.
    pub(crate) fn scripted(input: &[u8]) -> (Stdio, Capture) {
        let capture = Capture::default();
        let stdio = Stdio::new(io::Cursor::new(input.to_vec()), capture.clone());
        (stdio, capture)
    }

    #[test]
    fn redraw_moves_up_and_clears() {
        let (mut stdio, out) = scripted(b"");
        let mut term = Terminal::new(&mut stdio).unwrap();
        term.draw(&["a".into(), "b".into(), "c".into()], 0).unwrap();
        term.draw(&["x".into()], 0).unwrap();
        term.finish("done").unwrap();

        assert_eq!(
            out.text(),
            "a\r\nb\r\nc\x1b[2A\r\x1b[Jx\r\x1b[Jdone\r\n"
        );
    }

    #[test]
    fn eof_is_an_error() {
        let (mut stdio, out) = scripted(b"");
        let mut term = Terminal::new(&mut stdio).unwrap();
        term.draw(&["? name ".into()], 0).unwrap();
        assert!(matches!(term.next_key(), Err(PromptError::Eof)));
        assert!(out.text().ends_with("\r\n"));
    }

    #[test]
    fn interrupt_is_an_error() {
        let (mut stdio, _) = scripted(b"\x03");
        let mut term = Terminal::new(&mut stdio).unwrap();
        assert!(matches!(term.next_key(), Err(PromptError::Interrupted)));
    }
}
