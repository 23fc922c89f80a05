//! Turning terminal input bytes into key presses.

use std::collections::VecDeque;
use std::io::{self, Read};

/// A key as a prompt sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// A printable character.
    Char(char),
    /// Carriage return or line feed.
    Enter,
    /// DEL or BS.
    Backspace,
    /// Forward delete.
    Delete,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Horizontal tab.
    Tab,
    /// A lone escape.
    Escape,
    /// Ctrl-C.
    Interrupt,
    /// Ctrl-D, or the input has ended.
    Eof,
    /// Anything else: unknown sequences and other control bytes.
    Ignored,
}

/// Decodes keys from a byte stream.
///
/// Bytes are read in chunks. An escape byte with nothing after it in the
/// same chunk is a lone Escape; otherwise it starts a CSI (`ESC [`) or SS3
/// (`ESC O`) sequence.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: VecDeque<u8>,
    closed: bool,
}

impl KeyDecoder {
    /// An empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one chunk if nothing is pending. Returns false at end of input.
    fn fill(&mut self, input: &mut dyn Read) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        if self.closed {
            return Ok(false);
        }
        let mut chunk = [0u8; 64];
        let n = loop {
            match input.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                // A hung-up pty reports EIO instead of end of file.
                Err(e) if e.raw_os_error() == Some(libc::EIO) => break 0,
                Err(e) => return Err(e),
            }
        };
        if n == 0 {
            self.closed = true;
            return Ok(false);
        }
        self.pending.extend(&chunk[..n]);
        Ok(true)
    }

    fn next_byte(&mut self, input: &mut dyn Read) -> io::Result<Option<u8>> {
        if self.fill(input)? {
            Ok(self.pending.pop_front())
        } else {
            Ok(None)
        }
    }

    /// Block until a whole key has arrived.
    pub fn read_key(&mut self, input: &mut dyn Read) -> io::Result<InputKey> {
        let Some(byte) = self.next_byte(input)? else {
            return Ok(InputKey::Eof);
        };

        let key = match byte {
            b'\r' | b'\n' => InputKey::Enter,
            0x7f | 0x08 => InputKey::Backspace,
            b'\t' => InputKey::Tab,
            0x03 => InputKey::Interrupt,
            0x04 => InputKey::Eof,
            0x1b => self.escape(input)?,
            b if b < 0x20 => InputKey::Ignored,
            b if b < 0x80 => InputKey::Char(char::from(b)),
            b => self.utf8(b, input)?,
        };
        Ok(key)
    }

    fn escape(&mut self, input: &mut dyn Read) -> io::Result<InputKey> {
        let intro = match self.pending.front() {
            Some(&b) => b,
            None => return Ok(InputKey::Escape),
        };
        if intro != b'[' && intro != b'O' {
            return Ok(InputKey::Escape);
        }
        self.pending.pop_front();

        let mut params = Vec::new();
        let final_byte = loop {
            match self.next_byte(input)? {
                Some(b) if (0x40..=0x7e).contains(&b) => break b,
                Some(b) => params.push(b),
                None => return Ok(InputKey::Eof),
            }
        };

        Ok(match (final_byte, params.as_slice()) {
            (b'A', _) => InputKey::Up,
            (b'B', _) => InputKey::Down,
            (b'C', _) => InputKey::Right,
            (b'D', _) => InputKey::Left,
            (b'H', _) | (b'~', b"1" | b"7") => InputKey::Home,
            (b'F', _) | (b'~', b"4" | b"8") => InputKey::End,
            (b'~', b"3") => InputKey::Delete,
            _ => InputKey::Ignored,
        })
    }

    fn utf8(&mut self, lead: u8, input: &mut dyn Read) -> io::Result<InputKey> {
        let width = match lead {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Ok(InputKey::Ignored),
        };
        let mut bytes = vec![lead];
        while bytes.len() < width {
            match self.next_byte(input)? {
                Some(b) if b & 0xc0 == 0x80 => bytes.push(b),
                Some(b) => {
                    self.pending.push_front(b);
                    return Ok(InputKey::Ignored);
                }
                None => return Ok(InputKey::Eof),
            }
        }
        Ok(std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.chars().next())
            .map_or(InputKey::Ignored, InputKey::Char))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn decode_all(bytes: &[u8]) -> Vec<InputKey> {
        let mut input = bytes;
        let mut decoder = KeyDecoder::new();
        let mut keys = Vec::new();
        loop {
            let key = decoder.read_key(&mut input).unwrap();
            if key == InputKey::Eof && decoder.closed {
                break;
            }
            keys.push(key);
        }
        keys
    }

    #[test]
    fn plain_and_control() {
        assert_eq!(
            decode_all(b"b\x7f\r\n\x08\t"),
            [
                InputKey::Char('b'),
                InputKey::Backspace,
                InputKey::Enter,
                InputKey::Enter,
                InputKey::Backspace,
                InputKey::Tab,
            ]
        );
    }

    #[test]
    fn arrows_both_modes() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1bOC\x1bOD"),
            [InputKey::Up, InputKey::Down, InputKey::Right, InputKey::Left]
        );
    }

    #[test]
    fn editing_keys() {
        assert_eq!(
            decode_all(b"\x1b[H\x1b[F\x1b[3~\x1b[1~\x1b[4~\x1b[5~"),
            [
                InputKey::Home,
                InputKey::End,
                InputKey::Delete,
                InputKey::Home,
                InputKey::End,
                InputKey::Ignored,
            ]
        );
    }

    #[test]
    fn lone_escape() {
        assert_eq!(decode_all(b"\x1b"), [InputKey::Escape]);
        assert_eq!(
            decode_all(b"\x1bx"),
            [InputKey::Escape, InputKey::Char('x')]
        );
    }

    #[test]
    fn interrupt_and_eof() {
        let mut decoder = KeyDecoder::new();
        let mut input: &[u8] = b"\x03\x04";
        assert_eq!(decoder.read_key(&mut input).unwrap(), InputKey::Interrupt);
        assert_eq!(decoder.read_key(&mut input).unwrap(), InputKey::Eof);
        assert_eq!(decoder.read_key(&mut input).unwrap(), InputKey::Eof);
    }

    #[test]
    fn multibyte_chars() {
        assert_eq!(
            decode_all("é✔".as_bytes()),
            [InputKey::Char('é'), InputKey::Char('✔')]
        );
    }

    /// Reader that hands out one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&b, rest)) if !buf.is_empty() => {
                    buf[0] = b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn split_sequence_completes() {
        // The introducer arrived in an earlier chunk than the final byte.
        let mut decoder = KeyDecoder::new();
        decoder.pending.extend(b"\x1b[");
        let mut rest = Trickle(b"B");
        assert_eq!(decoder.read_key(&mut rest).unwrap(), InputKey::Down);
    }

    proptest! {
        /// Decoding never panics and consumes all input.
        #[test]
        fn any_bytes_decode(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let keys = decode_all(&bytes);
            prop_assert!(keys.len() <= bytes.len());
        }

        /// Printable ASCII text decodes to exactly its characters.
        #[test]
        fn printable_text(text in "[ -~]{0,32}") {
            let keys = decode_all(text.as_bytes());
            let expected: Vec<_> = text.chars().map(InputKey::Char).collect();
            prop_assert_eq!(keys, expected);
        }
    }
}
