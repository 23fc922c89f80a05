//! Named keys and the byte sequences a terminal sends for them.

use std::borrow::Cow;
use std::fmt;

/// A key press the scripted side can send.
///
/// Sequences follow xterm in normal cursor-key mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow (`ESC [ A`).
    ArrowUp,
    /// Down arrow (`ESC [ B`).
    ArrowDown,
    /// Right arrow (`ESC [ C`).
    ArrowRight,
    /// Left arrow (`ESC [ D`).
    ArrowLeft,
    /// Home (`ESC [ H`).
    Home,
    /// End (`ESC [ F`).
    End,
    /// Enter, a carriage return.
    Enter,
    /// Backspace, DEL (0x7f).
    Backspace,
    /// Forward delete (`ESC [ 3 ~`).
    Delete,
    /// Horizontal tab.
    Tab,
    /// Escape on its own.
    Escape,
    /// Space bar.
    Space,
    /// Ctrl+C, interrupt.
    CtrlC,
    /// Ctrl+D, end of transmission.
    CtrlD,
    /// Any other control byte, see [`Key::ctrl`].
    Control(u8),
}

impl Key {
    /// The control key for a letter or one of `[ \ ] ^ _`.
    ///
    /// `Key::ctrl('u')` is the kill-line byte 0x15.
    #[must_use]
    pub const fn ctrl(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        let byte = match c {
            'a'..='z' => c as u8 - b'a' + 1,
            '[' => 0x1b,
            '\\' => 0x1c,
            ']' => 0x1d,
            '^' => 0x1e,
            '_' => 0x1f,
            _ => return None,
        };
        Some(Self::Control(byte))
    }

    /// Bytes written to the terminal for this key.
    #[must_use]
    pub fn as_bytes(self) -> Cow<'static, [u8]> {
        let seq: &'static [u8] = match self {
            Self::ArrowUp => b"\x1b[A",
            Self::ArrowDown => b"\x1b[B",
            Self::ArrowRight => b"\x1b[C",
            Self::ArrowLeft => b"\x1b[D",
            Self::Home => b"\x1b[H",
            Self::End => b"\x1b[F",
            Self::Enter => b"\r",
            Self::Backspace => b"\x7f",
            Self::Delete => b"\x1b[3~",
            Self::Tab => b"\t",
            Self::Escape => b"\x1b",
            Self::Space => b" ",
            Self::CtrlC => b"\x03",
            Self::CtrlD => b"\x04",
            Self::Control(byte) => return Cow::Owned(vec![byte]),
        };
        Cow::Borrowed(seq)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Control(byte) if *byte < 0x20 => write!(f, "Ctrl-{}", (byte + b'@') as char),
            Self::Control(byte) => write!(f, "0x{byte:02x}"),
            other => write!(f, "{other:?}"),
        }
    }
}
