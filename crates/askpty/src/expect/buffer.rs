//! Accumulated, not yet consumed program output.

use super::Match;
use super::pattern::Pattern;

/// Unconsumed output as text.
///
/// Bytes are decoded incrementally: a UTF-8 sequence split across reads is
/// held back until it completes, and invalid bytes become U+FFFD. When the
/// text grows past `max_size` bytes the oldest part is dropped.
#[derive(Debug, Clone)]
pub struct ExpectBuffer {
    text: String,
    partial: Vec<u8>,
    max_size: usize,
    discarded: usize,
}

impl ExpectBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            text: String::new(),
            partial: Vec::new(),
            max_size: max_size.max(1),
            discarded: 0,
        }
    }

    /// Append raw output.
    pub fn push(&mut self, bytes: &[u8]) {
        self.partial.extend_from_slice(bytes);
        let mut rest: &[u8] = &self.partial;

        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    self.text.push_str(s);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to guarantees this prefix is UTF-8
                    self.text.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(n) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[n..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.partial = rest.to_vec();
        self.trim();
    }

    fn trim(&mut self) {
        if self.text.len() <= self.max_size {
            return;
        }
        let mut cut = self.text.len() - self.max_size;
        while !self.text.is_char_boundary(cut) {
            cut += 1;
        }
        self.text.drain(..cut);
        self.discarded += cut;
    }

    /// The unconsumed text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the unconsumed text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Bytes dropped because the buffer overflowed.
    #[must_use]
    pub const fn discarded(&self) -> usize {
        self.discarded
    }

    /// Search for `pattern`; on success consume through the end of the
    /// match and return it.
    pub fn take_match(&mut self, pattern: &Pattern) -> Option<Match> {
        let found = pattern.find(&self.text)?;
        let before = self.text[..found.start].to_string();
        let matched = found.as_str(&self.text).to_string();
        self.text.drain(..found.end);
        Some(Match::new(matched, before).with_captures(found.captures))
    }

    /// Consume everything, including a held-back partial character.
    pub fn take_all(&mut self) -> String {
        if !self.partial.is_empty() {
            let partial = std::mem::take(&mut self.partial);
            self.text.push_str(&String::from_utf8_lossy(&partial));
        }
        std::mem::take(&mut self.text)
    }
}

impl Default for ExpectBuffer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_BUFFER)
    }
}
