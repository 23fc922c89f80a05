//! Escape sequence handling for the screen grid.
//!
//! `vte` does the byte-level state machine; this module maps the dispatched
//! controls onto [`ScreenBuffer`] operations. Anything not listed is
//! ignored, which is what a real terminal does with sequences it lacks.

use vte::{Params, Perform};

use super::buffer::{Attributes, Color, ScreenBuffer};

/// First subparameter of every parameter, in order.
fn flat(params: &Params) -> Vec<u16> {
    params.iter().map(|p| p.first().copied().unwrap_or(0)).collect()
}

/// Parameter `i`, with 0 or missing replaced by `default`.
fn arg(params: &[u16], i: usize, default: u16) -> usize {
    match params.get(i) {
        Some(&0) | None => usize::from(default),
        Some(&v) => usize::from(v),
    }
}

impl Perform for ScreenBuffer {
    fn print(&mut self, c: char) {
        ScreenBuffer::print(self, c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' | 0x0b | 0x0c => self.linefeed(),
            b'\r' => self.carriage_return(),
            0x08 => self.backspace(),
            b'\t' => self.tab(),
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore || !intermediates.is_empty() {
            // Private modes (`CSI ? ...`) only toggle presentation.
            return;
        }

        let p = flat(params);
        let row = self.cursor().row;
        let col = self.cursor().col;

        match action {
            'A' => self.move_up(arg(&p, 0, 1)),
            'B' | 'e' => self.move_down(arg(&p, 0, 1)),
            'C' | 'a' => self.move_right(arg(&p, 0, 1)),
            'D' => self.move_left(arg(&p, 0, 1)),
            'E' => {
                self.move_down(arg(&p, 0, 1));
                self.carriage_return();
            }
            'F' => {
                self.move_up(arg(&p, 0, 1));
                self.carriage_return();
            }
            'G' | '`' => self.goto(row, arg(&p, 0, 1) - 1),
            'd' => self.goto(arg(&p, 0, 1) - 1, col),
            'H' | 'f' => self.goto(arg(&p, 0, 1) - 1, arg(&p, 1, 1) - 1),
            'J' => self.erase_display(p.first().copied().unwrap_or(0)),
            'K' => self.erase_line(p.first().copied().unwrap_or(0)),
            'X' => self.erase_chars(arg(&p, 0, 1)),
            '@' => self.insert_chars(arg(&p, 0, 1)),
            'P' => self.delete_chars(arg(&p, 0, 1)),
            'L' => self.insert_lines(arg(&p, 0, 1)),
            'M' => self.delete_lines(arg(&p, 0, 1)),
            'S' => self.scroll_up(arg(&p, 0, 1)),
            'T' => self.scroll_down(arg(&p, 0, 1)),
            'r' => {
                let bottom = arg(&p, 1, self.rows() as u16);
                self.set_scroll_region(arg(&p, 0, 1) - 1, bottom - 1);
            }
            's' => self.save_cursor(),
            'u' => self.restore_cursor(),
            'm' => apply_sgr(self, params),
            'n' => match p.first() {
                Some(5) => self.reply(b"\x1b[0n"),
                Some(6) => {
                    let answer = format!("\x1b[{};{}R", row + 1, col + 1);
                    self.reply(answer.as_bytes());
                }
                _ => {}
            },
            _ => tracing::trace!(%action, ?p, "ignored CSI sequence"),
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        if !intermediates.is_empty() {
            return;
        }
        match byte {
            b'7' => self.save_cursor(),
            b'8' => self.restore_cursor(),
            b'D' => self.linefeed(),
            b'E' => {
                self.carriage_return();
                self.linefeed();
            }
            b'M' => self.reverse_index(),
            b'c' => *self = Self::new(self.rows(), self.cols()),
            _ => {}
        }
    }
}

/// Apply Select Graphic Rendition parameters to the pen.
fn apply_sgr(buffer: &mut ScreenBuffer, params: &Params) {
    // `38;5;n` arrives as separate parameters, `38:5:n` as subparameters.
    let values: Vec<u16> = params.iter().flat_map(|p| p.iter().copied()).collect();
    let pen = buffer.pen_mut();

    if values.is_empty() {
        *pen = super::buffer::Cell::default();
        return;
    }

    let mut i = 0;
    while i < values.len() {
        match values[i] {
            0 => {
                pen.fg = Color::Default;
                pen.bg = Color::Default;
                pen.attrs = Attributes::empty();
            }
            1 => pen.attrs.insert(Attributes::BOLD),
            2 => pen.attrs.insert(Attributes::DIM),
            3 => pen.attrs.insert(Attributes::ITALIC),
            4 => pen.attrs.insert(Attributes::UNDERLINE),
            5 => pen.attrs.insert(Attributes::BLINK),
            7 => pen.attrs.insert(Attributes::INVERSE),
            8 => pen.attrs.insert(Attributes::HIDDEN),
            9 => pen.attrs.insert(Attributes::STRIKETHROUGH),
            21 | 22 => pen.attrs.remove(Attributes::BOLD | Attributes::DIM),
            23 => pen.attrs.remove(Attributes::ITALIC),
            24 => pen.attrs.remove(Attributes::UNDERLINE),
            25 => pen.attrs.remove(Attributes::BLINK),
            27 => pen.attrs.remove(Attributes::INVERSE),
            28 => pen.attrs.remove(Attributes::HIDDEN),
            29 => pen.attrs.remove(Attributes::STRIKETHROUGH),
            n @ 30..=37 => pen.fg = Color::Indexed((n - 30) as u8),
            39 => pen.fg = Color::Default,
            n @ 40..=47 => pen.bg = Color::Indexed((n - 40) as u8),
            49 => pen.bg = Color::Default,
            n @ 90..=97 => pen.fg = Color::Indexed((n - 90 + 8) as u8),
            n @ 100..=107 => pen.bg = Color::Indexed((n - 100 + 8) as u8),
            n @ (38 | 48) => {
                let (color, used) = extended_color(&values[i + 1..]);
                if let Some(color) = color {
                    if n == 38 {
                        pen.fg = color;
                    } else {
                        pen.bg = color;
                    }
                }
                i += used;
            }
            _ => {}
        }
        i += 1;
    }
}

/// Parse the tail of `38;5;n` / `38;2;r;g;b`; returns the color and how
/// many values it consumed.
fn extended_color(rest: &[u16]) -> (Option<Color>, usize) {
    match rest {
        [5, n, ..] => (Some(Color::Indexed(*n as u8)), 2),
        [2, r, g, b, ..] => (Some(Color::Rgb(*r as u8, *g as u8, *b as u8)), 4),
        [5] | [2, ..] => (None, rest.len()),
        _ => (None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(buffer: &mut ScreenBuffer, bytes: &[u8]) {
        let mut parser = vte::Parser::new();
        parser.advance(buffer, bytes);
    }

    #[test]
    fn cursor_movement() {
        let mut buf = ScreenBuffer::new(10, 20);
        feed(&mut buf, b"\x1b[5;10H");
        assert_eq!((buf.cursor().row, buf.cursor().col), (4, 9));

        feed(&mut buf, b"\x1b[2A\x1b[3D");
        assert_eq!((buf.cursor().row, buf.cursor().col), (2, 6));

        feed(&mut buf, b"\x1b[G");
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn clear_line_and_rewrite() {
        let mut buf = ScreenBuffer::new(3, 20);
        feed(&mut buf, b"first try\r\x1b[2Ksecond");
        assert_eq!(buf.row_text(0), "second");
    }

    #[test]
    fn move_up_and_clear_below() {
        let mut buf = ScreenBuffer::new(5, 20);
        feed(&mut buf, b"? pick\r\n> red\r\n  blue\r\n");
        feed(&mut buf, b"\x1b[3A\r\x1b[J? pick: blue\r\n");
        assert_eq!(buf.text(), "? pick: blue\n\n\n\n");
    }

    #[test]
    fn sgr_attributes_and_colors() {
        let mut buf = ScreenBuffer::new(1, 20);
        feed(&mut buf, b"\x1b[1;36mA\x1b[0mB\x1b[38;5;200mC\x1b[38;2;1;2;3mD");

        let a = buf.cell(0, 0).unwrap();
        assert!(a.attrs.contains(Attributes::BOLD));
        assert_eq!(a.fg, Color::CYAN);

        let b = buf.cell(0, 1).unwrap();
        assert_eq!(b.fg, Color::Default);
        assert!(b.attrs.is_empty());

        assert_eq!(buf.cell(0, 2).unwrap().fg, Color::Indexed(200));
        assert_eq!(buf.cell(0, 3).unwrap().fg, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn cursor_position_report() {
        let mut buf = ScreenBuffer::new(10, 20);
        feed(&mut buf, b"\x1b[3;4H\x1b[6n");
        assert_eq!(buf.take_replies(), b"\x1b[3;4R");
        assert!(buf.take_replies().is_empty());
    }

    #[test]
    fn private_modes_ignored() {
        let mut buf = ScreenBuffer::new(2, 10);
        feed(&mut buf, b"\x1b[?25lok\x1b[?25h");
        assert_eq!(buf.row_text(0), "ok");
    }

    #[test]
    fn save_restore_escape() {
        let mut buf = ScreenBuffer::new(5, 10);
        feed(&mut buf, b"\x1b[2;2H\x1b7\x1b[5;5H\x1b8x");
        assert_eq!(buf.row_text(1), " x");
    }
}
