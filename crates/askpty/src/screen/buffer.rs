//! Character grid behind the virtual terminal.
//!
//! The grid stores one [`Cell`] per position and a cursor. Writing at the
//! last column arms a pending wrap that the next printable character
//! resolves, the way xterm does, so a full-width line followed by CR LF
//! does not produce a blank line.

use std::fmt;

/// Terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Default terminal color.
    #[default]
    Default,
    /// 256-color palette index; 0-7 are the classic ANSI colors.
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// The classic ANSI colors, by name.
    pub const RED: Self = Self::Indexed(1);
    /// ANSI green.
    pub const GREEN: Self = Self::Indexed(2);
    /// ANSI cyan.
    pub const CYAN: Self = Self::Indexed(6);
}

bitflags::bitflags! {
    /// Text attributes for a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attributes: u8 {
        /// Bold text.
        const BOLD = 0b0000_0001;
        /// Dim/faint text.
        const DIM = 0b0000_0010;
        /// Italic text.
        const ITALIC = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE = 0b0000_1000;
        /// Blinking text.
        const BLINK = 0b0001_0000;
        /// Inverse video.
        const INVERSE = 0b0010_0000;
        /// Hidden text.
        const HIDDEN = 0b0100_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b1000_0000;
    }
}

/// A single position on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character shown.
    pub ch: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text attributes.
    pub attrs: Attributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attributes::empty(),
        }
    }
}

/// Cursor position, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Row.
    pub row: usize,
    /// Column.
    pub col: usize,
}

/// The character grid plus cursor and pen state.
#[derive(Clone)]
pub struct ScreenBuffer {
    rows: usize,
    cols: usize,
    lines: Vec<Vec<Cell>>,
    cursor: Cursor,
    wrap_pending: bool,
    /// Style applied to newly printed characters.
    pen: Cell,
    saved: Option<(Cursor, Cell)>,
    /// Scroll region, inclusive.
    top: usize,
    bottom: usize,
    /// Bytes the terminal owes the program (query answers).
    replies: Vec<u8>,
}

impl ScreenBuffer {
    /// Create a blank grid. Zero dimensions are raised to one.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            lines: vec![vec![Cell::default(); cols]; rows],
            cursor: Cursor::default(),
            wrap_pending: false,
            pen: Cell::default(),
            saved: None,
            top: 0,
            bottom: rows - 1,
            replies: Vec::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Current cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Cell at a position.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.lines.get(row).and_then(|line| line.get(col))
    }

    /// Put a printable character at the cursor and advance.
    pub fn print(&mut self, ch: char) {
        if self.wrap_pending {
            self.wrap_pending = false;
            self.cursor.col = 0;
            self.linefeed();
        }

        self.lines[self.cursor.row][self.cursor.col] = Cell { ch, ..self.pen };

        if self.cursor.col + 1 >= self.cols {
            self.wrap_pending = true;
        } else {
            self.cursor.col += 1;
        }
    }

    /// Move down one line, scrolling at the bottom of the scroll region.
    pub fn linefeed(&mut self) {
        if self.cursor.row == self.bottom {
            self.scroll_up(1);
        } else if self.cursor.row + 1 < self.rows {
            self.cursor.row += 1;
        }
    }

    /// Move up one line, scrolling down at the top of the scroll region.
    pub fn reverse_index(&mut self) {
        if self.cursor.row == self.top {
            self.scroll_down(1);
        } else {
            self.cursor.row = self.cursor.row.saturating_sub(1);
        }
    }

    /// Return to column 0.
    pub const fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.wrap_pending = false;
    }

    /// Move one column left.
    pub const fn backspace(&mut self) {
        self.cursor.col = self.cursor.col.saturating_sub(1);
        self.wrap_pending = false;
    }

    /// Advance to the next tab stop (every 8 columns).
    pub fn tab(&mut self) {
        self.cursor.col = ((self.cursor.col / 8 + 1) * 8).min(self.cols - 1);
    }

    /// Move the cursor, clamped to the grid.
    pub fn goto(&mut self, row: usize, col: usize) {
        self.cursor.row = row.min(self.rows - 1);
        self.cursor.col = col.min(self.cols - 1);
        self.wrap_pending = false;
    }

    /// Move up `n` rows, stopping at the top.
    pub fn move_up(&mut self, n: usize) {
        self.goto(self.cursor.row.saturating_sub(n), self.cursor.col);
    }

    /// Move down `n` rows, stopping at the bottom.
    pub fn move_down(&mut self, n: usize) {
        self.goto(self.cursor.row.saturating_add(n), self.cursor.col);
    }

    /// Move left `n` columns.
    pub fn move_left(&mut self, n: usize) {
        self.goto(self.cursor.row, self.cursor.col.saturating_sub(n));
    }

    /// Move right `n` columns.
    pub fn move_right(&mut self, n: usize) {
        self.goto(self.cursor.row, self.cursor.col.saturating_add(n));
    }

    fn blank(&self) -> Cell {
        Cell {
            bg: self.pen.bg,
            ..Cell::default()
        }
    }

    fn clear_cells(&mut self, row: usize, from: usize, to: usize) {
        let blank = self.blank();
        let to = to.min(self.cols);
        if let Some(line) = self.lines.get_mut(row) {
            for cell in &mut line[from.min(to)..to] {
                *cell = blank;
            }
        }
    }

    /// Erase in display: 0 = cursor to end, 1 = start to cursor, 2/3 = all.
    pub fn erase_display(&mut self, mode: u16) {
        let Cursor { row, col } = self.cursor;
        match mode {
            0 => {
                self.clear_cells(row, col, self.cols);
                for r in row + 1..self.rows {
                    self.clear_cells(r, 0, self.cols);
                }
            }
            1 => {
                for r in 0..row {
                    self.clear_cells(r, 0, self.cols);
                }
                self.clear_cells(row, 0, col + 1);
            }
            _ => {
                for r in 0..self.rows {
                    self.clear_cells(r, 0, self.cols);
                }
            }
        }
    }

    /// Erase in line: 0 = cursor to end, 1 = start to cursor, 2 = whole line.
    pub fn erase_line(&mut self, mode: u16) {
        let Cursor { row, col } = self.cursor;
        match mode {
            0 => self.clear_cells(row, col, self.cols),
            1 => self.clear_cells(row, 0, col + 1),
            _ => self.clear_cells(row, 0, self.cols),
        }
    }

    /// Blank `n` cells from the cursor without moving anything.
    pub fn erase_chars(&mut self, n: usize) {
        let Cursor { row, col } = self.cursor;
        self.clear_cells(row, col, col.saturating_add(n));
    }

    /// Insert `n` blanks at the cursor, shifting the rest of the line right.
    pub fn insert_chars(&mut self, n: usize) {
        let blank = self.blank();
        let Cursor { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let n = n.min(self.cols - col);
        line[col..].rotate_right(n);
        for cell in &mut line[col..col + n] {
            *cell = blank;
        }
    }

    /// Delete `n` cells at the cursor, shifting the rest of the line left.
    pub fn delete_chars(&mut self, n: usize) {
        let blank = self.blank();
        let Cursor { row, col } = self.cursor;
        let cols = self.cols;
        let line = &mut self.lines[row];
        let n = n.min(cols - col);
        line[col..].rotate_left(n);
        for cell in &mut line[cols - n..] {
            *cell = blank;
        }
    }

    /// Scroll the region up by `n` lines; blank lines enter at the bottom.
    pub fn scroll_up(&mut self, n: usize) {
        let n = n.min(self.bottom - self.top + 1);
        let blank = vec![self.blank(); self.cols];
        self.lines[self.top..=self.bottom].rotate_left(n);
        for line in &mut self.lines[self.bottom + 1 - n..=self.bottom] {
            line.clone_from(&blank);
        }
    }

    /// Scroll the region down by `n` lines; blank lines enter at the top.
    pub fn scroll_down(&mut self, n: usize) {
        let n = n.min(self.bottom - self.top + 1);
        let blank = vec![self.blank(); self.cols];
        self.lines[self.top..=self.bottom].rotate_right(n);
        for line in &mut self.lines[self.top..self.top + n] {
            line.clone_from(&blank);
        }
    }

    /// Insert `n` blank lines at the cursor row inside the scroll region.
    pub fn insert_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        if row < self.top || row > self.bottom {
            return;
        }
        let saved_top = self.top;
        self.top = row;
        self.scroll_down(n);
        self.top = saved_top;
    }

    /// Delete `n` lines at the cursor row inside the scroll region.
    pub fn delete_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        if row < self.top || row > self.bottom {
            return;
        }
        let saved_top = self.top;
        self.top = row;
        self.scroll_up(n);
        self.top = saved_top;
    }

    /// Set the scroll region (0-indexed, inclusive) and home the cursor.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let bottom = bottom.min(self.rows - 1);
        if top < bottom {
            self.top = top;
            self.bottom = bottom;
        } else {
            self.top = 0;
            self.bottom = self.rows - 1;
        }
        self.goto(0, 0);
    }

    /// Save cursor and pen (DECSC).
    pub const fn save_cursor(&mut self) {
        self.saved = Some((self.cursor, self.pen));
    }

    /// Restore cursor and pen (DECRC).
    pub fn restore_cursor(&mut self) {
        if let Some((cursor, pen)) = self.saved {
            self.pen = pen;
            self.goto(cursor.row, cursor.col);
        }
    }

    /// Mutable access to the pen for SGR handling.
    pub(crate) const fn pen_mut(&mut self) -> &mut Cell {
        &mut self.pen
    }

    /// Queue bytes to send back to the program.
    pub(crate) fn reply(&mut self, bytes: &[u8]) {
        self.replies.extend_from_slice(bytes);
    }

    /// Take queued replies.
    pub fn take_replies(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.replies)
    }

    /// A row as text, trailing blanks removed.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        self.lines.get(row).map_or_else(String::new, |line| {
            line.iter()
                .map(|c| c.ch)
                .collect::<String>()
                .trim_end()
                .to_string()
        })
    }

    /// All rows joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        (0..self.rows)
            .map(|r| self.row_text(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for ScreenBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenBuffer")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("cursor", &self.cursor)
            .finish()
    }
}
