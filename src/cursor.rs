//! Character cursor
//!
//! A cursor over the source characters with the bookkeeping the lexer needs:
//! row/column tracking, bounded lookahead and lookback, a mark for capturing
//! substrings, and snapshots for speculative scans that may need to rewind
//! (math delimiters, heredocs, list markers).
//!
//! The cursor works on characters, not bytes, so multi-byte input never
//! splits a code point and columns count what an editor would show.

use crate::position::Position;

/// A saved cursor location for [`Cursor::backtrack_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    offset: usize,
    row: usize,
    col: usize,
}

impl Snapshot {
    pub fn position(&self) -> Position {
        Position::new(self.offset, self.row, self.col)
    }
}

#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    offset: usize,
    row: usize,
    col: usize,
    marked: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            offset: 0,
            row: 1,
            col: 1,
            marked: 0,
        }
    }

    pub fn has_source_left(&self) -> bool {
        self.offset < self.chars.len()
    }

    /// The character under the cursor, or `None` past the end.
    pub fn cur_char(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    pub fn position(&self) -> Position {
        Position::new(self.offset, self.row, self.col)
    }

    /// Whether the cursor sits on the first column of a line.
    pub fn at_line_start(&self) -> bool {
        self.col == 1
    }

    /// The character `n` places after the current one.
    pub fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.offset + n).copied()
    }

    /// Up to `n` characters after the current one.
    pub fn lookahead(&self, n: usize) -> String {
        let start = (self.offset + 1).min(self.chars.len());
        let end = (start + n).min(self.chars.len());
        self.chars[start..end].iter().collect()
    }

    /// Up to `n` characters before the current one.
    pub fn lookback(&self, n: usize) -> String {
        let start = self.offset.saturating_sub(n);
        self.chars[start..self.offset].iter().collect()
    }

    /// Whether the text starting at the cursor (current character included)
    /// matches `s` exactly.
    pub fn at_str(&self, s: &str) -> bool {
        let mut offset = self.offset;
        for expected in s.chars() {
            match self.chars.get(offset) {
                Some(&c) if c == expected => offset += 1,
                _ => return false,
            }
        }
        true
    }

    /// Advance by `n` characters, saturating at the end of input.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if !self.advance_once() {
                break;
            }
        }
    }

    fn advance_once(&mut self) -> bool {
        match self.cur_char() {
            Some('\n') => {
                self.row += 1;
                self.col = 1;
            }
            Some(_) => self.col += 1,
            None => return false,
        }
        self.offset += 1;
        true
    }

    /// Advance while the predicate holds and input remains.
    pub fn advance_while(&mut self, pred: impl Fn(&Cursor) -> bool) {
        while self.has_source_left() && pred(self) {
            self.advance_once();
        }
    }

    /// Advance until the predicate holds or input runs out.
    pub fn advance_until(&mut self, pred: impl Fn(&Cursor) -> bool) {
        while self.has_source_left() && !pred(self) {
            self.advance_once();
        }
    }

    /// Remember the current offset for a later [`Cursor::capture_marked_substring`].
    pub fn mark_position(&mut self) {
        self.marked = self.offset;
    }

    /// The substring from the mark through the current character, inclusive.
    pub fn capture_marked_substring(&self) -> String {
        let end = (self.offset + 1).min(self.chars.len());
        self.chars[self.marked..end.max(self.marked)].iter().collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            offset: self.offset,
            row: self.row,
            col: self.col,
        }
    }

    /// Rewind to a snapshot taken earlier on this cursor.
    pub fn backtrack_to(&mut self, snapshot: Snapshot) {
        self.offset = snapshot.offset;
        self.row = snapshot.row;
        self.col = snapshot.col;
    }

    /// Consume the whitespace run after a token and return it.
    ///
    /// Stops without consuming at a blank-line boundary (a newline directly
    /// followed by another newline), so the main lexer loop still sees the
    /// `\n\n` pair and can emit an empty-row token for it.
    pub fn capture_right_pad(&mut self) -> String {
        let mut pad = String::new();
        while let Some(c) = self.cur_char() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' && self.peek(1) == Some('\n') {
                break;
            }
            pad.push(c);
            self.advance_once();
        }
        pad
    }
}

// ============================================================================
// Tests
// ============================================================================
