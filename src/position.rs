//! Source positions
//!
//! Every token and AST node carries the position of its first character so
//! diagnostics can point back into the source. Offsets count characters from
//! the start of the input; rows and columns are 1-based, the way editors
//! display them.

use serde::Serialize;
use std::fmt;

/// A location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Character offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub row: usize,
    /// 1-based column number.
    pub col: usize,
}

impl Position {
    pub fn new(offset: usize, row: usize, col: usize) -> Self {
        Self { offset, row, col }
    }

    /// The position of the first character of any input.
    pub fn start() -> Self {
        Self {
            offset: 0,
            row: 1,
            col: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

// ============================================================================
// Tests
// ============================================================================
