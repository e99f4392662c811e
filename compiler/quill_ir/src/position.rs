//! Source positions.

use std::fmt;

/// A point in the source text.
///
/// `offset` is a byte offset from the start of the source and is what the
/// diagnostic renderer uses to underline code. `line` and `column` are
/// 1-based and counted in characters; they are what error messages print.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Start of a source file.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    #[inline]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }

    /// Position reached after scanning `text` starting from `self`.
    #[must_use]
    pub fn advance(self, text: &str) -> Position {
        let mut pos = self;
        for ch in text.chars() {
            pos.offset += ch.len_utf8() as u32;
            if ch == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests;
