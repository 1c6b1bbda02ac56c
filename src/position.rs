use std::fmt::{Display, Formatter};

/// A 1-based line/column location in the input, tracked incrementally by the
/// lexer's character source as it consumes characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position a fresh source starts at.
    pub fn start() -> Self {
        Self::new(1, 1)
    }

    /// Advances this position past `c`, matching the convention that `\n`
    /// resets the column and begins a new line.
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_column_on_normal_chars() {
        let mut pos = Position::start();
        pos.advance('a');
        pos.advance('b');
        assert_eq!(pos, Position::new(1, 3));
    }

    #[test]
    fn advances_line_and_resets_column_on_newline() {
        let mut pos = Position::start();
        pos.advance('a');
        pos.advance('\n');
        assert_eq!(pos, Position::new(2, 1));
    }
}
