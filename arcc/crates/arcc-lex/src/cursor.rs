//! Character cursor for traversing source code.
//!
//! The cursor walks the source one `char` at a time, tracking the byte
//! offset, the 1-based line and the 0-based column. Columns count characters,
//! not bytes, so positions stay meaningful for non-ASCII identifiers inside
//! string literals and comments.

use arcc_util::Position;

/// A cursor for traversing source code character by character.
///
/// # Example
///
/// ```
/// use arcc_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new("x := 1");
/// assert_eq!(cursor.current_char(), 'x');
/// cursor.advance();
/// assert_eq!(cursor.column(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    /// The source text being traversed.
    source: &'a str,

    /// Current byte position in the source.
    position: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (0-based, in characters).
    column: u32,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 0,
        }
    }

    /// Returns the current character, or `'\0'` at the end of the source.
    #[inline]
    pub fn current_char(&self) -> char {
        self.peek_char(0)
    }

    /// Returns the character `offset` characters ahead (0 = current).
    ///
    /// ```
    /// use arcc_lex::cursor::Cursor;
    ///
    /// let cursor = Cursor::new("a->b");
    /// assert_eq!(cursor.peek_char(1), '-');
    /// assert_eq!(cursor.peek_char(9), '\0');
    /// ```
    #[inline]
    pub fn peek_char(&self, offset: usize) -> char {
        let rest = &self.source[self.position..];
        // Fast path for ASCII (most common case)
        if let Some(&b) = rest.as_bytes().get(offset) {
            if rest.as_bytes()[..=offset].is_ascii() {
                return b as char;
            }
        }
        rest.chars().nth(offset).unwrap_or('\0')
    }

    /// Advances the cursor to the next character.
    ///
    /// Updates line and column tracking. Does nothing if already at end.
    #[inline]
    pub fn advance(&mut self) {
        if let Some(c) = self.source[self.position..].chars().next() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    /// Returns true if the cursor is at the end of the source.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Consumes `expected` if it is the current character.
    ///
    /// ```
    /// use arcc_lex::cursor::Cursor;
    ///
    /// let mut cursor = Cursor::new(":=");
    /// assert!(!cursor.match_char('='));
    /// assert!(cursor.match_char(':'));
    /// assert!(cursor.match_char('='));
    /// ```
    pub fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Current line number (1-based).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column number (0-based).
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Current line and column.
    #[inline]
    pub fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Current byte offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Source text from byte offset `start` up to the cursor.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    /// Source text from the cursor to the end.
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor() {
        let cursor = Cursor::new("func f");
        assert_eq!(cursor.current_char(), 'f');
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.pos(), Position::new(1, 0));
    }

    #[test]
    fn test_advance_past_end_is_noop() {
        let mut cursor = Cursor::new("a");
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current_char(), '\0');
        assert_eq!(cursor.column(), 1);
    }

    #[test]
    fn test_advance_utf8() {
        let mut cursor = Cursor::new("αβ\"");
        assert_eq!(cursor.peek_char(1), 'β');
        cursor.advance();
        assert_eq!(cursor.current_char(), 'β');
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.column(), 1);
        assert_eq!(cursor.peek_char(1), '"');
    }

    #[test]
    fn test_line_column_tracking() {
        let mut cursor = Cursor::new("ab\ncd");
        for _ in 0..4 {
            cursor.advance();
        }
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.column(), 1);
    }

    #[test]
    fn test_slice_and_remaining() {
        let mut cursor = Cursor::new("valve -> out");
        for _ in 0..5 {
            cursor.advance();
        }
        assert_eq!(cursor.slice_from(0), "valve");
        assert_eq!(cursor.remaining(), " -> out");
    }
}
