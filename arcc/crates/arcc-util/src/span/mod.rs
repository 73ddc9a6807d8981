//! Span module - Source location tracking.
//!
//! This module provides types for representing source code locations:
//! a [`Position`] (line and column of a single character) and a [`Span`]
//! (byte range plus the positions of its first and last character).
//!
//! Lines are 1-based. Columns are 0-based character offsets within the line,
//! which is what Arc tooling has always reported (`2:4 error: ...`).
//!
//! # Examples
//!
//! ```
//! use arcc_util::span::{Position, Span};
//!
//! let span = Span::new(10, 13, Position::new(2, 4), Position::new(2, 7));
//! assert_eq!(span.start.line, 2);
//! assert_eq!(span.len(), 3);
//! ```

use std::fmt;

/// A line/column location in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (0-based, in characters)
    pub col: u32,
}

impl Position {
    /// The zero position, used when a diagnostic has no source node
    pub const ZERO: Position = Position { line: 0, col: 0 };

    /// Create a new position
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Source location span
///
/// A `Span` represents a range in source code, identified by:
/// - Byte offsets (start, end), end exclusive
/// - The position of the first character
/// - The position just past the last character
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset in source
    pub lo: usize,
    /// End byte offset in source (exclusive)
    pub hi: usize,
    /// Position of the first character
    pub start: Position,
    /// Position just past the last character
    pub end: Position,
}

impl Span {
    /// Dummy span for nodes that have no source location
    ///
    /// ```
    /// use arcc_util::span::{Position, Span};
    ///
    /// assert_eq!(Span::DUMMY.start, Position::ZERO);
    /// assert!(Span::DUMMY.is_empty());
    /// ```
    pub const DUMMY: Span = Span {
        lo: 0,
        hi: 0,
        start: Position::ZERO,
        end: Position::ZERO,
    };

    /// Create a new span
    #[inline]
    pub const fn new(lo: usize, hi: usize, start: Position, end: Position) -> Self {
        Self { lo, hi, start, end }
    }

    /// Returns true if this span is empty (lo == hi)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }

    /// Returns the length of the span in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    /// Check if this span contains a byte offset
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.lo <= offset && offset < self.hi
    }

    /// Join two spans into a single span covering both
    ///
    /// ```
    /// use arcc_util::span::{Position, Span};
    ///
    /// let a = Span::new(0, 4, Position::new(1, 0), Position::new(1, 4));
    /// let b = Span::new(8, 10, Position::new(2, 2), Position::new(2, 4));
    /// let joined = a.to(b);
    /// assert_eq!(joined.lo, 0);
    /// assert_eq!(joined.hi, 10);
    /// assert_eq!(joined.end, Position::new(2, 4));
    /// ```
    #[inline]
    pub fn to(self, other: Span) -> Span {
        let (start, lo) = if other.lo < self.lo {
            (other.start, other.lo)
        } else {
            (self.start, self.lo)
        };
        let (end, hi) = if other.hi > self.hi {
            (other.end, other.hi)
        } else {
            (self.end, self.hi)
        };
        Span { lo, hi, start, end }
    }
}

/// Anything that occupies a region of source text.
///
/// Diagnostics use this to compute their start and end positions from an
/// AST node, a token, or a bare [`Span`].
pub trait Spanned {
    /// The source region covered by this value
    fn span(&self) -> Span;
}

impl Spanned for Span {
    #[inline]
    fn span(&self) -> Span {
        *self
    }
}

impl<T: Spanned + ?Sized> Spanned for &T {
    #[inline]
    fn span(&self) -> Span {
        (**self).span()
    }
}

impl<T: Spanned + ?Sized> Spanned for Box<T> {
    #[inline]
    fn span(&self) -> Span {
        (**self).span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(lo: usize, hi: usize, line: u32, col: u32) -> Span {
        Span::new(
            lo,
            hi,
            Position::new(line, col),
            Position::new(line, col + (hi - lo) as u32),
        )
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 7).to_string(), "3:7");
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn test_span_len_and_contains() {
        let s = span(10, 20, 1, 5);
        assert_eq!(s.len(), 10);
        assert!(s.contains(10));
        assert!(s.contains(19));
        assert!(!s.contains(20));
    }

    #[test]
    fn test_span_to_is_symmetric() {
        let a = span(0, 4, 1, 0);
        let b = span(10, 12, 2, 3);
        assert_eq!(a.to(b), b.to(a));
        assert_eq!(a.to(b).start, Position::new(1, 0));
        assert_eq!(a.to(b).end, Position::new(2, 5));
    }

    #[test]
    fn test_spanned_for_references() {
        let s = span(1, 2, 1, 1);
        let boxed: Box<Span> = Box::new(s);
        assert_eq!((&s).span(), s);
        assert_eq!(boxed.span(), s);
    }
}
