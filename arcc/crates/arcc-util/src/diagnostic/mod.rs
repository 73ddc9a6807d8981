//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! This module provides the [`Diagnostic`] value and the [`Diagnostics`]
//! store every phase reports into. The store keeps insertion order and
//! deduplicates: at most one entry exists per `(start position, message)`.
//! Adding the same message twice at the same position keeps the more severe
//! of the two.
//!
//! # Examples
//!
//! ```
//! use arcc_util::diagnostic::{Diagnostics, ErrorCode, Severity};
//! use arcc_util::span::{Position, Span};
//!
//! let span = Span::new(0, 3, Position::new(1, 0), Position::new(1, 3));
//! let mut diags = Diagnostics::new();
//! diags.add_warning("unused", Some(span));
//! diags.add_error("unused", Some(span));
//! diags.add_error_code(ErrorCode::SymbolUndefined, "undefined symbol: x", None);
//!
//! assert_eq!(diags.len(), 2);
//! assert_eq!(diags.iter().next().map(|d| d.severity), Some(Severity::Error));
//! assert!(!diags.ok());
//! ```

mod builder;
mod codes;
mod level;

pub use builder::DiagnosticBuilder;
pub use codes::ErrorCode;
pub use level::Severity;

use crate::span::{Position, Span};
use rustc_hash::FxHashMap;
use std::fmt;

/// A diagnostic message with severity and location
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic severity level
    pub severity: Severity,
    /// Main diagnostic message
    pub message: String,
    /// Position of the first offending character
    pub start: Position,
    /// Position just past the offending region
    pub end: Position,
    /// Optional stable code
    pub code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic. Without a span both positions are zero.
    pub fn new(severity: Severity, message: impl fmt::Display, span: Option<Span>) -> Self {
        let span = span.unwrap_or(Span::DUMMY);
        Self {
            severity,
            message: message.to_string(),
            start: span.start,
            end: span.end,
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl fmt::Display, span: Option<Span>) -> Self {
        Self::new(Severity::Error, message, span)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl fmt::Display, span: Option<Span>) -> Self {
        Self::new(Severity::Warning, message, span)
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.start, self.severity, self.message)
    }
}

/// Ordered, deduplicating collection of diagnostics
///
/// Entries are never removed. A positional index maps each start position to
/// the entries beginning there, so both dedup and [`Diagnostics::at_location`]
/// only look at the entries sharing that position.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    by_start: FxHashMap<Position, Vec<usize>>,
}

impl Diagnostics {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic, merging with an existing entry that has the same
    /// start position and message.
    ///
    /// The existing entry is replaced only when the incoming severity is
    /// strictly higher; otherwise the call is a no-op.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if let Some(indices) = self.by_start.get(&diagnostic.start) {
            for &i in indices {
                let existing = &mut self.entries[i];
                if existing.message == diagnostic.message {
                    if diagnostic.severity.is_higher_than(existing.severity) {
                        *existing = diagnostic;
                    }
                    return;
                }
            }
        }
        let index = self.entries.len();
        self.by_start.entry(diagnostic.start).or_default().push(index);
        self.entries.push(diagnostic);
    }

    /// Add an error located at `span`
    pub fn add_error(&mut self, message: impl fmt::Display, span: Option<Span>) {
        self.add(Diagnostic::new(Severity::Error, message, span));
    }

    /// Add an error carrying a stable code
    pub fn add_error_code(&mut self, code: ErrorCode, message: impl fmt::Display, span: Option<Span>) {
        self.add(Diagnostic::new(Severity::Error, message, span).with_code(code));
    }

    /// Add a warning located at `span`
    pub fn add_warning(&mut self, message: impl fmt::Display, span: Option<Span>) {
        self.add(Diagnostic::new(Severity::Warning, message, span));
    }

    /// Add a warning carrying a stable code
    pub fn add_warning_code(
        &mut self,
        code: ErrorCode,
        message: impl fmt::Display,
        span: Option<Span>,
    ) {
        self.add(Diagnostic::new(Severity::Warning, message, span).with_code(code));
    }

    /// Add an informational message
    pub fn add_info(&mut self, message: impl fmt::Display, span: Option<Span>) {
        self.add(Diagnostic::new(Severity::Info, message, span));
    }

    /// Add a hint
    pub fn add_hint(&mut self, message: impl fmt::Display, span: Option<Span>) {
        self.add(Diagnostic::new(Severity::Hint, message, span));
    }

    /// Append every entry of `other`, applying the dedup rule to each
    pub fn merge(&mut self, other: Diagnostics) {
        for diagnostic in other.entries {
            self.add(diagnostic);
        }
    }

    /// True iff no entry has severity [`Severity::Error`]
    pub fn ok(&self) -> bool {
        !self.entries.iter().any(|d| d.severity.is_error())
    }

    /// Error entries, in order
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    /// Warning entries, in order
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Number of error entries
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Indices of the entries starting at `position`, ascending
    pub fn at_location(&self, position: Position) -> &[usize] {
        self.by_start
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&Diagnostic> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in order
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.add(diagnostic);
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("analysis successful");
        }
        for (i, diagnostic) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}
