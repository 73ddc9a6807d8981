//! Diagnostic builder for fluent diagnostic construction.
//!
//! The lexer and parser report through this builder so that every syntax
//! error carries [`ErrorCode::Syntax`] and a precise span.
//!
//! # Examples
//!
//! ```
//! use arcc_util::diagnostic::{DiagnosticBuilder, Diagnostics, ErrorCode};
//! use arcc_util::span::Span;
//!
//! let mut diags = Diagnostics::new();
//! DiagnosticBuilder::error("unexpected token '}'")
//!     .code(ErrorCode::Syntax)
//!     .span(Span::DUMMY)
//!     .emit(&mut diags);
//!
//! assert_eq!(diags.len(), 1);
//! ```

use super::{Diagnostic, Diagnostics, ErrorCode, Severity};
use crate::span::Span;

/// Builder for [`Diagnostic`] values
#[derive(Clone, Debug)]
#[must_use = "a diagnostic builder does nothing until built or emitted"]
pub struct DiagnosticBuilder {
    severity: Severity,
    message: String,
    span: Option<Span>,
    code: Option<ErrorCode>,
}

impl DiagnosticBuilder {
    /// Start a diagnostic with the given severity
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            span: None,
            code: None,
        }
    }

    /// Start an error
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Start a warning
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Attach a stable code
    pub fn code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Locate the diagnostic
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Finish building
    pub fn build(self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.severity, self.message, self.span);
        match self.code {
            Some(code) => diagnostic.with_code(code),
            None => diagnostic,
        }
    }

    /// Build and add to `diagnostics`
    pub fn emit(self, diagnostics: &mut Diagnostics) {
        diagnostics.add(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    #[test]
    fn test_builder_sets_all_fields() {
        let span = Span::new(4, 6, Position::new(1, 4), Position::new(1, 6));
        let diag = DiagnosticBuilder::warning("odd")
            .code(ErrorCode::TypeMismatch)
            .span(span)
            .build();
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.start, Position::new(1, 4));
        assert_eq!(diag.end, Position::new(1, 6));
        assert_eq!(diag.code, Some(ErrorCode::TypeMismatch));
    }

    #[test]
    fn test_builder_without_span_is_zero() {
        let diag = DiagnosticBuilder::error("eof").build();
        assert_eq!(diag.start, Position::ZERO);
        assert_eq!(diag.code, None);
    }
}
