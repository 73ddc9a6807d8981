//! arcc-par - Parser for the Arc language
//!
//! A recursive descent parser with precedence climbing for expressions. It
//! turns the token stream from `arcc-lex` into a [`Program`] whose nodes
//! carry a [`NodeId`] and a [`Span`].
//!
//! # Example Usage
//!
//! ```
//! use arcc_par::{parse, Item};
//!
//! let (program, diagnostics) = parse("authority 200\nfunc add(a i64, b i64) i64 { return a + b }");
//! assert!(diagnostics.ok());
//! assert_eq!(program.items.len(), 2);
//! assert!(matches!(program.items[1], Item::Function(_)));
//! ```
//!
//! # Error Recovery
//!
//! Syntax errors are reported with code `ARC1001`. The parser then skips to
//! a synchronization point and continues:
//! - Top level: the next `func`, `sequence` or `authority` keyword, or the
//!   first token on a later line
//! - Statements: the closing `}` or the first token on a later line
//!
//! Newlines carry no syntax, so the line heuristic only guides recovery.

#![warn(missing_docs)]

pub mod ast;
mod expr;
mod flow;
mod items;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

pub use ast::*;

use arcc_lex::{tokenize, Token, TokenKind};
use arcc_util::{DiagnosticBuilder, Diagnostics, ErrorCode, Span};
use tracing::debug;

/// Parses Arc source text.
///
/// Lexical and syntax errors are both returned in the diagnostics; the
/// program contains every item that could be recovered.
pub fn parse(source: &str) -> (Program, Diagnostics) {
    let (tokens, mut diagnostics) = tokenize(source);
    let program = Parser::new(tokens, &mut diagnostics).parse_program();
    debug!(
        items = program.items.len(),
        errors = diagnostics.error_count(),
        "parsed program"
    );
    (program, diagnostics)
}

/// Deepest nesting of expressions, blocks and routing tables the parser
/// descends into
pub const MAX_NESTING_DEPTH: u32 = 128;

/// Recursive descent parser over a token vector
pub struct Parser<'a> {
    /// Token stream, always terminated by `Eof`
    tokens: Vec<Token>,

    /// Current position in token stream
    position: usize,

    /// Error sink
    diagnostics: &'a mut Diagnostics,

    /// Next node id to hand out
    next_id: u32,

    /// Current nesting depth, bounded by [`MAX_NESTING_DEPTH`]
    depth: u32,
}

impl<'a> Parser<'a> {
    /// Create a parser. A trailing `Eof` token is added if missing.
    pub fn new(mut tokens: Vec<Token>, diagnostics: &'a mut Diagnostics) -> Self {
        if !tokens.last().map(Token::is_eof).unwrap_or(false) {
            let end = tokens.last().map(|t| t.span).unwrap_or(Span::DUMMY);
            let eof = Span::new(end.hi, end.hi, end.end, end.end);
            tokens.push(Token::new(TokenKind::Eof, eof));
        }
        Self {
            tokens,
            position: 0,
            diagnostics,
            next_id: 0,
            depth: 0,
        }
    }

    /// Parse a complete source file
    pub fn parse_program(&mut self) -> Program {
        let id = self.next_id();
        let start = self.current_span();
        let mut items = Vec::new();

        while !self.is_at_end() {
            match self.parse_item() {
                Some(item) => items.push(item),
                None => self.recover_to_sync_point(),
            }
        }

        let span = start.to(self.current_span());
        Program { id, span, items }
    }

    /// Number of node ids handed out so far
    pub fn node_count(&self) -> u32 {
        self.next_id
    }

    // ========================================================================
    // TOKEN NAVIGATION
    // ========================================================================

    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get current token
    pub(crate) fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    /// Get current token kind
    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Kind of the token `offset` positions ahead
    pub(crate) fn peek_kind(&self, offset: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + offset).min(last)].kind
    }

    /// Get current span
    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token
    pub(crate) fn previous_span(&self) -> Span {
        if self.position == 0 {
            return self.current_span();
        }
        self.tokens[(self.position - 1).min(self.tokens.len() - 1)].span
    }

    /// Span from `start` to the end of the last consumed token
    pub(crate) fn span_from_start(&self, start: Span) -> Span {
        start.to(self.previous_span())
    }

    /// Check if at end of tokens
    pub(crate) fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    /// True if the current token is `kind`
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advance to next token, returning the consumed one
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    /// Match and consume token
    pub(crate) fn match_token(&mut self, expected: &TokenKind) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect specific token
    pub(crate) fn expect(&mut self, expected: TokenKind) -> Option<Span> {
        if self.check(&expected) {
            Some(self.advance().span)
        } else {
            self.error_expected(&expected.describe());
            None
        }
    }

    /// Expect an identifier
    pub(crate) fn expect_ident(&mut self, what: &str) -> Option<Ident> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let name = name.clone();
            let span = self.advance().span;
            Some(Ident::new(name, span))
        } else {
            self.error_expected(what);
            None
        }
    }

    /// Run `parse` one nesting level deeper.
    ///
    /// Past [`MAX_NESTING_DEPTH`] an error is reported instead and nothing
    /// is parsed.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.error(format!(
                "nesting too deep (maximum is {MAX_NESTING_DEPTH} levels)"
            ));
            return None;
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // ERRORS
    // ========================================================================

    /// Report an error at the current token
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(message, span);
    }

    /// Report an error with expected token info
    pub(crate) fn error_expected(&mut self, expected: &str) {
        let found = self.current_kind().describe();
        self.error(format!("expected {expected}, found {found}"));
    }

    /// Report an error at `span`
    pub(crate) fn error_at(&mut self, message: impl Into<String>, span: Span) {
        DiagnosticBuilder::error(message)
            .code(ErrorCode::Syntax)
            .span(span)
            .emit(self.diagnostics);
    }

    /// Recover to synchronization point
    ///
    /// Always consumes at least one token, then skips until a top-level
    /// keyword or the first token on a later line.
    pub(crate) fn recover_to_sync_point(&mut self) {
        let line = self.current_span().start.line;
        self.advance();
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Func | TokenKind::Sequence | TokenKind::Authority => break,
                _ if self.current_span().start.line > line => break,
                _ => {
                    self.advance();
                },
            }
        }
    }

    /// Recover to statement synchronization point
    pub(crate) fn recover_to_stmt_sync(&mut self) {
        let line = self.current_span().start.line;
        if !self.check(&TokenKind::RBrace) {
            self.advance();
        }
        while !self.is_at_end() && !self.check(&TokenKind::RBrace) {
            if self.current_span().start.line > line {
                break;
            }
            self.advance();
        }
    }
}
