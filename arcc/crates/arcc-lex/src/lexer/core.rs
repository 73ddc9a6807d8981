//! Core lexer implementation.
//!
//! This module contains the main Lexer struct and its dispatch loop.

use arcc_util::{DiagnosticBuilder, Diagnostics, ErrorCode, Position, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for the Arc language.
///
/// The lexer transforms source text into a stream of [`Token`]s, reporting
/// malformed input into the borrowed [`Diagnostics`] store. Newlines are
/// ordinary whitespace; statements are delimited by the grammar alone.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Store for lexical errors.
    pub(crate) diagnostics: &'a mut Diagnostics,

    /// Byte offset where the current token starts.
    pub(crate) token_start: usize,

    /// Line/column where the current token starts.
    token_start_pos: Position,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str, diagnostics: &'a mut Diagnostics) -> Self {
        let mut cursor = Cursor::new(source);
        if cursor.remaining().starts_with('\u{FEFF}') {
            cursor.advance();
        }
        let token_start_pos = cursor.pos();
        Self {
            cursor,
            diagnostics,
            token_start: 0,
            token_start_pos,
        }
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character. Returns an [`TokenKind::Eof`] token at the end of input,
    /// and keeps returning it if called again.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.mark_start();

        if self.cursor.is_at_end() {
            return self.finish(TokenKind::Eof);
        }

        let kind = match self.cursor.current_char() {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            '+' => self.single(TokenKind::Plus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '%' => self.single(TokenKind::Percent),
            '^' => self.single(TokenKind::Caret),
            '-' => self.lex_minus(),
            ':' => self.lex_colon(),
            '$' => self.lex_dollar(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '"' => self.lex_string(),
            c if c == '_' || c.is_ascii_alphabetic() => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.cursor.peek_char(1).is_ascii_digit() => self.lex_number(),
            c => {
                self.cursor.advance();
                self.report_error(format!("unexpected character '{c}'"));
                TokenKind::Invalid(c)
            },
        };
        self.finish(kind)
    }

    /// Records the cursor as the start of the next reported span.
    pub(crate) fn mark_start(&mut self) {
        self.token_start = self.cursor.position();
        self.token_start_pos = self.cursor.pos();
    }

    /// Consumes one character and yields `kind`.
    #[inline]
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    fn finish(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.current_span())
    }

    /// Span from the start of the current token to the cursor.
    pub(crate) fn current_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_pos,
            self.cursor.pos(),
        )
    }

    /// Reports a lexical error covering the current token.
    pub fn report_error(&mut self, message: String) {
        DiagnosticBuilder::error(message)
            .code(ErrorCode::Syntax)
            .span(self.current_span())
            .emit(self.diagnostics);
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Returns the current column number (0-based).
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    /// Returns the current byte position in the source.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Tokenizes `source` completely. The returned vector always ends with an
/// [`TokenKind::Eof`] token.
///
/// ```
/// use arcc_lex::{tokenize, TokenKind};
///
/// let (tokens, diagnostics) = tokenize("valve -> out");
/// assert!(diagnostics.is_empty());
/// assert_eq!(tokens[1].kind, TokenKind::Arrow);
/// assert_eq!(tokens.len(), 4);
/// ```
pub fn tokenize(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut tokens = Vec::new();
    {
        let mut lexer = Lexer::new(source, &mut diagnostics);
        loop {
            let token = lexer.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
    }
    (tokens, diagnostics)
}
