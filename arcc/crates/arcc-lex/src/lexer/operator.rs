//! Operator and punctuation lexing.
//!
//! Single-character punctuation is handled inline by the dispatcher; this
//! module covers the characters that may start a two-character operator.

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Handles: `-`, `->`
    pub fn lex_minus(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            TokenKind::Arrow
        } else {
            TokenKind::Minus
        }
    }

    /// Handles: `:`, `:=`
    pub fn lex_colon(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::Declare
        } else {
            TokenKind::Colon
        }
    }

    /// Handles: `$=`
    pub fn lex_dollar(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::StateDeclare
        } else {
            self.report_error("expected '=' after '$'".to_string());
            TokenKind::Invalid('$')
        }
    }

    /// Handles: `=`, `==`
    pub fn lex_equals(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::EqEq
        } else {
            TokenKind::Assign
        }
    }

    /// Handles: `!=`
    pub fn lex_bang(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::NotEq
        } else {
            self.report_error("unexpected character '!', use 'not' for negation".to_string());
            TokenKind::Invalid('!')
        }
    }

    /// Handles: `<`, `<=`
    pub fn lex_less(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::LtEq
        } else {
            TokenKind::Lt
        }
    }

    /// Handles: `>`, `>=`
    pub fn lex_greater(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        }
    }
}
