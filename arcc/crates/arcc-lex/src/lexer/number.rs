//! Number literal lexing.
//!
//! Arc numbers are decimal. A literal with a fractional part or an exponent
//! is a float; everything else is an unsigned integer. Signs are unary
//! operators and never part of the literal.

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal.
    ///
    /// # Number Formats
    ///
    /// - Integer: `0`, `42`, `255`
    /// - Float: `3.14`, `.5`, `1e10`, `2.5e-3`
    pub fn lex_number(&mut self) -> TokenKind {
        self.eat_digits();

        let mut is_float = false;
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            self.eat_digits();
        }

        if matches!(self.cursor.current_char(), 'e' | 'E') {
            let sign = matches!(self.cursor.peek_char(1), '+' | '-');
            let first_digit = if sign { 2 } else { 1 };
            if self.cursor.peek_char(first_digit).is_ascii_digit() {
                is_float = true;
                self.cursor.advance();
                if sign {
                    self.cursor.advance();
                }
                self.eat_digits();
            } else {
                self.cursor.advance();
                if sign {
                    self.cursor.advance();
                }
                self.report_error("no digits in float exponent".to_string());
                return TokenKind::Float(0.0);
            }
        }

        let text = self.cursor.slice_from(self.token_start);
        if is_float {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => TokenKind::Float(value),
                Ok(_) => {
                    self.report_error(format!("floating point literal '{text}' is not finite"));
                    TokenKind::Float(0.0)
                },
                Err(e) => {
                    self.report_error(format!("invalid floating point literal '{text}': {e}"));
                    TokenKind::Float(0.0)
                },
            }
        } else {
            match text.parse::<u64>() {
                Ok(value) => TokenKind::Int(value),
                Err(_) => {
                    self.report_error(format!("integer literal '{text}' is too large"));
                    TokenKind::Int(0)
                },
            }
        }
    }

    fn eat_digits(&mut self) {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};

    fn first(source: &str) -> TokenKind {
        tokenize(source).0.remove(0).kind
    }

    #[test]
    fn test_integers() {
        assert_eq!(first("0"), TokenKind::Int(0));
        assert_eq!(first("255"), TokenKind::Int(255));
        assert_eq!(first("18446744073709551615"), TokenKind::Int(u64::MAX));
    }

    #[test]
    fn test_floats() {
        assert_eq!(first("3.25"), TokenKind::Float(3.25));
        assert_eq!(first(".5"), TokenKind::Float(0.5));
        assert_eq!(first("1e3"), TokenKind::Float(1000.0));
        assert_eq!(first("2.5e-1"), TokenKind::Float(0.25));
    }

    #[test]
    fn test_dot_without_digit_is_not_float() {
        let (tokens, diags) = tokenize("1.");
        assert_eq!(tokens[0].kind, TokenKind::Int(1));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_integer_overflow_reported() {
        let (tokens, diags) = tokenize("18446744073709551616");
        assert_eq!(tokens[0].kind, TokenKind::Int(0));
        assert!(diags.to_string().contains("too large"));
    }

    #[test]
    fn test_missing_exponent_digits() {
        let (_, diags) = tokenize("1e+");
        assert!(diags.to_string().contains("no digits in float exponent"));
    }
}
