//! Comment lexing.
//!
//! This module handles skipping whitespace, line comments and block comments.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and comments before the next token.
    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }

            match self.cursor.current_char() {
                c if c.is_whitespace() => self.cursor.advance(),
                '/' => match self.cursor.peek_char(1) {
                    '/' => self.skip_line_comment(),
                    '*' => self.skip_block_comment(),
                    _ => return,
                },
                _ => return,
            }
        }
    }

    /// Skips a line comment (from `//` to end of line).
    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skips a block comment. Block comments do not nest.
    fn skip_block_comment(&mut self) {
        self.mark_start();
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }

        self.report_error("unterminated block comment".to_string());
    }
}

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(
            kinds("x // trailing\ny"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Ident("y".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_block_comment_spanning_lines() {
        let (tokens, diags) = tokenize("/* a\n b */ z");
        assert!(diags.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Ident("z".into()));
        assert_eq!(tokens[0].span.start.line, 2);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (tokens, diags) = tokenize("x /* never closed");
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
        assert_eq!(diags.len(), 1);
        assert!(diags.to_string().contains("unterminated block comment"));
    }

    #[test]
    fn test_slash_alone_is_division() {
        assert_eq!(kinds("a / b")[1], TokenKind::Slash);
    }
}
