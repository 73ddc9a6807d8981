//! String literal lexing.

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a double-quoted string literal, processing escapes.
    ///
    /// Supported escapes: `\n`, `\t`, `\r`, `\0`, `\\`, `\"`.
    /// A string may not span lines.
    pub fn lex_string(&mut self) -> TokenKind {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();
            self.cursor.advance();

            match c {
                '"' => break,
                '\\' => {
                    let escaped = self.cursor.current_char();
                    match escape_value(escaped) {
                        Some(value) => {
                            self.cursor.advance();
                            content.push(value);
                        },
                        None if self.cursor.is_at_end() => {},
                        None => {
                            self.cursor.advance();
                            self.report_error(format!("unknown escape sequence '\\{escaped}'"));
                        },
                    }
                },
                c => content.push(c),
            }
        }

        TokenKind::Str(content)
    }
}

fn escape_value(c: char) -> Option<char> {
    Some(match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        '\\' => '\\',
        '"' => '"',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};

    #[test]
    fn test_plain_string() {
        let (tokens, diags) = tokenize("\"hello world\"");
        assert!(diags.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Str("hello world".into()));
        assert_eq!(tokens[0].span.len(), 13);
    }

    #[test]
    fn test_escapes() {
        let (tokens, _) = tokenize(r#""a\n\"b\"""#);
        assert_eq!(tokens[0].kind, TokenKind::Str("a\n\"b\"".into()));
    }

    #[test]
    fn test_unknown_escape_reported() {
        let (tokens, diags) = tokenize(r#""\q""#);
        assert_eq!(tokens[0].kind, TokenKind::Str(String::new()));
        assert!(diags.to_string().contains("unknown escape"));
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, diags) = tokenize("\"open\nx");
        assert_eq!(tokens[0].kind, TokenKind::Str("open".into()));
        assert_eq!(tokens[1].kind, TokenKind::Ident("x".into()));
        assert!(diags.to_string().contains("unterminated string literal"));
    }

    #[test]
    fn test_non_ascii_content() {
        let (tokens, _) = tokenize("\"°C\" x");
        assert_eq!(tokens[0].kind, TokenKind::Str("°C".into()));
        assert_eq!(tokens[1].span.start.col, 5);
    }
}
