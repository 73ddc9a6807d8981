//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// Identifiers are `[A-Za-z_][A-Za-z0-9_]*`. Reserved words, including
    /// the scalar type names, come back as their keyword token.
    pub fn lex_identifier(&mut self) -> TokenKind {
        while {
            let c = self.cursor.current_char();
            c == '_' || c.is_ascii_alphanumeric()
        } {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        keyword_from_ident(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::token::PrimitiveType;
    use crate::{tokenize, TokenKind};

    fn first(source: &str) -> TokenKind {
        tokenize(source).0.remove(0).kind
    }

    #[test]
    fn test_simple_identifier() {
        assert_eq!(first("sensor_1"), TokenKind::Ident("sensor_1".into()));
        assert_eq!(first("_tmp"), TokenKind::Ident("_tmp".into()));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(first("func"), TokenKind::Func);
        assert_eq!(first("authority"), TokenKind::Authority);
        assert_eq!(first("sequence"), TokenKind::Sequence);
        assert_eq!(first("stage"), TokenKind::Stage);
        assert_eq!(first("not"), TokenKind::Not);
    }

    #[test]
    fn test_type_names_are_reserved() {
        assert_eq!(first("f64"), TokenKind::Type(PrimitiveType::F64));
        assert_eq!(first("str"), TokenKind::Type(PrimitiveType::Str));
        assert_eq!(first("chan"), TokenKind::Chan);
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(first("funcs"), TokenKind::Ident("funcs".into()));
        assert_eq!(first("i32x"), TokenKind::Ident("i32x".into()));
    }
}
