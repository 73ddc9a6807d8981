//! arcc-lex - Lexical Analyzer for the Arc language
//!
//! This crate turns Arc source text into a stream of [`Token`]s, each
//! carrying the [`Span`](arcc_util::Span) it was read from. Malformed input
//! is reported into a [`Diagnostics`](arcc_util::Diagnostics) store with
//! code `ARC1001`; the lexer always makes progress and always ends with an
//! [`TokenKind::Eof`] token.
//!
//! # Example Usage
//!
//! ```
//! use arcc_lex::{Lexer, TokenKind};
//! use arcc_util::Diagnostics;
//!
//! let mut diagnostics = Diagnostics::new();
//! let mut lexer = Lexer::new("authority (valve 100)", &mut diagnostics);
//!
//! assert_eq!(lexer.next_token().kind, TokenKind::Authority);
//! assert_eq!(lexer.next_token().kind, TokenKind::LParen);
//! assert_eq!(lexer.next_token().kind, TokenKind::Ident("valve".to_string()));
//! ```
//!
//! # Token Categories
//!
//! - **Keywords**: `func`, `if`, `else`, `return`, `sequence`, `stage`,
//!   `authority`, `chan`, `series`, `and`, `or`, `not`, and the scalar type
//!   names `i8` … `u64`, `f32`, `f64`, `str`
//! - **Literals**: unsigned integers (`42`), floats (`3.14`, `1e3`), strings
//! - **Operators**: `+ - * / % ^`, `== != < <= > >=`, `:=`, `$=`, `=`, `->`
//! - **Delimiters**: `() {} [] , :`
//! - **Comments**: `// line` and `/* block */`

#![warn(missing_docs)]

pub mod cursor;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use cursor::Cursor;
pub use lexer::{tokenize, Lexer};
pub use token::{keyword_from_ident, PrimitiveType, Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, diags) = tokenize(source);
        assert!(diags.ok(), "{diags}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_function_declaration() {
        let source = r#"
            func scale{factor f64 = 2.0}(value f64) f64 {
                return value * factor
            }
        "#;
        let tokens = kinds(source);

        assert_eq!(tokens[0], TokenKind::Func);
        assert_eq!(tokens[1], TokenKind::Ident("scale".into()));
        assert_eq!(tokens[2], TokenKind::LBrace);
        assert!(tokens.contains(&TokenKind::Float(2.0)));
        assert!(tokens.contains(&TokenKind::Type(PrimitiveType::F64)));
        assert!(tokens.contains(&TokenKind::Return));
        assert_eq!(tokens.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_flow_statement() {
        assert_eq!(
            kinds("sensor -> scale{factor=3} -> out"),
            vec![
                TokenKind::Ident("sensor".into()),
                TokenKind::Arrow,
                TokenKind::Ident("scale".into()),
                TokenKind::LBrace,
                TokenKind::Ident("factor".into()),
                TokenKind::Assign,
                TokenKind::Int(3),
                TokenKind::RBrace,
                TokenKind::Arrow,
                TokenKind::Ident("out".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_stateful_variable() {
        let tokens = kinds("count $= 0\ncount = count + 1");
        assert_eq!(tokens[1], TokenKind::StateDeclare);
        assert_eq!(tokens[4], TokenKind::Assign);
    }

    #[test]
    fn test_positions_are_line_one_based_column_zero_based() {
        let (tokens, _) = tokenize("authority 200\n  x := 1");
        assert_eq!(tokens[0].span.start, arcc_util::Position::new(1, 0));
        assert_eq!(tokens[1].span.start, arcc_util::Position::new(1, 10));
        assert_eq!(tokens[2].span.start, arcc_util::Position::new(2, 2));
        assert_eq!(tokens[2].span.end, arcc_util::Position::new(2, 3));
    }

    #[test]
    fn test_iterator_stops_before_eof() {
        let mut diagnostics = arcc_util::Diagnostics::new();
        let lexer = Lexer::new("a b c", &mut diagnostics);
        assert_eq!(lexer.count(), 3);
    }
}
