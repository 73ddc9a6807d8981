//! Type parsing: `f64`, `chan T`, `series T`

use crate::ast::{TypeExpr, TypeExprKind};
use crate::Parser;
use arcc_lex::TokenKind;

impl<'a> Parser<'a> {
    /// True if `kind` can begin a type
    pub(crate) fn starts_type(kind: &TokenKind) -> bool {
        matches!(kind, TokenKind::Type(_) | TokenKind::Chan | TokenKind::Series)
    }

    /// Parse a type expression
    pub(crate) fn parse_type(&mut self) -> Option<TypeExpr> {
        let start = self.current_span();
        let kind = match self.current_kind().clone() {
            TokenKind::Type(prim) => {
                self.advance();
                TypeExprKind::Primitive(prim)
            },
            TokenKind::Chan => {
                self.advance();
                TypeExprKind::Chan(Box::new(self.parse_type()?))
            },
            TokenKind::Series => {
                self.advance();
                TypeExprKind::Series(Box::new(self.parse_type()?))
            },
            _ => {
                self.error_expected("type");
                return None;
            },
        };
        Some(TypeExpr {
            span: self.span_from_start(start),
            kind,
        })
    }
}
