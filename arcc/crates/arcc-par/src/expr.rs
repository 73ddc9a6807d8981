//! Expression parsing using Pratt Parsing (Top-Down Operator Precedence)
//!
//! # Operator Precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `or` | Left |
//! | 2 | `and` | Left |
//! | 3 | `==`, `!=` | Left |
//! | 4 | `<`, `<=`, `>`, `>=` | Left |
//! | 5 | `+`, `-` | Left |
//! | 6 | `*`, `/`, `%` | Left |
//! | 7 | `^` | Right |
//!
//! Prefix `-` and `not` bind tighter than every infix operator, so `-a ^ 2`
//! is `(-a) ^ 2`. Indexing and calls bind tightest of all.

use crate::ast::*;
use crate::Parser;
use arcc_lex::TokenKind;

/// Binding power levels for Pratt parsing
/// Higher numbers = tighter binding (higher precedence)
#[doc(hidden)]
pub mod bp {
    /// Minimum binding power (start of expression)
    pub const MIN: u8 = 0;

    /// Logical OR: or
    pub const LOGICAL_OR: u8 = 2;

    /// Logical AND: and
    pub const LOGICAL_AND: u8 = 4;

    /// Equality: ==, !=
    pub const EQUALITY: u8 = 6;

    /// Relational: <, <=, >, >=
    pub const RELATIONAL: u8 = 8;

    /// Additive: +, -
    pub const ADDITIVE: u8 = 10;

    /// Multiplicative: *, /, %
    pub const MULTIPLICATIVE: u8 = 12;

    /// Power: ^ (right associative)
    pub const POWER: u8 = 14;
}

/// Infix operator for a token, if it is one
pub(crate) fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::Caret => BinaryOp::Pow,
        _ => return None,
    };
    Some(op)
}

/// Returns (left_binding_power, right_binding_power) for `op`.
///
/// Left-associative operators use `right = left + 1`, right-associative
/// ones use `right = left`.
fn binding_power(op: BinaryOp) -> (u8, u8) {
    let left = match op {
        BinaryOp::Or => bp::LOGICAL_OR,
        BinaryOp::And => bp::LOGICAL_AND,
        BinaryOp::Eq | BinaryOp::NotEq => bp::EQUALITY,
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => bp::RELATIONAL,
        BinaryOp::Add | BinaryOp::Sub => bp::ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => bp::MULTIPLICATIVE,
        BinaryOp::Pow => return (bp::POWER, bp::POWER),
    };
    (left, left + 1)
}

impl<'a> Parser<'a> {
    /// Parse a complete expression
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_expr_with_min_bp(bp::MIN)
    }

    /// Pratt parser core: only operators with left binding power `>= min_bp`
    /// are consumed.
    fn parse_expr_with_min_bp(&mut self, min_bp: u8) -> Option<Expr> {
        self.nested(|p| p.parse_binary(min_bp))
    }

    fn parse_binary(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some(op) = binary_op(self.current_kind()) else {
                break;
            };
            let (lbp, rbp) = binding_power(op);
            if lbp < min_bp {
                break;
            }
            self.advance();

            let rhs = self.parse_expr_with_min_bp(rbp)?;
            let span = self.span_from_start(lhs.span);
            lhs = Expr {
                id: self.next_id(),
                span,
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
        }

        Some(lhs)
    }

    /// `-e`, `not e`, or a postfix expression
    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let id = self.next_id();
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        Some(Expr {
            id,
            span: self.span_from_start(start),
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        })
    }

    /// Primary followed by any number of `[index]` suffixes
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        while self.check(&TokenKind::LBracket) && self.continues_line() {
            self.advance();
            let index = self.parse_expression()?;
            self.expect(TokenKind::RBracket)?;
            expr = Expr {
                id: self.next_id(),
                span: self.span_from_start(expr.span),
                kind: ExprKind::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                },
            };
        }
        Some(expr)
    }

    /// True if the current token sits on the same line as the previous one.
    /// A bracket or paren opening a new line starts a new construct.
    fn continues_line(&self) -> bool {
        self.current_span().start.line == self.previous_span().end.line
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let id = self.next_id();
        let start = self.current_span();

        let kind = match self.current_kind().clone() {
            TokenKind::Int(value) => {
                self.advance();
                ExprKind::Literal(Literal::Int(value))
            },
            TokenKind::Float(value) => {
                self.advance();
                ExprKind::Literal(Literal::Float(value))
            },
            TokenKind::Str(value) => {
                self.advance();
                ExprKind::Literal(Literal::Str(value))
            },
            TokenKind::Ident(name) => {
                let callee = Ident::new(name, self.advance().span);
                if self.check(&TokenKind::LParen) && self.continues_line() {
                    self.advance();
                    let args = self.parse_arguments(TokenKind::RParen)?;
                    ExprKind::Call { callee, args }
                } else {
                    ExprKind::Ident(callee.name)
                }
            },
            TokenKind::Type(target) if self.peek_kind(1) == &TokenKind::LParen => {
                self.advance();
                self.advance();
                let value = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                ExprKind::Cast {
                    target,
                    value: Box::new(value),
                }
            },
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                ExprKind::Paren(Box::new(inner))
            },
            TokenKind::LBracket => {
                self.advance();
                ExprKind::Series(self.parse_arguments(TokenKind::RBracket)?)
            },
            _ => {
                self.error_expected("expression");
                return None;
            },
        };

        Some(Expr {
            id,
            span: self.span_from_start(start),
            kind,
        })
    }

    /// Comma separated expressions up to and including `close`.
    /// A trailing comma is accepted.
    pub(crate) fn parse_arguments(&mut self, close: TokenKind) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        while !self.check(&close) && !self.is_at_end() {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Some(args)
    }
}
