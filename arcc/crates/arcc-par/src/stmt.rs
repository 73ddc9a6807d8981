//! Statement parsing: blocks, declarations, assignments, `if`, `return`

use crate::ast::*;
use crate::Parser;
use arcc_lex::TokenKind;

impl<'a> Parser<'a> {
    /// Parse `{ statements }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        self.nested(Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Option<Block> {
        let id = self.next_id();
        let start = self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.recover_to_stmt_sync(),
            }
        }

        self.expect(TokenKind::RBrace)?;
        Some(Block {
            id,
            span: self.span_from_start(start),
            stmts,
        })
    }

    /// Parse a single statement
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        let id = self.next_id();
        let start = self.current_span();

        let kind = match self.current_kind() {
            TokenKind::If => StmtKind::If(self.parse_if()?),
            TokenKind::Return => self.parse_return()?,
            TokenKind::Ident(_) => match self.peek_kind(1) {
                TokenKind::Declare | TokenKind::StateDeclare => self.parse_var_decl(false)?,
                _ if Self::starts_type(self.peek_kind(1)) => self.parse_var_decl(true)?,
                TokenKind::Assign => self.parse_assign()?,
                _ => self.parse_expr_or_indexed_assign()?,
            },
            _ => StmtKind::Expr(self.parse_expression()?),
        };

        Some(Stmt {
            id,
            span: self.span_from_start(start),
            kind,
        })
    }

    /// `name [type] := value` or `name [type] $= value`
    fn parse_var_decl(&mut self, typed: bool) -> Option<StmtKind> {
        let name = self.expect_ident("variable name")?;
        let ty = if typed { Some(self.parse_type()?) } else { None };
        let stateful = match self.current_kind() {
            TokenKind::Declare => false,
            TokenKind::StateDeclare => true,
            _ => {
                self.error_expected("':=' or '$='");
                return None;
            },
        };
        self.advance();
        let value = self.parse_expression()?;
        Some(StmtKind::VarDecl(VarDecl {
            name,
            ty,
            value,
            stateful,
        }))
    }

    /// `name = value`
    fn parse_assign(&mut self) -> Option<StmtKind> {
        let target = self.expect_ident("assignment target")?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        Some(StmtKind::Assign(Assign {
            target,
            index: None,
            value,
        }))
    }

    /// An expression statement, or `name[index] = value`
    fn parse_expr_or_indexed_assign(&mut self) -> Option<StmtKind> {
        let expr = self.parse_expression()?;
        if !self.check(&TokenKind::Assign) {
            return Some(StmtKind::Expr(expr));
        }
        let ExprKind::Index { target, index } = expr.kind else {
            self.error("invalid assignment target");
            return None;
        };
        let span = target.span;
        let ExprKind::Ident(name) = target.kind else {
            self.error_at("indexed assignment target must be a name", span);
            return None;
        };
        self.advance();
        let value = self.parse_expression()?;
        Some(StmtKind::Assign(Assign {
            target: Ident::new(name, span),
            index: Some(*index),
            value,
        }))
    }

    /// `if cond { } else if cond { } else { }`
    fn parse_if(&mut self) -> Option<IfStmt> {
        self.expect(TokenKind::If)?;
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;

        let mut else_ifs = Vec::new();
        let mut else_block = None;
        while self.match_token(&TokenKind::Else) {
            if self.match_token(&TokenKind::If) {
                let condition = self.parse_expression()?;
                let block = self.parse_block()?;
                else_ifs.push(ElseIf { condition, block });
            } else {
                else_block = Some(self.parse_block()?);
                break;
            }
        }

        Some(IfStmt {
            condition,
            then_block,
            else_ifs,
            else_block,
        })
    }

    /// `return` with an optional value on the same line
    fn parse_return(&mut self) -> Option<StmtKind> {
        let keyword = self.advance().span;
        let has_value = !self.check(&TokenKind::RBrace)
            && !self.is_at_end()
            && self.current_span().start.line == keyword.start.line;
        if has_value {
            Some(StmtKind::Return(Some(self.parse_expression()?)))
        } else {
            Some(StmtKind::Return(None))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ExprKind, Item, Stmt, StmtKind, TypeExprKind};
    use arcc_lex::PrimitiveType;

    fn body(source: &str) -> Vec<Stmt> {
        let (mut program, diags) = parse(&format!("func f() {{\n{source}\n}}"));
        assert!(diags.ok(), "{diags}");
        match program.items.remove(0) {
            Item::Function(f) => f.body.stmts,
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_declarations() {
        let stmts = body("a := 1\nb f32 := 2\nc $= 0\nd i64 $= 5");
        assert_eq!(stmts.len(), 4);
        let StmtKind::VarDecl(b) = &stmts[1].kind else {
            panic!("expected declaration");
        };
        assert_eq!(
            b.ty.as_ref().map(|t| &t.kind),
            Some(&TypeExprKind::Primitive(PrimitiveType::F32))
        );
        assert!(matches!(&stmts[2].kind, StmtKind::VarDecl(v) if v.stateful && v.ty.is_none()));
        assert!(matches!(&stmts[3].kind, StmtKind::VarDecl(v) if v.stateful && v.ty.is_some()));
    }

    #[test]
    fn test_assignment_and_call() {
        let stmts = body("x = x + 1\nlog(x)");
        assert!(matches!(stmts[0].kind, StmtKind::Assign(_)));
        let StmtKind::Expr(call) = &stmts[1].kind else {
            panic!("expected expression statement");
        };
        assert!(matches!(call.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn test_indexed_assignment() {
        let stmts = body("s[i + 1] = 2.0\ns[0]\n");
        let StmtKind::Assign(assign) = &stmts[0].kind else {
            panic!("expected assignment");
        };
        assert_eq!(assign.target.name, "s");
        assert!(matches!(
            assign.index.as_ref().map(|e| &e.kind),
            Some(ExprKind::Binary { .. })
        ));
        assert!(matches!(&stmts[1].kind, StmtKind::Expr(e) if matches!(e.kind, ExprKind::Index { .. })));

        let (_, diags) = parse("func f() { s[0][1] = 2 }");
        assert!(diags.to_string().contains("indexed assignment target must be a name"));
        let (_, diags) = parse("func f() { g(1) = 2 }");
        assert!(diags.to_string().contains("invalid assignment target"));
    }

    #[test]
    fn test_if_else_chain() {
        let stmts = body("if x > 1 { y = 1 } else if x > 0 { y = 2 } else { y = 3 }");
        let StmtKind::If(stmt) = &stmts[0].kind else {
            panic!("expected if");
        };
        assert_eq!(stmt.else_ifs.len(), 1);
        assert!(stmt.else_block.is_some());
    }

    #[test]
    fn test_bare_return_followed_by_statement() {
        let stmts = body("return\nx := 1");
        assert!(matches!(stmts[0].kind, StmtKind::Return(None)));
        assert!(matches!(stmts[1].kind, StmtKind::VarDecl(_)));
    }

    #[test]
    fn test_statement_spans_cover_line() {
        let stmts = body("  total := a * 2");
        assert_eq!(stmts[0].span.start.line, 2);
        assert_eq!(stmts[0].span.start.col, 2);
        assert_eq!(stmts[0].span.end.col, 16);
    }

    #[test]
    fn test_recovers_inside_block() {
        let (program, diags) = parse("func f() {\n x := )\n y := 2\n}");
        assert_eq!(diags.error_count(), 1);
        let Item::Function(f) = &program.items[0] else {
            panic!("expected function");
        };
        assert_eq!(f.body.stmts.len(), 1);
    }
}
