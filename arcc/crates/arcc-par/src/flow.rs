//! Flow statement parsing: `source -> func{config} -> sink`, plus routing
//! tables `{ out: target, ... }` on either side of a func.

use crate::ast::*;
use crate::expr::binary_op;
use crate::Parser;
use arcc_lex::TokenKind;

impl<'a> Parser<'a> {
    /// True if the current token can begin a flow node
    pub(crate) fn starts_flow_node(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::LParen
            | TokenKind::LBrace
            | TokenKind::LBracket
            | TokenKind::Minus
            | TokenKind::Not => true,
            TokenKind::Type(_) => self.peek_kind(1) == &TokenKind::LParen,
            _ => false,
        }
    }

    /// Parse `node -> node [-> node ...]`
    pub(crate) fn parse_flow_statement(&mut self) -> Option<FlowStatement> {
        let id = self.next_id();
        let start = self.current_span();

        let mut nodes = vec![self.parse_flow_node()?];
        while self.match_token(&TokenKind::Arrow) {
            nodes.push(self.parse_flow_node()?);
        }

        if nodes.len() < 2 {
            self.error_expected("'->'");
            return None;
        }

        Some(FlowStatement {
            id,
            span: self.span_from_start(start),
            nodes,
        })
    }

    fn parse_flow_node(&mut self) -> Option<FlowNode> {
        let id = self.next_id();
        let start = self.current_span();

        let kind = match self.current_kind().clone() {
            TokenKind::LBrace => FlowNodeKind::Routing(self.nested(Self::parse_routing_table)?),
            TokenKind::Ident(name) if self.peek_kind(1) == &TokenKind::LBrace => {
                let name = Ident::new(name, self.advance().span);
                let config = self.parse_config_values()?;
                FlowNodeKind::Call { name, config }
            },
            TokenKind::Ident(name) if !self.ident_continues_expression() => {
                FlowNodeKind::Identifier(Ident::new(name, self.advance().span))
            },
            _ => FlowNodeKind::Expr(self.parse_expression()?),
        };

        Some(FlowNode {
            id,
            span: self.span_from_start(start),
            kind,
        })
    }

    /// `{ name: node [-> node ...] [: param], ... }`
    fn parse_routing_table(&mut self) -> Option<RoutingTable> {
        let id = self.next_id();
        let start = self.expect(TokenKind::LBrace)?;

        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            entries.push(self.parse_routing_entry()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;

        Some(RoutingTable {
            id,
            span: self.span_from_start(start),
            entries,
        })
    }

    fn parse_routing_entry(&mut self) -> Option<RoutingEntry> {
        let id = self.next_id();
        let start = self.current_span();
        let name = self.expect_ident("routing entry name")?;
        self.expect(TokenKind::Colon)?;

        let mut nodes = vec![self.parse_flow_node()?];
        while self.match_token(&TokenKind::Arrow) {
            nodes.push(self.parse_flow_node()?);
        }
        let param = if self.match_token(&TokenKind::Colon) {
            Some(self.expect_ident("parameter name")?)
        } else {
            None
        };

        Some(RoutingEntry {
            id,
            span: self.span_from_start(start),
            name,
            nodes,
            param,
        })
    }

    /// True if the identifier at the cursor is the head of a larger expression
    fn ident_continues_expression(&self) -> bool {
        let next = self.peek_kind(1);
        if binary_op(next).is_some() {
            return true;
        }
        let same_line = self
            .tokens
            .get(self.position + 1)
            .map(|t| t.span.start.line == self.current_span().end.line)
            .unwrap_or(false);
        same_line && matches!(next, TokenKind::LParen | TokenKind::LBracket)
    }

    /// `{a=1, b=2}` or `{1, 2}`, starting at the `{`
    fn parse_config_values(&mut self) -> Option<ConfigValues> {
        let start = self.expect(TokenKind::LBrace)?;

        let named = self.check(&TokenKind::RBrace)
            || (matches!(self.current_kind(), TokenKind::Ident(_))
                && self.peek_kind(1) == &TokenKind::Assign);
        if !named {
            let values = self.parse_arguments(TokenKind::RBrace)?;
            return Some(ConfigValues::Anonymous {
                values,
                span: self.span_from_start(start),
            });
        }

        let mut values = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let id = self.next_id();
            let entry_start = self.current_span();
            let name = self.expect_ident("config parameter name")?;
            self.expect(TokenKind::Assign)?;
            let value = self.parse_expression()?;
            values.push(ConfigValue {
                id,
                span: self.span_from_start(entry_start),
                name,
                value,
            });
            self.match_token(&TokenKind::Comma);
        }
        self.expect(TokenKind::RBrace)?;
        Some(ConfigValues::Named(values))
    }
}
