//! Item parsing - top-level declarations (authority, func, sequence, flows)

use crate::ast::*;
use crate::Parser;
use arcc_lex::TokenKind;

impl<'a> Parser<'a> {
    /// Parse a single top-level item
    pub(crate) fn parse_item(&mut self) -> Option<Item> {
        match self.current_kind() {
            TokenKind::Authority => self.parse_authority().map(Item::Authority),
            TokenKind::Func => self.parse_function().map(Item::Function),
            TokenKind::Sequence => self.parse_sequence().map(Item::Sequence),
            TokenKind::Stage => {
                self.error("stage declarations must appear inside a sequence");
                None
            },
            _ if self.starts_flow_node() => self.parse_flow_statement().map(Item::Flow),
            _ => {
                self.error_expected("'func', 'sequence', 'authority' or a flow statement");
                None
            },
        }
    }

    // ========================================================================
    // AUTHORITY
    // ========================================================================

    /// `authority N` or `authority ( [N] [name N]* )`
    fn parse_authority(&mut self) -> Option<AuthorityBlock> {
        let id = self.next_id();
        let start = self.advance().span;

        if self.match_token(&TokenKind::LParen) {
            let mut entries = Vec::new();
            while !self.check(&TokenKind::RParen) && !self.is_at_end() {
                entries.push(self.parse_authority_entry()?);
                self.match_token(&TokenKind::Comma);
            }
            self.expect(TokenKind::RParen)?;
            let span = self.span_from_start(start);
            return Some(AuthorityBlock {
                id,
                span,
                kind: AuthorityKind::Grouped(entries),
            });
        }

        let (value, value_span) = self.expect_authority_value()?;
        Some(AuthorityBlock {
            id,
            span: self.span_from_start(start),
            kind: AuthorityKind::Simple { value, value_span },
        })
    }

    fn parse_authority_entry(&mut self) -> Option<AuthorityEntry> {
        let id = self.next_id();
        let start = self.current_span();
        let word = self.current_kind().word().map(str::to_string);
        let channel = word.map(|name| Ident::new(name, self.advance().span));
        let (value, value_span) = self.expect_authority_value()?;
        Some(AuthorityEntry {
            id,
            span: self.span_from_start(start),
            channel,
            value,
            value_span,
        })
    }

    fn expect_authority_value(&mut self) -> Option<(u64, arcc_util::Span)> {
        if let TokenKind::Int(value) = self.current_kind().clone() {
            let span = self.advance().span;
            Some((value, span))
        } else {
            self.error_expected("authority value");
            None
        }
    }

    // ========================================================================
    // FUNCTIONS
    // ========================================================================

    /// `func name {config} (inputs) output { body }`
    fn parse_function(&mut self) -> Option<FunctionDecl> {
        let id = self.next_id();
        let start = self.advance().span;
        let name = self.expect_ident("function name")?;

        let config = if self.match_token(&TokenKind::LBrace) {
            self.parse_param_list(TokenKind::RBrace, true)?
        } else {
            Vec::new()
        };

        self.expect(TokenKind::LParen)?;
        let inputs = self.parse_param_list(TokenKind::RParen, true)?;

        let output = match self.current_kind() {
            TokenKind::LParen => {
                self.advance();
                Some(OutputDecl::Named(
                    self.parse_param_list(TokenKind::RParen, false)?,
                ))
            },
            _ if Self::starts_type(self.current_kind()) => {
                Some(OutputDecl::Single(self.parse_type()?))
            },
            _ => None,
        };

        let body = self.parse_block()?;
        Some(FunctionDecl {
            id,
            span: self.span_from_start(start),
            name,
            config,
            inputs,
            output,
            body,
        })
    }

    /// Parses `name type [= default], ...` up to and including `close`.
    fn parse_param_list(&mut self, close: TokenKind, allow_default: bool) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        while !self.check(&close) && !self.is_at_end() {
            let id = self.next_id();
            let start = self.current_span();
            let name = self.expect_ident("parameter name")?;
            let ty = self.parse_type()?;
            let default = if self.check(&TokenKind::Assign) {
                let eq_span = self.advance().span;
                let value = self.parse_expression()?;
                if !allow_default {
                    self.error_at("output parameters may not have default values", eq_span);
                }
                Some(value)
            } else {
                None
            };
            params.push(Param {
                id,
                span: self.span_from_start(start),
                name,
                ty,
                default,
            });
            if !self.match_token(&TokenKind::Comma) && !self.check(&close) {
                // Config blocks may separate entries by whitespace alone.
                if close != TokenKind::RBrace {
                    self.error_expected(&format!("',' or {}", close.describe()));
                    return None;
                }
            }
        }
        self.expect(close)?;
        Some(params)
    }

    // ========================================================================
    // SEQUENCES
    // ========================================================================

    /// `sequence name { stage a { ... } stage b { ... } }`
    fn parse_sequence(&mut self) -> Option<SequenceDecl> {
        let id = self.next_id();
        let start = self.advance().span;
        let name = self.expect_ident("sequence name")?;
        self.expect(TokenKind::LBrace)?;

        let mut stages = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.check(&TokenKind::Stage) {
                match self.parse_stage() {
                    Some(stage) => stages.push(stage),
                    None => self.recover_to_stmt_sync(),
                }
            } else {
                self.error_expected("'stage'");
                self.recover_to_stmt_sync();
            }
        }
        self.expect(TokenKind::RBrace)?;

        Some(SequenceDecl {
            id,
            span: self.span_from_start(start),
            name,
            stages,
        })
    }

    fn parse_stage(&mut self) -> Option<StageDecl> {
        let id = self.next_id();
        let start = self.advance().span;
        let name = self.expect_ident("stage name")?;
        self.expect(TokenKind::LBrace)?;

        let mut flows = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if !self.starts_flow_node() {
                self.error_expected("flow statement");
                self.recover_to_stmt_sync();
                continue;
            }
            match self.parse_flow_statement() {
                Some(flow) => flows.push(flow),
                None => self.recover_to_stmt_sync(),
            }
            self.match_token(&TokenKind::Comma);
        }
        self.expect(TokenKind::RBrace)?;

        Some(StageDecl {
            id,
            span: self.span_from_start(start),
            name,
            flows,
        })
    }
}
