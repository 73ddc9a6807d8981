//! Edge case tests for arcc-par

#[cfg(test)]
mod tests {
    use crate::{parse, AuthorityKind, ExprKind, FlowNodeKind, Item, Program, StmtKind, MAX_NESTING_DEPTH};
    use arcc_util::{Diagnostics, ErrorCode};
    use proptest::prelude::*;

    fn parse_source(source: &str) -> (Program, Diagnostics) {
        parse(source)
    }

    // ==================== EDGE CASES ====================

    /// EDGE CASE: Whitespace and comments only
    #[test]
    fn test_edge_comments_only() {
        let (program, diags) = parse_source("// header\n/* block\n comment */\n");
        assert!(program.items.is_empty());
        assert!(diags.is_empty());
    }

    /// EDGE CASE: Empty function body
    #[test]
    fn test_edge_empty_function_body() {
        let (program, diags) = parse_source("func empty() {}");
        assert!(diags.ok());
        let Item::Function(func) = &program.items[0] else {
            panic!("Expected function item");
        };
        assert!(func.body.stmts.is_empty());
        assert!(func.output.is_none());
    }

    /// EDGE CASE: Empty grouped authority
    #[test]
    fn test_edge_empty_authority_group() {
        let (program, diags) = parse_source("authority ()");
        assert!(diags.ok());
        assert!(matches!(
            &program.items[0],
            Item::Authority(a) if matches!(&a.kind, AuthorityKind::Grouped(e) if e.is_empty())
        ));
    }

    /// EDGE CASE: Empty sequence and empty stage
    #[test]
    fn test_edge_empty_sequence_and_stage() {
        let (program, diags) = parse_source("sequence a {}\nsequence b { stage s {} }");
        assert!(diags.ok());
        assert_eq!(program.items.len(), 2);
    }

    /// EDGE CASE: Whole program on one line
    #[test]
    fn test_edge_single_line_program() {
        let (program, diags) =
            parse_source("func f(x f64) f64 { y := x * 2 return y } a -> f -> b");
        assert!(diags.ok(), "{diags}");
        assert_eq!(program.items.len(), 2);
        let Item::Function(func) = &program.items[0] else {
            panic!("Expected function item");
        };
        assert!(matches!(func.body.stmts[1].kind, StmtKind::Return(Some(_))));
    }

    /// EDGE CASE: Literal at the head of a flow
    #[test]
    fn test_edge_literal_flow_source() {
        let (program, diags) = parse_source("1.5 -> out");
        assert!(diags.ok());
        let Item::Flow(flow) = &program.items[0] else {
            panic!("Expected flow");
        };
        assert!(matches!(
            &flow.nodes[0].kind,
            FlowNodeKind::Expr(e) if matches!(e.kind, ExprKind::Literal(_))
        ));
    }

    /// EDGE CASE: Deeply nested parentheses
    #[test]
    fn test_edge_deep_nesting() {
        let source = format!("{}x{} -> out", "(".repeat(64), ")".repeat(64));
        let (program, diags) = parse_source(&source);
        assert!(diags.ok());
        assert_eq!(program.items.len(), 1);
    }

    /// EDGE CASE: Nesting past the limit is a syntax error, not a crash
    #[test]
    fn test_edge_nesting_limit() {
        let depth = 5_000;
        let sources = [
            format!("func f() {{ x := {}1{} }}", "(".repeat(depth), ")".repeat(depth)),
            format!("func f() {{ x := {}1 }}", "-".repeat(depth)),
            format!("func f() {{ x := 2{} }}", " ^ 2".repeat(depth)),
            format!("func f() {{ {}{} }}", "if 1 { ".repeat(depth), "} ".repeat(depth)),
        ];
        for source in &sources {
            let (_, diags) = parse_source(source);
            let err = diags.errors().next().expect("nesting error");
            assert_eq!(err.code, Some(ErrorCode::Syntax));
            assert_eq!(
                err.message,
                format!("nesting too deep (maximum is {MAX_NESTING_DEPTH} levels)")
            );
        }
    }

    /// EDGE CASE: Nesting just under the limit parses
    #[test]
    fn test_edge_nesting_below_limit() {
        let depth = MAX_NESTING_DEPTH as usize - 2;
        let source = format!("func f() {{ x := {}1{} }}", "(".repeat(depth), ")".repeat(depth));
        let (program, diags) = parse_source(&source);
        assert!(diags.ok(), "{diags}");
        assert_eq!(program.items.len(), 1);
    }

    /// EDGE CASE: Keywords are not identifiers
    #[test]
    fn test_edge_keyword_as_name() {
        let (_, diags) = parse_source("func return() {}");
        assert!(diags
            .to_string()
            .contains("expected function name, found 'return'"));
    }

    // ==================== ERRORS ====================

    #[test]
    fn test_err_unclosed_block() {
        let (program, diags) = parse_source("func f() {\n x := 1\n");
        assert!(program.items.is_empty());
        assert!(diags.to_string().contains("expected '}', found end of file"));
    }

    #[test]
    fn test_err_all_syntax_coded() {
        let (_, diags) = parse_source("func (\nsequence {\nauthority x\n-> ->");
        assert!(diags.error_count() >= 3);
        assert!(diags.iter().all(|d| d.code == Some(ErrorCode::Syntax)));
    }

    #[test]
    fn test_err_lexer_and_parser_errors_combined() {
        let (_, diags) = parse_source("a -> @ -> b");
        assert!(diags.to_string().contains("unexpected character '@'"));
        assert!(diags.to_string().contains("expected expression"));
    }

    #[test]
    fn test_err_recovery_keeps_later_items() {
        let (program, diags) = parse_source("func broken( {\n}\nfunc good() {}\na -> b");
        assert!(!diags.ok());
        let kinds: Vec<_> = program.items.iter().map(Item::describe).collect();
        assert_eq!(kinds, ["func", "flow"]);
    }

    proptest! {
        #[test]
        fn prop_parser_terminates(source in "[a-z0-9 (){}\\[\\],=:$+*<>\\n-]{0,80}") {
            let (program, diags) = parse_source(&source);
            if diags.ok() {
                prop_assert!(program.span.lo <= program.span.hi);
            }
        }

        #[test]
        fn prop_node_ids_unique_on_flows(names in prop::collection::vec("[a-z]{1,6}", 2..8)) {
            let source = names.join(" -> ");
            let (program, diags) = parse_source(&source);
            prop_assume!(diags.ok());
            let Item::Flow(flow) = &program.items[0] else {
                return Err(TestCaseError::fail("expected flow"));
            };
            let mut ids: Vec<_> = flow.nodes.iter().map(|n| n.id).collect();
            ids.push(flow.id);
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), names.len() + 1);
        }
    }
}
