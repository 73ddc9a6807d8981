//! Edge case tests for arcc-sem

#[cfg(test)]
mod tests {
    use crate::test_util::{analyze_source, analyze_with_channels, assert_clean, messages};
    use crate::{analyze_program, Resolver, Symbol, Type};
    use arcc_par::{parse, Item, StmtKind};
    use arcc_util::{CancellationToken, Diagnostics, Severity};
    use proptest::prelude::*;
    use std::rc::Rc;

    /// Host resolver that cancels the analysis the first time it is asked
    struct CancelOnLookup {
        token: CancellationToken,
    }

    impl Resolver for CancelOnLookup {
        fn resolve(&self, _name: &str) -> Option<Symbol> {
            self.token.cancel();
            None
        }
    }

    // ==================== EDGE CASES ====================

    /// EDGE CASE: Empty program
    #[test]
    fn test_edge_empty_program() {
        let result = analyze_source("");
        assert_clean(&result);
        assert_eq!(result.analysis.authorities, Default::default());
        assert_eq!(result.analysis.scope.local_symbols().count(), 0);
    }

    /// EDGE CASE: Comments only
    #[test]
    fn test_edge_comments_only() {
        assert_clean(&analyze_source("// nothing here\n/* or here */"));
    }

    /// EDGE CASE: Authority after a flow
    #[test]
    fn test_edge_authority_after_flow() {
        let result = analyze_with_channels("sensor -> valve\nauthority 10", &channels());
        let messages = messages(&result);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("before"));
        assert_eq!(result.analysis.authorities.default, None);
    }

    /// EDGE CASE: Empty grouped authority
    #[test]
    fn test_edge_empty_authority_group() {
        let result = analyze_source("authority ()");
        assert_clean(&result);
        assert!(result.analysis.authorities.channels.is_empty());
    }

    /// EDGE CASE: Recursive function
    #[test]
    fn test_edge_recursion() {
        assert_clean(&analyze_source(
            "func fact(n i64) i64 {\n if n < 2 { return 1 }\n return n * fact(n - 1)\n}",
        ));
    }

    /// EDGE CASE: Deep shadowing across nested blocks
    #[test]
    fn test_edge_deep_shadowing() {
        let source = "func f(a f64) {\n x := 1\n if a > 0 {\n  x := 2.5\n  if a > 1 {\n   x := \"s\"\n  }\n  x = 3.5\n }\n x = 4\n}";
        assert_clean(&analyze_source(source));
    }

    /// EDGE CASE: Unused integer literal defaults to i64
    #[test]
    fn test_edge_integer_default() {
        let result = analyze_source("func f() { x := 7 }");
        let Item::Function(func) = &result.program.items[0] else {
            panic!("Expected function item");
        };
        let StmtKind::VarDecl(decl) = &func.body.stmts[0].kind else {
            panic!("Expected declaration");
        };
        assert_eq!(result.type_of(decl.value.id), Some(Type::I64));
    }

    /// EDGE CASE: The same mistake in two places is reported twice
    #[test]
    fn test_edge_same_message_different_positions() {
        let result = analyze_source("func f() {\n a := ghost\n b := ghost\n}");
        assert_eq!(
            messages(&result),
            ["undefined symbol: ghost", "undefined symbol: ghost"]
        );
    }

    /// EDGE CASE: Cancellation in the middle of the walk
    #[test]
    fn test_edge_cancel_mid_walk() {
        let (program, _) = parse("func f() { x := stop }\nfunc g() { y := later }");
        let token = CancellationToken::new();
        let resolver = CancelOnLookup {
            token: token.clone(),
        };
        let output = analyze_program(&program, Some(Rc::new(resolver)), token);

        let collected: Vec<_> = output
            .diagnostics
            .iter()
            .map(|d| (d.severity, d.message.as_str()))
            .collect();
        assert_eq!(
            collected,
            [
                (Severity::Error, "undefined symbol: stop"),
                (Severity::Info, "analysis cancelled"),
            ]
        );
        // Declarations made before cancellation are kept.
        assert!(output.analysis.scope.resolve("g").is_ok());
    }

    /// EDGE CASE: Independent analyses merge into one store
    #[test]
    fn test_edge_merge_independent_runs() {
        let mut all = Diagnostics::new();
        for source in ["func f() { a := x }", "func f() { a := y }"] {
            let (program, _) = parse(source);
            let output = analyze_program(&program, None, CancellationToken::new());
            all.merge(output.diagnostics);
        }
        // Same position, different text: both survive.
        assert_eq!(all.len(), 2);
    }

    fn channels() -> [(&'static str, u32, Type); 2] {
        [("sensor", 1, Type::F64), ("valve", 2, Type::F64)]
    }

    // ==================== PROPERTIES ====================

    proptest! {
        #[test]
        fn prop_default_authority_range(value in 0u64..1000) {
            let result = analyze_source(&format!("authority {value}"));
            prop_assert_eq!(result.diagnostics.ok(), value <= 255);
            let expected = u8::try_from(value).ok();
            prop_assert_eq!(result.analysis.authorities.default, expected);
        }

        #[test]
        fn prop_reanalysis_is_deterministic(n in 1usize..6) {
            let source: String = (0..n)
                .map(|i| format!("func f{i}(a i32) i32 {{ return a + {i} }}\n"))
                .chain(std::iter::once("func dup() {}\nfunc dup() {}".to_string()))
                .collect();
            let first = messages(&analyze_source(&source));
            let second = messages(&analyze_source(&source));
            prop_assert_eq!(first.len(), 1);
            prop_assert_eq!(first, second);
        }
    }
}
