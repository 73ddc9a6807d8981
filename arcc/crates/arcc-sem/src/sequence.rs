//! Sequences and stages
//!
//! A sequence opens a scope holding its stages, so flows in one stage may
//! name any stage of the same sequence regardless of order. Each stage's
//! flows run in a nested stage scope.

use crate::context::Context;
use crate::flow::analyze_flow;
use crate::scope::{ScopeKind, Symbol, SymbolKind};
use crate::types::Type;
use arcc_par::SequenceDecl;
use tracing::trace;

/// Build the symbol of a sequence declaration
pub fn declare_sequence(ctx: &Context<'_, SequenceDecl>) -> Symbol {
    let decl = ctx.ast;
    Symbol::new(
        decl.name.name.clone(),
        SymbolKind::Sequence,
        Type::Invalid,
        ctx.new_symbol_id(),
        decl.name.span,
    )
}

/// Declare the stages of a sequence and check their flows
pub fn analyze_sequence(ctx: &Context<'_, SequenceDecl>, symbol: &Symbol) {
    let decl = ctx.ast;
    if decl.stages.is_empty() {
        ctx.warning_at(&decl.name, format!("sequence {} has no stages", decl.name.name));
        return;
    }

    let mut scope = ctx.scope.child_owned(ScopeKind::Sequence, symbol.clone());
    let mut stages = Vec::with_capacity(decl.stages.len());
    for stage in &decl.stages {
        let stage_symbol = Symbol::new(
            stage.name.name.clone(),
            SymbolKind::Stage,
            Type::Invalid,
            ctx.new_symbol_id(),
            stage.name.span,
        );
        if let Err(err) = scope.declare(stage_symbol.clone()) {
            ctx.error_code_at(err.code(), &stage.name, &err);
        }
        stages.push(stage_symbol);
    }

    for (stage, stage_symbol) in decl.stages.iter().zip(stages) {
        trace!(sequence = %decl.name.name, stage = %stage.name.name, "analyzing stage");
        let stage_scope = scope.child_owned(ScopeKind::Stage, stage_symbol);
        for flow in &stage.flows {
            analyze_flow(&ctx.child(flow).with_scope(stage_scope.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{analyze_with_channels, messages};
    use crate::types::Type;
    use arcc_util::{ErrorCode, Severity};

    fn channels() -> [(&'static str, u32, Type); 2] {
        [("sensor", 1, Type::F64), ("valve", 2, Type::F64)]
    }

    #[test]
    fn test_stages_see_each_other() {
        let source = "sequence main {\n stage idle { sensor > 1 -> run }\n stage run { sensor -> valve }\n}";
        let result = analyze_with_channels(source, &channels());
        assert!(result.diagnostics.is_empty(), "{}", result.diagnostics);
    }

    #[test]
    fn test_duplicate_stage() {
        let source = "sequence main {\n stage a { sensor -> valve }\n stage a { sensor -> valve }\n}";
        let result = analyze_with_channels(source, &channels());
        let diag = result.diagnostics.errors().next().unwrap();
        assert_eq!(
            diag.message,
            "name a conflicts with existing symbol at line 2, col 7"
        );
        assert_eq!(diag.code, Some(ErrorCode::SymbolRedefined));
    }

    #[test]
    fn test_empty_sequence_warns() {
        let result = analyze_with_channels("sequence idle {}", &channels());
        assert!(result.diagnostics.ok());
        let diag = result.diagnostics.iter().next().unwrap();
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "sequence idle has no stages");
    }

    #[test]
    fn test_stage_flows_are_checked() {
        let source = "sequence main { stage s { sensor -> ghost } }";
        assert_eq!(
            messages(&analyze_with_channels(source, &channels())),
            ["undefined symbol: ghost"]
        );
    }

    #[test]
    fn test_stage_names_do_not_leak() {
        let source = "sequence main { stage s { sensor -> valve } }\nsensor > 1 -> s";
        assert_eq!(
            messages(&analyze_with_channels(source, &channels())),
            ["undefined symbol: s"]
        );
    }
}
