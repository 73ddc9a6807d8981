//! Helpers shared by the unit tests

use crate::analyzer::{analyze, Analysis};
use crate::context::{Context, Session};
use crate::scope::Channels;
use crate::types::Type;
use arcc_par::{parse, NodeId, Program};
use arcc_util::{CancellationToken, Diagnostics};
use std::rc::Rc;

/// Everything a test may want to inspect after analysis
pub struct AnalysisResult {
    pub program: Program,
    pub diagnostics: Diagnostics,
    pub analysis: Analysis,
    pub session: Rc<Session>,
}

impl AnalysisResult {
    /// Final type recorded for an expression node
    pub fn type_of(&self, id: NodeId) -> Option<Type> {
        self.session.types().get(id).cloned()
    }

    /// Substitute solved variables in `ty`
    pub fn resolve(&self, ty: &Type) -> Type {
        self.session.constraints().resolve(ty)
    }
}

pub fn analyze_source(source: &str) -> AnalysisResult {
    analyze_with_channels(source, &[])
}

pub fn analyze_with_channels(source: &str, channels: &[(&str, u32, Type)]) -> AnalysisResult {
    let (program, parse_diags) = parse(source);
    assert!(parse_diags.is_empty(), "parse failed for {source:?}:\n{parse_diags}");

    let mut table = Channels::new();
    for (name, id, elem) in channels {
        table.insert(*name, *id, elem.clone());
    }

    let (analysis, session) = {
        let ctx = Context::create_root(CancellationToken::new(), &program, Some(Rc::new(table)));
        let analysis = analyze(&ctx);
        (analysis, Rc::clone(ctx.session()))
    };
    let diagnostics = session.diagnostics().clone();
    AnalysisResult {
        program,
        diagnostics,
        analysis,
        session,
    }
}

#[track_caller]
pub fn assert_clean(result: &AnalysisResult) {
    assert!(
        result.diagnostics.is_empty(),
        "expected no diagnostics, got:\n{}",
        result.diagnostics
    );
}

/// Messages of every diagnostic, in report order
pub fn messages(result: &AnalysisResult) -> Vec<String> {
    result.diagnostics.iter().map(|d| d.message.clone()).collect()
}
