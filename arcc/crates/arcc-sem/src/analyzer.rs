//! Program driver
//!
//! Runs the passes over a whole program:
//!
//! 1. authority blocks
//! 2. declarations: every `func` and `sequence` enters the root scope, so
//!    bodies may refer to items declared later in the file
//! 3. inference: bodies of functions with inferred outputs run in inference
//!    mode, binding their output variables before any caller is checked
//! 4. bodies, flows and sequences in textual order
//! 5. defaulting of unresolved type variables, then substitution of the
//!    recorded types
//!
//! The cancellation token is polled between top-level items.

use crate::authority::{analyze_authorities, Authorities};
use crate::context::Context;
use crate::flow::analyze_flow;
use crate::function::{analyze_function_body, declare_function, has_inferred_output};
use crate::scope::{Scope, Symbol};
use crate::sequence::{analyze_sequence, declare_sequence};
use arcc_par::{Item, Program};
use arcc_util::{Cancelled, Spanned};
use tracing::{debug, trace};

/// Result of analyzing a program
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Root scope holding every declared function and sequence
    pub scope: Scope,
    /// Authority values collected from the authority blocks
    pub authorities: Authorities,
}

/// Analyze `ctx.ast`, reporting into the context's session
pub fn analyze(ctx: &Context<'_, Program>) -> Analysis {
    let program = ctx.ast;
    debug!(items = program.items.len(), "analyzing program");

    let authorities = analyze_authorities(ctx);
    let mut scope = ctx.scope.clone();
    if let Err(Cancelled) = run(ctx, &mut scope) {
        debug!("analysis cancelled");
        ctx.info("analysis cancelled");
    }

    let session = ctx.session();
    let defaulted = session.constraints_mut().finalize();
    {
        let constraints = session.constraints();
        session.types_mut().rewrite(|ty| constraints.resolve(ty));
    }
    debug!(
        defaulted,
        errors = session.diagnostics().error_count(),
        "analyzed program"
    );

    Analysis { scope, authorities }
}

/// Declaration, inference and body passes; `scope` ends up holding every
/// declaration made before a cancellation
fn run(ctx: &Context<'_, Program>, scope: &mut Scope) -> Result<(), Cancelled> {
    let token = ctx.session().token();
    let program = ctx.ast;

    let mut symbols: Vec<Option<Symbol>> = Vec::with_capacity(program.items.len());
    for item in &program.items {
        token.check()?;
        let symbol = match item {
            Item::Function(decl) => declare_function(&ctx.child(decl)),
            Item::Sequence(decl) => declare_sequence(&ctx.child(decl)),
            Item::Authority(_) | Item::Flow(_) => {
                symbols.push(None);
                continue;
            },
        };
        if let Err(err) = scope.declare(symbol.clone()) {
            ctx.error_code_at(err.code(), &symbol.span, &err);
        }
        symbols.push(Some(symbol));
    }

    let ctx = ctx.with_scope(scope.clone());
    let inferring = ctx.with_inference_mode(true);
    for (item, symbol) in program.items.iter().zip(&symbols) {
        if let (Item::Function(decl), Some(symbol)) = (item, symbol) {
            if has_inferred_output(decl) {
                token.check()?;
                trace!(name = %decl.name.name, "inferring output type");
                analyze_function_body(&inferring.child(decl), symbol);
            }
        }
    }

    for (item, symbol) in program.items.iter().zip(&symbols) {
        token.check()?;
        trace!(kind = item.describe(), line = item.span().start.line, "analyzing item");
        match (item, symbol) {
            (Item::Function(decl), Some(symbol)) => analyze_function_body(&ctx.child(decl), symbol),
            (Item::Sequence(decl), Some(symbol)) => analyze_sequence(&ctx.child(decl), symbol),
            (Item::Flow(flow), _) => analyze_flow(&ctx.child(flow)),
            _ => {},
        }
    }

    Ok(())
}
