//! arcc-sem - Semantic Analyzer & Type Checker for Arc
//!
//! ============================================================================
//! SEMANTIC ANALYSIS OVERVIEW
//! ============================================================================
//!
//! The analyzer walks a parsed [`arcc_par::Program`] and answers:
//! - Does every name refer to a declaration?
//! - Do the types of expressions, assignments, calls and flows agree?
//! - Are authority blocks well formed and placed first?
//!
//! Problems are never returned as `Err`. They are collected as diagnostics
//! in a shared store and the walk always continues, so one run reports as
//! much as it can.
//!
//! PASSES:
//! -------
//!
//! ```text
//! authority ──▶ declarations ──▶ inference ──▶ bodies / flows / sequences ──▶ finalize
//! ```
//!
//! See [`analyzer`] for what each pass does.
//!
//! ============================================================================
//! NAME RESOLUTION
//! ============================================================================
//!
//! Scopes are persistent: adding a symbol yields a new [`Scope`] value and
//! leaves the old one untouched. Blocks declare into their own scope in
//! place, copying the local table only while an earlier snapshot still
//! shares it, so a name is visible only after its declaration.
//!
//! ```text
//! Root (host channels) ─▶ Function f ─▶ Block ─▶ Block (if branch)
//!                     └─▶ Sequence s ─▶ Stage a
//! ```
//!
//! A name may shadow one from an enclosing scope, but not one in the same
//! scope. The root scope falls back to a host [`Resolver`] (usually a
//! [`Channels`] table) for names the program does not declare.
//!
//! ============================================================================
//! TYPE INFERENCE
//! ============================================================================
//!
//! Unknown types are type variables in a [`ConstraintSystem`]. Each variable
//! may carry a [`Constraint`] limiting what it can become:
//!
//! ```text
//! 42       ?T0 : integer    (any numeric type)
//! 1.5      ?T1 : float      (f32 or f64)
//! x + 1.5  unify(?x, ?T1)   ?x : float
//! ```
//!
//! Unification is union-find: merging two variables intersects their
//! constraints, and binding a variable checks the type against the
//! constraint. The outcome does not depend on the order in which
//! constraints were added. Variables still unbound at the end default to
//! their constraint's default type (`i64` for integers, `f64` for floats).
//!
//! # Example
//!
//! ```
//! use arcc_sem::{analyze_program, Channels, Type};
//! use arcc_util::CancellationToken;
//! use std::rc::Rc;
//!
//! let (program, _) = arcc_par::parse("func scale(x f64) f64 { return x * 2 }\nsensor -> scale -> valve");
//! let channels = Channels::new()
//!     .with("sensor", 1, Type::F64)
//!     .with("valve", 2, Type::F64);
//! let output = analyze_program(&program, Some(Rc::new(channels)), CancellationToken::new());
//! assert!(output.diagnostics.ok(), "{}", output.diagnostics);
//! ```

pub mod analyzer;
pub mod authority;
pub mod constraints;
pub mod context;
pub mod expression;
pub mod flow;
pub mod function;
pub mod scope;
pub mod sequence;
pub mod statement;
pub mod types;

#[cfg(test)]
mod edge_cases;
#[cfg(test)]
mod test_util;

pub use analyzer::{analyze, Analysis};
pub use authority::Authorities;
pub use constraints::{ConstraintSystem, UnifyError};
pub use context::{Context, Session, TypeMap};
pub use scope::{ChannelInfo, Channels, Resolver, Scope, ScopeError, ScopeKind, Symbol, SymbolKind};
pub use types::{ConstValue, Constraint, FunctionType, Param, Type, TypeVarId, DEFAULT_OUTPUT};

use arcc_par::Program;
use arcc_util::{CancellationToken, Diagnostics};
use std::rc::Rc;

/// Everything produced by [`analyze_program`]
#[derive(Debug)]
pub struct AnalysisOutput {
    /// Root scope and authorities
    pub analysis: Analysis,
    /// Diagnostics in report order
    pub diagnostics: Diagnostics,
    /// Final type of every analyzed expression
    pub types: TypeMap,
}

/// Analyze `program` in a fresh session and collect the results.
///
/// `resolver` supplies host symbols such as channels; `token` may be
/// cancelled from another thread to stop the walk between items.
pub fn analyze_program(
    program: &Program,
    resolver: Option<Rc<dyn Resolver>>,
    token: CancellationToken,
) -> AnalysisOutput {
    let ctx = Context::create_root(token, program, resolver);
    let analysis = analyze(&ctx);
    let session = ctx.session();
    let diagnostics = session.diagnostics().clone();
    let types = session.types().clone();
    AnalysisOutput {
        analysis,
        diagnostics,
        types,
    }
}
