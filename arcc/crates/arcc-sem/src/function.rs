//! Function declarations and bodies
//!
//! Declaration builds a [`FunctionType`] from the written signature so that
//! calls and flows anywhere in the program can be checked against it. Body
//! analysis then runs the statements in a function scope holding the
//! parameters.

use crate::context::Context;
use crate::expression::analyze_expression;
use crate::scope::{ScopeKind, Symbol, SymbolKind};
use crate::statement::analyze_block;
use crate::types::{ConstValue, FunctionType, Param, Type, DEFAULT_OUTPUT};
use arcc_par::{
    Block, Expr, ExprKind, FunctionDecl, Literal, OutputDecl, Param as AstParam, StmtKind, UnaryOp,
};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Parameter lists of a signature, used in messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Config,
    Input,
    Output,
}

impl Section {
    fn as_str(self) -> &'static str {
        match self {
            Section::Config => "config",
            Section::Input => "input",
            Section::Output => "output",
        }
    }

    fn symbol_kind(self) -> SymbolKind {
        match self {
            Section::Config => SymbolKind::Config,
            Section::Input => SymbolKind::Input,
            Section::Output => SymbolKind::Output,
        }
    }
}

/// Build the symbol of a function declaration
pub fn declare_function(ctx: &Context<'_, FunctionDecl>) -> Symbol {
    let decl = ctx.ast;
    let config = params(ctx, Section::Config, &decl.config);
    let inputs = params(ctx, Section::Input, &decl.inputs);
    let outputs = match &decl.output {
        Some(OutputDecl::Single(ty)) => vec![Param::new(DEFAULT_OUTPUT, Type::from_type_expr(ty))],
        Some(OutputDecl::Named(list)) => params(ctx, Section::Output, list),
        None if returns_value(&decl.body) => vec![Param::new(DEFAULT_OUTPUT, ctx.fresh(None))],
        None => Vec::new(),
    };

    let ty = FunctionType {
        config,
        inputs,
        outputs,
    };
    trace!(name = %decl.name.name, inputs = ty.inputs.len(), "declared function");
    Symbol::new(
        decl.name.name.clone(),
        SymbolKind::Function,
        Type::Function(Box::new(ty)),
        ctx.new_symbol_id(),
        decl.name.span,
    )
}

/// True if a function's output type must be inferred from its body
pub fn has_inferred_output(decl: &FunctionDecl) -> bool {
    decl.output.is_none() && returns_value(&decl.body)
}

/// True if some `return` in `block` carries a value
fn returns_value(block: &Block) -> bool {
    block.stmts.iter().any(|stmt| match &stmt.kind {
        StmtKind::Return(value) => value.is_some(),
        StmtKind::If(stmt) => {
            returns_value(&stmt.then_block)
                || stmt.else_ifs.iter().any(|clause| returns_value(&clause.block))
                || stmt.else_block.as_ref().is_some_and(returns_value)
        },
        _ => false,
    })
}

/// Build one parameter list. Config and input parameters may carry literal
/// defaults, and a required parameter may not follow an optional one.
fn params(ctx: &Context<'_, FunctionDecl>, section: Section, list: &[AstParam]) -> Vec<Param> {
    let section_name = section.as_str();
    let mut seen = FxHashSet::default();
    let mut seen_optional = false;
    let mut out = Vec::with_capacity(list.len());
    for param in list {
        let name = &param.name.name;
        if !seen.insert(name.as_str()) {
            ctx.error_at(&param.name, format!("duplicate {section_name} {name}"));
            continue;
        }
        let ty = Type::from_type_expr(&param.ty);
        let default = match &param.default {
            Some(expr) => {
                seen_optional = true;
                check_default(ctx, section, expr, &ty)
            },
            None => {
                if seen_optional {
                    ctx.error_at(
                        &param.name,
                        format!(
                            "required {section_name} parameter {name} cannot follow optional {section_name} parameters"
                        ),
                    );
                }
                None
            },
        };
        out.push(Param {
            name: name.clone(),
            ty,
            default,
        });
    }
    out
}

/// Type-check a parameter default and extract its value
fn check_default(
    ctx: &Context<'_, FunctionDecl>,
    section: Section,
    expr: &Expr,
    ty: &Type,
) -> Option<ConstValue> {
    let Some(value) = const_value(expr) else {
        ctx.error_at(expr, format!("{} parameter default must be a literal", section.as_str()));
        return None;
    };
    let actual = analyze_expression(&ctx.child(expr).with_type_hint(Some(ty.clone())));
    let (found, expected) = (ctx.humanize(&actual), ctx.humanize(ty));
    if let Err(err) = ctx.unify(ty, &actual) {
        ctx.error_code_at(
            err.code(),
            expr,
            format!("type mismatch: cannot assign {found} to {expected}"),
        );
        return None;
    }
    Some(value)
}

/// Value of a literal or negated numeric literal
pub fn const_value(expr: &Expr) -> Option<ConstValue> {
    match &expr.kind {
        ExprKind::Literal(Literal::Int(v)) => Some(ConstValue::Int(i128::from(*v))),
        ExprKind::Literal(Literal::Float(v)) => Some(ConstValue::Float(*v)),
        ExprKind::Literal(Literal::Str(s)) => Some(ConstValue::Str(s.clone())),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => match const_value(operand)? {
            ConstValue::Int(v) => Some(ConstValue::Int(-v)),
            ConstValue::Float(v) => Some(ConstValue::Float(-v)),
            ConstValue::Str(_) => None,
        },
        _ => None,
    }
}

/// Analyze the body of a declared function
pub fn analyze_function_body(ctx: &Context<'_, FunctionDecl>, symbol: &Symbol) {
    let decl = ctx.ast;
    let mut scope = ctx.scope.child_owned(ScopeKind::Function, symbol.clone());
    let Type::Function(func) = &symbol.ty else {
        return;
    };

    let sections = [
        (Section::Config, decl.config.as_slice(), &func.config),
        (Section::Input, decl.inputs.as_slice(), &func.inputs),
    ];
    let named_outputs: &[AstParam] = match &decl.output {
        Some(OutputDecl::Named(list)) => list.as_slice(),
        _ => &[],
    };
    let sections = sections
        .into_iter()
        .chain([(Section::Output, named_outputs, &func.outputs)]);

    for (section, written, declared) in sections {
        for param in declared {
            let Some(ast) = written.iter().find(|p| p.name.name == param.name) else {
                continue;
            };
            let symbol = Symbol::new(
                param.name.clone(),
                section.symbol_kind(),
                param.ty.clone(),
                ctx.new_symbol_id(),
                ast.name.span,
            );
            let span = symbol.span;
            if let Err(err) = scope.declare(symbol) {
                ctx.error_code_at(err.code(), &span, &err);
            }
        }
    }

    analyze_block(&ctx.child(&decl.body).with_scope(scope));
}
