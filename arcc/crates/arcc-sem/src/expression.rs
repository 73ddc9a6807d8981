//! Expression typing
//!
//! [`analyze_expression`] computes the type of an expression, reports what
//! is wrong with it, and records the type of every sub-expression in the
//! session's type map. Literals take their type from the context's hint
//! when the hint accepts them, otherwise they become constrained variables
//! resolved later by unification or by the defaults applied at the end.

use crate::context::Context;
use crate::scope::SymbolKind;
use crate::types::{Constraint, Type};
use arcc_par::{BinaryOp, Expr, ExprKind, Ident, Literal, UnaryOp};
use arcc_util::ErrorCode;

/// Type an expression and every sub-expression
pub fn analyze_expression(ctx: &Context<'_, Expr>) -> Type {
    let ty = match &ctx.ast.kind {
        ExprKind::Literal(literal) => literal_type(ctx, literal),
        ExprKind::Ident(name) => ident_type(ctx, name),
        ExprKind::Paren(inner) => analyze_expression(&ctx.child(&**inner)),
        ExprKind::Unary { op, operand } => unary_type(ctx, *op, operand),
        ExprKind::Binary { op, lhs, rhs } => binary_type(ctx, *op, lhs, rhs),
        ExprKind::Call { callee, args } => call_type(ctx, callee, args),
        ExprKind::Cast { target, value } => {
            cast_type(ctx, Type::from_primitive(*target), value)
        },
        ExprKind::Index { target, index } => index_type(ctx, target, index),
        ExprKind::Series(elements) => series_type(ctx, elements),
    };
    ctx.record_type(ctx.ast.id, &ty);
    ty
}

fn sub(ctx: &Context<'_, Expr>, expr: &Expr, hint: Option<Type>) -> Type {
    analyze_expression(&ctx.child(expr).with_type_hint(hint))
}

fn hint(ctx: &Context<'_, Expr>) -> Option<Type> {
    ctx.type_hint.as_ref().map(|h| ctx.resolve(h))
}

fn literal_type(ctx: &Context<'_, Expr>, literal: &Literal) -> Type {
    match literal {
        Literal::Int(_) => match hint(ctx) {
            Some(h) if h.is_numeric() => h,
            _ => ctx.fresh(Some(Constraint::ExactIntegerFloat)),
        },
        Literal::Float(_) => match hint(ctx) {
            Some(h) if h.is_float() => h,
            _ => ctx.fresh(Some(Constraint::Float)),
        },
        Literal::Str(_) => Type::Str,
    }
}

fn ident_type(ctx: &Context<'_, Expr>, name: &str) -> Type {
    match ctx.scope.resolve(name) {
        Ok(symbol) => match symbol.kind {
            SymbolKind::Channel => symbol.ty.element().cloned().unwrap_or(Type::Invalid),
            SymbolKind::Sequence | SymbolKind::Stage => {
                ctx.error(format!("{name} is a {} and has no value", symbol.kind));
                Type::Invalid
            },
            _ => symbol.ty,
        },
        Err(err) => {
            ctx.error_code(err.code(), &err);
            Type::Invalid
        },
    }
}

fn unary_type(ctx: &Context<'_, Expr>, op: UnaryOp, operand: &Expr) -> Type {
    match op {
        UnaryOp::Neg => {
            let ty = sub(ctx, operand, ctx.type_hint.clone());
            match ctx.resolve(&ty) {
                Type::Var(_) => {
                    let numeric = ctx.fresh(Some(Constraint::Numeric));
                    if ctx.unify(&ty, &numeric).is_err() {
                        ctx.error(format!("operator - not supported for type {}", ctx.humanize(&ty)));
                        return Type::Invalid;
                    }
                    ty
                },
                t if t.is_signed_integer() || t.is_float() || t == Type::Invalid => ty,
                Type::Series(elem) if elem.is_signed_integer() || elem.is_float() => ty,
                _ => {
                    ctx.error(format!("operator - not supported for type {}", ctx.humanize(&ty)));
                    Type::Invalid
                },
            }
        },
        UnaryOp::Not => {
            let ty = sub(ctx, operand, Some(Type::U8));
            if ctx.unify(&ty, &Type::U8).is_err() {
                ctx.error(format!(
                    "operator 'not' requires boolean operand, received {}",
                    ctx.humanize(&ty)
                ));
            }
            Type::U8
        },
    }
}

/// True if `op` may be applied to values of type `ty`
fn supports(op: BinaryOp, ty: &Type) -> bool {
    match ty {
        Type::Invalid => true,
        Type::Str => op == BinaryOp::Add || op.is_comparison(),
        Type::Series(elem) => elem.is_numeric(),
        t => t.is_numeric(),
    }
}

fn binary_type(ctx: &Context<'_, Expr>, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Type {
    let name = op.as_str();

    if op.is_logical() {
        for operand in [lhs, rhs] {
            let ty = sub(ctx, operand, Some(Type::U8));
            if ctx.unify(&ty, &Type::U8).is_err() {
                ctx.error_at(operand, format!("cannot use {} in {name} operation", ctx.humanize(&ty)));
            }
        }
        return Type::U8;
    }

    let lhs_hint = if op.is_arithmetic() { ctx.type_hint.clone() } else { None };
    let lhs_ty = sub(ctx, lhs, lhs_hint);
    let rhs_ty = sub(ctx, rhs, Some(ctx.resolve(&lhs_ty)));

    let (lhs_name, rhs_name) = (ctx.humanize(&lhs_ty), ctx.humanize(&rhs_ty));
    if let Err(err) = ctx.unify(&lhs_ty, &rhs_ty) {
        ctx.error_code(
            err.code(),
            format!("type mismatch: cannot use {lhs_name} and {rhs_name} in {name} operation"),
        );
        return if op.is_comparison() { Type::U8 } else { Type::Invalid };
    }

    let operand = ctx.resolve(&lhs_ty);
    let valid = match &operand {
        // Strings concatenate, so `+` leaves an open variable unconstrained.
        Type::Var(_) if op == BinaryOp::Add || op.is_comparison() => true,
        Type::Var(_) => {
            let numeric = ctx.fresh(Some(Constraint::Numeric));
            ctx.unify(&lhs_ty, &numeric).is_ok()
        },
        t => supports(op, t),
    };
    if !valid {
        ctx.error(format!("cannot use {} in {name} operation", ctx.humanize(&lhs_ty)));
        return if op.is_comparison() { Type::U8 } else { Type::Invalid };
    }

    if op.is_comparison() {
        Type::U8
    } else {
        lhs_ty
    }
}

fn call_type(ctx: &Context<'_, Expr>, callee: &Ident, args: &[Expr]) -> Type {
    let symbol = match ctx.scope.resolve(&callee.name) {
        Ok(symbol) => symbol,
        Err(err) => {
            ctx.error_code_at(err.code(), callee, &err);
            analyze_args_unchecked(ctx, args);
            return Type::Invalid;
        },
    };
    let Type::Function(func) = symbol.ty else {
        ctx.error_at(callee, format!("{} is not a function", callee.name));
        analyze_args_unchecked(ctx, args);
        return Type::Invalid;
    };
    let name = &callee.name;

    if func.has_named_outputs() {
        ctx.error(format!(
            "cannot call function {name}: functions with multiple named outputs are not callable"
        ));
        analyze_args_unchecked(ctx, args);
        return Type::Invalid;
    }

    let total = func.inputs.len();
    let required = func.inputs.iter().filter(|p| p.is_required()).count();
    if args.len() < required || args.len() > total {
        let expected = if required == total {
            total.to_string()
        } else {
            format!("{required} to {total}")
        };
        ctx.error_code(
            ErrorCode::FuncArgCount,
            format!("function {name} expects {expected} argument(s), got {}", args.len()),
        );
        analyze_args_unchecked(ctx, args);
    } else {
        for (i, (arg, param)) in args.iter().zip(&func.inputs).enumerate() {
            let ty = sub(ctx, arg, Some(ctx.resolve(&param.ty)));
            let (expected, got) = (ctx.humanize(&param.ty), ctx.humanize(&ty));
            if ctx.unify(&ty, &param.ty).is_err() {
                ctx.error_code_at(
                    ErrorCode::FuncArgType,
                    arg,
                    format!("argument {} of {name}: expected {expected}, got {got}", i + 1),
                );
            }
        }
    }

    func.return_type().cloned().unwrap_or(Type::Invalid)
}

fn analyze_args_unchecked(ctx: &Context<'_, Expr>, args: &[Expr]) {
    for arg in args {
        sub(ctx, arg, None);
    }
}

fn cast_type(ctx: &Context<'_, Expr>, target: Type, value: &Expr) -> Type {
    let ty = sub(ctx, value, None);
    let valid = match ctx.resolve(&ty) {
        Type::Invalid => true,
        source if source == target => true,
        Type::Var(_) if target.is_numeric() => {
            let numeric = ctx.fresh(Some(Constraint::Numeric));
            ctx.unify(&ty, &numeric).is_ok()
        },
        source => source.is_numeric() && target.is_numeric(),
    };
    if !valid {
        ctx.error(format!("cannot cast {} to {target}", ctx.humanize(&ty)));
    }
    target
}

fn index_type(ctx: &Context<'_, Expr>, target: &Expr, index: &Expr) -> Type {
    let target_ty = sub(ctx, target, None);
    let index_ty = sub(ctx, index, None);

    let integer = ctx.fresh(Some(Constraint::Integer));
    if ctx.unify(&index_ty, &integer).is_err() {
        ctx.error_at(
            index,
            format!("series index must be an integer, received {}", ctx.humanize(&index_ty)),
        );
    }

    match ctx.resolve(&target_ty) {
        Type::Series(elem) => *elem,
        Type::Invalid => Type::Invalid,
        Type::Var(_) => {
            let elem = ctx.fresh(None);
            match ctx.unify(&target_ty, &Type::series(elem.clone())) {
                Ok(()) => elem,
                Err(_) => {
                    ctx.error_at(target, format!("cannot index into {}", ctx.humanize(&target_ty)));
                    Type::Invalid
                },
            }
        },
        _ => {
            ctx.error_at(target, format!("cannot index into {}", ctx.humanize(&target_ty)));
            Type::Invalid
        },
    }
}

fn series_type(ctx: &Context<'_, Expr>, elements: &[Expr]) -> Type {
    let elem = match hint(ctx) {
        Some(Type::Series(elem)) => *elem,
        _ => ctx.fresh(None),
    };
    for element in elements {
        let ty = sub(ctx, element, Some(ctx.resolve(&elem)));
        let (expected, found) = (ctx.humanize(&elem), ctx.humanize(&ty));
        if let Err(err) = ctx.unify(&elem, &ty) {
            ctx.error_code_at(
                err.code(),
                element,
                format!("type mismatch: series element {found} does not match {expected}"),
            );
        }
    }
    Type::series(elem)
}
