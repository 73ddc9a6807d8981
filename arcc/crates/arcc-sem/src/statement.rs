//! Statement analysis
//!
//! Statements run in order. A declaration hands its symbol back to the
//! enclosing block, which adds it to the block scope before the next
//! statement runs. Blocks open a child scope, so nothing declared inside
//! escapes.

use crate::context::Context;
use crate::expression::analyze_expression;
use crate::scope::{Scope, ScopeError, ScopeKind, Symbol, SymbolKind};
use crate::types::{Constraint, Type};
use arcc_par::{Assign, Block, Expr, ExprKind, IfStmt, Stmt, StmtKind, VarDecl};
use arcc_util::ErrorCode;

/// Analyze a block in a fresh child scope
pub fn analyze_block(ctx: &Context<'_, Block>) {
    let mut scope = ctx.scope.child(ScopeKind::Block);
    for stmt in &ctx.ast.stmts {
        let Some(symbol) = analyze_statement(&ctx.child(stmt).with_scope(scope.clone())) else {
            continue;
        };
        let span = symbol.span;
        if let Err(err) = scope.declare(symbol) {
            ctx.error_code_at(err.code(), &span, &err);
        }
    }
}

/// Analyze one statement; returns the symbol it declares, if any
pub fn analyze_statement(ctx: &Context<'_, Stmt>) -> Option<Symbol> {
    match &ctx.ast.kind {
        StmtKind::VarDecl(decl) => return analyze_var_decl(ctx, decl),
        StmtKind::Assign(assign) => analyze_assign(ctx, assign),
        StmtKind::If(stmt) => analyze_if(ctx, stmt),
        StmtKind::Return(value) => analyze_return(ctx, value.as_ref()),
        StmtKind::Expr(expr) => {
            analyze_expression(&ctx.child(expr).with_type_hint(None));
        },
    }
    None
}

fn expr_with_hint(ctx: &Context<'_, Stmt>, expr: &Expr, hint: Option<Type>) -> Type {
    analyze_expression(&ctx.child(expr).with_type_hint(hint))
}

fn analyze_var_decl(ctx: &Context<'_, Stmt>, decl: &VarDecl) -> Option<Symbol> {
    let declared = decl.ty.as_ref().map(Type::from_type_expr);
    let value_ty = expr_with_hint(ctx, &decl.value, declared.clone());

    let (kind, ty, id) = match declared {
        Some(declared) => {
            let (found, expected) = (ctx.humanize(&value_ty), ctx.humanize(&declared));
            if let Err(err) = ctx.unify(&declared, &value_ty) {
                ctx.error_code_at(
                    err.code(),
                    &decl.value,
                    format!("type mismatch: cannot assign {found} to {expected}"),
                );
            }
            (variable_kind(decl), declared, ctx.new_symbol_id())
        },
        None => match channel_alias(ctx, &decl.value) {
            Some(channel) if !decl.stateful => (SymbolKind::Channel, channel.ty, channel.id),
            _ => (variable_kind(decl), value_ty, ctx.new_symbol_id()),
        },
    };

    if let Some(func) = ctx.scope.enclosing(ScopeKind::Function).and_then(Scope::owner) {
        if func.name == decl.name.name {
            let err = ScopeError::Redefined {
                name: func.name.clone(),
                line: func.span.start.line,
                col: func.span.start.col,
            };
            ctx.error_code_at(err.code(), &decl.name, &err);
            return None;
        }
    }

    Some(Symbol::new(decl.name.name.clone(), kind, ty, id, decl.name.span))
}

fn variable_kind(decl: &VarDecl) -> SymbolKind {
    if decl.stateful {
        SymbolKind::StatefulVariable
    } else {
        SymbolKind::Variable
    }
}

/// The channel `value` names, if it is a bare channel identifier
fn channel_alias(ctx: &Context<'_, Stmt>, value: &Expr) -> Option<Symbol> {
    let ExprKind::Ident(name) = &value.kind else {
        return None;
    };
    ctx.scope
        .resolve(name)
        .ok()
        .filter(|symbol| symbol.kind == SymbolKind::Channel)
}

fn analyze_assign(ctx: &Context<'_, Stmt>, assign: &Assign) {
    let target = &assign.target;
    let symbol = match ctx.scope.resolve(&target.name) {
        Ok(symbol) => symbol,
        Err(err) => {
            ctx.error_code_at(err.code(), target, &err);
            expr_with_hint(ctx, &assign.value, None);
            return;
        },
    };

    if !symbol.kind.is_assignable() {
        ctx.error_at(target, format!("cannot assign to {}", target.name));
        if let Some(index) = &assign.index {
            expr_with_hint(ctx, index, None);
        }
        expr_with_hint(ctx, &assign.value, None);
        return;
    }

    if let Some(index) = &assign.index {
        analyze_indexed_assign(ctx, assign, index, &symbol.ty);
        return;
    }

    if symbol.kind == SymbolKind::Channel {
        let elem = symbol.ty.element().cloned().unwrap_or(Type::Invalid);
        let value_ty = expr_with_hint(ctx, &assign.value, Some(ctx.resolve(&elem)));
        let (found, expected) = (ctx.humanize(&value_ty), ctx.humanize(&elem));
        if let Err(err) = ctx.unify(&elem, &value_ty) {
            ctx.error_code_at(
                err.code(),
                &assign.value,
                format!("type mismatch: cannot write {found} to channel of type {expected}"),
            );
        }
        return;
    }

    let value_ty = expr_with_hint(ctx, &assign.value, Some(ctx.resolve(&symbol.ty)));
    let (found, expected) = (ctx.humanize(&value_ty), ctx.humanize(&symbol.ty));
    if let Err(err) = ctx.unify(&symbol.ty, &value_ty) {
        ctx.error_code_at(
            err.code(),
            &assign.value,
            format!("type mismatch: cannot assign {found} to variable of type {expected}"),
        );
    }
}

/// `name[index] = value` on a series variable
fn analyze_indexed_assign(ctx: &Context<'_, Stmt>, assign: &Assign, index: &Expr, ty: &Type) {
    let elem = match ctx.resolve(ty) {
        Type::Series(elem) => *elem,
        resolved => {
            if resolved != Type::Invalid {
                ctx.error_at(&assign.target, "indexed assignment only supported on series types");
            }
            expr_with_hint(ctx, index, None);
            expr_with_hint(ctx, &assign.value, None);
            return;
        },
    };

    let index_ty = expr_with_hint(ctx, index, None);
    let integer = ctx.fresh(Some(Constraint::Integer));
    if ctx.unify(&index_ty, &integer).is_err() {
        ctx.error_at(
            index,
            format!("series index must be an integer, received {}", ctx.humanize(&index_ty)),
        );
    }

    let value_ty = expr_with_hint(ctx, &assign.value, Some(ctx.resolve(&elem)));
    let (found, expected) = (ctx.humanize(&value_ty), ctx.humanize(&elem));
    if let Err(err) = ctx.unify(&elem, &value_ty) {
        ctx.error_code_at(
            err.code(),
            &assign.value,
            format!("type mismatch: cannot assign {found} to series element of type {expected}"),
        );
    }
}

fn analyze_condition(ctx: &Context<'_, Stmt>, condition: &Expr) {
    let ty = expr_with_hint(ctx, condition, None);
    let valid = match ctx.resolve(&ty) {
        Type::Invalid => true,
        Type::Var(_) => {
            let numeric = ctx.fresh(Some(Constraint::Numeric));
            ctx.unify(&ty, &numeric).is_ok()
        },
        t => t.is_numeric(),
    };
    if !valid {
        ctx.error_at(
            condition,
            format!("if condition must be numeric, received {}", ctx.humanize(&ty)),
        );
    }
}

fn analyze_if(ctx: &Context<'_, Stmt>, stmt: &IfStmt) {
    analyze_condition(ctx, &stmt.condition);
    analyze_block(&ctx.child(&stmt.then_block));
    for clause in &stmt.else_ifs {
        analyze_condition(ctx, &clause.condition);
        analyze_block(&ctx.child(&clause.block));
    }
    if let Some(block) = &stmt.else_block {
        analyze_block(&ctx.child(block));
    }
}

fn analyze_return(ctx: &Context<'_, Stmt>, value: Option<&Expr>) {
    let Some(Type::Function(func)) = ctx
        .scope
        .enclosing(ScopeKind::Function)
        .and_then(Scope::owner)
        .map(|owner| owner.ty.clone())
    else {
        ctx.error("return statement outside of a function");
        return;
    };

    match (value, func.return_type()) {
        (Some(expr), Some(expected)) => {
            let actual = expr_with_hint(ctx, expr, Some(ctx.resolve(expected)));
            let (found, wanted) = (ctx.humanize(&actual), ctx.humanize(expected));
            if let Err(err) = ctx.unify(expected, &actual) {
                ctx.error_code_at(err.code(), expr, format!("cannot return {found}, expected {wanted}"));
            }
        },
        (Some(expr), None) => {
            expr_with_hint(ctx, expr, None);
            if func.has_named_outputs() {
                ctx.error("unexpected return value in function with named outputs");
            } else {
                ctx.error("unexpected return value in function with void return type");
            }
        },
        (None, Some(expected)) => {
            ctx.error_code(
                ErrorCode::TypeMismatch,
                format!("missing return value of type {}", ctx.humanize(expected)),
            );
        },
        (None, None) => {},
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{analyze_source, analyze_with_channels, assert_clean, messages};
    use crate::types::Type;
    use arcc_util::ErrorCode;

    #[test]
    fn test_declarations() {
        assert_clean(&analyze_source(
            "func f(a f64) f64 {\n x := a\n y f64 := 2\n z $= 0\n z = z + 1\n return x * y\n}",
        ));
    }

    #[test]
    fn test_declared_type_mismatch() {
        let result = analyze_source("func f() { x i32 := \"s\" }");
        let diag = result.diagnostics.errors().next().unwrap();
        assert_eq!(diag.message, "type mismatch: cannot assign str to i32");
        assert_eq!(diag.code, Some(ErrorCode::TypeMismatch));

        let result = analyze_source("func f() { x i32 := 1.5 }");
        let diag = result.diagnostics.errors().next().unwrap();
        assert_eq!(diag.message, "type mismatch: cannot assign float to i32");
        assert_eq!(diag.code, Some(ErrorCode::TypeConstraintViolation));
    }

    #[test]
    fn test_redeclaration_in_same_block() {
        let result = analyze_source("func f() {\n dog := 1\n dog := 2\n}");
        let diag = result.diagnostics.errors().next().unwrap();
        assert_eq!(
            diag.message,
            "name dog conflicts with existing symbol at line 2, col 1"
        );
        assert_eq!(diag.code, Some(ErrorCode::SymbolRedefined));
    }

    #[test]
    fn test_shadowing_in_nested_block() {
        assert_clean(&analyze_source(
            "func f(a f64) {\n x := 1\n if a > 0 {\n  x := \"s\"\n }\n}",
        ));
    }

    #[test]
    fn test_local_named_like_function() {
        let result = analyze_source("func calc() {\n calc := 1\n}");
        assert_eq!(
            messages(&result),
            ["name calc conflicts with existing symbol at line 1, col 5"]
        );
    }

    #[test]
    fn test_block_locals_do_not_escape() {
        let result = analyze_source("func f(a f64) {\n if a > 0 {\n  y := 1\n }\n z := y\n}");
        assert_eq!(messages(&result), ["undefined symbol: y"]);
    }

    #[test]
    fn test_assignments() {
        let result = analyze_source("func f{k f64}(a f64) {\n a = 1.0\n k = 2.0\n}");
        assert_eq!(messages(&result), ["cannot assign to a", "cannot assign to k"]);

        let result = analyze_source("func f() {\n x := 1.5\n x = \"s\"\n}");
        assert_eq!(
            messages(&result),
            ["type mismatch: cannot assign str to variable of type float"]
        );

        let result = analyze_source("func f() { ghost = 1 }");
        assert_eq!(messages(&result), ["undefined symbol: ghost"]);
    }

    #[test]
    fn test_indexed_assignment() {
        assert_clean(&analyze_source(
            "func f() {\n s series f64 := [1.0, 2.0]\n s[0] = 3.0\n s[1] = 2\n t := [1, 2]\n t[0] = 1.5\n}",
        ));

        let result = analyze_source("func f() {\n s series f64 := [1.0]\n s[0] = \"x\"\n}");
        let diag = result.diagnostics.errors().next().unwrap();
        assert_eq!(
            diag.message,
            "type mismatch: cannot assign str to series element of type f64"
        );
        assert_eq!(diag.code, Some(ErrorCode::TypeMismatch));

        let result = analyze_source("func f() {\n x := 1.5\n x[0] = 2.0\n}");
        assert_eq!(
            messages(&result),
            ["indexed assignment only supported on series types"]
        );

        let result = analyze_source("func f() {\n s := [1.0]\n s[0.5] = 2.0\n}");
        assert_eq!(
            messages(&result),
            ["series index must be an integer, received float"]
        );

        let result = analyze_source("func f(s series f64) { s[0] = 1.0 }");
        assert_eq!(messages(&result), ["cannot assign to s"]);
    }

    #[test]
    fn test_channel_writes() {
        let channels = [("valve", 1, Type::F32)];
        assert_clean(&analyze_with_channels("func f(a f32) { valve = a }", &channels));
        let result = analyze_with_channels("func f() { valve = \"open\" }", &channels);
        assert_eq!(
            messages(&result),
            ["type mismatch: cannot write str to channel of type f32"]
        );
        // Untyped aliases of a channel stay writable channels.
        assert_clean(&analyze_with_channels("func f() {\n v := valve\n v = 1.0\n}", &channels));
    }

    #[test]
    fn test_if_conditions() {
        assert_clean(&analyze_source(
            "func f(a f64) {\n if a > 1 { } else if a < 0 { } else { }\n}",
        ));
        let result = analyze_source("func f(s str) { if s { } }");
        assert_eq!(messages(&result), ["if condition must be numeric, received str"]);
    }

    #[test]
    fn test_return_checks() {
        // A value return without a written output infers one.
        assert_clean(&analyze_source("func f() { return 1 }"));

        let result = analyze_source("func f() f64 { return }");
        assert_eq!(messages(&result), ["missing return value of type f64"]);

        let result = analyze_source("func f() i32 { return \"s\" }");
        assert_eq!(messages(&result), ["cannot return str, expected i32"]);
    }

    #[test]
    fn test_named_outputs_are_assigned() {
        assert_clean(&analyze_source(
            "func split(v f64) (hi f64, lo f64) {\n hi = v\n lo = -v\n}",
        ));
        let result = analyze_source("func split(v f64) (hi f64, lo f64) { return v }");
        assert_eq!(
            messages(&result),
            ["unexpected return value in function with named outputs"]
        );
    }
}
