//! Flow statements
//!
//! A flow `a -> f{k=1} -> b` connects endpoints left to right. Each node
//! becomes an [`Endpoint`] describing what it produces, and every arrow is
//! checked by unifying the producer's output type with what the consumer
//! accepts:
//!
//! ```text
//!   producer \ consumer    channel            func
//!   channel                value types        first input
//!   func                   return type        first (only) input
//!   expression             expression type    first input
//! ```
//!
//! A node that fails to resolve produces no endpoint, and the arrow after
//! it is not checked.
//!
//! A flow may carry one routing table. After a func with named outputs it
//! sends each output down its own chain, optionally into a named input of
//! the func after the table (`{ hi: scale{}: a, lo: valve } -> mix`).
//! Before a func it gathers sources into named inputs
//! (`{ sensor: a, valve: b } -> mix`). Types are threaded along each entry.

use crate::context::Context;
use crate::expression::analyze_expression;
use crate::scope::SymbolKind;
use crate::types::{FunctionType, Param, Type};
use arcc_par::{
    ConfigValues, FlowNode, FlowNodeKind, FlowStatement, Ident, RoutingEntry, RoutingTable,
};
use arcc_util::ErrorCode;
use rustc_hash::FxHashSet;

/// What a flow node produces
#[derive(Debug, Clone)]
enum Endpoint {
    Channel { name: String, elem: Type },
    Func { name: String, func: Box<FunctionType> },
    Expr { ty: Type },
}

/// A func invoked next to a routing table
struct Invoked<'n> {
    name: &'n Ident,
    /// `None` when the name did not resolve to a function
    func: Option<Box<FunctionType>>,
}

/// Check a flow statement
pub fn analyze_flow(ctx: &Context<'_, FlowStatement>) {
    let nodes = &ctx.ast.nodes;
    let tables = nodes
        .iter()
        .filter(|n| matches!(n.kind, FlowNodeKind::Routing(_)))
        .count();

    let mut prev: Option<Endpoint> = None;
    for (i, node) in nodes.iter().enumerate() {
        let ctx = ctx.child(node);
        if let FlowNodeKind::Routing(table) = &node.kind {
            let ctx = ctx.child(table);
            if tables > 1 {
                ctx.error("unexpected routing table configuration");
            } else if i > 0 {
                analyze_output_table(&ctx, &nodes[..i], &nodes[i + 1..]);
            } else {
                analyze_input_table(&ctx, &nodes[i + 1..]);
            }
            prev = None;
            continue;
        }
        let is_sink = i + 1 == nodes.len() && i > 0;
        prev = analyze_node(&ctx, prev.as_ref(), is_sink);
    }
}

fn analyze_node(ctx: &Context<'_, FlowNode>, prev: Option<&Endpoint>, is_sink: bool) -> Option<Endpoint> {
    match &ctx.ast.kind {
        FlowNodeKind::Identifier(ident) => identifier(ctx, ident, prev, is_sink),
        FlowNodeKind::Call { name, config } => invocation(ctx, name, Some(config), prev),
        FlowNodeKind::Expr(expr) => {
            let ty = analyze_expression(&ctx.child(expr).with_type_hint(None));
            Some(Endpoint::Expr { ty })
        },
        FlowNodeKind::Routing(table) => {
            ctx.child(table).error("unexpected routing table configuration");
            None
        },
    }
}

fn identifier(
    ctx: &Context<'_, FlowNode>,
    ident: &Ident,
    prev: Option<&Endpoint>,
    is_sink: bool,
) -> Option<Endpoint> {
    let symbol = match ctx.scope.resolve(&ident.name) {
        Ok(symbol) => symbol,
        Err(err) => {
            ctx.error_code_at(err.code(), ident, &err);
            return None;
        },
    };
    match symbol.kind {
        SymbolKind::Function => invocation(ctx, ident, None, prev),
        SymbolKind::Channel => {
            let elem = symbol.ty.element().cloned().unwrap_or(Type::Invalid);
            if let Some(prev) = prev {
                connect_to_channel(ctx, prev, &ident.name, &elem);
            }
            Some(Endpoint::Channel {
                name: ident.name.clone(),
                elem,
            })
        },
        // Flowing into a sequence or stage activates it; nothing to type.
        SymbolKind::Sequence | SymbolKind::Stage if is_sink => None,
        _ => {
            ctx.error_at(ident, format!("{} is not a channel", ident.name));
            None
        },
    }
}

fn invocation(
    ctx: &Context<'_, FlowNode>,
    name: &Ident,
    config: Option<&ConfigValues>,
    prev: Option<&Endpoint>,
) -> Option<Endpoint> {
    let symbol = match ctx.scope.resolve(&name.name) {
        Ok(symbol) => symbol,
        Err(err) => {
            ctx.error_code_at(err.code(), name, &err);
            return None;
        },
    };
    let Type::Function(func) = symbol.ty else {
        ctx.error_at(name, format!("{} is not a function", name.name));
        return None;
    };
    check_config(ctx, &name.name, &func, config);
    if let Some(prev) = prev {
        connect_to_func(ctx, prev, &name.name, &func);
    }
    Some(Endpoint::Func {
        name: name.name.clone(),
        func,
    })
}

fn check_config(
    ctx: &Context<'_, FlowNode>,
    func_name: &str,
    func: &FunctionType,
    config: Option<&ConfigValues>,
) {
    let mut provided = FxHashSet::default();
    match config {
        None => {},
        Some(ConfigValues::Anonymous { values, span }) => {
            for value in values {
                analyze_expression(&ctx.child(value).with_type_hint(None));
            }
            ctx.error_at(span, "anonymous configuration values are not supported");
            return;
        },
        Some(ConfigValues::Named(values)) => {
            for entry in values {
                let key = &entry.name.name;
                let Some(param) = func.config_param(key) else {
                    analyze_expression(&ctx.child(&entry.value).with_type_hint(None));
                    ctx.error_at(
                        &entry.name,
                        format!("unknown config parameter '{key}' for func '{func_name}'"),
                    );
                    continue;
                };
                provided.insert(key.as_str());
                let hint = Some(ctx.resolve(&param.ty));
                let actual = analyze_expression(&ctx.child(&entry.value).with_type_hint(hint));
                let (expected, got) = (ctx.humanize(&param.ty), ctx.humanize(&actual));
                if ctx.unify(&param.ty, &actual).is_err() {
                    ctx.error_code_at(
                        ErrorCode::FuncArgType,
                        &entry.value,
                        format!("type mismatch: config parameter '{key}' expects {expected} but got {got}"),
                    );
                }
            }
        },
    }

    for param in func.config.iter().filter(|p| p.is_required()) {
        if !provided.contains(param.name.as_str()) {
            ctx.error_code(
                ErrorCode::FuncArgCount,
                format!(
                    "missing required config parameter '{}' for func '{func_name}'",
                    param.name
                ),
            );
        }
    }
}

/// Output type of a function feeding the next node, if it has exactly one
fn single_output<'f>(ctx: &Context<'_, FlowNode>, name: &str, func: &'f FunctionType) -> Option<&'f Type> {
    if func.has_named_outputs() {
        ctx.error(format!("func '{name}' has named outputs and requires a routing table"));
        return None;
    }
    let output = func.return_type();
    if output.is_none() {
        ctx.error(format!("func '{name}' has no output"));
    }
    output
}

fn connect_to_func(ctx: &Context<'_, FlowNode>, prev: &Endpoint, name: &str, func: &FunctionType) {
    let Some(param) = func.inputs.first() else {
        ctx.error(format!("func '{name}' has no input parameters"));
        return;
    };
    let param_name = ctx.humanize(&param.ty);

    match prev {
        Endpoint::Channel { name: channel, elem } => {
            let elem_name = ctx.humanize(elem);
            if ctx.unify(elem, &param.ty).is_err() {
                ctx.error(format!(
                    "channel {channel} value type {elem_name} does not match func {name} parameter type {param_name}"
                ));
            }
        },
        Endpoint::Expr { ty } => {
            let ty_name = ctx.humanize(ty);
            if ctx.unify(ty, &param.ty).is_err() {
                ctx.error(format!(
                    "expression type {ty_name} does not match func {name} parameter type {param_name}"
                ));
            }
        },
        Endpoint::Func {
            name: source,
            func: source_func,
        } => {
            if func.inputs.len() > 1 {
                ctx.error(format!("{name} has more than one parameter"));
                return;
            }
            let Some(output) = single_output(ctx, source, source_func) else {
                return;
            };
            let output_name = ctx.humanize(output);
            if ctx.unify(output, &param.ty).is_err() {
                ctx.error(format!(
                    "return type {output_name} of {source} is not equal to argument type {param_name} of {name}"
                ));
            }
        },
    }
}

fn connect_to_channel(ctx: &Context<'_, FlowNode>, prev: &Endpoint, name: &str, elem: &Type) {
    let elem_name = ctx.humanize(elem);
    match prev {
        Endpoint::Channel {
            name: source,
            elem: source_elem,
        } => {
            let source_name = ctx.humanize(source_elem);
            if ctx.unify(source_elem, elem).is_err() {
                ctx.error(format!(
                    "channel {source} value type {source_name} does not match channel {name} value type {elem_name}"
                ));
            }
        },
        Endpoint::Expr { ty } => {
            let ty_name = ctx.humanize(ty);
            if ctx.unify(ty, elem).is_err() {
                ctx.error(format!(
                    "expression type {ty_name} does not match channel {name} value type {elem_name}"
                ));
            }
        },
        Endpoint::Func {
            name: source,
            func: source_func,
        } => {
            let Some(output) = single_output(ctx, source, source_func) else {
                return;
            };
            let output_name = ctx.humanize(output);
            if ctx.unify(output, elem).is_err() {
                ctx.error(format!(
                    "return type {output_name} of {source} does not match channel {name} value type {elem_name}"
                ));
            }
        },
    }
}

// ============================================================================
// ROUTING TABLES
// ============================================================================

/// The func invoked by `node`, without reporting anything
fn invoked<'n, N: ?Sized>(ctx: &Context<'_, N>, node: &'n FlowNode) -> Option<Invoked<'n>> {
    let lookup = |name: &Ident| match ctx.scope.resolve(&name.name) {
        Ok(symbol) => match symbol.ty {
            Type::Function(func) => Some(func),
            _ => None,
        },
        Err(_) => None,
    };
    match &node.kind {
        FlowNodeKind::Call { name, .. } => Some(Invoked {
            name,
            func: lookup(name),
        }),
        FlowNodeKind::Identifier(name) => lookup(name).map(|func| Invoked {
            name,
            func: Some(func),
        }),
        FlowNodeKind::Expr(_) | FlowNodeKind::Routing(_) => None,
    }
}

fn analyze_output_table(ctx: &Context<'_, RoutingTable>, before: &[FlowNode], after: &[FlowNode]) {
    let Some(source) = before.iter().rev().find_map(|n| invoked(ctx, n)) else {
        ctx.error("output routing table must follow a func invocation");
        return;
    };
    // Resolution failures were reported by the chain.
    let Some(func) = &source.func else {
        return;
    };
    if !func.has_named_outputs() {
        ctx.error(format!(
            "func '{}' does not have named outputs, cannot use routing table",
            source.name.name
        ));
        return;
    }
    let next = after.iter().find_map(|n| invoked(ctx, n));
    for entry in &ctx.ast.entries {
        analyze_output_entry(&ctx.child(entry), &source.name.name, func, next.as_ref());
    }
}

fn analyze_output_entry(
    ctx: &Context<'_, RoutingEntry>,
    source: &str,
    func: &FunctionType,
    next: Option<&Invoked<'_>>,
) {
    let entry = ctx.ast;
    let output_name = &entry.name.name;
    let Some(output) = func.outputs.iter().find(|p| &p.name == output_name) else {
        ctx.error_at(
            &entry.name,
            format!("func '{source}' does not have output '{output_name}'"),
        );
        return;
    };

    let mut mapped = None;
    if let Some(param) = &entry.param {
        let Some(next) = next else {
            ctx.error_at(param, "parameter mapping requires a func after the routing table");
            return;
        };
        let Some(next_func) = &next.func else {
            return;
        };
        let Some(input) = next_func.inputs.iter().find(|p| p.name == param.name) else {
            ctx.error_at(
                param,
                format!("func '{}' does not have parameter '{}'", next.name.name, param.name),
            );
            return;
        };
        mapped = Some(input);
    }

    let mut flowing = Some(output.ty.clone());
    for (i, node) in entry.nodes.iter().enumerate() {
        let target = if i + 1 == entry.nodes.len() { mapped } else { None };
        flowing = route_target(&ctx.child(node), flowing.as_ref(), target);
    }
}

fn analyze_input_table(ctx: &Context<'_, RoutingTable>, after: &[FlowNode]) {
    let Some(next) = after.iter().find_map(|n| invoked(ctx, n)) else {
        ctx.error("input routing table must precede a func invocation");
        return;
    };
    let Some(func) = &next.func else {
        return;
    };
    for entry in &ctx.ast.entries {
        analyze_input_entry(&ctx.child(entry), next.name, func);
    }
}

fn analyze_input_entry(ctx: &Context<'_, RoutingEntry>, func_name: &Ident, func: &FunctionType) {
    let entry = ctx.ast;
    let Some((last, chain)) = entry.nodes.split_last() else {
        ctx.error("routing entry must have at least one target");
        return;
    };
    let FlowNodeKind::Identifier(param_name) = &last.kind else {
        ctx.error_at(
            last,
            "last element in input routing entry must be a parameter name (identifier)",
        );
        return;
    };
    let Some(param) = func.inputs.iter().find(|p| p.name == param_name.name) else {
        ctx.error_at(
            param_name,
            format!("func '{}' does not have parameter '{}'", func_name.name, param_name.name),
        );
        return;
    };

    let mut flowing = source_channel(ctx, &entry.name);
    for node in chain {
        flowing = route_target(&ctx.child(node), flowing.as_ref(), None);
    }
    let Some(flowing) = flowing else {
        return;
    };
    let (got, expected) = (ctx.humanize(&flowing), ctx.humanize(&param.ty));
    if ctx.unify(&flowing, &param.ty).is_err() {
        ctx.error_at(
            param_name,
            format!(
                "type mismatch: output type {got} does not match func {} parameter {} type {expected}",
                func_name.name, param.name
            ),
        );
    }
}

/// Value type of the channel feeding an input routing entry
fn source_channel(ctx: &Context<'_, RoutingEntry>, name: &Ident) -> Option<Type> {
    let symbol = match ctx.scope.resolve(&name.name) {
        Ok(symbol) => symbol,
        Err(err) => {
            ctx.error_code_at(err.code(), name, &err);
            return None;
        },
    };
    if symbol.kind != SymbolKind::Channel {
        ctx.error_at(name, format!("{} is not a channel", name.name));
        return None;
    }
    symbol.ty.element().cloned()
}

/// Check one node of a routing entry fed a value of type `flowing`.
///
/// Returns the type the node passes on. `mapped` is the input of the func
/// after the table that the last node of an entry feeds.
fn route_target(
    ctx: &Context<'_, FlowNode>,
    flowing: Option<&Type>,
    mapped: Option<&Param>,
) -> Option<Type> {
    match &ctx.ast.kind {
        FlowNodeKind::Call { name, config } => route_to_func(ctx, name, Some(config), flowing, mapped),
        FlowNodeKind::Identifier(ident) => {
            let symbol = match ctx.scope.resolve(&ident.name) {
                Ok(symbol) => symbol,
                Err(err) => {
                    ctx.error_code_at(err.code(), ident, &err);
                    return None;
                },
            };
            match symbol.kind {
                SymbolKind::Function => route_to_func(ctx, ident, None, flowing, mapped),
                SymbolKind::Channel => {
                    let elem = symbol.ty.element().cloned().unwrap_or(Type::Invalid);
                    if let Some(flowing) = flowing {
                        let (got, elem_name) = (ctx.humanize(flowing), ctx.humanize(&elem));
                        if ctx.unify(flowing, &elem).is_err() {
                            ctx.error(format!(
                                "type mismatch: output type {got} does not match channel {} value type {elem_name}",
                                ident.name
                            ));
                        }
                    }
                    Some(elem)
                },
                // Sequences accept any value as an activation signal.
                SymbolKind::Sequence => None,
                _ => {
                    ctx.error_at(ident, format!("{} is not a channel or sequence", ident.name));
                    None
                },
            }
        },
        FlowNodeKind::Expr(expr) => Some(analyze_expression(&ctx.child(expr).with_type_hint(None))),
        FlowNodeKind::Routing(table) => {
            ctx.child(table).error("unexpected routing table configuration");
            None
        },
    }
}

fn route_to_func(
    ctx: &Context<'_, FlowNode>,
    name: &Ident,
    config: Option<&ConfigValues>,
    flowing: Option<&Type>,
    mapped: Option<&Param>,
) -> Option<Type> {
    let Some(Endpoint::Func { func, .. }) = invocation(ctx, name, config, None) else {
        return None;
    };
    if let (Some(flowing), Some(param)) = (flowing, func.inputs.first()) {
        let (got, expected) = (ctx.humanize(flowing), ctx.humanize(&param.ty));
        if ctx.unify(flowing, &param.ty).is_err() {
            ctx.error(format!(
                "type mismatch: output type {got} does not match func {} parameter type {expected}",
                name.name
            ));
        }
    }

    let output = func.return_type().cloned();
    let Some(target) = mapped else {
        return output;
    };
    if func.has_named_outputs() {
        ctx.error(format!(
            "func '{}' has named outputs and requires explicit output selection",
            name.name
        ));
        return None;
    }
    if let Some(output) = &output {
        let (got, expected) = (ctx.humanize(output), ctx.humanize(&target.ty));
        if ctx.unify(output, &target.ty).is_err() {
            ctx.error(format!(
                "type mismatch: func {} output type {got} does not match target parameter {} type {expected}",
                name.name, target.name
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use crate::test_util::{analyze_with_channels, assert_clean, messages};
    use crate::types::Type;
    use arcc_util::ErrorCode;

    fn channels() -> [(&'static str, u32, Type); 5] {
        [
            ("sensor", 1, Type::F64),
            ("valve", 2, Type::F64),
            ("count", 3, Type::I32),
            ("label", 4, Type::Str),
            ("alarm", 5, Type::U8),
        ]
    }

    fn check(source: &str) -> Vec<String> {
        messages(&analyze_with_channels(source, &channels()))
    }

    #[test]
    fn test_channel_through_functions() {
        let source = "func scale{k f64 = 2.0}(v f64) f64 { return v * k }\n\
                      func clamp(v f64) f64 { return v }\n\
                      sensor -> scale{k=3.0} -> clamp -> valve";
        assert_clean(&analyze_with_channels(source, &channels()));
    }

    #[test]
    fn test_channel_to_channel() {
        assert!(check("sensor -> valve").is_empty());
        assert_eq!(
            check("sensor -> count"),
            ["channel sensor value type f64 does not match channel count value type i32"]
        );
    }

    #[test]
    fn test_expression_source() {
        assert!(check("sensor > 10 -> alarm").is_empty());
        assert!(check("2 -> count").is_empty());
        assert_eq!(
            check("\"x\" -> valve"),
            ["expression type str does not match channel valve value type f64"]
        );
    }

    #[test]
    fn test_channel_into_function_parameter() {
        assert_eq!(
            check("func f(v i32) i32 { return v }\nlabel -> f -> count"),
            ["channel label value type str does not match func f parameter type i32"]
        );
    }

    #[test]
    fn test_function_to_function() {
        let source = "func a(v f64) str { return \"s\" }\nfunc b(v f64) f64 { return v }\n\
                      sensor -> a -> b -> valve";
        assert_eq!(
            check(source),
            ["return type str of a is not equal to argument type f64 of b"]
        );

        let source = "func a(v f64) f64 { return v }\nfunc two(x f64, y f64) f64 { return x }\n\
                      sensor -> a -> two";
        assert_eq!(check(source), ["two has more than one parameter"]);
    }

    #[test]
    fn test_function_to_channel() {
        let source = "func a(v f64) str { return \"s\" }\nsensor -> a -> valve";
        assert_eq!(
            check(source),
            ["return type str of a does not match channel valve value type f64"]
        );
    }

    #[test]
    fn test_named_outputs_need_routing() {
        let source = "func split(v f64) (hi f64, lo f64) {}\nsensor -> split -> valve";
        assert_eq!(
            check(source),
            ["func 'split' has named outputs and requires a routing table"]
        );
    }

    #[test]
    fn test_function_without_inputs() {
        let source = "func tick() f64 { return 1.0 }\nsensor -> tick\ntick -> valve";
        assert_eq!(check(source), ["func 'tick' has no input parameters"]);
    }

    #[test]
    fn test_config_checks() {
        let decl = "func f{need f64 opt i32 = 1}(v f64) f64 { return v }\n";
        assert_eq!(
            check(&format!("{decl}sensor -> f{{bogus=1}} -> valve")),
            [
                "unknown config parameter 'bogus' for func 'f'",
                "missing required config parameter 'need' for func 'f'",
            ]
        );

        let result = analyze_with_channels(
            &format!("{decl}sensor -> f{{need=\"x\"}} -> valve"),
            &channels(),
        );
        let diag = result.diagnostics.errors().next().unwrap();
        assert_eq!(
            diag.message,
            "type mismatch: config parameter 'need' expects f64 but got str"
        );
        assert_eq!(diag.code, Some(ErrorCode::FuncArgType));

        let result = analyze_with_channels(&format!("{decl}sensor -> f -> valve"), &channels());
        let diag = result.diagnostics.errors().next().unwrap();
        assert_eq!(diag.code, Some(ErrorCode::FuncArgCount));

        assert_eq!(
            check(&format!("{decl}sensor -> f{{1.0}} -> valve")),
            ["anonymous configuration values are not supported"]
        );
    }

    #[test]
    fn test_resolution_failures() {
        assert_eq!(check("ghost -> valve"), ["undefined symbol: ghost"]);
        assert_eq!(
            check("func f(v f64) f64 { return v }\nsensor -> valve{x=1}"),
            ["valve is not a function"]
        );
        assert_eq!(
            check("sequence main { stage s { sensor -> valve } }\nmain -> valve"),
            ["main is not a channel"]
        );
    }

    #[test]
    fn test_sequence_as_sink() {
        assert!(check("sequence main { stage s { sensor -> valve } }\nsensor > 5 -> main").is_empty());
    }

    #[test]
    fn test_inferred_function_in_flow() {
        let source = "func double(v f64) { return v * 2 }\nsensor -> double -> valve";
        assert!(check(source).is_empty());
    }

    const SPLIT: &str = "func split{limit f64 = 100.0}(v f64) (high f64, low f64) {}\n\
                         func join(a f64, b f64) f64 { return a + b }\n\
                         func scale(v f64) f64 { return v }\n";

    fn check_routed(flows: &str) -> Vec<String> {
        check(&format!("{SPLIT}{flows}"))
    }

    #[test]
    fn test_output_routing_table() {
        let source = format!(
            "{SPLIT}sensor -> split{{limit=50.0}} -> {{\n  high: scale -> valve,\n  low: valve\n}}"
        );
        assert_clean(&analyze_with_channels(&source, &channels()));
        assert!(check_routed("sensor -> split -> { high: 2.0, low: scale{} }").is_empty());
    }

    #[test]
    fn test_output_routing_type_mismatch() {
        assert_eq!(
            check_routed("sensor -> split -> { high: count }"),
            ["type mismatch: output type f64 does not match channel count value type i32"]
        );
        assert_eq!(
            check_routed("func whole(v i32) i32 { return v }\nsensor -> split -> { low: whole }"),
            ["type mismatch: output type f64 does not match func whole parameter type i32"]
        );
        assert_eq!(
            check_routed("func word(v f64) str { return \"s\" }\nsensor -> split -> { low: word -> valve }"),
            ["type mismatch: output type str does not match channel valve value type f64"]
        );
    }

    #[test]
    fn test_output_routing_requires_named_outputs() {
        assert_eq!(
            check_routed("sensor -> { high: valve }"),
            ["output routing table must follow a func invocation"]
        );
        assert_eq!(
            check_routed("sensor -> scale -> { high: valve }"),
            ["func 'scale' does not have named outputs, cannot use routing table"]
        );
        assert_eq!(
            check_routed("sensor -> split -> { middle: valve }"),
            ["func 'split' does not have output 'middle'"]
        );
    }

    #[test]
    fn test_routed_func_config_checked() {
        let flows = "func gate{limit f64}(v f64) f64 { return v }\n\
                     sensor -> split -> { high: gate{limit=2.0} -> valve, low: gate -> valve }";
        assert_eq!(
            check_routed(flows),
            ["missing required config parameter 'limit' for func 'gate'"]
        );
    }

    #[test]
    fn test_routing_parameter_mapping() {
        assert!(check_routed("sensor -> split -> { high: valve: a, low: scale: b } -> join -> valve").is_empty());
        assert_eq!(
            check_routed("sensor -> split -> { high: valve: c } -> join"),
            ["func 'join' does not have parameter 'c'"]
        );
        assert_eq!(
            check_routed("sensor -> split -> { high: valve: a }"),
            ["parameter mapping requires a func after the routing table"]
        );
    }

    #[test]
    fn test_routing_parameter_mapping_types() {
        assert_eq!(
            check_routed("func word(v f64) str { return \"s\" }\nsensor -> split -> { high: word: a } -> join"),
            ["type mismatch: func word output type str does not match target parameter a type f64"]
        );
        assert_eq!(
            check_routed("sensor -> split -> { high: split: a } -> join"),
            ["func 'split' has named outputs and requires explicit output selection"]
        );
    }

    #[test]
    fn test_routing_to_sequence() {
        let flows = "sequence main { stage s { sensor -> valve } }\n\
                     sensor -> split -> { high: main, low: valve }";
        assert!(check_routed(flows).is_empty());
        assert_eq!(
            check_routed("sensor -> split -> { high: join{} -> 1 -> valve, low: nope }"),
            ["undefined symbol: nope"]
        );
    }

    #[test]
    fn test_input_routing_table() {
        assert!(check_routed("{ sensor: a, valve: scale -> b } -> join -> valve").is_empty());
        assert_eq!(
            check_routed("{ label: a } -> join"),
            ["type mismatch: output type str does not match func join parameter a type f64"]
        );
        assert_eq!(check_routed("{ sensor: c } -> join"), ["func 'join' does not have parameter 'c'"]);
        assert_eq!(
            check_routed("{ sensor: 1 + 2 } -> join"),
            ["last element in input routing entry must be a parameter name (identifier)"]
        );
        assert_eq!(
            check_routed("{ sensor: a } -> valve"),
            ["input routing table must precede a func invocation"]
        );
        assert_eq!(check_routed("{ scale: a } -> join"), ["scale is not a channel"]);
    }

    #[test]
    fn test_one_routing_table_per_flow() {
        assert_eq!(
            check_routed("sensor -> split -> { high: valve } -> join -> { low: valve }"),
            [
                "unexpected routing table configuration",
                "unexpected routing table configuration",
            ]
        );
    }
}
