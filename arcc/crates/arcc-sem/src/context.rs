//! Analysis context
//!
//! A [`Context`] is the cursor the walker carries through the tree. It
//! combines two kinds of state:
//!
//! - A shared [`Session`] behind an `Rc`: diagnostics, the constraint
//!   system, the type map, the symbol-id counter and the cancellation token.
//!   Every context derived from the same root writes into the same session.
//! - Value fields copied into every derived context: the current scope, the
//!   AST node, the type hint and the inference flag. Changing them on a
//!   derived context never affects its parent.
//!
//! ```text
//!   root ctx ──child(item)──▶ item ctx ──with_scope(s)──▶ body ctx
//!       │                         │                           │
//!       └──────────── Rc<Session> (shared) ───────────────────┘
//! ```

use crate::constraints::{ConstraintSystem, UnifyError};
use crate::scope::{Resolver, Scope};
use crate::types::{Constraint, Type};
use arcc_par::{NodeId, Program};
use arcc_util::{CancellationToken, Diagnostic, Diagnostics, ErrorCode, Severity, Span, Spanned};
use rustc_hash::FxHashMap;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Inferred type of every analyzed expression, keyed by node id
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    types: FxHashMap<NodeId, Type>,
}

impl TypeMap {
    /// Type recorded for `id`
    pub fn get(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }

    /// Record or overwrite the type of `id`
    pub fn insert(&mut self, id: NodeId, ty: Type) {
        self.types.insert(id, ty);
    }

    /// Number of recorded nodes
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every entry, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Type)> {
        self.types.iter().map(|(id, ty)| (*id, ty))
    }

    /// Apply `f` to every recorded type
    pub fn rewrite(&mut self, mut f: impl FnMut(&Type) -> Type) {
        for ty in self.types.values_mut() {
            *ty = f(ty);
        }
    }
}

/// State shared by every context of one analysis
#[derive(Debug, Default)]
pub struct Session {
    diagnostics: RefCell<Diagnostics>,
    constraints: RefCell<ConstraintSystem>,
    types: RefCell<TypeMap>,
    next_symbol: Cell<u32>,
    token: CancellationToken,
}

impl Session {
    /// A fresh session polling `token`
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Diagnostics reported so far
    pub fn diagnostics(&self) -> Ref<'_, Diagnostics> {
        self.diagnostics.borrow()
    }

    /// Inferred expression types
    pub fn types(&self) -> Ref<'_, TypeMap> {
        self.types.borrow()
    }

    /// The constraint system
    pub fn constraints(&self) -> Ref<'_, ConstraintSystem> {
        self.constraints.borrow()
    }

    pub(crate) fn constraints_mut(&self) -> RefMut<'_, ConstraintSystem> {
        self.constraints.borrow_mut()
    }

    pub(crate) fn types_mut(&self) -> RefMut<'_, TypeMap> {
        self.types.borrow_mut()
    }

    /// Add a diagnostic directly, bypassing inference-mode suppression
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().add(diagnostic);
    }

    /// The cancellation token this session polls
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    fn next_symbol_id(&self) -> u32 {
        let id = self.next_symbol.get();
        self.next_symbol.set(id + 1);
        id
    }
}

/// Cursor over one AST node
pub struct Context<'a, N: ?Sized> {
    session: Rc<Session>,
    /// Scope visible at this node
    pub scope: Scope,
    /// The node being analyzed
    pub ast: &'a N,
    /// Type expected by the parent, if any
    pub type_hint: Option<Type>,
    /// Set while probing function bodies for their output type
    pub in_type_inference: bool,
}

impl<N: ?Sized> Clone for Context<'_, N> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
            scope: self.scope.clone(),
            ast: self.ast,
            type_hint: self.type_hint.clone(),
            in_type_inference: self.in_type_inference,
        }
    }
}

impl<N: ?Sized> fmt::Debug for Context<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("scope", &self.scope)
            .field("type_hint", &self.type_hint)
            .field("in_type_inference", &self.in_type_inference)
            .finish_non_exhaustive()
    }
}

impl<'a> Context<'a, Program> {
    /// Root context for `program` with a fresh session
    pub fn create_root(
        token: CancellationToken,
        program: &'a Program,
        resolver: Option<Rc<dyn Resolver>>,
    ) -> Self {
        Self {
            session: Rc::new(Session::new(token)),
            scope: Scope::root(resolver),
            ast: program,
            type_hint: None,
            in_type_inference: false,
        }
    }
}

impl<'a, N: ?Sized> Context<'a, N> {
    /// The shared session
    pub fn session(&self) -> &Rc<Session> {
        &self.session
    }

    /// Same session, scope and flags; new node
    pub fn child<'b, M: ?Sized>(&self, node: &'b M) -> Context<'b, M> {
        Context {
            session: Rc::clone(&self.session),
            scope: self.scope.clone(),
            ast: node,
            type_hint: self.type_hint.clone(),
            in_type_inference: self.in_type_inference,
        }
    }

    /// Copy with a different scope
    pub fn with_scope(&self, scope: Scope) -> Self {
        Self {
            scope,
            ..self.clone()
        }
    }

    /// Copy with a different type hint
    pub fn with_type_hint(&self, type_hint: Option<Type>) -> Self {
        Self {
            type_hint,
            ..self.clone()
        }
    }

    /// Copy with inference mode switched on or off
    pub fn with_inference_mode(&self, in_type_inference: bool) -> Self {
        Self {
            in_type_inference,
            ..self.clone()
        }
    }

    /// True once the session's token was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.session.token.is_cancelled()
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    fn emit(&self, severity: Severity, code: Option<ErrorCode>, span: Span, message: &dyn fmt::Display) {
        if self.in_type_inference {
            return;
        }
        let diagnostic = Diagnostic::new(severity, message, Some(span));
        let diagnostic = match code {
            Some(code) => diagnostic.with_code(code),
            None => diagnostic,
        };
        self.session.report(diagnostic);
    }

    /// Error at `node`
    pub fn error_at(&self, node: &impl Spanned, message: impl fmt::Display) {
        self.emit(Severity::Error, None, node.span(), &message);
    }

    /// Coded error at `node`
    pub fn error_code_at(&self, code: ErrorCode, node: &impl Spanned, message: impl fmt::Display) {
        self.emit(Severity::Error, Some(code), node.span(), &message);
    }

    /// Warning at `node`
    pub fn warning_at(&self, node: &impl Spanned, message: impl fmt::Display) {
        self.emit(Severity::Warning, None, node.span(), &message);
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    /// Allocate a type variable
    pub fn fresh(&self, constraint: Option<Constraint>) -> Type {
        self.session.constraints_mut().fresh(constraint)
    }

    /// Unify two types in the shared system
    pub fn unify(&self, a: &Type, b: &Type) -> Result<(), UnifyError> {
        self.session.constraints_mut().unify(a, b)
    }

    /// Substitute bound variables
    pub fn resolve(&self, ty: &Type) -> Type {
        self.session.constraints().resolve(ty)
    }

    /// Render a type for a diagnostic
    pub fn humanize(&self, ty: &Type) -> String {
        self.session.constraints().humanize(ty)
    }

    /// Record the type of a node; ignored in inference mode
    pub fn record_type(&self, id: NodeId, ty: &Type) {
        if !self.in_type_inference {
            self.session.types_mut().insert(id, ty.clone());
        }
    }

    /// Allocate a symbol id
    pub fn new_symbol_id(&self) -> u32 {
        self.session.next_symbol_id()
    }
}

impl<N: Spanned + ?Sized> Context<'_, N> {
    /// Error at the current node
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Severity::Error, None, self.ast.span(), &message);
    }

    /// Coded error at the current node
    pub fn error_code(&self, code: ErrorCode, message: impl fmt::Display) {
        self.emit(Severity::Error, Some(code), self.ast.span(), &message);
    }

    /// Warning at the current node
    pub fn warning(&self, message: impl fmt::Display) {
        self.emit(Severity::Warning, None, self.ast.span(), &message);
    }

    /// Informational message at the current node
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Severity::Info, None, self.ast.span(), &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{ScopeKind, Symbol, SymbolKind};
    use arcc_par::parse;

    fn program() -> Program {
        parse("func f() {}").0
    }

    #[test]
    fn test_child_shares_session_not_values() {
        let program = program();
        let root = Context::create_root(CancellationToken::new(), &program, None);
        let item = root.child(&program.items[0]).with_type_hint(Some(Type::F32));
        let scope = root
            .scope
            .child(ScopeKind::Block)
            .add(Symbol::new("x", SymbolKind::Variable, Type::I8, 0, Span::DUMMY))
            .unwrap();
        let inner = item.with_scope(scope);

        assert!(root.type_hint.is_none());
        assert!(root.scope.resolve("x").is_err());
        assert!(inner.scope.resolve("x").is_ok());
        assert_eq!(inner.type_hint, Some(Type::F32));

        inner.error("from inner");
        assert_eq!(root.session().diagnostics().len(), 1);
        assert!(Rc::ptr_eq(root.session(), inner.session()));
    }

    #[test]
    fn test_inference_mode_suppresses_output() {
        let program = program();
        let root = Context::create_root(CancellationToken::new(), &program, None);
        let inferring = root.with_inference_mode(true);
        inferring.error("hidden");
        inferring.record_type(program.id, &Type::U8);
        assert!(root.session().diagnostics().is_empty());
        assert!(root.session().types().is_empty());

        // Unification still happens in the shared system.
        let var = inferring.fresh(None);
        inferring.unify(&var, &Type::U8).unwrap();
        assert_eq!(root.resolve(&var), Type::U8);
        assert!(!root.in_type_inference);
    }

    #[test]
    fn test_symbol_ids_are_unique_across_children() {
        let program = program();
        let root = Context::create_root(CancellationToken::new(), &program, None);
        let child = root.child(&program.items[0]);
        let ids = [root.new_symbol_id(), child.new_symbol_id(), root.new_symbol_id()];
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn test_cancellation_is_visible() {
        let program = program();
        let token = CancellationToken::new();
        let root = Context::create_root(token.clone(), &program, None);
        assert!(!root.is_cancelled());
        token.cancel();
        assert!(root.child(&program.items[0]).is_cancelled());
    }

    #[test]
    fn test_coded_error_at_node() {
        let program = program();
        let root = Context::create_root(CancellationToken::new(), &program, None);
        root.error_code_at(ErrorCode::SymbolUndefined, &program.items[0], "undefined symbol: g");
        let diags = root.session().diagnostics();
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.code, Some(ErrorCode::SymbolUndefined));
        assert_eq!(diag.start.line, 1);
    }
}
