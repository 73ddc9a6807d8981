//! Scope chain and symbols
//!
//! Scopes are persistent: [`Scope::add`] returns a new scope sharing its
//! parent chain with the receiver, so a caller holding the old value never
//! observes the addition. Statements thread the returned scope forward,
//! which gives declaration-order visibility for free.
//!
//! ```text
//!   root (functions, sequences) ──▶ host resolver (channels)
//!    └─ function (config, inputs, outputs)
//!        └─ block (locals)
//!            └─ block (locals)
//! ```

use crate::types::Type;
use arcc_util::{ErrorCode, Span};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// What a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Host channel
    Channel,
    /// Local variable
    Variable,
    /// `$=` variable, persists across invocations
    StatefulVariable,
    /// Function config parameter
    Config,
    /// Function input
    Input,
    /// Named function output
    Output,
    /// Function declaration
    Function,
    /// Sequence declaration
    Sequence,
    /// Stage inside a sequence
    Stage,
}

impl SymbolKind {
    /// Lowercase name used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Channel => "channel",
            SymbolKind::Variable => "variable",
            SymbolKind::StatefulVariable => "stateful variable",
            SymbolKind::Config => "config",
            SymbolKind::Input => "input",
            SymbolKind::Output => "output",
            SymbolKind::Function => "function",
            SymbolKind::Sequence => "sequence",
            SymbolKind::Stage => "stage",
        }
    }

    /// True for names a statement may assign to
    pub fn is_assignable(self) -> bool {
        matches!(
            self,
            SymbolKind::Channel
                | SymbolKind::Variable
                | SymbolKind::StatefulVariable
                | SymbolKind::Output
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved name
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Declared name
    pub name: String,
    /// What the name refers to
    pub kind: SymbolKind,
    /// Type of the value; `Function` for functions
    pub ty: Type,
    /// Identifier, unique per analysis for declared symbols and stable per
    /// channel table for channels
    pub id: u32,
    /// Declaration site; dummy for host symbols
    pub span: Span,
}

impl Symbol {
    /// Create a symbol
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: Type, id: u32, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            id,
            span,
        }
    }
}

/// Name lookup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// Name not found in any enclosing scope
    #[error("undefined symbol: {name}")]
    Undefined {
        /// Looked-up name
        name: String,
    },
    /// Name already declared in the same scope
    #[error("name {name} conflicts with existing symbol at line {line}, col {col}")]
    Redefined {
        /// Declared name
        name: String,
        /// Line of the existing declaration
        line: u32,
        /// Column of the existing declaration
        col: u32,
    },
}

impl ScopeError {
    /// Diagnostic code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            ScopeError::Undefined { .. } => ErrorCode::SymbolUndefined,
            ScopeError::Redefined { .. } => ErrorCode::SymbolRedefined,
        }
    }
}

/// Source of symbols declared outside the program
pub trait Resolver {
    /// Look up a host symbol
    fn resolve(&self, name: &str) -> Option<Symbol>;
}

impl Resolver for FxHashMap<String, Symbol> {
    fn resolve(&self, name: &str) -> Option<Symbol> {
        self.get(name).cloned()
    }
}

impl Resolver for IndexMap<String, Symbol> {
    fn resolve(&self, name: &str) -> Option<Symbol> {
        self.get(name).cloned()
    }
}

/// A channel known to the host
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    /// Channel key
    pub id: u32,
    /// Type of the values carried
    pub elem: Type,
}

/// Host channel table
///
/// # Examples
///
/// ```
/// use arcc_sem::{Channels, Resolver, SymbolKind, Type};
///
/// let channels = Channels::new().with("valve", 100, Type::F64);
/// let sym = channels.resolve("valve").unwrap();
/// assert_eq!(sym.kind, SymbolKind::Channel);
/// assert_eq!(sym.ty, Type::chan(Type::F64));
/// assert!(channels.resolve("vent").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channels {
    entries: IndexMap<String, ChannelInfo>,
}

impl Channels {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a channel
    pub fn insert(&mut self, name: impl Into<String>, id: u32, elem: Type) {
        self.entries.insert(name.into(), ChannelInfo { id, elem });
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, id: u32, elem: Type) -> Self {
        self.insert(name, id, elem);
        self
    }

    /// Channel by name
    pub fn get(&self, name: &str) -> Option<&ChannelInfo> {
        self.entries.get(name)
    }

    /// Channels in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelInfo)> {
        self.entries.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolver for Channels {
    fn resolve(&self, name: &str) -> Option<Symbol> {
        self.entries.get(name).map(|info| {
            Symbol::new(
                name,
                SymbolKind::Channel,
                Type::chan(info.elem.clone()),
                info.id,
                Span::DUMMY,
            )
        })
    }
}

/// What introduced a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Program level
    Root,
    /// Function parameters
    Function,
    /// `{ ... }` inside a function
    Block,
    /// Stages of a sequence
    Sequence,
    /// Flows of a stage
    Stage,
}

#[derive(Clone)]
struct ScopeData {
    kind: ScopeKind,
    symbols: IndexMap<String, Symbol>,
    parent: Option<Scope>,
    resolver: Option<Rc<dyn Resolver>>,
    owner: Option<Symbol>,
}

/// Persistent lexical scope
#[derive(Clone)]
pub struct Scope(Rc<ScopeData>);

impl Scope {
    /// A root scope, optionally backed by host symbols
    pub fn root(resolver: Option<Rc<dyn Resolver>>) -> Scope {
        Scope(Rc::new(ScopeData {
            kind: ScopeKind::Root,
            symbols: IndexMap::new(),
            parent: None,
            resolver,
            owner: None,
        }))
    }

    /// An empty scope nested in this one
    pub fn child(&self, kind: ScopeKind) -> Scope {
        self.nested(kind, None)
    }

    /// An empty scope nested in this one, introduced by `owner`
    pub fn child_owned(&self, kind: ScopeKind, owner: Symbol) -> Scope {
        self.nested(kind, Some(owner))
    }

    fn nested(&self, kind: ScopeKind, owner: Option<Symbol>) -> Scope {
        Scope(Rc::new(ScopeData {
            kind,
            symbols: IndexMap::new(),
            parent: Some(self.clone()),
            resolver: None,
            owner,
        }))
    }

    /// What introduced this scope
    pub fn kind(&self) -> ScopeKind {
        self.0.kind
    }

    /// The symbol that introduced this scope, if any
    pub fn owner(&self) -> Option<&Symbol> {
        self.0.owner.as_ref()
    }

    /// The closest scope of `kind`, starting with this one
    pub fn enclosing(&self, kind: ScopeKind) -> Option<&Scope> {
        let mut scope = Some(self);
        while let Some(s) = scope {
            if s.kind() == kind {
                return Some(s);
            }
            scope = s.0.parent.as_ref();
        }
        None
    }

    /// A scope containing `symbol` in addition to this scope's symbols.
    ///
    /// Fails if the name is already declared in this very scope; names from
    /// enclosing scopes or the host may be shadowed.
    pub fn add(&self, symbol: Symbol) -> Result<Scope, ScopeError> {
        let mut next = self.clone();
        next.declare(symbol)?;
        Ok(next)
    }

    /// Declare `symbol` in this scope in place.
    ///
    /// Other handles to the scope keep their symbols: the table is copied
    /// only while it is shared, so a scope held by one owner grows without
    /// copying.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), ScopeError> {
        if let Some(existing) = self.0.symbols.get(&symbol.name) {
            return Err(ScopeError::Redefined {
                name: symbol.name,
                line: existing.span.start.line,
                col: existing.span.start.col,
            });
        }
        Rc::make_mut(&mut self.0)
            .symbols
            .insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Find `name` here, in an enclosing scope, or in the host resolver
    pub fn resolve(&self, name: &str) -> Result<Symbol, ScopeError> {
        let mut scope = Some(self);
        while let Some(s) = scope {
            if let Some(symbol) = s.0.symbols.get(name) {
                return Ok(symbol.clone());
            }
            if s.0.parent.is_none() {
                if let Some(symbol) = s.0.resolver.as_ref().and_then(|r| r.resolve(name)) {
                    return Ok(symbol);
                }
            }
            scope = s.0.parent.as_ref();
        }
        Err(ScopeError::Undefined {
            name: name.to_string(),
        })
    }

    /// Find `name` in this scope only
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.0.symbols.get(name)
    }

    /// Symbols declared in this scope, in declaration order
    pub fn local_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.0.symbols.values()
    }

    /// Number of enclosing scopes
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.0.parent.as_ref();
        while let Some(s) = scope {
            depth += 1;
            scope = s.0.parent.as_ref();
        }
        depth
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("kind", &self.0.kind)
            .field("symbols", &self.0.symbols.keys().collect::<Vec<_>>())
            .field("depth", &self.depth())
            .finish()
    }
}
