//! arcc-par - AST Node Definitions
//!
//! Every node that the analyzer may attach information to carries a
//! [`NodeId`] assigned by the parser in source order, plus the [`Span`] it
//! covers. Top-level items, statements, expressions and flow nodes are all
//! closed enums.

use arcc_lex::PrimitiveType;
use arcc_util::{define_idx, Span, Spanned};

define_idx!(
    /// Identifier of an AST node, unique within one parse
    NodeId
);

/// A node of the syntax tree
pub trait AstNode: Spanned {
    /// Parser-assigned identity
    fn id(&self) -> NodeId;
}

macro_rules! impl_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Spanned for $ty {
                fn span(&self) -> Span {
                    self.span
                }
            }

            impl AstNode for $ty {
                fn id(&self) -> NodeId {
                    self.id
                }
            }
        )*
    };
}

impl_node!(
    Program,
    AuthorityBlock,
    AuthorityEntry,
    FunctionDecl,
    Param,
    Block,
    Stmt,
    Expr,
    FlowStatement,
    FlowNode,
    RoutingTable,
    RoutingEntry,
    ConfigValue,
    SequenceDecl,
    StageDecl,
);

/// A name as written in source
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    /// The name
    pub name: String,
    /// Where it was written
    pub span: Span,
}

impl Ident {
    /// Create an identifier
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// AST root
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    /// Node id
    pub id: NodeId,
    /// Whole-file span
    pub span: Span,
    /// Top-level items in source order
    pub items: Vec<Item>,
}

/// Top-level item
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// `authority ...`
    Authority(AuthorityBlock),
    /// `func name ... { }`
    Function(FunctionDecl),
    /// `a -> b -> c`
    Flow(FlowStatement),
    /// `sequence name { stage ... }`
    Sequence(SequenceDecl),
}

impl Item {
    /// Short description used in logs
    pub fn describe(&self) -> &'static str {
        match self {
            Item::Authority(_) => "authority",
            Item::Function(_) => "func",
            Item::Flow(_) => "flow",
            Item::Sequence(_) => "sequence",
        }
    }
}

impl Spanned for Item {
    fn span(&self) -> Span {
        match self {
            Item::Authority(a) => a.span,
            Item::Function(f) => f.span,
            Item::Flow(f) => f.span,
            Item::Sequence(s) => s.span,
        }
    }
}

impl AstNode for Item {
    fn id(&self) -> NodeId {
        match self {
            Item::Authority(a) => a.id,
            Item::Function(f) => f.id,
            Item::Flow(f) => f.id,
            Item::Sequence(s) => s.id,
        }
    }
}

// ============================================================================
// AUTHORITY
// ============================================================================

/// `authority 200` or `authority (200 valve 100)`
#[derive(Clone, Debug, PartialEq)]
pub struct AuthorityBlock {
    /// Node id
    pub id: NodeId,
    /// Span of the whole block
    pub span: Span,
    /// Which form was written
    pub kind: AuthorityKind,
}

/// The two authority forms
#[derive(Clone, Debug, PartialEq)]
pub enum AuthorityKind {
    /// `authority N`: a default value
    Simple {
        /// Declared value, unchecked
        value: u64,
        /// Span of the value literal
        value_span: Span,
    },
    /// `authority ( entries )`
    Grouped(Vec<AuthorityEntry>),
}

/// One entry of a grouped authority block
#[derive(Clone, Debug, PartialEq)]
pub struct AuthorityEntry {
    /// Node id
    pub id: NodeId,
    /// Span of the entry
    pub span: Span,
    /// Channel name, or `None` for a default entry
    pub channel: Option<Ident>,
    /// Declared value, unchecked
    pub value: u64,
    /// Span of the value literal
    pub value_span: Span,
}

// ============================================================================
// FUNCTIONS
// ============================================================================

/// `func name{config}(inputs) outputs { body }`
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    /// Node id
    pub id: NodeId,
    /// Span of the whole declaration
    pub span: Span,
    /// Function name
    pub name: Ident,
    /// Config parameters, in order
    pub config: Vec<Param>,
    /// Input parameters, in order
    pub inputs: Vec<Param>,
    /// Declared output, if any
    pub output: Option<OutputDecl>,
    /// Function body
    pub body: Block,
}

/// A named, typed parameter
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Node id
    pub id: NodeId,
    /// Span of the parameter
    pub span: Span,
    /// Parameter name
    pub name: Ident,
    /// Declared type
    pub ty: TypeExpr,
    /// Default value (config parameters only)
    pub default: Option<Expr>,
}

/// Declared function output
#[derive(Clone, Debug, PartialEq)]
pub enum OutputDecl {
    /// A single unnamed output: `func f() f64`
    Single(TypeExpr),
    /// Named outputs: `func f() (hi f64, lo f64)`
    Named(Vec<Param>),
}

/// A type as written in source
#[derive(Clone, Debug, PartialEq)]
pub struct TypeExpr {
    /// Span of the type
    pub span: Span,
    /// Shape of the type
    pub kind: TypeExprKind,
}

/// Shape of a written type
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExprKind {
    /// Scalar type
    Primitive(PrimitiveType),
    /// `chan T`
    Chan(Box<TypeExpr>),
    /// `series T`
    Series(Box<TypeExpr>),
}

impl Spanned for TypeExpr {
    fn span(&self) -> Span {
        self.span
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// `{ statements }`
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Node id
    pub id: NodeId,
    /// Span including braces
    pub span: Span,
    /// Statements in order
    pub stmts: Vec<Stmt>,
}

/// A statement
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    /// Node id
    pub id: NodeId,
    /// Span of the statement
    pub span: Span,
    /// What the statement does
    pub kind: StmtKind,
}

/// Statement forms
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `x := e`, `x T := e`, `x $= e`
    VarDecl(VarDecl),
    /// `x = e`
    Assign(Assign),
    /// `if c { } else if c { } else { }`
    If(IfStmt),
    /// `return` or `return e`
    Return(Option<Expr>),
    /// A bare expression, usually a call
    Expr(Expr),
}

/// Variable declaration
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    /// Declared name
    pub name: Ident,
    /// Explicit type, if written
    pub ty: Option<TypeExpr>,
    /// Initial value
    pub value: Expr,
    /// `$=` declarations persist across invocations
    pub stateful: bool,
}

/// Assignment to an existing name, or to one element of a series
#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    /// Assigned name
    pub target: Ident,
    /// `i` in `name[i] = value`
    pub index: Option<Expr>,
    /// New value
    pub value: Expr,
}

/// Conditional statement
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    /// Condition of the `if`
    pub condition: Expr,
    /// Taken when the condition holds
    pub then_block: Block,
    /// `else if` clauses in order
    pub else_ifs: Vec<ElseIf>,
    /// Final `else`
    pub else_block: Option<Block>,
}

/// `else if condition { block }`
#[derive(Clone, Debug, PartialEq)]
pub struct ElseIf {
    /// Condition
    pub condition: Expr,
    /// Body
    pub block: Block,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// An expression
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    /// Node id
    pub id: NodeId,
    /// Span of the expression
    pub span: Span,
    /// Expression form
    pub kind: ExprKind,
}

/// Expression forms
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Literal value
    Literal(Literal),
    /// Name reference
    Ident(String),
    /// `( e )`
    Paren(Box<Expr>),
    /// `-e`, `not e`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// `a op b`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// `f(args)`
    Call {
        /// Called function
        callee: Ident,
        /// Arguments in order
        args: Vec<Expr>,
    },
    /// `f64(e)`
    Cast {
        /// Target type
        target: PrimitiveType,
        /// Converted value
        value: Box<Expr>,
    },
    /// `s[i]`
    Index {
        /// Indexed value
        target: Box<Expr>,
        /// Index
        index: Box<Expr>,
    },
    /// `[a, b, c]`
    Series(Vec<Expr>),
}

/// Literal values
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// Unsigned integer
    Int(u64),
    /// Float
    Float(f64),
    /// String
    Str(String),
}

/// Prefix operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `not`
    Not,
}

/// Infix operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `^`
    Pow,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOp {
    /// Source spelling
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    /// `+ - * / % ^`
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Rem
                | BinaryOp::Pow
        )
    }

    /// `== != < <= > >=`
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    /// `and`, `or`
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

// ============================================================================
// FLOWS AND SEQUENCES
// ============================================================================

/// `node -> node -> ...`
#[derive(Clone, Debug, PartialEq)]
pub struct FlowStatement {
    /// Node id
    pub id: NodeId,
    /// Span of the whole chain
    pub span: Span,
    /// At least two nodes
    pub nodes: Vec<FlowNode>,
}

/// One node of a flow chain
#[derive(Clone, Debug, PartialEq)]
pub struct FlowNode {
    /// Node id
    pub id: NodeId,
    /// Span of the node
    pub span: Span,
    /// Node form
    pub kind: FlowNodeKind,
}

/// Flow node forms
#[derive(Clone, Debug, PartialEq)]
pub enum FlowNodeKind {
    /// A bare name: a channel, or a function invoked without config
    Identifier(Ident),
    /// `name{config}`: function invocation with config values
    Call {
        /// Function name
        name: Ident,
        /// Config values
        config: ConfigValues,
    },
    /// Any other expression
    Expr(Expr),
    /// `{ name: node -> node: param, ... }`
    Routing(RoutingTable),
}

/// Routing table splitting named outputs, or gathering named inputs
#[derive(Clone, Debug, PartialEq)]
pub struct RoutingTable {
    /// Node id
    pub id: NodeId,
    /// Span of the braces
    pub span: Span,
    /// Entries in source order
    pub entries: Vec<RoutingEntry>,
}

/// `name: node [-> node ...] [: param]`
#[derive(Clone, Debug, PartialEq)]
pub struct RoutingEntry {
    /// Node id
    pub id: NodeId,
    /// Span of the entry
    pub span: Span,
    /// Output name, or source name in an input table
    pub name: Ident,
    /// Target chain
    pub nodes: Vec<FlowNode>,
    /// Input of the func after the table fed by this entry
    pub param: Option<Ident>,
}

/// Config values of a flow invocation
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValues {
    /// `{a=1, b=2}`
    Named(Vec<ConfigValue>),
    /// `{1, 2}`
    Anonymous {
        /// The values
        values: Vec<Expr>,
        /// Span of the braces
        span: Span,
    },
}

/// `name = value` inside a config block
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigValue {
    /// Node id
    pub id: NodeId,
    /// Span of the pair
    pub span: Span,
    /// Config parameter name
    pub name: Ident,
    /// Value
    pub value: Expr,
}

/// `sequence name { stage ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceDecl {
    /// Node id
    pub id: NodeId,
    /// Span of the declaration
    pub span: Span,
    /// Sequence name
    pub name: Ident,
    /// Stages in order
    pub stages: Vec<StageDecl>,
}

/// `stage name { flows }`
#[derive(Clone, Debug, PartialEq)]
pub struct StageDecl {
    /// Node id
    pub id: NodeId,
    /// Span of the stage
    pub span: Span,
    /// Stage name
    pub name: Ident,
    /// Flows in order
    pub flows: Vec<FlowStatement>,
}
