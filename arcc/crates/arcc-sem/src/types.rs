//! Arc types
//!
//! Types are plain values compared structurally. Type variables are only
//! meaningful together with the [`ConstraintSystem`](crate::ConstraintSystem)
//! that allocated them; use its `humanize` to render a type for users.

use arcc_lex::PrimitiveType;
use arcc_par::{TypeExpr, TypeExprKind};
use arcc_util::define_idx;
use std::fmt;

define_idx!(
    /// Type variable identifier
    TypeVarId
);

/// Name of the output of a function declared with a single unnamed output
pub const DEFAULT_OUTPUT: &str = "output";

/// A type in the type system
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 8-bit unsigned integer, also the boolean type
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// UTF-8 string
    Str,
    /// Channel carrying values of the element type
    Chan(Box<Type>),
    /// Series of values of the element type
    Series(Box<Type>),
    /// Inference variable
    Var(TypeVarId),
    /// Function signature
    Function(Box<FunctionType>),
    /// Placeholder after an error; unifies with everything
    Invalid,
}

impl Type {
    /// `chan elem`
    pub fn chan(elem: Type) -> Type {
        Type::Chan(Box::new(elem))
    }

    /// `series elem`
    pub fn series(elem: Type) -> Type {
        Type::Series(Box::new(elem))
    }

    /// Convert a primitive keyword
    pub fn from_primitive(prim: PrimitiveType) -> Type {
        match prim {
            PrimitiveType::I8 => Type::I8,
            PrimitiveType::I16 => Type::I16,
            PrimitiveType::I32 => Type::I32,
            PrimitiveType::I64 => Type::I64,
            PrimitiveType::U8 => Type::U8,
            PrimitiveType::U16 => Type::U16,
            PrimitiveType::U32 => Type::U32,
            PrimitiveType::U64 => Type::U64,
            PrimitiveType::F32 => Type::F32,
            PrimitiveType::F64 => Type::F64,
            PrimitiveType::Str => Type::Str,
        }
    }

    /// Convert a written type
    pub fn from_type_expr(expr: &TypeExpr) -> Type {
        match &expr.kind {
            TypeExprKind::Primitive(prim) => Type::from_primitive(*prim),
            TypeExprKind::Chan(inner) => Type::chan(Type::from_type_expr(inner)),
            TypeExprKind::Series(inner) => Type::series(Type::from_type_expr(inner)),
        }
    }

    /// Signed integer types
    pub fn is_signed_integer(&self) -> bool {
        matches!(self, Type::I8 | Type::I16 | Type::I32 | Type::I64)
    }

    /// Unsigned integer types
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(self, Type::U8 | Type::U16 | Type::U32 | Type::U64)
    }

    /// Any integer type
    pub fn is_integer(&self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    /// `f32` or `f64`
    pub fn is_float(&self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }

    /// Integer or float
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Element type of a channel or series
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Chan(elem) | Type::Series(elem) => Some(elem),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::I8 => f.write_str("i8"),
            Type::I16 => f.write_str("i16"),
            Type::I32 => f.write_str("i32"),
            Type::I64 => f.write_str("i64"),
            Type::U8 => f.write_str("u8"),
            Type::U16 => f.write_str("u16"),
            Type::U32 => f.write_str("u32"),
            Type::U64 => f.write_str("u64"),
            Type::F32 => f.write_str("f32"),
            Type::F64 => f.write_str("f64"),
            Type::Str => f.write_str("str"),
            Type::Chan(elem) => write!(f, "chan {elem}"),
            Type::Series(elem) => write!(f, "series {elem}"),
            Type::Var(v) => write!(f, "T{}", v.0),
            Type::Function(_) => f.write_str("func"),
            Type::Invalid => f.write_str("invalid"),
        }
    }
}

/// Restriction on the concrete types a variable may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Any integer type
    Integer,
    /// Any float type
    Float,
    /// Any numeric type
    Numeric,
    /// An integer literal: any numeric type, `i64` when unconstrained
    ExactIntegerFloat,
}

impl Constraint {
    /// True if the concrete type `ty` satisfies this constraint
    pub fn admits(self, ty: &Type) -> bool {
        match self {
            Constraint::Integer => ty.is_integer(),
            Constraint::Float => ty.is_float(),
            Constraint::Numeric | Constraint::ExactIntegerFloat => ty.is_numeric(),
        }
    }

    /// Intersection of two constraints; `None` when nothing satisfies both.
    ///
    /// ```
    /// use arcc_sem::Constraint::*;
    ///
    /// assert_eq!(Integer.intersect(Numeric), Some(Integer));
    /// assert_eq!(ExactIntegerFloat.intersect(Float), Some(Float));
    /// assert_eq!(ExactIntegerFloat.intersect(Numeric), Some(ExactIntegerFloat));
    /// assert_eq!(Integer.intersect(Float), None);
    /// ```
    pub fn intersect(self, other: Constraint) -> Option<Constraint> {
        use Constraint::*;
        match (self, other) {
            (a, b) if a == b => Some(a),
            (Numeric, c) | (c, Numeric) => Some(c),
            (ExactIntegerFloat, c) | (c, ExactIntegerFloat) => Some(c),
            _ => None,
        }
    }

    /// Type chosen when nothing else binds the variable
    pub fn default_type(self) -> Type {
        match self {
            Constraint::Integer | Constraint::ExactIntegerFloat => Type::I64,
            Constraint::Float | Constraint::Numeric => Type::F64,
        }
    }

    /// Name shown in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Constraint::Integer | Constraint::ExactIntegerFloat => "integer",
            Constraint::Float => "float",
            Constraint::Numeric => "numeric",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compile-time value of a config parameter default
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Integer literal, possibly negated
    Int(i128),
    /// Float literal, possibly negated
    Float(f64),
    /// String literal
    Str(String),
}

/// A named, typed signature entry
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: Type,
    /// Default value; config and input parameters only
    pub default: Option<ConstValue>,
}

impl Param {
    /// A parameter without a default
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    /// True when the caller must supply this parameter
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Signature of an Arc function
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionType {
    /// Config parameters `{...}`
    pub config: Vec<Param>,
    /// Inputs `(...)`
    pub inputs: Vec<Param>,
    /// Outputs; a single unnamed output is stored as [`DEFAULT_OUTPUT`]
    pub outputs: Vec<Param>,
}

impl FunctionType {
    /// Type of the single unnamed output, if that is what was declared
    pub fn return_type(&self) -> Option<&Type> {
        match self.outputs.as_slice() {
            [only] if only.name == DEFAULT_OUTPUT => Some(&only.ty),
            _ => None,
        }
    }

    /// True for functions declared with `(name type, ...)` outputs
    pub fn has_named_outputs(&self) -> bool {
        !self.outputs.is_empty() && self.return_type().is_none()
    }

    /// Config parameter by name
    pub fn config_param(&self, name: &str) -> Option<&Param> {
        self.config.iter().find(|p| p.name == name)
    }

    /// Every parameter: config, inputs, outputs
    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.config.iter().chain(&self.inputs).chain(&self.outputs)
    }
}
