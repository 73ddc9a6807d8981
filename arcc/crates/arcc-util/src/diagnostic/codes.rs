//! Stable diagnostic codes.
//!
//! Codes follow the format `ARC{number}`. The thousands digit groups them:
//! 1xxx syntax, 2xxx types, 3xxx calls, 4xxx symbols.
//!
//! # Examples
//!
//! ```
//! use arcc_util::diagnostic::ErrorCode;
//!
//! assert_eq!(ErrorCode::TypeMismatch.as_str(), "ARC2001");
//! assert_eq!(ErrorCode::SymbolUndefined.number(), 4001);
//! ```

use std::fmt;

/// A unique code identifying a class of diagnostic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed source rejected by the lexer or parser
    Syntax,
    /// Two types that must be equal are not
    TypeMismatch,
    /// A type does not satisfy a constraint (e.g. float where integer required)
    TypeConstraintViolation,
    /// Wrong number of arguments in a call
    FuncArgCount,
    /// Argument type does not match the parameter type
    FuncArgType,
    /// Name does not resolve in any enclosing scope
    SymbolUndefined,
    /// Name already declared in the same scope
    SymbolRedefined,
}

impl ErrorCode {
    /// Numeric part of the code
    pub const fn number(self) -> u32 {
        match self {
            ErrorCode::Syntax => 1001,
            ErrorCode::TypeMismatch => 2001,
            ErrorCode::TypeConstraintViolation => 2003,
            ErrorCode::FuncArgCount => 3001,
            ErrorCode::FuncArgType => 3002,
            ErrorCode::SymbolUndefined => 4001,
            ErrorCode::SymbolRedefined => 4002,
        }
    }

    /// Full textual code, e.g. `ARC2001`
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Syntax => "ARC1001",
            ErrorCode::TypeMismatch => "ARC2001",
            ErrorCode::TypeConstraintViolation => "ARC2003",
            ErrorCode::FuncArgCount => "ARC3001",
            ErrorCode::FuncArgType => "ARC3002",
            ErrorCode::SymbolUndefined => "ARC4001",
            ErrorCode::SymbolRedefined => "ARC4002",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
