//! Token definitions for the Arc language.

use arcc_util::{Span, Spanned};
use std::fmt;

/// Built-in scalar type names.
///
/// These are reserved words in Arc: `i32(x)` is a cast, never a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `str`
    Str,
}

impl PrimitiveType {
    /// Source spelling
    pub const fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::I8 => "i8",
            PrimitiveType::I16 => "i16",
            PrimitiveType::I32 => "i32",
            PrimitiveType::I64 => "i64",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
            PrimitiveType::Str => "str",
        }
    }

    /// Parse a type name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "i8" => PrimitiveType::I8,
            "i16" => PrimitiveType::I16,
            "i32" => PrimitiveType::I32,
            "i64" => PrimitiveType::I64,
            "u8" => PrimitiveType::U8,
            "u16" => PrimitiveType::U16,
            "u32" => PrimitiveType::U32,
            "u64" => PrimitiveType::U64,
            "f32" => PrimitiveType::F32,
            "f64" => PrimitiveType::F64,
            "str" => PrimitiveType::Str,
            _ => return None,
        })
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a lexical token
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    /// `func`
    Func,
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
    /// `sequence`
    Sequence,
    /// `stage`
    Stage,
    /// `authority`
    Authority,
    /// `chan`
    Chan,
    /// `series`
    Series,
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// A scalar type name such as `f64`
    Type(PrimitiveType),

    // Literals and names
    /// Identifier
    Ident(String),
    /// Unsigned integer literal
    Int(u64),
    /// Floating point literal
    Float(f64),
    /// String literal with escapes processed
    Str(String),

    // Punctuation
    /// `->`
    Arrow,
    /// `:=`
    Declare,
    /// `$=`
    StateDeclare,
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,

    /// Unrecognised character
    Invalid(char),
    /// End of input
    Eof,
}

impl TokenKind {
    /// Human-readable description used in parse errors
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Int(v) => format!("integer {v}"),
            TokenKind::Float(v) => format!("float {v}"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Type(t) => format!("'{t}'"),
            TokenKind::Invalid(c) => format!("'{c}'"),
            TokenKind::Eof => "end of file".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// Source text of an identifier or keyword; `None` for anything else.
    ///
    /// Host channel names are free-form, so contexts that only ever expect
    /// a name accept reserved words through this.
    pub fn word(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            TokenKind::Type(t) => Some(t.as_str()),
            TokenKind::Invalid(_) | TokenKind::Eof => None,
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Str(_) => None,
            other => {
                let text = other.symbol();
                text.starts_with(|c: char| c.is_ascii_alphabetic())
                    .then_some(text)
            },
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Func => "func",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::Sequence => "sequence",
            TokenKind::Stage => "stage",
            TokenKind::Authority => "authority",
            TokenKind::Chan => "chan",
            TokenKind::Series => "series",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Arrow => "->",
            TokenKind::Declare => ":=",
            TokenKind::StateDeclare => "$=",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            _ => "",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Maps a word to its keyword token, if it is reserved.
///
/// ```
/// use arcc_lex::token::{keyword_from_ident, PrimitiveType, TokenKind};
///
/// assert_eq!(keyword_from_ident("func"), Some(TokenKind::Func));
/// assert_eq!(keyword_from_ident("u8"), Some(TokenKind::Type(PrimitiveType::U8)));
/// assert_eq!(keyword_from_ident("valve"), None);
/// ```
pub fn keyword_from_ident(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "func" => TokenKind::Func,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "sequence" => TokenKind::Sequence,
        "stage" => TokenKind::Stage,
        "authority" => TokenKind::Authority,
        "chan" => TokenKind::Chan,
        "series" => TokenKind::Series,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        other => return PrimitiveType::from_name(other).map(TokenKind::Type),
    };
    Some(kind)
}

/// A token with its source location
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What was lexed
    pub kind: TokenKind,
    /// Where it was lexed
    pub span: Span,
}

impl Token {
    /// Create a token
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// True for the end-of-input marker
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_names_round_trip() {
        for name in ["i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64", "str"] {
            let prim = PrimitiveType::from_name(name);
            assert_eq!(prim.map(PrimitiveType::as_str), Some(name));
        }
        assert_eq!(PrimitiveType::from_name("i128"), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(TokenKind::Arrow.describe(), "'->'");
        assert_eq!(TokenKind::Ident("x".into()).describe(), "identifier 'x'");
        assert_eq!(TokenKind::Eof.describe(), "end of file");
    }

    #[test]
    fn test_word() {
        assert_eq!(TokenKind::Ident("valve".into()).word(), Some("valve"));
        assert_eq!(TokenKind::Chan.word(), Some("chan"));
        assert_eq!(TokenKind::Type(PrimitiveType::F32).word(), Some("f32"));
        assert_eq!(TokenKind::Arrow.word(), None);
        assert_eq!(TokenKind::Int(3).word(), None);
    }
}
