//! Lexer module.
//!
//! The implementation is split into focused components:
//! - `core` - Main Lexer struct and dispatch
//! - `identifier` - Identifier and keyword lexing
//! - `number` - Number literal lexing
//! - `string` - String literal lexing
//! - `operator` - Operator and punctuation lexing
//! - `comment` - Whitespace and comment skipping

mod comment;
mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use core::{tokenize, Lexer};
