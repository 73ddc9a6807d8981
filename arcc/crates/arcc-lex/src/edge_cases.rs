//! Edge case tests for arcc-lex
