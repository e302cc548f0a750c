//! Rust-like source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`stream`]: Pull-based token cursor with lookahead and forking
//! - [`parse`]: Parsing (tokens → AST), extended by the `declarations`,
//!   `statements`, `expressions` and `types` modules
//! - [`ast`]: AST node definitions
//!
//! # Supported Surface
//!
//! - Items: functions, structs, enums, traits, impls, modules, type aliases,
//!   statics, constants, `use` trees, `extern crate`, `macro_rules!`
//! - Expressions: the full operator table, closures, macros, struct literals,
//!   generics and turbofish, and control flow in expression position
//! - Patterns: literals, names, tuples, paths, tuple-struct and struct patterns,
//!   alternatives and ranges (parsed with the expression grammar)
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod stream;
mod types;

pub use parse::{ParseError, ParseErrorKind, Parser};

use ast::SourceFile;

/// Parse a complete source file
///
/// Lexical errors surface before any parsing happens; both kinds abort.
pub fn parse_source(source: &str) -> Result<SourceFile, crate::TranslateError> {
    let mut parser = Parser::from_source(source)?;
    Ok(parser.parse_source_file()?)
}
