//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: items (functions, structs, enums, traits, impls, modules, ...)
//! - `statements`: blocks, `let`, `if`, `match` and loops
//! - `expressions`: expressions with precedence climbing
//! - `types`: type expressions and generic lists
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Parsing is fail-fast: the first structural mismatch is returned as a
//! [`ParseError`] and no partial tree is produced.

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, LexError, Lexer, Punct, Token};
use crate::parser::stream::TokenStream;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("Expected {expected}, found end of file")]
    UnexpectedEnd { expected: String },
    #[error("Malformed literal: {0}")]
    MalformedLiteral(String),
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at line {}, column {}: {kind}", location.line, location.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: SourceLocation,
}

/// Context-dependent parsing switches
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Restrictions {
    /// Inside `if`/`while`/`match`/`for` headers a `{` always opens the body
    pub(crate) no_struct_literal: bool,
}

/// Recursive descent parser for the Rust-like source language
pub struct Parser {
    pub(crate) stream: TokenStream,
    pub(crate) restrictions: Restrictions,
}

impl Parser {
    pub fn new(stream: TokenStream) -> Self {
        Self {
            stream,
            restrictions: Restrictions::default(),
        }
    }

    /// Tokenize `source` and build a parser over it
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::new(TokenStream::new(tokens)))
    }

    /// Parse the entire compilation unit
    pub fn parse_source_file(&mut self) -> Result<SourceFile, ParseError> {
        let mut items = Vec::new();

        while !self.is_at_end() {
            items.push(self.parse_item()?);
        }

        tracing::debug!(items = items.len(), "parsed source file");
        Ok(SourceFile { items })
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        self.stream.peek()
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        self.stream.peek_nth(n)
    }

    pub(crate) fn advance(&mut self) -> Token {
        self.stream.advance()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.stream.is_at_end()
    }

    pub(crate) fn check_punct(&self, punct: Punct) -> bool {
        self.peek().is_punct(punct)
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    pub(crate) fn match_punct(&mut self, punct: Punct) -> bool {
        if self.check_punct(punct) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Error describing the current token as unexpected
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let kind = match self.peek() {
            Token::Eof => ParseErrorKind::UnexpectedEnd {
                expected: expected.to_string(),
            },
            found => ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
            },
        };
        ParseError {
            kind,
            location: self.stream.location(),
        }
    }

    pub(crate) fn expect_punct(&mut self, punct: Punct, ctx: &str) -> Result<(), ParseError> {
        if self.match_punct(punct) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}' {}", punct.as_str(), ctx)))
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword, ctx: &str) -> Result<(), ParseError> {
        if self.match_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}' {}", keyword.as_str(), ctx)))
        }
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_punct(Punct::Semi, ctx)
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Identifier or one of the name-like keywords (`self`, `Self`, `super`, `crate`, `_`)
    pub(crate) fn parse_name(&mut self) -> Result<Name, ParseError> {
        let name = match self.peek() {
            Token::Ident(name) => Name::Ident(name.clone()),
            Token::Keyword(Keyword::Underscore) => Name::Underscore,
            Token::Keyword(Keyword::SelfValue) => Name::SelfValue,
            Token::Keyword(Keyword::SelfType) => Name::SelfType,
            Token::Keyword(Keyword::Super) => Name::Super,
            Token::Keyword(Keyword::Crate) => Name::Crate,
            _ => return Err(self.unexpected("name")),
        };
        self.advance();
        Ok(name)
    }

    pub(crate) fn is_name_start(&self) -> bool {
        matches!(
            self.peek(),
            Token::Ident(_)
                | Token::Keyword(
                    Keyword::Underscore
                        | Keyword::SelfValue
                        | Keyword::SelfType
                        | Keyword::Super
                        | Keyword::Crate
                )
        )
    }

    /// Optional label literal (`'outer`)
    pub(crate) fn parse_optional_label(&mut self) -> Option<Lifetime> {
        if let Token::Literal(crate::parser::lexer::LiteralKind::Label, name) = self.peek() {
            let label = Lifetime(name.clone());
            self.advance();
            Some(label)
        } else {
            None
        }
    }

    /// Run `f` with struct literals suppressed (or re-enabled), restoring afterwards
    pub(crate) fn with_restrictions<T>(
        &mut self,
        restrictions: Restrictions,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.restrictions;
        self.restrictions = restrictions;
        let result = f(self);
        self.restrictions = saved;
        result
    }

    /// Comma-separated list up to (and including) `close`
    pub(crate) fn parse_comma_list<T>(
        &mut self,
        close: Punct,
        ctx: &str,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();

        while !self.check_punct(close) {
            items.push(item(self)?);
            if !self.match_punct(Punct::Comma) {
                break;
            }
        }

        self.expect_punct(close, ctx)?;
        Ok(items)
    }
}
