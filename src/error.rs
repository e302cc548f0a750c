//! Fatal translation errors
//!
//! Lexical and syntactic errors abort a translation; no output is produced.
//! Unsupported constructs found during generation are not errors (see
//! [`GenerationGap`](crate::codegen::GenerationGap)).

use crate::parser::lexer::LexError;
use crate::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl TranslateError {
    /// Line and column the error was reported at
    pub fn location(&self) -> crate::parser::ast::SourceLocation {
        match self {
            TranslateError::Lex(error) => error.location,
            TranslateError::Parse(error) => error.location,
        }
    }
}
