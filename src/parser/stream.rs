//! Pull-based token source with cheap forking
//!
//! The parser never indexes the token vector directly. A [`TokenStream`] is an
//! `Rc` to the shared, immutable token list plus a cursor, so cloning one is
//! the speculative-lookahead "fork": the clone can be advanced freely while
//! the original cursor stays where it was.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{Punct, Spanned, Token};
use std::rc::Rc;

static EOF: Token = Token::Eof;
static GT: Token = Token::Punct(Punct::Gt);

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Rc<[Spanned]>,
    position: usize,
    /// The current `>>` has had its first `>` consumed by a generic list
    split_shr: bool,
}

impl TokenStream {
    /// Build a stream, dropping plain comments and inner doc comments
    pub fn new(tokens: Vec<Spanned>) -> Self {
        let tokens: Vec<Spanned> = tokens
            .into_iter()
            .filter(|spanned| !matches!(&spanned.token, Token::Comment(kind, _) if kind.is_trivia()))
            .collect();

        Self {
            tokens: tokens.into(),
            position: 0,
            split_shr: false,
        }
    }

    pub fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// Token `n` positions ahead; `Eof` past the end
    pub fn peek_nth(&self, n: usize) -> &Token {
        if n == 0 && self.split_shr {
            return &GT;
        }
        self.tokens
            .get(self.position + n)
            .map(|spanned| &spanned.token)
            .unwrap_or(&EOF)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        self.split_shr = false;
        token
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof)
    }

    pub fn location(&self) -> SourceLocation {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|spanned| spanned.location)
            .unwrap_or_default()
    }

    /// Independent cursor for a speculative scan
    pub fn fork(&self) -> TokenStream {
        self.clone()
    }

    /// Consume one `>` closing a generic list, splitting `>>` if needed
    pub fn eat_closing_angle(&mut self) -> bool {
        match self.peek() {
            Token::Punct(Punct::Gt) => {
                self.advance();
                true
            }
            Token::Punct(Punct::Shr) => {
                self.split_shr = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn stream(source: &str) -> TokenStream {
        TokenStream::new(Lexer::new(source).tokenize().unwrap())
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut stream = stream("a // note\n/* block */ b /// doc\n c");

        assert!(matches!(stream.advance(), Token::Ident(ref s) if s == "a"));
        assert!(matches!(stream.advance(), Token::Ident(ref s) if s == "b"));
        assert!(matches!(stream.advance(), Token::Comment(..)));
        assert!(matches!(stream.advance(), Token::Ident(ref s) if s == "c"));
        assert!(stream.is_at_end());
        assert!(matches!(stream.advance(), Token::Eof));
    }

    #[test]
    fn test_fork_does_not_move_original() {
        let stream = stream("x < y");
        let mut lookahead = stream.fork();
        lookahead.advance();
        lookahead.advance();

        assert!(matches!(stream.peek(), Token::Ident(ref s) if s == "x"));
        assert!(matches!(lookahead.peek(), Token::Ident(ref s) if s == "y"));
    }

    #[test]
    fn test_split_shr() {
        let mut stream = stream(">> x");

        assert!(stream.eat_closing_angle());
        assert!(stream.peek().is_punct(Punct::Gt));
        assert!(stream.eat_closing_angle());
        assert!(matches!(stream.peek(), Token::Ident(ref s) if s == "x"));
    }
}
