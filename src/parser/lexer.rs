//! Lexer (tokenizer) for Rust-like source code
//!
//! Converts raw source text into a flat list of [`Spanned`] tokens consumed by
//! the parser through a [`TokenStream`](super::stream::TokenStream). Tokens
//! themselves are position-free values; the location travels next to them so
//! that errors can still point at a line and column.
//!
//! Punctuation is matched longest-first against a fixed table, so `>>=` is a
//! single token and `a=-1` lexes as `=` followed by `-`.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    As,
    Async,
    Await,
    Break,
    Const,
    Continue,
    Crate,
    Dyn,
    Else,
    Enum,
    Extern,
    False,
    Fn,
    For,
    If,
    Impl,
    In,
    Let,
    Loop,
    Match,
    Mod,
    Move,
    Mut,
    Pub,
    Ref,
    Return,
    SelfValue,
    SelfType,
    Static,
    Struct,
    Super,
    Trait,
    True,
    Type,
    Unsafe,
    Use,
    Where,
    While,
    Underscore,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("as", Keyword::As),
    ("async", Keyword::Async),
    ("await", Keyword::Await),
    ("break", Keyword::Break),
    ("const", Keyword::Const),
    ("continue", Keyword::Continue),
    ("crate", Keyword::Crate),
    ("dyn", Keyword::Dyn),
    ("else", Keyword::Else),
    ("enum", Keyword::Enum),
    ("extern", Keyword::Extern),
    ("false", Keyword::False),
    ("fn", Keyword::Fn),
    ("for", Keyword::For),
    ("if", Keyword::If),
    ("impl", Keyword::Impl),
    ("in", Keyword::In),
    ("let", Keyword::Let),
    ("loop", Keyword::Loop),
    ("match", Keyword::Match),
    ("mod", Keyword::Mod),
    ("move", Keyword::Move),
    ("mut", Keyword::Mut),
    ("pub", Keyword::Pub),
    ("ref", Keyword::Ref),
    ("return", Keyword::Return),
    ("self", Keyword::SelfValue),
    ("Self", Keyword::SelfType),
    ("static", Keyword::Static),
    ("struct", Keyword::Struct),
    ("super", Keyword::Super),
    ("trait", Keyword::Trait),
    ("true", Keyword::True),
    ("type", Keyword::Type),
    ("unsafe", Keyword::Unsafe),
    ("use", Keyword::Use),
    ("where", Keyword::Where),
    ("while", Keyword::While),
    ("_", Keyword::Underscore),
];

impl Keyword {
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, keyword)| *keyword)
    }

    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| *keyword == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Not,
    And,
    Or,
    AndAnd,
    OrOr,
    Shl,
    Shr,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    CaretEq,
    AndEq,
    OrEq,
    ShlEq,
    ShrEq,
    Eq,
    EqEq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    At,
    Dot,
    DotDot,
    DotDotDot,
    DotDotEq,
    Comma,
    Semi,
    Colon,
    PathSep,
    RArrow,
    FatArrow,
    Pound,
    Dollar,
    Question,
    Tilde,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
}

/// Longest spellings first so that matching can stop at the first hit.
const PUNCTUATION: &[(&str, Punct)] = &[
    ("<<=", Punct::ShlEq),
    (">>=", Punct::ShrEq),
    ("...", Punct::DotDotDot),
    ("..=", Punct::DotDotEq),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("<<", Punct::Shl),
    (">>", Punct::Shr),
    ("+=", Punct::PlusEq),
    ("-=", Punct::MinusEq),
    ("*=", Punct::StarEq),
    ("/=", Punct::SlashEq),
    ("%=", Punct::PercentEq),
    ("^=", Punct::CaretEq),
    ("&=", Punct::AndEq),
    ("|=", Punct::OrEq),
    ("==", Punct::EqEq),
    ("!=", Punct::Ne),
    (">=", Punct::Ge),
    ("<=", Punct::Le),
    ("..", Punct::DotDot),
    ("::", Punct::PathSep),
    ("->", Punct::RArrow),
    ("=>", Punct::FatArrow),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("^", Punct::Caret),
    ("!", Punct::Not),
    ("&", Punct::And),
    ("|", Punct::Or),
    ("=", Punct::Eq),
    (">", Punct::Gt),
    ("<", Punct::Lt),
    ("@", Punct::At),
    (".", Punct::Dot),
    (",", Punct::Comma),
    (";", Punct::Semi),
    (":", Punct::Colon),
    ("#", Punct::Pound),
    ("$", Punct::Dollar),
    ("?", Punct::Question),
    ("~", Punct::Tilde),
    ("(", Punct::OpenParen),
    (")", Punct::CloseParen),
    ("{", Punct::OpenBrace),
    ("}", Punct::CloseBrace),
    ("[", Punct::OpenBracket),
    ("]", Punct::CloseBracket),
];

impl Punct {
    pub fn as_str(self) -> &'static str {
        PUNCTUATION
            .iter()
            .find(|(_, punct)| *punct == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Char,
    Str,
    Byte,
    ByteStr,
    Integer,
    Float,
    /// Lifetimes and loop labels: `'a`
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    /// `///`
    DocLine,
    /// `/** */`
    DocBlock,
    /// `//!` and `/*! */`
    InnerDoc,
}

impl CommentKind {
    /// Comments that carry no meaning for the parser
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            CommentKind::Line | CommentKind::Block | CommentKind::InnerDoc
        )
    }
}

/// All token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Keyword(Keyword),
    /// Kind plus decoded text (escapes resolved, quotes stripped)
    Literal(LiteralKind, String),
    Punct(Punct),
    Comment(CommentKind, String),
    Eof,
}

impl Token {
    pub fn is_punct(&self, punct: Punct) -> bool {
        matches!(self, Token::Punct(p) if *p == punct)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Keyword(keyword) => write!(f, "keyword '{}'", keyword.as_str()),
            Token::Literal(LiteralKind::Str, text) => write!(f, "string literal \"{}\"", text),
            Token::Literal(LiteralKind::ByteStr, text) => {
                write!(f, "byte string literal b\"{}\"", text)
            }
            Token::Literal(LiteralKind::Char, text) => write!(f, "character literal '{}'", text),
            Token::Literal(LiteralKind::Byte, text) => write!(f, "byte literal b'{}'", text),
            Token::Literal(LiteralKind::Integer, text) => write!(f, "integer literal {}", text),
            Token::Literal(LiteralKind::Float, text) => write!(f, "float literal {}", text),
            Token::Literal(LiteralKind::Label, text) => write!(f, "label '{}", text),
            Token::Punct(punct) => write!(f, "'{}'", punct.as_str()),
            Token::Comment(..) => write!(f, "comment"),
            Token::Eof => write!(f, "end of file"),
        }
    }
}

/// A token together with the position where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated character literal")]
    UnterminatedChar,
    #[error("Unterminated block comment")]
    UnterminatedBlockComment,
    #[error("No such escape sequence: \\{0}")]
    UnknownEscape(char),
    #[error("Undefined punctuation: {0}")]
    UndefinedPunctuation(String),
    #[error("Unexpected character: '{0}'")]
    UnexpectedCharacter(char),
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Lexer error at line {}, column {}: {kind}", location.line, location.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

/// Lexer for Rust-like source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    /// Set right after a `.` token so `t.0.1` lexes as two integer fields
    after_dot: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            after_dot: false,
        }
    }

    /// Tokenize the entire input, ending with [`Token::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            let location = self.current_location();
            if self.is_at_end() {
                tokens.push(Spanned {
                    token: Token::Eof,
                    location,
                });
                break;
            }

            let token = self.next_token()?;
            if !matches!(token, Token::Comment(..)) {
                self.after_dot = token.is_punct(Punct::Dot);
            }
            tokens.push(Spanned { token, location });
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Ok(Token::Eof),
        };

        match ch {
            '/' if self.peek_ahead(1) == Some('/') => Ok(self.line_comment()),
            '/' if self.peek_ahead(1) == Some('*') => self.block_comment(),
            '"' => {
                self.advance();
                let text = self.quoted_text(loc)?;
                Ok(Token::Literal(LiteralKind::Str, text))
            }
            '\'' => {
                self.advance();
                self.char_or_label(loc)
            }
            'r' if self.starts_raw_string(1) => {
                self.advance();
                let text = self.raw_text(loc)?;
                Ok(Token::Literal(LiteralKind::Str, text))
            }
            'r' if self.peek_ahead(1) == Some('#')
                && self.peek_ahead(2).is_some_and(is_ident_start) =>
            {
                // Raw identifier: r#type
                self.advance();
                self.advance();
                Ok(Token::Ident(self.identifier_text()))
            }
            'b' if self.peek_ahead(1) == Some('\'') => {
                self.advance();
                self.advance();
                let value = self.char_body(loc)?;
                Ok(Token::Literal(LiteralKind::Byte, value.to_string()))
            }
            'b' if self.peek_ahead(1) == Some('"') => {
                self.advance();
                self.advance();
                let text = self.quoted_text(loc)?;
                Ok(Token::Literal(LiteralKind::ByteStr, text))
            }
            'b' if self.peek_ahead(1) == Some('r') && self.starts_raw_string(2) => {
                self.advance();
                self.advance();
                let text = self.raw_text(loc)?;
                Ok(Token::Literal(LiteralKind::ByteStr, text))
            }
            '0'..='9' => Ok(self.number_literal()),
            c if is_ident_start(c) => Ok(self.identifier_or_keyword()),
            _ => self.punctuation(loc),
        }
    }

    fn punctuation(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        for (text, punct) in PUNCTUATION {
            let matches = text
                .chars()
                .enumerate()
                .all(|(offset, expected)| self.peek_ahead(offset) == Some(expected));
            if matches {
                for _ in 0..text.len() {
                    self.advance();
                }
                return Ok(Token::Punct(*punct));
            }
        }

        let ch = self.peek().unwrap_or('\0');
        let kind = if ch.is_ascii_punctuation() {
            LexErrorKind::UndefinedPunctuation(ch.to_string())
        } else {
            LexErrorKind::UnexpectedCharacter(ch)
        };
        Err(LexError {
            kind,
            location: loc,
        })
    }

    /// `//`, `///` or `//!` up to (not including) the newline
    fn line_comment(&mut self) -> Token {
        self.advance();
        self.advance();

        let kind = match (self.peek(), self.peek_ahead(1)) {
            (Some('/'), Some('/')) => CommentKind::Line,
            (Some('/'), _) => {
                self.advance();
                CommentKind::DocLine
            }
            (Some('!'), _) => {
                self.advance();
                CommentKind::InnerDoc
            }
            _ => CommentKind::Line,
        };

        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            text.push(ch);
            self.advance();
        }

        Token::Comment(kind, text.trim_end_matches('\r').to_string())
    }

    /// Block comments nest, as in Rust
    fn block_comment(&mut self) -> Result<Token, LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        let kind = match (self.peek(), self.peek_ahead(1)) {
            (Some('*'), Some('/')) | (Some('*'), Some('*')) => CommentKind::Block,
            (Some('*'), _) => {
                self.advance();
                CommentKind::DocBlock
            }
            (Some('!'), _) => {
                self.advance();
                CommentKind::InnerDoc
            }
            _ => CommentKind::Block,
        };

        let mut text = String::new();
        let mut depth = 1;
        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                depth -= 1;
                if depth == 0 {
                    self.advance(); // skip '*'
                    self.advance(); // skip '/'
                    return Ok(Token::Comment(kind, text));
                }
            } else if self.peek() == Some('/') && self.peek_ahead(1) == Some('*') {
                depth += 1;
            }
            if let Some(ch) = self.advance() {
                text.push(ch);
            }
        }

        Err(LexError {
            kind: LexErrorKind::UnterminatedBlockComment,
            location: start_loc,
        })
    }

    /// Body of a `"..."` literal; the opening quote is already consumed
    fn quoted_text(&mut self, loc: SourceLocation) -> Result<String, LexError> {
        let mut text = String::new();

        loop {
            match self.advance() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        location: loc,
                    })
                }
                Some('"') => return Ok(text),
                Some('\\') => {
                    if self.peek() == Some('\n') || self.peek() == Some('\r') {
                        // Line continuation skips the newline and leading whitespace
                        while self.peek().is_some_and(char::is_whitespace) {
                            self.advance();
                        }
                    } else {
                        text.push(self.escape(loc)?);
                    }
                }
                Some(ch) => text.push(ch),
            }
        }
    }

    fn starts_raw_string(&self, offset: usize) -> bool {
        let mut offset = offset;
        while self.peek_ahead(offset) == Some('#') {
            offset += 1;
        }
        self.peek_ahead(offset) == Some('"')
    }

    /// `r#"..."#`; positioned on the first `#` or the quote
    fn raw_text(&mut self, loc: SourceLocation) -> Result<String, LexError> {
        let mut hashes = 0;
        while self.peek() == Some('#') {
            hashes += 1;
            self.advance();
        }
        self.advance(); // opening quote

        let mut text = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        location: loc,
                    })
                }
                Some('"') if (0..hashes).all(|i| self.peek_ahead(i) == Some('#')) => {
                    for _ in 0..hashes {
                        self.advance();
                    }
                    return Ok(text);
                }
                Some(ch) => text.push(ch),
            }
        }
    }

    /// Either `'c'` or a label `'name`; the opening quote is already consumed
    fn char_or_label(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let first = self.peek();
        let closes = self.peek_ahead(1) == Some('\'');

        match first {
            Some(c) if is_ident_start(c) && !closes => {
                Ok(Token::Literal(LiteralKind::Label, self.identifier_text()))
            }
            _ => {
                let value = self.char_body(loc)?;
                Ok(Token::Literal(LiteralKind::Char, value.to_string()))
            }
        }
    }

    /// Single (possibly escaped) character followed by the closing quote
    fn char_body(&mut self, loc: SourceLocation) -> Result<char, LexError> {
        let unterminated = LexError {
            kind: LexErrorKind::UnterminatedChar,
            location: loc,
        };

        let value = match self.advance() {
            None | Some('\n') => return Err(unterminated),
            Some('\\') => self.escape(loc)?,
            Some(ch) => ch,
        };

        if self.advance() != Some('\'') {
            return Err(unterminated);
        }
        Ok(value)
    }

    /// Decode the escape after a backslash
    fn escape(&mut self, loc: SourceLocation) -> Result<char, LexError> {
        let unknown = |c: char| LexError {
            kind: LexErrorKind::UnknownEscape(c),
            location: loc,
        };

        let Some(ch) = self.advance() else {
            return Err(LexError {
                kind: LexErrorKind::UnterminatedString,
                location: loc,
            });
        };

        match ch {
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            '0' => Ok('\0'),
            '\\' => Ok('\\'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            'x' => {
                let digits: String = (0..2).filter_map(|_| self.advance()).collect();
                u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| unknown('x'))
            }
            'u' => {
                if self.advance() != Some('{') {
                    return Err(unknown('u'));
                }
                let mut digits = String::new();
                loop {
                    match self.advance() {
                        Some('}') => break,
                        Some('_') => {}
                        Some(d) if d.is_ascii_hexdigit() => digits.push(d),
                        _ => return Err(unknown('u')),
                    }
                }
                u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| unknown('u'))
            }
            other => Err(unknown(other)),
        }
    }

    /// Integer or float literal, keeping prefixes, separators and suffixes
    fn number_literal(&mut self) -> Token {
        let mut text = String::new();
        let mut is_float = false;

        let radix_prefix = self.peek() == Some('0')
            && matches!(self.peek_ahead(1), Some('x') | Some('o') | Some('b'));

        if radix_prefix {
            for _ in 0..2 {
                if let Some(ch) = self.advance() {
                    text.push(ch);
                }
            }
            while let Some(ch) = self.peek() {
                if ch.is_ascii_hexdigit() || ch == '_' {
                    text.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        } else {
            self.take_digits(&mut text);

            // Fractional part, but never for `0..n`, `1.max(2)` or `t.0.1`
            if !self.after_dot && self.peek() == Some('.') {
                match self.peek_ahead(1) {
                    Some(d) if d.is_ascii_digit() => {
                        is_float = true;
                        text.push('.');
                        self.advance();
                        self.take_digits(&mut text);
                    }
                    Some(c) if c == '.' || is_ident_start(c) => {}
                    _ => {
                        is_float = true;
                        text.push('.');
                        self.advance();
                    }
                }
            }

            if !self.after_dot && matches!(self.peek(), Some('e') | Some('E')) {
                let sign = matches!(self.peek_ahead(1), Some('+') | Some('-'));
                let digit_at = if sign { 2 } else { 1 };
                if self.peek_ahead(digit_at).is_some_and(|d| d.is_ascii_digit()) {
                    is_float = true;
                    for _ in 0..digit_at {
                        if let Some(ch) = self.advance() {
                            text.push(ch);
                        }
                    }
                    self.take_digits(&mut text);
                }
            }
        }

        // Type suffix such as `u8` or `f64`
        if self.peek().is_some_and(is_ident_start) {
            let suffix = self.identifier_text();
            if suffix.starts_with('f') {
                is_float = true;
            }
            text.push_str(&suffix);
        }

        let kind = if is_float {
            LiteralKind::Float
        } else {
            LiteralKind::Integer
        };
        Token::Literal(kind, text)
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn identifier_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn identifier_or_keyword(&mut self) -> Token {
        let text = self.identifier_text();
        match Keyword::lookup(&text) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Ident(text),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|spanned| spanned.token)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokens("fn main() { return 0; }");

        assert!(matches!(tokens[0], Token::Keyword(Keyword::Fn)));
        assert!(matches!(tokens[1], Token::Ident(ref s) if s == "main"));
        assert!(tokens[2].is_punct(Punct::OpenParen));
        assert!(tokens[3].is_punct(Punct::CloseParen));
        assert!(tokens[4].is_punct(Punct::OpenBrace));
        assert!(matches!(tokens[5], Token::Keyword(Keyword::Return)));
        assert!(matches!(tokens[6], Token::Literal(LiteralKind::Integer, ref s) if s == "0"));
        assert!(tokens[7].is_punct(Punct::Semi));
        assert!(tokens[8].is_punct(Punct::CloseBrace));
        assert!(matches!(tokens[9], Token::Eof));
    }

    #[test]
    fn test_longest_match_punctuation() {
        let tokens = tokens(">>= ..= :: => != -> && a=-1");

        assert!(tokens[0].is_punct(Punct::ShrEq));
        assert!(tokens[1].is_punct(Punct::DotDotEq));
        assert!(tokens[2].is_punct(Punct::PathSep));
        assert!(tokens[3].is_punct(Punct::FatArrow));
        assert!(tokens[4].is_punct(Punct::Ne));
        assert!(tokens[5].is_punct(Punct::RArrow));
        assert!(tokens[6].is_punct(Punct::AndAnd));
        assert!(tokens[8].is_punct(Punct::Eq));
        assert!(tokens[9].is_punct(Punct::Minus));
    }

    #[test]
    fn test_comments() {
        let tokens = tokens("x // note\n/// doc\n/* a /* nested */ b */ //! inner\ny");

        assert!(matches!(tokens[0], Token::Ident(ref s) if s == "x"));
        assert!(matches!(tokens[1], Token::Comment(CommentKind::Line, ref s) if s == " note"));
        assert!(matches!(tokens[2], Token::Comment(CommentKind::DocLine, ref s) if s == " doc"));
        assert!(matches!(tokens[3], Token::Comment(CommentKind::Block, _)));
        assert!(matches!(tokens[4], Token::Comment(CommentKind::InnerDoc, _)));
        assert!(matches!(tokens[5], Token::Ident(ref s) if s == "y"));
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokens(r##""hello\nworld\u{41}" r"raw\n" r#"with "quotes""#"##);

        assert_eq!(
            tokens[0],
            Token::Literal(LiteralKind::Str, "hello\nworldA".to_string())
        );
        assert_eq!(
            tokens[1],
            Token::Literal(LiteralKind::Str, "raw\\n".to_string())
        );
        assert_eq!(
            tokens[2],
            Token::Literal(LiteralKind::Str, "with \"quotes\"".to_string())
        );
    }

    #[test]
    fn test_char_and_label() {
        let tokens = tokens("'a' '\\n' 'outer b'x' b\"hi\"");

        assert_eq!(tokens[0], Token::Literal(LiteralKind::Char, "a".to_string()));
        assert_eq!(tokens[1], Token::Literal(LiteralKind::Char, "\n".to_string()));
        assert_eq!(
            tokens[2],
            Token::Literal(LiteralKind::Label, "outer".to_string())
        );
        assert_eq!(tokens[3], Token::Literal(LiteralKind::Byte, "x".to_string()));
        assert_eq!(
            tokens[4],
            Token::Literal(LiteralKind::ByteStr, "hi".to_string())
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = tokens("1_000u32 2.5 0..10 1e3 0xff t.0.1");

        assert_eq!(
            tokens[0],
            Token::Literal(LiteralKind::Integer, "1_000u32".to_string())
        );
        assert_eq!(tokens[1], Token::Literal(LiteralKind::Float, "2.5".to_string()));
        assert_eq!(tokens[2], Token::Literal(LiteralKind::Integer, "0".to_string()));
        assert!(tokens[3].is_punct(Punct::DotDot));
        assert_eq!(tokens[5], Token::Literal(LiteralKind::Float, "1e3".to_string()));
        assert_eq!(
            tokens[6],
            Token::Literal(LiteralKind::Integer, "0xff".to_string())
        );
        // t . 0 . 1
        assert_eq!(tokens[9], Token::Literal(LiteralKind::Integer, "0".to_string()));
        assert!(tokens[10].is_punct(Punct::Dot));
        assert_eq!(tokens[11], Token::Literal(LiteralKind::Integer, "1".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("let s = \"oops;").tokenize().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.location, SourceLocation::new(1, 9));
    }

    #[test]
    fn test_unknown_escape_and_punctuation() {
        let err = Lexer::new(r#""\q""#).tokenize().unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnknownEscape('q'));

        let err = Lexer::new("a ` b").tokenize().unwrap_err();
        assert_eq!(
            err.kind,
            LexErrorKind::UndefinedPunctuation("`".to_string())
        );
    }
}
