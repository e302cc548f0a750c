//! Expression parsing implementation
//!
//! This module handles expression parsing using precedence climbing for
//! binary operators and recursive descent for everything else.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, characters, strings, bytes, booleans, unit
//! - Names and paths (`a::b::c`), turbofish (`f::<T>`)
//! - Binary operators: arithmetic, comparison, logical, bitwise, assignment,
//!   ranges and `as` casts
//! - Unary operators: `-`, `!`, `*`, `&`, `&mut`, prefix ranges
//! - Postfix: calls, indexing, fields, `?`, generic application, struct literals
//! - Arrays, tuples, closures, macro invocations
//! - Control flow in expression position (`if`, `match`, loops, blocks)
//!
//! # Precedence
//!
//! From loosest to tightest: assignment, range, `||`, `&&`, comparison, `|`,
//! `^`, `&`, shifts, additive, multiplicative, `as`. The assignment family is
//! right-associative; everything else is left-associative.
//!
//! # Ambiguities
//!
//! A `<` after a name is generic application only when a forked stream finds
//! the matching `>` before anything that cannot appear inside generic
//! arguments. A `{` after a name opens a struct literal only when it is
//! followed by `}` or by `field:` / `field,` / `field}`, and never in the head
//! of `if`, `while`, `match` or `for`.

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, LiteralKind, Punct, Token};
use crate::parser::parse::{ParseError, ParseErrorKind, Parser, Restrictions};

/// Binding power of binary operators, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Assign,
    Range,
    Or,
    And,
    Compare,
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    Additive,
    Multiplicative,
    Cast,
}

impl Precedence {
    fn is_right_associative(self) -> bool {
        self == Precedence::Assign
    }
}

/// Binary operator spelled by `token`, with its precedence
fn binary_operator(token: &Token) -> Option<(BinaryOp, Precedence)> {
    let op = match token {
        Token::Keyword(Keyword::As) => return Some((BinaryOp::As, Precedence::Cast)),
        Token::Punct(punct) => *punct,
        _ => return None,
    };

    let entry = match op {
        Punct::Eq => (BinaryOp::Assign, Precedence::Assign),
        Punct::PlusEq => (BinaryOp::AddAssign, Precedence::Assign),
        Punct::MinusEq => (BinaryOp::SubAssign, Precedence::Assign),
        Punct::StarEq => (BinaryOp::MulAssign, Precedence::Assign),
        Punct::SlashEq => (BinaryOp::DivAssign, Precedence::Assign),
        Punct::PercentEq => (BinaryOp::RemAssign, Precedence::Assign),
        Punct::AndEq => (BinaryOp::BitAndAssign, Precedence::Assign),
        Punct::OrEq => (BinaryOp::BitOrAssign, Precedence::Assign),
        Punct::CaretEq => (BinaryOp::BitXorAssign, Precedence::Assign),
        Punct::ShlEq => (BinaryOp::ShlAssign, Precedence::Assign),
        Punct::ShrEq => (BinaryOp::ShrAssign, Precedence::Assign),
        Punct::DotDot => (BinaryOp::Range, Precedence::Range),
        Punct::DotDotEq | Punct::DotDotDot => (BinaryOp::RangeInclusive, Precedence::Range),
        Punct::OrOr => (BinaryOp::Or, Precedence::Or),
        Punct::AndAnd => (BinaryOp::And, Precedence::And),
        Punct::EqEq => (BinaryOp::Eq, Precedence::Compare),
        Punct::Ne => (BinaryOp::Ne, Precedence::Compare),
        Punct::Lt => (BinaryOp::Lt, Precedence::Compare),
        Punct::Le => (BinaryOp::Le, Precedence::Compare),
        Punct::Gt => (BinaryOp::Gt, Precedence::Compare),
        Punct::Ge => (BinaryOp::Ge, Precedence::Compare),
        Punct::Or => (BinaryOp::BitOr, Precedence::BitOr),
        Punct::Caret => (BinaryOp::BitXor, Precedence::BitXor),
        Punct::And => (BinaryOp::BitAnd, Precedence::BitAnd),
        Punct::Shl => (BinaryOp::Shl, Precedence::Shift),
        Punct::Shr => (BinaryOp::Shr, Precedence::Shift),
        Punct::Plus => (BinaryOp::Add, Precedence::Additive),
        Punct::Minus => (BinaryOp::Sub, Precedence::Additive),
        Punct::Star => (BinaryOp::Mul, Precedence::Multiplicative),
        Punct::Slash => (BinaryOp::Div, Precedence::Multiplicative),
        Punct::Percent => (BinaryOp::Rem, Precedence::Multiplicative),
        _ => return None,
    };
    Some(entry)
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_expression_above(Precedence::Assign)
    }

    /// Parse an expression using only operators binding at least as tight as `min`
    pub(crate) fn parse_expression_above(&mut self, min: Precedence) -> Result<Expr, ParseError> {
        let lhs = self.parse_unary()?;
        self.parse_binary_rhs(lhs, min)
    }

    /// Match patterns and `let` patterns: no assignment, struct patterns allowed
    pub(crate) fn parse_pattern(&mut self) -> Result<Expr, ParseError> {
        self.with_restrictions(Restrictions::default(), |p| {
            p.parse_expression_above(Precedence::Range)
        })
    }

    /// Precedence climbing over binary operators
    pub(crate) fn parse_binary_rhs(&mut self, mut lhs: Expr, min: Precedence) -> Result<Expr, ParseError> {
        loop {
            let Some((op, prec)) = binary_operator(self.peek()) else {
                break;
            };
            if prec < min {
                break;
            }
            self.advance();

            let mut rhs = match op {
                BinaryOp::As => self.parse_type()?,
                BinaryOp::Range | BinaryOp::RangeInclusive if !self.starts_expression() => Expr::unit(),
                _ => self.parse_unary()?,
            };

            // Let tighter operators (or the right-associative assignment
            // family at equal precedence) claim the right operand first
            while let Some((_, next)) = binary_operator(self.peek()) {
                if next > prec || (next == prec && prec.is_right_associative()) {
                    rhs = self.parse_binary_rhs(rhs, next)?;
                } else {
                    break;
                }
            }

            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Whether the current token can begin an operand
    pub(crate) fn starts_expression(&self) -> bool {
        match self.peek() {
            Token::Eof => false,
            Token::Punct(
                Punct::Semi
                | Punct::CloseParen
                | Punct::CloseBracket
                | Punct::CloseBrace
                | Punct::Comma
                | Punct::FatArrow,
            ) => false,
            Token::Punct(Punct::OpenBrace) => !self.restrictions.no_struct_literal,
            _ => true,
        }
    }

    /// Prefix operators
    pub(crate) fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Punct(Punct::Minus) => Some(UnaryOp::Neg),
            Token::Punct(Punct::Not) => Some(UnaryOp::Not),
            Token::Punct(Punct::Star) => Some(UnaryOp::Deref),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        match self.peek() {
            Token::Punct(Punct::And) | Token::Punct(Punct::AndAnd) => {
                let double = self.check_punct(Punct::AndAnd);
                self.advance();
                let mutable = self.match_keyword(Keyword::Mut);
                let operand = Expr::Ref {
                    lifetime: None,
                    mutable,
                    operand: Box::new(self.parse_unary()?),
                };
                if double {
                    Ok(Expr::Ref {
                        lifetime: None,
                        mutable: false,
                        operand: Box::new(operand),
                    })
                } else {
                    Ok(operand)
                }
            }
            Token::Punct(Punct::DotDot) | Token::Punct(Punct::DotDotEq) => {
                // `..end`, `..=end` or a bare `..`
                let op = if self.check_punct(Punct::DotDot) {
                    BinaryOp::Range
                } else {
                    BinaryOp::RangeInclusive
                };
                self.advance();
                let end = if self.starts_expression() {
                    self.parse_expression_above(Precedence::Or)?
                } else {
                    Expr::unit()
                };
                Ok(Expr::binary(op, Expr::unit(), end))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_primary()?;
        self.parse_postfix_from(expr)
    }

    /// Postfix chain, resolved left to right
    pub(crate) fn parse_postfix_from(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.peek() {
                Token::Punct(Punct::OpenParen) => {
                    let args = self.parse_call_arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                Token::Punct(Punct::OpenBracket) => {
                    self.advance();
                    let index = self.with_restrictions(Restrictions::default(), |p| p.parse_expression())?;
                    self.expect_punct(Punct::CloseBracket, "after index expression")?;
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                Token::Punct(Punct::Dot) => {
                    self.advance();
                    expr = self.parse_field_access(expr)?;
                }
                Token::Punct(Punct::Question) => {
                    self.advance();
                    expr = Expr::Try(Box::new(expr));
                }
                Token::Punct(Punct::PathSep) => {
                    self.advance();
                    if self.check_punct(Punct::Lt) {
                        expr = self.parse_generic_application(expr)?;
                    } else {
                        let name = self.parse_name()?;
                        expr = Expr::Path {
                            prefix: Box::new(expr),
                            name,
                        };
                    }
                }
                Token::Punct(Punct::Lt) if is_path_like(&expr) && self.looks_like_generics() => {
                    expr = self.parse_generic_application(expr)?;
                }
                Token::Punct(Punct::OpenBrace)
                    if is_path_like(&expr)
                        && !self.restrictions.no_struct_literal
                        && self.looks_like_struct_literal() =>
                {
                    expr = self.parse_struct_literal(expr)?;
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// `.field`, `.0`, `.await` and method turbofish `.collect::<T>`
    fn parse_field_access(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let field = match self.peek().clone() {
            Token::Ident(name) => Name::Ident(name),
            Token::Literal(LiteralKind::Integer, index) if index.chars().all(|c| c.is_ascii_digit()) => {
                Name::Ident(index)
            }
            Token::Keyword(Keyword::Await) => {
                self.advance();
                return Ok(target);
            }
            _ => return Err(self.unexpected("field name")),
        };
        self.advance();

        let field = Expr::Field {
            target: Box::new(target),
            field,
        };
        if self.check_punct(Punct::PathSep) && self.peek_nth(1).is_punct(Punct::Lt) {
            self.advance();
            return self.parse_generic_application(field);
        }
        Ok(field)
    }

    /// Speculative scan from a `<` for its matching `>`
    fn looks_like_generics(&self) -> bool {
        let mut lookahead = self.stream.fork();
        let mut depth: i32 = 0;
        let mut groups: i32 = 0;

        loop {
            match lookahead.advance() {
                Token::Punct(Punct::Lt) => depth += 1,
                Token::Punct(Punct::Gt) => depth -= 1,
                Token::Punct(Punct::Shr) => depth -= 2,
                Token::Punct(Punct::OpenParen) | Token::Punct(Punct::OpenBracket) => groups += 1,
                Token::Punct(Punct::CloseParen) | Token::Punct(Punct::CloseBracket) if groups > 0 => {
                    groups -= 1
                }
                Token::Punct(Punct::Semi) if groups > 0 => {}
                Token::Punct(
                    Punct::Semi
                    | Punct::CloseParen
                    | Punct::CloseBracket
                    | Punct::CloseBrace
                    | Punct::OpenBrace
                    | Punct::AndAnd
                    | Punct::OrOr,
                )
                | Token::Eof => return false,
                _ => {}
            }

            if depth == 0 {
                return true;
            }
            if depth < 0 {
                return false;
            }
        }
    }

    /// `{` then `}`, `..`, or a field name followed by `:`, `,` or `}`
    fn looks_like_struct_literal(&self) -> bool {
        match self.peek_nth(1) {
            Token::Punct(Punct::CloseBrace) | Token::Punct(Punct::DotDot) => true,
            Token::Ident(_) | Token::Literal(LiteralKind::Integer, _) => matches!(
                self.peek_nth(2),
                Token::Punct(Punct::Colon | Punct::Comma | Punct::CloseBrace)
            ),
            _ => false,
        }
    }

    fn parse_struct_literal(&mut self, ty: Expr) -> Result<Expr, ParseError> {
        self.expect_punct(Punct::OpenBrace, "to open struct literal")?;
        let mut fields = Vec::new();
        let mut base = None;

        while !self.check_punct(Punct::CloseBrace) {
            if self.match_punct(Punct::DotDot) {
                // A bare `..` is the rest marker of a struct pattern
                if !self.check_punct(Punct::CloseBrace) {
                    base = Some(Box::new(self.parse_expression()?));
                }
                break;
            }

            let name = match self.peek().clone() {
                Token::Ident(name) | Token::Literal(LiteralKind::Integer, name) => Name::Ident(name),
                _ => return Err(self.unexpected("field name in struct literal")),
            };
            self.advance();

            let value = if self.match_punct(Punct::Colon) {
                self.parse_expression()?
            } else {
                Expr::Name(name.clone())
            };
            fields.push(FieldInit { name, value });

            if !self.match_punct(Punct::Comma) {
                break;
            }
        }

        self.expect_punct(Punct::CloseBrace, "to close struct literal")?;
        Ok(Expr::Constructor {
            ty: Box::new(ty),
            fields,
            base,
        })
    }

    pub(crate) fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_punct(Punct::OpenParen, "to open argument list")?;
        self.with_restrictions(Restrictions::default(), |p| {
            p.parse_comma_list(Punct::CloseParen, "after arguments", |p| p.parse_expression())
        })
    }

    /// Atoms and the control-flow expressions that start with a keyword
    pub(crate) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().clone() {
            Token::Literal(LiteralKind::Label, label) => {
                self.advance();
                self.expect_punct(Punct::Colon, "after loop label")?;
                self.parse_loop(Some(Lifetime(label)))
            }
            Token::Literal(kind, text) => {
                self.advance();
                Ok(Expr::Literal(self.literal(kind, text)?))
            }
            Token::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            Token::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            Token::Ident(name)
                if self.peek_nth(1).is_punct(Punct::Not)
                    && matches!(
                        self.peek_nth(2),
                        Token::Punct(Punct::OpenParen | Punct::OpenBracket | Punct::OpenBrace)
                    ) =>
            {
                self.advance();
                self.advance();
                let args = self.parse_macro_arguments()?;
                Ok(Expr::MacroCall {
                    name: Name::Ident(name),
                    args,
                })
            }
            Token::Punct(Punct::OpenParen) => {
                self.advance();
                self.with_restrictions(Restrictions::default(), |p| p.parse_parenthesized())
            }
            Token::Punct(Punct::OpenBracket) => {
                self.advance();
                self.with_restrictions(Restrictions::default(), |p| p.parse_array())
            }
            Token::Punct(Punct::OpenBrace) => Ok(Expr::Block(self.parse_block()?)),
            Token::Punct(Punct::Or) | Token::Punct(Punct::OrOr) => self.parse_closure(),
            Token::Keyword(Keyword::Move) => {
                self.advance();
                self.parse_closure()
            }
            Token::Keyword(Keyword::Unsafe) => {
                self.advance();
                Ok(Expr::Block(self.parse_block()?))
            }
            Token::Keyword(Keyword::If) => Ok(Expr::If(self.parse_if()?)),
            Token::Keyword(Keyword::Match) => Ok(Expr::Match(self.parse_match()?)),
            Token::Keyword(Keyword::Loop | Keyword::While | Keyword::For) => self.parse_loop(None),
            Token::Keyword(Keyword::Break) => {
                self.advance();
                let label = self.parse_optional_label();
                let value = if self.starts_expression() {
                    Some(Box::new(self.parse_expression()?))
                } else {
                    None
                };
                Ok(Expr::Break { label, value })
            }
            Token::Keyword(Keyword::Continue) => {
                self.advance();
                let label = self.parse_optional_label();
                Ok(Expr::Continue { label })
            }
            Token::Keyword(Keyword::Return) => {
                self.advance();
                let value = if self.starts_expression() {
                    Some(Box::new(self.parse_expression()?))
                } else {
                    None
                };
                Ok(Expr::Return(value))
            }
            Token::Keyword(Keyword::Ref | Keyword::Mut) => {
                // Binding modes in patterns carry nothing for the output
                self.advance();
                self.parse_primary()
            }
            _ if self.is_name_start() => Ok(Expr::Name(self.parse_name()?)),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn literal(&self, kind: LiteralKind, text: String) -> Result<Literal, ParseError> {
        let malformed = |message: String| ParseError {
            kind: ParseErrorKind::MalformedLiteral(message),
            location: self.stream.location(),
        };

        match kind {
            LiteralKind::Integer => {
                let radix = match text.get(..2) {
                    Some("0x") => 16,
                    Some("0o") => 8,
                    Some("0b") => 2,
                    _ => return Ok(Literal::Int(text)),
                };
                // The suffix starts at the first non-hex character
                let digits: Vec<char> = text[2..]
                    .chars()
                    .take_while(|c| c.is_ascii_hexdigit() || *c == '_')
                    .filter(|c| *c != '_')
                    .collect();
                if digits.is_empty() {
                    return Err(malformed(format!("integer literal '{}' has no digits", text)));
                }
                if let Some(bad) = digits.iter().find(|c| !c.is_digit(radix)) {
                    return Err(malformed(format!(
                        "invalid digit '{}' for a base {} literal in '{}'",
                        bad, radix, text
                    )));
                }
                Ok(Literal::Int(text))
            }
            LiteralKind::Float => Ok(Literal::Float(text)),
            LiteralKind::Str => Ok(Literal::Str(text)),
            LiteralKind::Char => text
                .chars()
                .next()
                .map(Literal::Char)
                .ok_or_else(|| malformed("empty character literal".to_string())),
            LiteralKind::Byte => text
                .chars()
                .next()
                .and_then(|c| u8::try_from(u32::from(c)).ok())
                .map(Literal::Byte)
                .ok_or_else(|| malformed(format!("byte literal '{}' is out of range", text))),
            LiteralKind::ByteStr => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect::<Option<Vec<u8>>>()
                .map(Literal::ByteStr)
                .ok_or_else(|| malformed("non-ASCII character in byte string".to_string())),
            LiteralKind::Label => Err(malformed(format!("unexpected label '{}", text))),
        }
    }

    /// After `(`: unit, a parenthesized expression, or a tuple
    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        if self.match_punct(Punct::CloseParen) {
            return Ok(Expr::unit());
        }

        let first = self.parse_expression()?;
        if self.match_punct(Punct::CloseParen) {
            return Ok(first);
        }

        self.expect_punct(Punct::Comma, "or ')' after expression")?;
        let mut elements = vec![first];
        elements.extend(self.parse_comma_list(Punct::CloseParen, "to close tuple", |p| {
            p.parse_expression()
        })?);
        Ok(Expr::Tuple(elements))
    }

    /// After `[`: `[]`, `[a, b]` or `[value; count]`
    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        if self.match_punct(Punct::CloseBracket) {
            return Ok(Expr::Array(Vec::new()));
        }

        let first = self.parse_expression()?;
        if self.match_punct(Punct::Semi) {
            let count = self.parse_expression()?;
            self.expect_punct(Punct::CloseBracket, "after array length")?;
            return Ok(Expr::ArrayRepeat {
                value: Box::new(first),
                count: Box::new(count),
            });
        }

        let mut elements = vec![first];
        if self.match_punct(Punct::Comma) {
            elements.extend(self.parse_comma_list(Punct::CloseBracket, "to close array", |p| {
                p.parse_expression()
            })?);
        } else {
            self.expect_punct(Punct::CloseBracket, "to close array")?;
        }
        Ok(Expr::Array(elements))
    }

    /// Macro arguments inside any delimiter; `[value; count]` becomes one repeat argument
    fn parse_macro_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let close = match self.advance() {
            Token::Punct(Punct::OpenParen) => Punct::CloseParen,
            Token::Punct(Punct::OpenBracket) => Punct::CloseBracket,
            _ => Punct::CloseBrace,
        };

        self.with_restrictions(Restrictions::default(), |p| {
            if p.match_punct(close) {
                return Ok(Vec::new());
            }

            let first = p.parse_expression()?;
            if p.match_punct(Punct::Semi) {
                let count = p.parse_expression()?;
                p.expect_punct(close, "to close macro arguments")?;
                return Ok(vec![Expr::ArrayRepeat {
                    value: Box::new(first),
                    count: Box::new(count),
                }]);
            }

            let mut args = vec![first];
            if p.match_punct(Punct::Comma) {
                args.extend(p.parse_comma_list(close, "to close macro arguments", |p| p.parse_expression())?);
            } else {
                p.expect_punct(close, "to close macro arguments")?;
            }
            Ok(args)
        })
    }

    /// `|a, b: i32| body`, `|| body`, `|x| -> T { ... }`
    fn parse_closure(&mut self) -> Result<Expr, ParseError> {
        let params = if self.match_punct(Punct::OrOr) {
            Vec::new()
        } else {
            self.expect_punct(Punct::Or, "to open closure parameters")?;
            self.parse_comma_list(Punct::Or, "to close closure parameters", |p| {
                p.match_keyword(Keyword::Mut);
                let name = p.parse_name()?;
                let ty = if p.match_punct(Punct::Colon) {
                    Some(p.parse_type()?)
                } else {
                    None
                };
                Ok(Parameter::Named { name, ty })
            })?
        };

        let (return_type, body) = if self.match_punct(Punct::RArrow) {
            let ty = self.parse_type()?;
            (Some(Box::new(ty)), Expr::Block(self.parse_block()?))
        } else {
            (None, self.parse_expression()?)
        };

        Ok(Expr::Closure(Closure {
            params,
            return_type,
            body: Box::new(body),
        }))
    }
}

fn is_path_like(expr: &Expr) -> bool {
    matches!(expr, Expr::Name(_) | Expr::Path { .. } | Expr::WithGenerics { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Expr {
        Parser::from_source(source).unwrap().parse_expression().unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            expr("1 + 2 * 3"),
            Expr::binary(
                BinaryOp::Add,
                Expr::int("1"),
                Expr::binary(BinaryOp::Mul, Expr::int("2"), Expr::int("3"))
            )
        );
    }

    #[test]
    fn test_associativity() {
        assert_eq!(
            expr("a = b = c"),
            Expr::binary(
                BinaryOp::Assign,
                Expr::name("a"),
                Expr::binary(BinaryOp::Assign, Expr::name("b"), Expr::name("c"))
            )
        );
        assert_eq!(
            expr("a - b - c"),
            Expr::binary(
                BinaryOp::Sub,
                Expr::binary(BinaryOp::Sub, Expr::name("a"), Expr::name("b")),
                Expr::name("c")
            )
        );
    }

    #[test]
    fn test_cast_binds_tighter_than_arithmetic() {
        assert_eq!(
            expr("a + b as i64"),
            Expr::binary(
                BinaryOp::Add,
                Expr::name("a"),
                Expr::binary(BinaryOp::As, Expr::name("b"), Expr::name("i64"))
            )
        );
    }

    #[test]
    fn test_less_than_is_comparison_without_closing_angle() {
        assert_eq!(
            expr("x < y"),
            Expr::binary(BinaryOp::Lt, Expr::name("x"), Expr::name("y"))
        );
    }

    #[test]
    fn test_generic_struct_literal_index() {
        let parsed = expr("foo::bar<T>{a:1,b:2}[0]");

        let Expr::Index { target, index } = parsed else {
            panic!("Expected index expression");
        };
        assert_eq!(*index, Expr::int("0"));
        let Expr::Constructor { ty, fields, base } = *target else {
            panic!("Expected struct literal");
        };
        assert_eq!(fields.len(), 2);
        assert!(base.is_none());
        assert!(matches!(*ty, Expr::WithGenerics { ref args, .. } if args == &vec![Expr::name("T")]));
    }

    #[test]
    fn test_method_chain_with_turbofish() {
        let parsed = expr("items.iter().collect::<Vec<_>>()");
        let Expr::Call { callee, args } = parsed else {
            panic!("Expected call");
        };
        assert!(args.is_empty());
        assert!(matches!(*callee, Expr::WithGenerics { .. }));
    }

    #[test]
    fn test_ranges() {
        assert_eq!(
            expr("0..n + 1"),
            Expr::binary(
                BinaryOp::Range,
                Expr::int("0"),
                Expr::binary(BinaryOp::Add, Expr::name("n"), Expr::int("1"))
            )
        );
        assert_eq!(
            expr("a.."),
            Expr::binary(BinaryOp::Range, Expr::name("a"), Expr::unit())
        );
    }

    #[test]
    fn test_tuple_and_unit() {
        assert!(expr("()").is_unit());
        assert_eq!(expr("(a)"), Expr::name("a"));
        assert!(matches!(expr("(a,)"), Expr::Tuple(ref items) if items.len() == 1));
    }

    #[test]
    fn test_macro_repeat_form() {
        let parsed = expr("vec![0; 4]");
        assert!(matches!(
            parsed,
            Expr::MacroCall { ref args, .. } if matches!(args.as_slice(), [Expr::ArrayRepeat { .. }])
        ));
    }

    #[test]
    fn test_closure() {
        let Expr::Closure(closure) = expr("|a, b: i32| a + b") else {
            panic!("Expected closure");
        };
        assert_eq!(closure.params.len(), 2);
        assert!(matches!(*closure.body, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_malformed_byte_literal() {
        let err = Parser::from_source("b'\\u{400}'")
            .unwrap()
            .parse_expression()
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::MalformedLiteral(_)));
    }

    #[test]
    fn test_radix_digits_are_checked() {
        for source in ["0o9", "0b2", "0b1_0_3u8", "0x"] {
            let err = Parser::from_source(source)
                .unwrap()
                .parse_expression()
                .unwrap_err();
            assert!(matches!(err.kind, ParseErrorKind::MalformedLiteral(_)), "{}", source);
        }
        assert_eq!(expr("0b1010_u8"), Expr::int("0b1010_u8"));
        assert_eq!(expr("0o17"), Expr::int("0o17"));
        assert_eq!(expr("0xFFi32"), Expr::int("0xFFi32"));
    }
}
