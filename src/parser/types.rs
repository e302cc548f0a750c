//! Type expressions and generic lists
//!
//! Types share the expression AST: a path type is an `Expr::Name`/`Expr::Path`,
//! generic application is `Expr::WithGenerics`, references are `Expr::Ref`,
//! `[T]` is a one-element `Expr::Array`, `[T; N]` an `Expr::ArrayRepeat`, and
//! tuples/unit reuse `Expr::Tuple` and `Literal::Unit`.
//!
//! Closure-trait sugar `Fn(A, B) -> R` and pointer types `fn(A) -> R` become a
//! generic application whose last argument is the return type (unit when no
//! `->` is written).

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, LiteralKind, Punct, Token};
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a type expression
    pub(crate) fn parse_type(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Punct(Punct::And) | Token::Punct(Punct::AndAnd) => {
                let double = self.check_punct(Punct::AndAnd);
                self.advance();
                let lifetime = self.parse_optional_label();
                let mutable = self.match_keyword(Keyword::Mut);
                let inner = Expr::Ref {
                    lifetime,
                    mutable,
                    operand: Box::new(self.parse_type()?),
                };
                if double {
                    Ok(Expr::Ref {
                        lifetime: None,
                        mutable: false,
                        operand: Box::new(inner),
                    })
                } else {
                    Ok(inner)
                }
            }
            Token::Punct(Punct::Star) => {
                // Raw pointers translate like the pointee
                self.advance();
                if !self.match_keyword(Keyword::Const) {
                    self.expect_keyword(Keyword::Mut, "or 'const' in raw pointer type")?;
                }
                self.parse_type()
            }
            Token::Punct(Punct::OpenBracket) => {
                self.advance();
                let element = self.parse_type()?;
                if self.match_punct(Punct::Semi) {
                    let count = self.with_restrictions(Default::default(), |p| p.parse_expression())?;
                    self.expect_punct(Punct::CloseBracket, "after array length")?;
                    Ok(Expr::ArrayRepeat {
                        value: Box::new(element),
                        count: Box::new(count),
                    })
                } else {
                    self.expect_punct(Punct::CloseBracket, "after slice element type")?;
                    Ok(Expr::Array(vec![element]))
                }
            }
            Token::Punct(Punct::OpenParen) => {
                self.advance();
                if self.match_punct(Punct::CloseParen) {
                    return Ok(Expr::unit());
                }
                let first = self.parse_type()?;
                if self.match_punct(Punct::CloseParen) {
                    return Ok(first);
                }
                self.expect_punct(Punct::Comma, "in tuple type")?;
                let mut elements = vec![first];
                elements.extend(self.parse_comma_list(Punct::CloseParen, "after tuple type", |p| {
                    p.parse_type()
                })?);
                Ok(Expr::Tuple(elements))
            }
            Token::Punct(Punct::Not) => {
                self.advance();
                Ok(Expr::name("!"))
            }
            Token::Keyword(Keyword::Dyn) | Token::Keyword(Keyword::Impl) => {
                self.advance();
                let mut bounds = self.parse_bounds()?;
                if bounds.is_empty() {
                    return Err(self.unexpected("trait bound"));
                }
                Ok(bounds.swap_remove(0))
            }
            Token::Keyword(Keyword::Fn) => {
                self.advance();
                self.parse_fn_sugar(Expr::name("fn"))
            }
            Token::Keyword(Keyword::Unsafe) | Token::Keyword(Keyword::Extern) => {
                // `unsafe extern "C" fn(...)`
                self.advance();
                if let Token::Literal(LiteralKind::Str, _) = self.peek() {
                    self.advance();
                }
                self.parse_type()
            }
            _ if self.is_name_start() => self.parse_type_path(),
            _ => Err(self.unexpected("type")),
        }
    }

    /// `a::b::C<T>` or `Fn(A) -> R`
    fn parse_type_path(&mut self) -> Result<Expr, ParseError> {
        let mut ty = Expr::Name(self.parse_name()?);

        loop {
            if self.check_punct(Punct::PathSep) {
                self.advance();
                if self.check_punct(Punct::Lt) {
                    ty = self.parse_generic_application(ty)?;
                } else {
                    let name = self.parse_name()?;
                    ty = Expr::Path {
                        prefix: Box::new(ty),
                        name,
                    };
                }
            } else if self.check_punct(Punct::Lt) {
                ty = self.parse_generic_application(ty)?;
            } else if self.check_punct(Punct::OpenParen) && is_closure_trait(&ty) {
                return self.parse_fn_sugar(ty);
            } else {
                return Ok(ty);
            }
        }
    }

    /// `(A, B) -> R` after a closure trait name
    fn parse_fn_sugar(&mut self, target: Expr) -> Result<Expr, ParseError> {
        self.expect_punct(Punct::OpenParen, "in function type")?;
        let mut args = self.parse_comma_list(Punct::CloseParen, "after function type parameters", |p| {
            p.parse_type()
        })?;
        let output = if self.match_punct(Punct::RArrow) {
            self.parse_type()?
        } else {
            Expr::unit()
        };
        args.push(output);

        Ok(Expr::WithGenerics {
            target: Box::new(target),
            lifetimes: Vec::new(),
            args,
        })
    }

    /// `target<'a, T, N = U>`; positioned on the `<`
    pub(crate) fn parse_generic_application(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let (lifetimes, args) = self.parse_generic_args()?;
        Ok(Expr::WithGenerics {
            target: Box::new(target),
            lifetimes,
            args,
        })
    }

    /// Generic argument list; a `>>` closing two lists is split
    pub(crate) fn parse_generic_args(&mut self) -> Result<(Vec<Lifetime>, Vec<Expr>), ParseError> {
        self.expect_punct(Punct::Lt, "to open generic arguments")?;
        let mut lifetimes = Vec::new();
        let mut args = Vec::new();

        while !self.stream.eat_closing_angle() {
            match self.peek().clone() {
                Token::Literal(LiteralKind::Label, name) => {
                    self.advance();
                    lifetimes.push(Lifetime(name));
                }
                Token::Literal(..) | Token::Punct(Punct::Minus) => {
                    args.push(self.parse_unary()?);
                }
                Token::Punct(Punct::OpenBrace) => {
                    args.push(Expr::Block(self.parse_block()?));
                }
                _ => {
                    let ty = self.parse_type()?;
                    if self.match_punct(Punct::Eq) {
                        // Associated type binding `Item = T`
                        let bound = self.parse_type()?;
                        args.push(Expr::binary(BinaryOp::Assign, ty, bound));
                    } else {
                        args.push(ty);
                    }
                }
            }

            if !self.match_punct(Punct::Comma) && !self.at_closing_angle() {
                return Err(self.unexpected("',' or '>' in generic arguments"));
            }
        }

        Ok((lifetimes, args))
    }

    fn at_closing_angle(&self) -> bool {
        self.check_punct(Punct::Gt) || self.check_punct(Punct::Shr)
    }

    /// Declaration generics `<'a, T: Bound + 'a, const N: usize, U = i32>`
    pub(crate) fn parse_generic_params(&mut self) -> Result<(Vec<Lifetime>, Vec<Generic>), ParseError> {
        let mut lifetimes = Vec::new();
        let mut generics = Vec::new();
        if !self.check_punct(Punct::Lt) {
            return Ok((lifetimes, generics));
        }
        self.advance();

        while !self.stream.eat_closing_angle() {
            if let Token::Literal(LiteralKind::Label, name) = self.peek().clone() {
                self.advance();
                lifetimes.push(Lifetime(name));
                if self.match_punct(Punct::Colon) {
                    // Lifetime outlives bounds carry nothing for the output
                    while self.parse_optional_label().is_some() && self.match_punct(Punct::Plus) {}
                }
            } else if self.match_keyword(Keyword::Const) {
                let name = Name::Ident(self.expect_identifier()?);
                self.expect_punct(Punct::Colon, "after const generic name")?;
                let ty = self.parse_type()?;
                generics.push(Generic {
                    name,
                    bounds: vec![ty],
                });
            } else {
                let name = Name::Ident(self.expect_identifier()?);
                let bounds = if self.match_punct(Punct::Colon) {
                    self.parse_bounds()?
                } else {
                    Vec::new()
                };
                if self.match_punct(Punct::Eq) {
                    self.parse_type()?;
                }
                generics.push(Generic { name, bounds });
            }

            if !self.match_punct(Punct::Comma) && !self.at_closing_angle() {
                return Err(self.unexpected("',' or '>' in generic parameters"));
            }
        }

        Ok((lifetimes, generics))
    }

    /// `A + B<T> + 'a + ?Sized`; lifetimes and `?` bounds are dropped
    pub(crate) fn parse_bounds(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut bounds = Vec::new();

        loop {
            if self.parse_optional_label().is_some() {
                // lifetime bound
            } else if self.match_punct(Punct::Question) {
                self.parse_type()?;
            } else if self.check_punct(Punct::OpenParen) {
                self.advance();
                bounds.extend(self.parse_bounds()?);
                self.expect_punct(Punct::CloseParen, "after parenthesized bound")?;
            } else if self.is_name_start() || self.check_keyword(Keyword::Fn) {
                bounds.push(self.parse_type()?);
            } else {
                break;
            }

            if !self.match_punct(Punct::Plus) {
                break;
            }
        }

        Ok(bounds)
    }

    /// `where T: A + B, U: C` merged into the matching generic parameters
    pub(crate) fn parse_where_clause(&mut self, generics: &mut [Generic]) -> Result<(), ParseError> {
        if !self.match_keyword(Keyword::Where) {
            return Ok(());
        }

        while !self.check_punct(Punct::OpenBrace) && !self.check_punct(Punct::Semi) && !self.is_at_end() {
            if self.parse_optional_label().is_some() {
                self.expect_punct(Punct::Colon, "in lifetime bound")?;
                while self.parse_optional_label().is_some() && self.match_punct(Punct::Plus) {}
            } else {
                let bounded = self.parse_type()?;
                self.expect_punct(Punct::Colon, "in where clause")?;
                let bounds = self.parse_bounds()?;

                let target = match &bounded {
                    Expr::Name(name) => generics.iter_mut().find(|generic| &generic.name == name),
                    _ => None,
                };
                match target {
                    Some(generic) => generic.bounds.extend(bounds),
                    None => tracing::debug!(?bounded, "dropping where-clause bound on non-parameter"),
                }
            }

            if !self.match_punct(Punct::Comma) {
                break;
            }
        }

        Ok(())
    }
}

fn is_closure_trait(ty: &Expr) -> bool {
    let name = match ty {
        Expr::Name(name) | Expr::Path { name, .. } => name,
        _ => return false,
    };
    matches!(name.ident_str(), Some("Fn" | "FnMut" | "FnOnce"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(source: &str) -> Expr {
        Parser::from_source(source).unwrap().parse_type().unwrap()
    }

    fn generic(target: Expr, args: Vec<Expr>) -> Expr {
        Expr::WithGenerics {
            target: Box::new(target),
            lifetimes: Vec::new(),
            args,
        }
    }

    #[test]
    fn test_nested_generics_split_shr() {
        let parsed = ty("Vec<Vec<i32>>");
        assert_eq!(
            parsed,
            generic(Expr::name("Vec"), vec![generic(Expr::name("Vec"), vec![Expr::name("i32")])])
        );
    }

    #[test]
    fn test_reference_with_lifetime() {
        match ty("&'a mut str") {
            Expr::Ref {
                lifetime,
                mutable,
                operand,
            } => {
                assert_eq!(lifetime, Some(Lifetime("a".to_string())));
                assert!(mutable);
                assert_eq!(*operand, Expr::name("str"));
            }
            other => panic!("Expected reference type, got {:?}", other),
        }
    }

    #[test]
    fn test_array_and_tuple_types() {
        assert!(matches!(ty("[u8; 4]"), Expr::ArrayRepeat { .. }));
        assert!(matches!(ty("[u8]"), Expr::Array(ref items) if items.len() == 1));
        assert!(matches!(ty("(i32, bool)"), Expr::Tuple(ref items) if items.len() == 2));
        assert!(ty("()").is_unit());
    }

    #[test]
    fn test_closure_trait_sugar() {
        let parsed = ty("Box<dyn Fn(i32) -> bool>");
        assert_eq!(
            parsed,
            generic(
                Expr::name("Box"),
                vec![generic(Expr::name("Fn"), vec![Expr::name("i32"), Expr::name("bool")])]
            )
        );
    }

    #[test]
    fn test_where_clause_merges_bounds() {
        let mut parser = Parser::from_source("<T: Clone, U> where U: Default {").unwrap();
        let (_, mut generics) = parser.parse_generic_params().unwrap();
        parser.parse_where_clause(&mut generics).unwrap();

        assert_eq!(generics[0].bounds, vec![Expr::name("Clone")]);
        assert_eq!(generics[1].bounds, vec![Expr::name("Default")]);
        assert!(parser.check_punct(Punct::OpenBrace));
    }
}
