//! Declaration parsing implementation
//!
//! This module handles parsing of items:
//!
//! - Functions: `fn name<T>(params) -> Ret where ... { ... }` (body optional)
//! - Data types: `struct` (named, tuple, unit) and `enum` (variants are structs)
//! - `trait` and `impl [Trait for] Type` blocks
//! - `mod`, `type`, `static`, `const`, `use`, `extern crate`, `macro_rules!`
//! - Outer doc comments and attributes, kept as wrappers around the item
//!
//! # Grammar
//!
//! ```text
//! item      ::= { doc_comment | attribute } [visibility] item_kind
//! item_kind ::= function | struct | enum | trait | impl | module
//!             | type_decl | static | const | use | extern_crate | macro_rules
//! function  ::= qualifiers 'fn' ident [generics] '(' params ')' ['->' type]
//!               [where_clause] (block | ';')
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{CommentKind, Keyword, LiteralKind, Punct, Token};
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse one item, including its doc comments and attributes
    pub(crate) fn parse_item(&mut self) -> Result<Item, ParseError> {
        if let Token::Comment(kind, text) = self.peek().clone() {
            self.advance();
            let style = match kind {
                CommentKind::DocBlock => DocStyle::Block,
                _ => DocStyle::Line,
            };
            let item = self.parse_item()?;
            return Ok(Item::Documented {
                doc: DocComment { style, text },
                item: Box::new(item),
            });
        }

        if self.check_punct(Punct::Pound) {
            let attribute = self.parse_attribute()?;
            let item = self.parse_item()?;
            return Ok(Item::Attributed {
                attribute,
                item: Box::new(item),
            });
        }

        self.skip_visibility()?;
        self.skip_qualifiers();

        match self.peek().clone() {
            Token::Keyword(Keyword::Fn) => Ok(Item::Function(self.parse_function()?)),
            Token::Keyword(Keyword::Struct) => {
                self.advance();
                Ok(Item::Struct(self.parse_struct_declaration()?))
            }
            Token::Keyword(Keyword::Enum) => Ok(Item::Enum(self.parse_enum()?)),
            Token::Keyword(Keyword::Trait) => Ok(Item::Trait(self.parse_trait()?)),
            Token::Keyword(Keyword::Impl) => Ok(Item::Impl(self.parse_impl()?)),
            Token::Keyword(Keyword::Mod) => Ok(Item::Module(self.parse_module()?)),
            Token::Keyword(Keyword::Type) => Ok(Item::TypeDecl(self.parse_type_declaration()?)),
            Token::Keyword(Keyword::Static) => Ok(Item::Static(self.parse_static()?)),
            Token::Keyword(Keyword::Const) => Ok(Item::Const(self.parse_const()?)),
            Token::Keyword(Keyword::Use) => Ok(Item::Use(self.parse_use()?)),
            Token::Keyword(Keyword::Extern) => {
                self.advance();
                self.expect_keyword(Keyword::Crate, "after 'extern'")?;
                let name = Name::Ident(self.expect_identifier()?);
                if self.match_keyword(Keyword::As) {
                    self.parse_name()?;
                }
                self.expect_semicolon("after extern crate")?;
                Ok(Item::ExternCrate(name))
            }
            Token::Ident(word) if word == "macro_rules" && self.peek_nth(1).is_punct(Punct::Not) => {
                self.advance();
                self.advance();
                let name = Name::Ident(self.expect_identifier()?);
                let braced = self.check_punct(Punct::OpenBrace);
                self.skip_token_tree()?;
                if !braced {
                    self.expect_semicolon("after macro_rules!")?;
                }
                Ok(Item::MacroRules(name))
            }
            _ => Err(self.unexpected("item")),
        }
    }

    /// `pub`, `pub(crate)`, `pub(in path)`
    fn skip_visibility(&mut self) -> Result<(), ParseError> {
        if self.match_keyword(Keyword::Pub) && self.check_punct(Punct::OpenParen) {
            self.skip_token_tree()?;
        }
        Ok(())
    }

    /// `const`, `async`, `unsafe`, `extern "abi"` in front of `fn`/`impl`/`trait`
    fn skip_qualifiers(&mut self) {
        loop {
            let next = self.peek_nth(1).clone();
            match self.peek() {
                Token::Keyword(Keyword::Const)
                    if matches!(
                        next,
                        Token::Keyword(Keyword::Fn | Keyword::Unsafe | Keyword::Async | Keyword::Extern)
                    ) =>
                {
                    self.advance();
                }
                Token::Keyword(Keyword::Async) => {
                    self.advance();
                }
                Token::Keyword(Keyword::Unsafe) => {
                    self.advance();
                }
                Token::Keyword(Keyword::Extern) if !next.is_keyword(Keyword::Crate) => {
                    self.advance();
                    if let Token::Literal(LiteralKind::Str, _) = self.peek() {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Skip doc comments and attributes where the output has no place for them
    pub(crate) fn skip_outer_attributes(&mut self) -> Result<(), ParseError> {
        loop {
            if let Token::Comment(..) = self.peek() {
                self.advance();
            } else if self.check_punct(Punct::Pound) {
                self.parse_attribute()?;
            } else {
                return Ok(());
            }
        }
    }

    /// `#[...]` or `#![...]`, reassembled into source-like text
    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        self.expect_punct(Punct::Pound, "to start attribute")?;
        let inner = self.match_punct(Punct::Not);
        if !self.check_punct(Punct::OpenBracket) {
            return Err(self.unexpected("'[' after '#'"));
        }

        let tokens = self.skip_token_tree()?;
        // Drop the surrounding brackets
        let body = &tokens[1..tokens.len().saturating_sub(1).max(1)];
        Ok(Attribute {
            inner,
            text: tokens_to_text(body),
        })
    }

    /// Consume one delimited group, returning its tokens including the delimiters
    fn skip_token_tree(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;

        loop {
            let token = self.peek().clone();
            match token {
                Token::Eof => return Err(self.unexpected("closing delimiter")),
                Token::Punct(Punct::OpenParen | Punct::OpenBracket | Punct::OpenBrace) => depth += 1,
                Token::Punct(Punct::CloseParen | Punct::CloseBracket | Punct::CloseBrace) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
            tokens.push(token);

            if depth == 0 {
                return Ok(tokens);
            }
        }
    }

    pub(crate) fn parse_function(&mut self) -> Result<Function, ParseError> {
        self.expect_keyword(Keyword::Fn, "to start function")?;
        let name = Name::Ident(self.expect_identifier()?);
        let (lifetimes, mut generics) = self.parse_generic_params()?;

        self.expect_punct(Punct::OpenParen, "to open parameter list")?;
        let params = self.parse_comma_list(Punct::CloseParen, "to close parameter list", |p| p.parse_parameter())?;

        let return_type = if self.match_punct(Punct::RArrow) {
            self.parse_type()?
        } else {
            Expr::unit()
        };
        self.parse_where_clause(&mut generics)?;

        let body = if self.match_punct(Punct::Semi) {
            None
        } else {
            Some(self.parse_block()?)
        };

        Ok(Function {
            name,
            lifetimes,
            generics,
            params,
            return_type,
            body,
        })
    }

    /// `self`, `&self`, `&'a mut self`, `mut self`, `self: Type` or `[mut] name: Type`
    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        self.skip_outer_attributes()?;

        let by_ref = self.check_punct(Punct::And)
            && matches!(
                (self.peek_nth(1), self.peek_nth(2)),
                (Token::Keyword(Keyword::SelfValue), _)
                    | (Token::Keyword(Keyword::Mut), Token::Keyword(Keyword::SelfValue))
                    | (Token::Literal(LiteralKind::Label, _), _)
            );
        if by_ref {
            self.advance();
            self.parse_optional_label();
            let mutable = self.match_keyword(Keyword::Mut);
            self.expect_keyword(Keyword::SelfValue, "in receiver")?;
            return Ok(Parameter::Receiver { by_ref, mutable });
        }

        let mutable = self.match_keyword(Keyword::Mut);
        if self.match_keyword(Keyword::SelfValue) {
            if self.match_punct(Punct::Colon) {
                // `self: Box<Self>` and friends still translate as the receiver
                self.parse_type()?;
            }
            return Ok(Parameter::Receiver {
                by_ref: false,
                mutable,
            });
        }

        let name = self.parse_name()?;
        self.expect_punct(Punct::Colon, "after parameter name")?;
        let ty = self.parse_type()?;
        Ok(Parameter::Named { name, ty: Some(ty) })
    }

    /// After `struct`: name, generics and a named, tuple or unit body
    fn parse_struct_declaration(&mut self) -> Result<Struct, ParseError> {
        let name = Name::Ident(self.expect_identifier()?);
        let (lifetimes, mut generics) = self.parse_generic_params()?;
        self.parse_where_clause(&mut generics)?;

        let (fields, tuple) = self.parse_fields()?;
        if tuple {
            self.parse_where_clause(&mut generics)?;
        }
        if tuple || fields.is_empty() {
            self.match_punct(Punct::Semi);
        }

        Ok(Struct {
            name,
            lifetimes,
            generics,
            fields,
            tuple,
        })
    }

    /// `{ a: A, b: B }`, `(A, B)` or nothing; returns the fields and whether they are positional
    fn parse_fields(&mut self) -> Result<(Vec<StructField>, bool), ParseError> {
        if self.match_punct(Punct::OpenBrace) {
            let fields = self.parse_comma_list(Punct::CloseBrace, "to close field list", |p| {
                p.skip_outer_attributes()?;
                p.skip_visibility()?;
                let name = Name::Ident(p.expect_identifier()?);
                p.expect_punct(Punct::Colon, "after field name")?;
                let ty = p.parse_type()?;
                Ok(StructField { name, ty })
            })?;
            Ok((fields, false))
        } else if self.match_punct(Punct::OpenParen) {
            let types = self.parse_comma_list(Punct::CloseParen, "to close tuple fields", |p| {
                p.skip_outer_attributes()?;
                p.skip_visibility()?;
                p.parse_type()
            })?;
            let fields = types
                .into_iter()
                .enumerate()
                .map(|(index, ty)| StructField {
                    name: Name::Ident(index.to_string()),
                    ty,
                })
                .collect();
            Ok((fields, true))
        } else {
            Ok((Vec::new(), false))
        }
    }

    fn parse_enum(&mut self) -> Result<Enum, ParseError> {
        self.expect_keyword(Keyword::Enum, "to start enum")?;
        let name = Name::Ident(self.expect_identifier()?);
        let (lifetimes, mut generics) = self.parse_generic_params()?;
        self.parse_where_clause(&mut generics)?;

        self.expect_punct(Punct::OpenBrace, "to open enum body")?;
        let variants = self.parse_comma_list(Punct::CloseBrace, "to close enum body", |p| {
            p.skip_outer_attributes()?;
            let name = Name::Ident(p.expect_identifier()?);
            let (fields, tuple) = p.parse_fields()?;
            if p.match_punct(Punct::Eq) {
                // Explicit discriminants are not carried over
                p.parse_expression()?;
            }
            Ok(Struct {
                name,
                lifetimes: Vec::new(),
                generics: Vec::new(),
                fields,
                tuple,
            })
        })?;

        Ok(Enum {
            name,
            lifetimes,
            generics,
            variants,
        })
    }

    fn parse_trait(&mut self) -> Result<Trait, ParseError> {
        self.expect_keyword(Keyword::Trait, "to start trait")?;
        let name = Name::Ident(self.expect_identifier()?);
        let (lifetimes, mut generics) = self.parse_generic_params()?;
        let supertraits = if self.match_punct(Punct::Colon) {
            self.parse_bounds()?
        } else {
            Vec::new()
        };
        self.parse_where_clause(&mut generics)?;
        let items = self.parse_item_block()?;

        Ok(Trait {
            name,
            lifetimes,
            generics,
            supertraits,
            items,
        })
    }

    fn parse_impl(&mut self) -> Result<Impl, ParseError> {
        self.expect_keyword(Keyword::Impl, "to start impl")?;
        let (lifetimes, mut generics) = self.parse_generic_params()?;
        // Negative impls `impl !Send for T`
        self.match_punct(Punct::Not);

        let first = self.parse_type()?;
        let (ty, trait_ref) = if self.match_keyword(Keyword::For) {
            (self.parse_type()?, Some(first))
        } else {
            (first, None)
        };
        self.parse_where_clause(&mut generics)?;
        let items = self.parse_item_block()?;

        Ok(Impl {
            lifetimes,
            generics,
            ty,
            trait_ref,
            items,
        })
    }

    /// `{ item* }`
    fn parse_item_block(&mut self) -> Result<Vec<Item>, ParseError> {
        self.expect_punct(Punct::OpenBrace, "to open item list")?;
        let mut items = Vec::new();
        while !self.match_punct(Punct::CloseBrace) {
            items.push(self.parse_item()?);
        }
        Ok(items)
    }

    fn parse_module(&mut self) -> Result<Module, ParseError> {
        self.expect_keyword(Keyword::Mod, "to start module")?;
        let name = Name::Ident(self.expect_identifier()?);
        let items = if self.match_punct(Punct::Semi) {
            None
        } else {
            Some(self.parse_item_block()?)
        };
        Ok(Module { name, items })
    }

    /// `type Name<T>[: Bounds] [= Type];`
    fn parse_type_declaration(&mut self) -> Result<TypeDecl, ParseError> {
        self.expect_keyword(Keyword::Type, "to start type alias")?;
        let name = Name::Ident(self.expect_identifier()?);
        let (_, mut generics) = self.parse_generic_params()?;
        if self.match_punct(Punct::Colon) {
            self.parse_bounds()?;
        }
        self.parse_where_clause(&mut generics)?;
        let ty = if self.match_punct(Punct::Eq) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect_semicolon("after type alias")?;
        Ok(TypeDecl { name, generics, ty })
    }

    fn parse_static(&mut self) -> Result<Static, ParseError> {
        self.expect_keyword(Keyword::Static, "to start static")?;
        let mutable = self.match_keyword(Keyword::Mut);
        let name = Name::Ident(self.expect_identifier()?);
        self.expect_punct(Punct::Colon, "after static name")?;
        let ty = self.parse_type()?;
        self.expect_punct(Punct::Eq, "in static declaration")?;
        let value = self.parse_expression()?;
        self.expect_semicolon("after static declaration")?;
        Ok(Static {
            name,
            mutable,
            ty,
            value,
        })
    }

    fn parse_const(&mut self) -> Result<Const, ParseError> {
        self.expect_keyword(Keyword::Const, "to start constant")?;
        let name = self.parse_name()?;
        self.expect_punct(Punct::Colon, "after constant name")?;
        let ty = self.parse_type()?;
        let value = if self.match_punct(Punct::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_semicolon("after constant")?;
        Ok(Const { name, ty, value })
    }

    fn parse_use(&mut self) -> Result<Use, ParseError> {
        self.expect_keyword(Keyword::Use, "to start use declaration")?;
        self.match_punct(Punct::PathSep);
        let mut paths = Vec::new();
        self.parse_use_tree(Vec::new(), &mut paths)?;
        self.expect_semicolon("after use declaration")?;
        Ok(Use { paths })
    }

    /// Flatten `a::{b, c::d as e, f::*}` into one `UsePath` per leaf
    fn parse_use_tree(&mut self, mut prefix: Vec<Name>, out: &mut Vec<UsePath>) -> Result<(), ParseError> {
        loop {
            if self.match_punct(Punct::Star) {
                out.push(UsePath {
                    segments: prefix,
                    alias: None,
                    glob: true,
                });
                return Ok(());
            }

            if self.match_punct(Punct::OpenBrace) {
                let branches = self.parse_comma_list(Punct::CloseBrace, "to close use group", |p| {
                    let mut leaves = Vec::new();
                    p.parse_use_tree(prefix.clone(), &mut leaves)?;
                    Ok(leaves)
                })?;
                out.extend(branches.into_iter().flatten());
                return Ok(());
            }

            prefix.push(self.parse_name()?);
            if !self.match_punct(Punct::PathSep) {
                break;
            }
        }

        let alias = if self.match_keyword(Keyword::As) {
            Some(self.parse_name()?)
        } else {
            None
        };
        out.push(UsePath {
            segments: prefix,
            alias,
            glob: false,
        });
        Ok(())
    }
}

/// Source-like spelling of a token run, as used for attribute text
fn tokens_to_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut previous_word = false;

    for token in tokens {
        let (spelling, word) = match token {
            Token::Ident(name) => (name.clone(), true),
            Token::Keyword(keyword) => (keyword.as_str().to_string(), true),
            Token::Literal(LiteralKind::Str, value) => (format!("{:?}", value), true),
            Token::Literal(LiteralKind::Char, value) => (format!("'{}'", value), true),
            Token::Literal(_, value) => (value.clone(), true),
            Token::Punct(punct) => (punct.as_str().to_string(), false),
            Token::Comment(..) | Token::Eof => continue,
        };

        if word && previous_word {
            text.push(' ');
        }
        if token.is_punct(Punct::Eq) {
            text.push(' ');
        }
        text.push_str(&spelling);
        if token.is_punct(Punct::Comma) || token.is_punct(Punct::Eq) {
            text.push(' ');
        }
        previous_word = word;
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(source: &str) -> Vec<Item> {
        Parser::from_source(source).unwrap().parse_source_file().unwrap().items
    }

    #[test]
    fn test_function_with_receiver_and_generics() {
        let parsed = items("impl<T> Stack<T> { pub fn push(&mut self, value: T) where T: Clone {} }");

        let Item::Impl(imp) = &parsed[0] else {
            panic!("Expected impl block");
        };
        assert!(imp.trait_ref.is_none());
        let Item::Function(push) = &imp.items[0] else {
            panic!("Expected method");
        };
        assert_eq!(
            push.params[0],
            Parameter::Receiver {
                by_ref: true,
                mutable: true
            }
        );
        assert!(push.has_receiver());
        assert!(push.returns_unit());
    }

    #[test]
    fn test_bodiless_trait_method() {
        let parsed = items("trait Shape: Debug { fn area(&self) -> f64; }");

        let Item::Trait(shape) = &parsed[0] else {
            panic!("Expected trait");
        };
        assert_eq!(shape.supertraits, vec![Expr::name("Debug")]);
        let Item::Function(area) = &shape.items[0] else {
            panic!("Expected trait method");
        };
        assert!(area.body.is_none());
    }

    #[test]
    fn test_enum_variants() {
        let parsed = items("enum Shape { Unit, Circle(f64), Rect { w: f64, h: f64 }, Code = 3 }");

        let Item::Enum(shape) = &parsed[0] else {
            panic!("Expected enum");
        };
        assert_eq!(shape.variants.len(), 4);
        assert!(shape.variants[1].tuple);
        assert_eq!(shape.variants[1].fields[0].name, Name::ident("0"));
        assert_eq!(shape.variants[2].fields.len(), 2);
    }

    #[test]
    fn test_use_tree_flattening() {
        let parsed = items("use std::{fmt, io::{self, Write as W}, collections::*};");

        let Item::Use(decl) = &parsed[0] else {
            panic!("Expected use");
        };
        assert_eq!(decl.paths.len(), 4);
        assert_eq!(
            decl.paths[2],
            UsePath {
                segments: vec![Name::ident("std"), Name::ident("io"), Name::ident("Write")],
                alias: Some(Name::ident("W")),
                glob: false,
            }
        );
        assert!(decl.paths[3].glob);
    }

    #[test]
    fn test_doc_comments_and_attributes_wrap_items() {
        let parsed = items("/// A point\n#[derive(Debug, Clone)]\npub struct P(i32, i32);");

        let Item::Documented { doc, item } = &parsed[0] else {
            panic!("Expected documented item");
        };
        assert_eq!(doc.text, " A point");
        let Item::Attributed { attribute, item } = item.as_ref() else {
            panic!("Expected attribute");
        };
        assert_eq!(attribute.text, "derive(Debug, Clone)");
        assert!(matches!(item.as_ref(), Item::Struct(s) if s.tuple));
    }

    #[test]
    fn test_misc_items() {
        let parsed = items(
            "mod io; extern crate core; macro_rules! m { () => {} } static mut N: u32 = 0; const C: i32 = 1; type R<T> = Result<T, E>;",
        );
        assert_eq!(parsed.len(), 6);
        assert!(matches!(&parsed[0], Item::Module(m) if m.items.is_none()));
        assert!(matches!(&parsed[1], Item::ExternCrate(_)));
        assert!(matches!(&parsed[2], Item::MacroRules(_)));
        assert!(matches!(&parsed[3], Item::Static(s) if s.mutable));
        assert!(matches!(&parsed[5], Item::TypeDecl(t) if t.generics.len() == 1));
    }
}
