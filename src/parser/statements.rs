//! Statement and block parsing implementation
//!
//! This module handles blocks and the block-like expressions:
//!
//! - Blocks: `{ stmt; stmt; tail }`
//! - Variable declarations: `let pattern: Type = value;`
//! - Control flow: `if`/`else`, `if let`, `match`, `loop`, `while`, `while let`, `for`
//! - Items nested inside blocks (local functions, `use`, ...)
//!
//! # Grammar
//!
//! ```text
//! block     ::= '{' { statement } [ expression ] '}'
//! statement ::= ';' | let_stmt | item
//!             | expression ';'
//!             | block_like_expression
//! let_stmt  ::= 'let' ['mut'] pattern [':' type] ['=' expression] ';'
//! ```
//!
//! An expression directly followed by `}` is the block's tail expression.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::expressions::Precedence;
use crate::parser::lexer::{Keyword, Punct, Token};
use crate::parser::parse::{ParseError, Parser, Restrictions};

impl Parser {
    /// Parse a braced block
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect_punct(Punct::OpenBrace, "to open block")?;
        self.with_restrictions(Restrictions::default(), |p| p.parse_block_body())
    }

    fn parse_block_body(&mut self) -> Result<Block, ParseError> {
        let mut block = Block::default();

        loop {
            self.skip_outer_attributes()?;
            if self.match_punct(Punct::CloseBrace) {
                return Ok(block);
            }

            if self.match_punct(Punct::Semi) {
                block.statements.push(Stmt::Empty);
            } else if self.check_keyword(Keyword::Let) {
                block.statements.push(Stmt::Let(self.parse_let()?));
            } else if self.starts_item() {
                block.statements.push(Stmt::Item(Box::new(self.parse_item()?)));
            } else {
                let expr = self.parse_statement_expression()?;
                if self.match_punct(Punct::Semi) {
                    block.statements.push(Stmt::Expr(expr));
                } else if self.match_punct(Punct::CloseBrace) {
                    block.tail = Some(Box::new(expr));
                    return Ok(block);
                } else if expr.is_block_like() {
                    block.statements.push(Stmt::Expr(expr));
                } else {
                    return Err(self.unexpected("';' or '}' after expression"));
                }
            }
        }
    }

    /// An expression at statement start; a leading block-like expression
    /// ends there unless a method call or `?` follows it
    pub(crate) fn parse_statement_expression(&mut self) -> Result<Expr, ParseError> {
        if !self.starts_block_like() {
            return self.parse_expression();
        }

        let expr = self.parse_primary()?;
        if self.check_punct(Punct::Dot) || self.check_punct(Punct::Question) {
            let expr = self.parse_postfix_from(expr)?;
            self.parse_binary_rhs(expr, Precedence::Assign)
        } else {
            Ok(expr)
        }
    }

    fn starts_block_like(&self) -> bool {
        match self.peek() {
            Token::Keyword(Keyword::If | Keyword::Match | Keyword::Loop | Keyword::While | Keyword::For) => true,
            Token::Keyword(Keyword::Unsafe) => self.peek_nth(1).is_punct(Punct::OpenBrace),
            Token::Punct(Punct::OpenBrace) => true,
            Token::Literal(crate::parser::lexer::LiteralKind::Label, _) => true,
            _ => false,
        }
    }

    /// Keywords that can only begin an item inside a block
    fn starts_item(&self) -> bool {
        match self.peek() {
            Token::Keyword(
                Keyword::Fn
                | Keyword::Struct
                | Keyword::Enum
                | Keyword::Trait
                | Keyword::Impl
                | Keyword::Mod
                | Keyword::Use
                | Keyword::Static
                | Keyword::Type
                | Keyword::Pub
                | Keyword::Extern,
            ) => true,
            Token::Keyword(Keyword::Const) => !self.peek_nth(1).is_punct(Punct::OpenBrace),
            Token::Keyword(Keyword::Unsafe) => matches!(
                self.peek_nth(1),
                Token::Keyword(Keyword::Fn | Keyword::Impl | Keyword::Trait)
            ),
            Token::Ident(name) => name == "macro_rules" && self.peek_nth(1).is_punct(Punct::Not),
            _ => false,
        }
    }

    /// `let pattern [: type] [= value];`
    pub(crate) fn parse_let(&mut self) -> Result<Let, ParseError> {
        self.expect_keyword(Keyword::Let, "to start declaration")?;
        let mutable = self.match_keyword(Keyword::Mut);
        let pattern = self.parse_binding_pattern()?;

        let ty = if self.match_punct(Punct::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let value = if self.match_punct(Punct::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        if ty.is_none() && value.is_none() {
            return Err(self.unexpected("':' or '=' in let statement"));
        }
        self.expect_semicolon("after let statement")?;

        Ok(Let {
            pattern,
            mutable,
            ty,
            value,
        })
    }

    /// Irrefutable binding: a name, `_`, or a tuple of bindings
    pub(crate) fn parse_binding_pattern(&mut self) -> Result<Expr, ParseError> {
        if self.match_punct(Punct::OpenParen) {
            let elements = self.parse_comma_list(Punct::CloseParen, "to close tuple pattern", |p| {
                p.match_keyword(Keyword::Mut);
                p.parse_binding_pattern()
            })?;
            return Ok(if elements.is_empty() {
                Expr::unit()
            } else {
                Expr::Tuple(elements)
            });
        }

        self.match_keyword(Keyword::Ref);
        self.match_keyword(Keyword::Mut);
        Ok(Expr::Name(self.parse_name()?))
    }

    /// `if cond { ... } [else if ... | else { ... }]`
    pub(crate) fn parse_if(&mut self) -> Result<If, ParseError> {
        self.expect_keyword(Keyword::If, "to start conditional")?;
        let condition = self.parse_condition()?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.match_keyword(Keyword::Else) {
            if self.check_keyword(Keyword::If) {
                Some(Box::new(Expr::If(self.parse_if()?)))
            } else {
                Some(Box::new(Expr::Block(self.parse_block()?)))
            }
        } else {
            None
        };

        Ok(If {
            condition: Box::new(condition),
            then_branch,
            else_branch,
        })
    }

    /// Head of `if`/`while`: an expression or `let pattern = value`
    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        let restricted = Restrictions {
            no_struct_literal: true,
        };
        self.with_restrictions(restricted, |p| {
            if p.match_keyword(Keyword::Let) {
                let pattern = p.parse_expression_above(Precedence::Range)?;
                p.expect_punct(Punct::Eq, "in let condition")?;
                let value = p.parse_expression_above(Precedence::Compare)?;
                Ok(Expr::Let {
                    pattern: Box::new(pattern),
                    value: Box::new(value),
                })
            } else {
                p.parse_expression()
            }
        })
    }

    /// `match scrutinee { pattern [if guard] => body, ... }`
    pub(crate) fn parse_match(&mut self) -> Result<Match, ParseError> {
        self.expect_keyword(Keyword::Match, "to start match")?;
        let restricted = Restrictions {
            no_struct_literal: true,
        };
        let scrutinee = self.with_restrictions(restricted, |p| p.parse_expression())?;
        self.expect_punct(Punct::OpenBrace, "to open match arms")?;

        let arms = self.with_restrictions(Restrictions::default(), |p| {
            let mut arms = Vec::new();
            loop {
                p.skip_outer_attributes()?;
                if p.match_punct(Punct::CloseBrace) {
                    return Ok(arms);
                }
                arms.push(p.parse_match_arm()?);
            }
        })?;

        Ok(Match {
            scrutinee: Box::new(scrutinee),
            arms,
        })
    }

    fn parse_match_arm(&mut self) -> Result<MatchArm, ParseError> {
        self.match_punct(Punct::Or);
        let pattern = self.parse_pattern()?;
        let guard = if self.match_keyword(Keyword::If) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_punct(Punct::FatArrow, "after match pattern")?;

        let body = self.parse_statement_expression()?;
        if !self.match_punct(Punct::Comma) && !self.check_punct(Punct::CloseBrace) && !body.is_block_like() {
            return Err(self.unexpected("',' or '}' after match arm"));
        }

        Ok(MatchArm {
            pattern,
            guard,
            body,
        })
    }

    /// `loop`, `while` or `for`, with an already-parsed label
    pub(crate) fn parse_loop(&mut self, label: Option<Lifetime>) -> Result<Expr, ParseError> {
        let restricted = Restrictions {
            no_struct_literal: true,
        };

        if self.match_keyword(Keyword::Loop) {
            let body = self.parse_block()?;
            Ok(Expr::Loop { label, body })
        } else if self.match_keyword(Keyword::While) {
            let condition = self.parse_condition()?;
            let body = self.parse_block()?;
            Ok(Expr::While {
                label,
                condition: Box::new(condition),
                body,
            })
        } else if self.match_keyword(Keyword::For) {
            let pattern = self.parse_binding_pattern()?;
            self.expect_keyword(Keyword::In, "in for loop")?;
            let iterable = self.with_restrictions(restricted, |p| p.parse_expression())?;
            let body = self.parse_block()?;
            Ok(Expr::For {
                label,
                pattern: Box::new(pattern),
                iterable: Box::new(iterable),
                body,
            })
        } else {
            Err(self.unexpected("'loop', 'while' or 'for'"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(source: &str) -> Block {
        Parser::from_source(source).unwrap().parse_block().unwrap()
    }

    #[test]
    fn test_tail_and_statements() {
        let parsed = block("{ let x = 1; x + 1 }");

        assert_eq!(parsed.statements.len(), 1);
        assert!(matches!(parsed.statements[0], Stmt::Let(_)));
        assert!(matches!(
            parsed.tail.as_deref(),
            Some(Expr::Binary { op: BinaryOp::Add, .. })
        ));
    }

    #[test]
    fn test_block_like_statement_without_semicolon() {
        let parsed = block("{ if a { b(); } *c = 1; }");

        assert_eq!(parsed.statements.len(), 2);
        assert!(matches!(parsed.statements[0], Stmt::Expr(Expr::If(_))));
        assert!(matches!(
            parsed.statements[1],
            Stmt::Expr(Expr::Binary { op: BinaryOp::Assign, .. })
        ));
        assert!(parsed.tail.is_none());
    }

    #[test]
    fn test_missing_semicolon_is_error() {
        let err = Parser::from_source("{ a b }").unwrap().parse_block().unwrap_err();
        assert!(err.to_string().contains("';' or '}'"));
    }

    #[test]
    fn test_if_with_comparison_condition() {
        let parsed = block("{ if x == y {} }");

        let Some(Expr::If(if_expr)) = parsed.tail.as_deref() else {
            panic!("Expected if as tail");
        };
        assert!(matches!(*if_expr.condition, Expr::Binary { op: BinaryOp::Eq, .. }));
        assert_eq!(if_expr.then_branch, Block::default());
    }

    #[test]
    fn test_let_requires_type_or_value() {
        let err = Parser::from_source("{ let x; }").unwrap().parse_block().unwrap_err();
        assert!(err.to_string().contains("let statement"));

        let parsed = block("{ let x: i32; }");
        let Stmt::Let(decl) = &parsed.statements[0] else {
            panic!("Expected let");
        };
        assert_eq!(decl.ty, Some(Expr::name("i32")));
        assert!(decl.value.is_none());
    }

    #[test]
    fn test_match_arms() {
        let parsed = block("{ match n { 0 => a, 1 | 2 if ok => { b } _ => c } }");

        let Some(Expr::Match(m)) = parsed.tail.as_deref() else {
            panic!("Expected match");
        };
        assert_eq!(m.arms.len(), 3);
        assert!(matches!(m.arms[1].pattern, Expr::Binary { op: BinaryOp::BitOr, .. }));
        assert!(m.arms[1].guard.is_some());
        assert!(m.arms[1].is_block_shaped());
        assert_eq!(m.arms[2].pattern, Expr::Name(Name::Underscore));
    }

    #[test]
    fn test_if_let_and_labeled_loop() {
        let parsed = block("{ 'outer: while let Some(x) = it.next() { break 'outer; } }");

        let Some(Expr::While { label, condition, .. }) = parsed.tail.as_deref() else {
            panic!("Expected while loop");
        };
        assert_eq!(label, &Some(Lifetime("outer".to_string())));
        assert!(matches!(**condition, Expr::Let { .. }));
    }

    #[test]
    fn test_for_over_range() {
        let parsed = block("{ for (i, x) in 0..n { } }");

        let Some(Expr::For { pattern, iterable, .. }) = parsed.tail.as_deref() else {
            panic!("Expected for loop");
        };
        assert!(matches!(**pattern, Expr::Tuple(_)));
        assert!(matches!(**iterable, Expr::Binary { op: BinaryOp::Range, .. }));
    }
}
