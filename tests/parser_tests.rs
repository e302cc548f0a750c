// Integration tests for the parser's public entry point

use rustsharp::parser::ast::*;
use rustsharp::parser::lexer::LexErrorKind;
use rustsharp::parser::{parse_source, ParseErrorKind};
use rustsharp::TranslateError;

/// Tail expression of `fn f() { <expr> }`
fn tail(expr: &str) -> Expr {
    let source = format!("fn f() {{ {} }}", expr);
    let file = parse_source(&source).expect("Parsing failed");
    let Some(Item::Function(function)) = file.items.into_iter().next() else {
        panic!("expected a function");
    };
    let body = function.body.expect("function should have a body");
    *body.tail.expect("block should have a tail")
}

#[test]
fn test_precedence_groups_tighter_operator() {
    assert_eq!(
        tail("1 + 2 * 3"),
        Expr::binary(
            BinaryOp::Add,
            Expr::int("1"),
            Expr::binary(BinaryOp::Mul, Expr::int("2"), Expr::int("3"))
        )
    );
    assert_eq!(
        tail("a || b && c"),
        Expr::binary(
            BinaryOp::Or,
            Expr::name("a"),
            Expr::binary(BinaryOp::And, Expr::name("b"), Expr::name("c"))
        )
    );
}

#[test]
fn test_associativity() {
    assert_eq!(
        tail("a = b = c"),
        Expr::binary(
            BinaryOp::Assign,
            Expr::name("a"),
            Expr::binary(BinaryOp::Assign, Expr::name("b"), Expr::name("c"))
        )
    );
    assert_eq!(
        tail("a + b + c"),
        Expr::binary(
            BinaryOp::Add,
            Expr::binary(BinaryOp::Add, Expr::name("a"), Expr::name("b")),
            Expr::name("c")
        )
    );
}

#[test]
fn test_generic_struct_literal_index() {
    let Expr::Index { target, index } = tail("foo::bar<T>{a:1,b:2}[0]") else {
        panic!("expected an index expression");
    };
    assert_eq!(*index, Expr::int("0"));

    let Expr::Constructor { ty, fields, base } = *target else {
        panic!("expected a struct literal");
    };
    assert!(base.is_none());
    let names: Vec<&str> = fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    let Expr::WithGenerics { target, args, .. } = *ty else {
        panic!("expected a generic application");
    };
    assert_eq!(args, vec![Expr::name("T")]);
    assert_eq!(
        *target,
        Expr::Path {
            prefix: Box::new(Expr::name("foo")),
            name: Name::ident("bar"),
        }
    );
}

#[test]
fn test_less_than_without_closing_angle_is_comparison() {
    assert_eq!(tail("x < y"), Expr::binary(BinaryOp::Lt, Expr::name("x"), Expr::name("y")));

    let source = "fn f() { if a < b { c } }";
    assert!(parse_source(source).is_ok());
}

#[test]
fn test_nested_generics_close_with_shift_token() {
    let file = parse_source("fn f(grid: Vec<Vec<i32>>) {}").expect("Parsing failed");
    let Item::Function(function) = &file.items[0] else {
        panic!("expected a function");
    };
    let Parameter::Named { ty: Some(ty), .. } = &function.params[0] else {
        panic!("expected a typed parameter");
    };
    assert!(matches!(ty, Expr::WithGenerics { args, .. } if matches!(args[0], Expr::WithGenerics { .. })));
}

#[test]
fn test_unterminated_string_is_lex_error() {
    let err = parse_source("fn main() { let s = \"oops; }").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Lex(ref lex) if lex.kind == LexErrorKind::UnterminatedString
    ));
    assert_eq!(err.location().line, 1);
}

#[test]
fn test_missing_token_is_parse_error() {
    let err = parse_source("fn main() {\n    let x = ;\n}").unwrap_err();
    let TranslateError::Parse(parse) = &err else {
        panic!("expected a parse error, got {:?}", err);
    };
    assert!(matches!(parse.kind, ParseErrorKind::UnexpectedToken { .. }));
    assert_eq!(parse.location.line, 2);
    assert!(err.to_string().starts_with("Parse error at line 2"));
}

#[test]
fn test_unexpected_end() {
    let err = parse_source("struct Point { x: i32,").unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Parse(ref parse) if matches!(parse.kind, ParseErrorKind::UnexpectedEnd { .. })
    ));
}

#[test]
fn test_items_are_kept_in_order() {
    let source = r#"
        use std::fmt;
        /// Shapes
        #[derive(Debug)]
        enum Shape { Circle(f64), Square { side: f64 } }
        trait Area { fn area(&self) -> f64; }
        impl Area for Shape { fn area(&self) -> f64 { 0.0 } }
        mod util;
        const MAX: u32 = 10;
    "#;
    let file = parse_source(source).expect("Parsing failed");
    let kinds: Vec<&str> = file
        .items
        .iter()
        .map(|item| match item.unwrapped() {
            Item::Use(_) => "use",
            Item::Enum(_) => "enum",
            Item::Trait(_) => "trait",
            Item::Impl(_) => "impl",
            Item::Module(_) => "mod",
            Item::Const(_) => "const",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["use", "enum", "trait", "impl", "mod", "const"]);
    assert!(matches!(&file.items[1], Item::Documented { item, .. } if matches!(**item, Item::Attributed { .. })));
}
