// End-to-end translation tests through the public API

use rustsharp::{translate, translate_with, TranslateError, TranslatorConfig};

#[test]
fn test_add_function() {
    let text = translate("fn add(a: i32, b: i32) -> i32 { a + b }").expect("Translation failed");
    assert_eq!(
        text,
        "public static class Crate\n{\n    public static int Add(int A, int B)\n    {\n        return A + B;\n    }\n}\n"
    );
}

#[test]
fn test_point_struct() {
    let text = translate("struct Point { x: i32, y: i32 }").expect("Translation failed");
    assert_eq!(
        text,
        "public static class Crate\n{\n    public partial class Point\n    {\n        public int X;\n        public int Y;\n    }\n}\n"
    );
}

#[test]
fn test_sibling_bindings_get_suffixes() {
    let text = translate("fn f() -> i32 { let x = 1; let x = x + 1; x }").expect("Translation failed");
    assert!(text.contains("        var X = 1;\n        var X1 = X + 1;\n        return X1;\n"));
}

#[test]
fn test_parameters_occupy_names_for_nested_scopes() {
    let source = "fn f(x: i32) -> i32 { if x > 0 { let x = x * 2; return x; } x }";
    let text = translate(source).expect("Translation failed");
    assert!(text.contains("public static int F(int X)"));
    assert!(text.contains("var X1 = X * 2;"));
    assert!(text.contains("return X1;"));
    assert!(text.ends_with("        return X;\n    }\n}\n"));
}

#[test]
fn test_names_are_free_again_after_scope_ends() {
    let source = "fn f() { { let a = 1; use_it(a); } { let a = 2; use_it(a); } }";
    let text = translate(source).expect("Translation failed");
    assert!(!text.contains("A1"));
    assert_eq!(text.matches("var A = ").count(), 2);
}

#[test]
fn test_value_if_is_wrapped_but_statement_if_is_not() {
    let text = translate("fn pick(c: bool) -> i32 { let v = if c { 1 } else { 2 }; v }").expect("Translation failed");
    assert!(text.contains("var V = new Func<dynamic>(() =>"));
    assert!(text.contains("return 1;"));
    assert!(text.starts_with("using System;\n\n"));

    let text = translate("fn run(c: bool) { if c { go(); } else { stop(); } }").expect("Translation failed");
    assert!(!text.contains("Func"));
    assert!(text.contains("        if (C)\n        {\n            Go();\n        }\n        else\n"));
}

#[test]
fn test_tail_match_with_block_arms_returns_wrapped_value() {
    let source = "fn pick(k: i32) -> i32 { match k { 0 => { let z = 1; z } _ => { 2 } } }";
    let text = translate(source).expect("Translation failed");
    assert!(text.contains("        return new Func<dynamic>(() =>\n"));
    assert!(text.contains("switch (K)"));
}

#[test]
fn test_typed_let_splices_name_before_value() {
    let source = "fn f(k: i32) { let total: i64 = match k { 0 => 1, _ => 2 }; }";
    let text = translate(source).expect("Translation failed");
    assert!(text.contains("        long Total = new Func<dynamic>(() =>\n"));
    assert!(text.contains("                case 0:\n                    return 1;\n"));
}

#[test]
fn test_statement_match_arms_break() {
    let source = "fn f(n: i32) { match n { 0 => zero(), _ => other() } }";
    let text = translate(source).expect("Translation failed");
    assert!(text.contains("case 0:\n                Zero();\n                break;\n"));
    assert!(text.contains("default:\n                Other();\n                break;\n"));
}

#[test]
fn test_unterminated_string_aborts() {
    let err = translate("fn main() { let s = \"oops; }").unwrap_err();
    assert!(matches!(err, TranslateError::Lex(_)));
    assert!(err.to_string().starts_with("Lexer error at line 1"));
}

#[test]
fn test_unsupported_items_leave_placeholders() {
    let source = "macro_rules! noisy { () => {} }\ntype Pair<T> = (T, T);\nfn keep() -> u8 { 1 }";
    let translation = translate_with(source, &TranslatorConfig::default()).expect("Translation failed");
    let gaps: Vec<String> = translation.gaps.iter().map(|gap| gap.to_string()).collect();
    assert_eq!(
        gaps,
        vec![
            "untranslated: macro_rules! noisy".to_string(),
            "untranslated: generic type alias Pair".to_string()
        ]
    );
    assert!(translation.text.contains("    // untranslated: macro_rules! noisy\n"));
    assert!(translation.text.contains("public static byte Keep()"));
}

#[test]
fn test_type_overrides_change_emitted_names() {
    let source = "fn size(v: u16) -> usize { 0 }";
    let text = translate(source).expect("Translation failed");
    assert!(text.contains("public static nunt Size(ushort V)"));

    let config = TranslatorConfig::default().with_type_override("usize", "nuint");
    let text = translate_with(source, &config).expect("Translation failed").text;
    assert!(text.contains("public static nuint Size(ushort V)"));
}

#[test]
fn test_root_class_and_indent_width() {
    let config = TranslatorConfig::default().with_root_class("Program").with_indent_width(2);
    let text = translate_with("fn main() {}", &config).expect("Translation failed").text;
    assert_eq!(text, "public static class Program\n{\n  public static void Main()\n  {\n  }\n}\n");
}

#[test]
fn test_impl_and_trait() {
    let source = r#"
        trait Shape {
            fn area(&self) -> f64;
        }

        struct Square {
            side: f64,
        }

        impl Shape for Square {
            fn area(&self) -> f64 {
                self.side * self.side
            }
        }
    "#;
    let text = translate(source).expect("Translation failed");
    assert!(text.contains("    public interface Shape\n    {\n        public abstract double Area();\n    }\n"));
    assert!(text.contains("    public partial class Square\n    {\n        public double Side;\n    }\n"));
    assert!(text.contains("    public partial class Square : Shape\n    {\n        public double Area()\n"));
    assert!(text.contains("            return this.Side * this.Side;\n"));
}

#[test]
fn test_loops_and_output() {
    let source = r#"
        fn main() {
            let mut total = 0;
            for i in 0..10 {
                if i % 2 == 0 {
                    continue;
                }
                total += i;
            }
            println!("total = {total}");
        }
    "#;
    let text = translate(source).expect("Translation failed");
    assert!(text.contains("        var Total = 0;\n"));
    assert!(text.contains("        for (var I = 0; I < 10; I++)\n"));
    assert!(text.contains("                continue;\n"));
    assert!(text.contains("            Total += I;\n"));
    assert!(text.contains("        Console.WriteLine(\"total = {0}\", Total);\n"));
}

#[test]
fn test_names_that_convert_alike_stay_distinct() {
    let text = translate("fn f(a: i32) { let a_ = 1; let a = 2; }").expect("Translation failed");
    assert!(text.contains("public static void F(int A)"));
    assert!(text.contains("        var A1 = 1;\n        var A2 = 2;\n"));
    assert_eq!(text.matches("var A ").count(), 0);
}

#[test]
fn test_invalid_radix_digits_abort() {
    for source in ["fn f() { let x = 0o9; }", "fn f() { let y = 0b2; }"] {
        let err = translate(source).unwrap_err();
        assert!(matches!(err, TranslateError::Parse(_)), "{}", source);
        assert!(err.to_string().contains("Malformed literal"));
    }
}

#[test]
fn test_associated_type_is_not_hoisted() {
    let translation =
        translate_with("impl<T> Tr for W<T> { type Out = T; }", &TranslatorConfig::default()).expect("Translation failed");
    assert!(translation.text.starts_with("public static class Crate\n"));
    assert_eq!(translation.gaps.len(), 1);
    assert_eq!(translation.gaps[0].to_string(), "untranslated: associated type Out");
}
