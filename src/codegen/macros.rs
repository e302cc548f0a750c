// Macro invocations: formatting, collections, assertions and panics

use super::expressions::{quote_string, CsPrecedence};
use super::Generator;
use crate::parser::ast::*;

/// Macros that never return
pub(crate) fn is_diverging_macro(name: &Name) -> bool {
    matches!(name.as_str(), "panic" | "unreachable" | "todo" | "unimplemented")
}

/// A format string rewritten to C# composite formatting
#[derive(Debug, PartialEq)]
struct CompositeFormat {
    template: String,
    /// Inline `{name}` arguments, appended after the explicit ones
    captures: Vec<String>,
}

/// `"{} and {name:>4}"` → `"{0} and {1,4}"` with `name` captured.
///
/// `named` lists the `name = value` arguments in order; they follow the
/// `positional` ones, and only names missing from it become captures.
fn rewrite_format(template: &str, positional: usize, named: &[&str]) -> CompositeFormat {
    let mut out = String::with_capacity(template.len());
    let mut captures: Vec<String> = Vec::new();
    let mut next_positional = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push_str("{{");
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push_str("}}");
            }
            '}' => out.push_str("}}"),
            '{' => {
                let mut placeholder = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(c);
                }
                if !closed {
                    tracing::debug!(template, "unterminated format placeholder kept as text");
                    out.push_str("{{");
                    out.push_str(&placeholder.replace('{', "{{"));
                    continue;
                }

                let (argument, spec) = match placeholder.split_once(':') {
                    Some((argument, spec)) => (argument.trim(), spec),
                    None => (placeholder.trim(), ""),
                };

                let index = if argument.is_empty() {
                    next_positional += 1;
                    next_positional - 1
                } else if let Ok(position) = argument.parse::<usize>() {
                    position
                } else if let Some(slot) = named.iter().position(|name| *name == argument) {
                    positional + slot
                } else {
                    let capture = match captures.iter().position(|name| name == argument) {
                        Some(capture) => capture,
                        None => {
                            captures.push(argument.to_string());
                            captures.len() - 1
                        }
                    };
                    positional + named.len() + capture
                };
                out.push_str(&format!("{{{}{}}}", index, rewrite_spec(spec)));
            }
            other => out.push(other),
        }
    }

    CompositeFormat { template: out, captures }
}

/// Trailing `name = value` arguments of a formatting macro
fn split_named_arguments(args: &[Expr]) -> (&[Expr], Vec<(&str, &Expr)>) {
    let named_from = args
        .iter()
        .rposition(|arg| named_argument(arg).is_none())
        .map_or(0, |last_positional| last_positional + 1);
    let (positional, named) = args.split_at(named_from);
    (positional, named.iter().filter_map(named_argument).collect())
}

fn named_argument(arg: &Expr) -> Option<(&str, &Expr)> {
    match arg {
        Expr::Binary {
            op: BinaryOp::Assign,
            left,
            right,
        } => match left.as_ref() {
            Expr::Name(Name::Ident(name)) => Some((name.as_str(), right.as_ref())),
            _ => None,
        },
        _ => None,
    }
}

/// Format spec (`>8.2`, `04x`, `?`) → C# alignment and format string
fn rewrite_spec(spec: &str) -> String {
    let spec = spec.trim_end_matches('?').trim_end_matches('#');
    let mut rest = spec;

    let mut align = None;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(fill), Some(a @ ('<' | '^' | '>'))) => {
            align = Some(a);
            rest = &rest[fill.len_utf8() + 1..];
        }
        (Some(a @ ('<' | '^' | '>')), _) => {
            align = Some(a);
            rest = &rest[1..];
        }
        _ => {}
    }
    rest = rest.trim_start_matches(['+', '-', '#']);

    let zero_padded = rest.starts_with('0');
    let width_len = rest.chars().take_while(char::is_ascii_digit).count();
    let width = rest[..width_len].trim_start_matches('0').to_string();
    rest = &rest[width_len..];

    let mut precision = String::new();
    if let Some(after_dot) = rest.strip_prefix('.') {
        let len = after_dot.chars().take_while(char::is_ascii_digit).count();
        precision = after_dot[..len].to_string();
        rest = &after_dot[len..];
    }

    let mut result = String::new();
    if !width.is_empty() && !zero_padded {
        match align {
            Some('<') | Some('^') => result.push_str(&format!(",-{}", width)),
            _ => result.push_str(&format!(",{}", width)),
        }
    }

    let format = match rest {
        "x" | "X" => format!("{}{}", rest, if zero_padded { width.as_str() } else { "" }),
        "e" | "E" => rest.to_string(),
        _ if !precision.is_empty() => format!("F{}", precision),
        _ if zero_padded && !width.is_empty() => format!("D{}", width),
        "" => String::new(),
        other => {
            tracing::debug!(spec = other, "format type dropped");
            String::new()
        }
    };
    if !format.is_empty() {
        result.push(':');
        result.push_str(&format);
    }
    result
}

impl Generator {
    pub(crate) fn emit_macro(&mut self, name: &Name, args: &[Expr]) {
        match name.as_str() {
            "println" => self.emit_format_call("Console.WriteLine", args),
            "print" => self.emit_format_call("Console.Write", args),
            "eprintln" => self.emit_format_call("Console.Error.WriteLine", args),
            "eprint" => self.emit_format_call("Console.Error.Write", args),
            "format" => self.emit_format_call("string.Format", args),
            "write" | "writeln" => match args.split_first() {
                Some((writer, rest)) => {
                    self.emit_operand(writer, CsPrecedence::Primary);
                    let method = if name.as_str() == "write" { ".Write" } else { ".WriteLine" };
                    self.emit_format_call(method, rest);
                }
                None => self.gap_inline(format!("{}! without a writer", name.as_str())),
            },
            "vec" => self.emit_vec(args),
            "assert" | "debug_assert" => self.emit_assert(args, None),
            "assert_eq" | "debug_assert_eq" => self.emit_assert(args, Some(BinaryOp::Eq)),
            "assert_ne" | "debug_assert_ne" => self.emit_assert(args, Some(BinaryOp::Ne)),
            "matches" => match args {
                [value, pattern, ..] => {
                    self.emit_operand(value, CsPrecedence::Relational);
                    self.out.write(" is ");
                    self.emit_pattern(pattern);
                }
                _ => self.gap_inline("matches! without a pattern"),
            },
            "panic" | "unreachable" | "todo" | "unimplemented" => {
                self.require_using("System");
                self.out.write("throw new Exception(");
                if args.is_empty() {
                    let message = match name.as_str() {
                        "unreachable" => "internal error: entered unreachable code",
                        "todo" => "not yet implemented",
                        "unimplemented" => "not implemented",
                        _ => "explicit panic",
                    };
                    self.out.write(&quote_string(message));
                } else {
                    self.emit_formatted_message(args);
                }
                self.out.write(")");
            }
            "dbg" => match args {
                [single] => self.emit_value(single),
                _ => self.emit_value(&Expr::Tuple(args.to_vec())),
            },
            other => self.gap_inline(format!("{}!", other)),
        }
    }

    /// `target(format, args...)`, rewriting a literal format string
    fn emit_format_call(&mut self, target: &str, args: &[Expr]) {
        if target.starts_with("Console") {
            self.require_using("System");
        }
        self.out.write(target);
        self.out.write("(");
        self.emit_message(args);
        self.out.write(")");
    }

    /// Format string and arguments, without the surrounding call
    fn emit_message(&mut self, args: &[Expr]) {
        let Some((Expr::Literal(Literal::Str(template)), rest)) = args.split_first() else {
            self.emit_list(args);
            return;
        };

        let (positional, named) = split_named_arguments(rest);
        let names: Vec<&str> = named.iter().map(|(name, _)| *name).collect();
        let format = rewrite_format(template, positional.len(), &names);
        self.out.write(&quote_string(&format.template));
        for arg in positional.iter().chain(named.iter().map(|(_, value)| *value)) {
            self.out.write(", ");
            self.emit_value(arg);
        }
        for capture in &format.captures {
            let name = self.render_ident(capture);
            self.out.write(&format!(", {}", name));
        }
    }

    /// Message argument that is a single formatted string
    fn emit_formatted_message(&mut self, args: &[Expr]) {
        match args {
            [Expr::Literal(Literal::Str(template))] if !template.contains(['{', '}']) => {
                self.out.write(&quote_string(template))
            }
            _ => self.emit_format_call("string.Format", args),
        }
    }

    fn emit_vec(&mut self, args: &[Expr]) {
        match args {
            [Expr::ArrayRepeat { value, count }] => {
                self.require_using("System.Linq");
                self.out.write("Enumerable.Repeat(");
                self.emit_value(value);
                self.out.write(", ");
                self.emit_value(count);
                self.out.write(").ToList()");
            }
            [] => {
                self.require_using("System.Collections.Generic");
                self.out.write("new List<dynamic>()");
            }
            elements => {
                self.require_using("System.Collections.Generic");
                self.out.write("new List<dynamic> { ");
                self.emit_list(elements);
                self.out.write(" }");
            }
        }
    }

    fn emit_assert(&mut self, args: &[Expr], comparison: Option<BinaryOp>) {
        self.require_using("System.Diagnostics");
        self.out.write("Debug.Assert(");
        let message = match (comparison, args) {
            (Some(op), [left, right, message @ ..]) => {
                self.emit_value(&Expr::binary(op, left.clone(), right.clone()));
                message
            }
            (None, [condition, message @ ..]) => {
                self.emit_value(condition);
                message
            }
            _ => {
                self.gap_inline("assertion without operands");
                &[]
            }
        };
        if !message.is_empty() {
            self.out.write(", ");
            self.emit_formatted_message(message);
        }
        self.out.write(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::context::TranslationContext;
    use crate::config::TranslatorConfig;
    use crate::parser::Parser;

    fn emit(source: &str) -> String {
        let mut parser = Parser::from_source(source).expect("source should lex");
        let expr = parser.parse_expression().expect("source should parse");
        let mut generator = Generator::new(TranslatorConfig::default());
        let mut inline = generator.with_context(TranslationContext::Expression);
        inline.emit_value(&expr);
        drop(inline);
        generator.out.into_string()
    }

    #[test]
    fn test_rewrite_format_positions_and_captures() {
        let format = rewrite_format("{} + {} = {total}, again {0} {total}", 2, &[]);
        assert_eq!(format.template, "{0} + {1} = {2}, again {0} {2}");
        assert_eq!(format.captures, vec!["total".to_string()]);
    }

    #[test]
    fn test_rewrite_format_keeps_escaped_braces() {
        assert_eq!(rewrite_format("{{{}}}", 1, &[]).template, "{{{0}}}");
    }

    #[test]
    fn test_rewrite_format_escapes_stray_braces() {
        let format = rewrite_format("{", 0, &[]);
        assert_eq!(format.template, "{{");
        assert!(format.captures.is_empty());
        assert_eq!(rewrite_format("a } b {x", 0, &[]).template, "a }} b {{x");
    }

    #[test]
    fn test_named_arguments_take_slots_after_positional_ones() {
        let format = rewrite_format("{0} {name} {other}", 1, &["name"]);
        assert_eq!(format.template, "{0} {1} {2}");
        assert_eq!(format.captures, vec!["other".to_string()]);

        assert_eq!(
            emit("println!(\"{0} {name}\", a, name = b)"),
            "Console.WriteLine(\"{0} {1}\", A, B)"
        );
        assert_eq!(
            emit("format!(\"{w} {} {w}\", y, w = x + 1)"),
            "string.Format(\"{1} {0} {1}\", Y, X + 1)"
        );
        assert_eq!(emit("println!(\"{\")"), "Console.WriteLine(\"{{\")");
    }

    #[test]
    fn test_rewrite_spec() {
        assert_eq!(rewrite_spec("?"), "");
        assert_eq!(rewrite_spec("#?"), "");
        assert_eq!(rewrite_spec(".2"), ":F2");
        assert_eq!(rewrite_spec(">8"), ",8");
        assert_eq!(rewrite_spec("<8"), ",-8");
        assert_eq!(rewrite_spec("*^6"), ",-6");
        assert_eq!(rewrite_spec("04"), ":D4");
        assert_eq!(rewrite_spec("08x"), ":x8");
        assert_eq!(rewrite_spec("X"), ":X");
        assert_eq!(rewrite_spec("10.3"), ",10:F3");
    }

    #[test]
    fn test_console_macros() {
        assert_eq!(emit("println!()"), "Console.WriteLine()");
        assert_eq!(
            emit("println!(\"{} is {:.1}\", name, ratio)"),
            "Console.WriteLine(\"{0} is {1:F1}\", Name, Ratio)"
        );
        assert_eq!(emit("eprint!(\"{x}\")"), "Console.Error.Write(\"{0}\", X)");
        assert_eq!(emit("format!(\"{:?}\", v)"), "string.Format(\"{0}\", V)");
        assert_eq!(emit("writeln!(f, \"{}\", 1)"), "F.WriteLine(\"{0}\", 1)");
    }

    #[test]
    fn test_collection_macros() {
        assert_eq!(emit("vec![1, 2]"), "new List<dynamic> { 1, 2 }");
        assert_eq!(emit("vec![]"), "new List<dynamic>()");
        assert_eq!(emit("vec![0; n]"), "Enumerable.Repeat(0, N).ToList()");
    }

    #[test]
    fn test_assertion_macros() {
        assert_eq!(emit("assert!(x > 0)"), "Debug.Assert(X > 0)");
        assert_eq!(emit("assert_eq!(a + 1, b)"), "Debug.Assert(A + 1 == B)");
        assert_eq!(emit("assert_ne!(a, b, \"differ\")"), "Debug.Assert(A != B, \"differ\")");
        assert_eq!(
            emit("assert!(ok, \"failed at {}\", i)"),
            "Debug.Assert(Ok, string.Format(\"failed at {0}\", I))"
        );
        assert_eq!(emit("matches!(c, 'a'..='z')"), "C is >= 'a' and <= 'z'");
    }

    #[test]
    fn test_panicking_macros() {
        assert_eq!(emit("panic!(\"bad {}\", x)"), "throw new Exception(string.Format(\"bad {0}\", X))");
        assert_eq!(emit("todo!()"), "throw new Exception(\"not yet implemented\")");
        assert_eq!(emit("panic!(\"stop\")"), "throw new Exception(\"stop\")");
        assert!(is_diverging_macro(&Name::ident("unreachable")));
        assert!(!is_diverging_macro(&Name::ident("println")));
    }

    #[test]
    fn test_unknown_macro_is_a_gap() {
        assert_eq!(emit("custom!(1)"), "/* untranslated: custom! */");
    }
}
