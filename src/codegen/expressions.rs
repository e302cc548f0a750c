// Expression emission: operators, literals, calls, closures, constructors

use super::context::TranslationContext;
use super::names::to_pascal_case;
use super::Generator;
use crate::parser::ast::*;

/// C# operator precedence, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum CsPrecedence {
    Lambda,
    Assignment,
    ConditionalOr,
    ConditionalAnd,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Range,
    Unary,
    Primary,
}

impl CsPrecedence {
    /// The next stricter level
    pub(crate) fn tighter(self) -> Self {
        use CsPrecedence::*;
        match self {
            Lambda => Assignment,
            Assignment => ConditionalOr,
            ConditionalOr => ConditionalAnd,
            ConditionalAnd => LogicalOr,
            LogicalOr => LogicalXor,
            LogicalXor => LogicalAnd,
            LogicalAnd => Equality,
            Equality => Relational,
            Relational => Shift,
            Shift => Additive,
            Additive => Multiplicative,
            Multiplicative => Range,
            Range => Unary,
            Unary | Primary => Primary,
        }
    }
}

fn binary_precedence(op: BinaryOp) -> CsPrecedence {
    match op {
        BinaryOp::Or => CsPrecedence::ConditionalOr,
        BinaryOp::And => CsPrecedence::ConditionalAnd,
        BinaryOp::BitOr => CsPrecedence::LogicalOr,
        BinaryOp::BitXor => CsPrecedence::LogicalXor,
        BinaryOp::BitAnd => CsPrecedence::LogicalAnd,
        BinaryOp::Eq | BinaryOp::Ne => CsPrecedence::Equality,
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => CsPrecedence::Relational,
        BinaryOp::Shl | BinaryOp::Shr => CsPrecedence::Shift,
        BinaryOp::Add | BinaryOp::Sub => CsPrecedence::Additive,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => CsPrecedence::Multiplicative,
        BinaryOp::Range | BinaryOp::RangeInclusive => CsPrecedence::Range,
        BinaryOp::As => CsPrecedence::Unary,
        _ => CsPrecedence::Assignment,
    }
}

/// Precedence of the C# text `expr` is emitted as
///
/// Constructs emitted as their operand alone (`*x`, `&x`, `x?`, a block with
/// only a tail) report the operand's precedence.
pub(crate) fn precedence_of(expr: &Expr) -> CsPrecedence {
    match expr {
        Expr::Closure(_) => CsPrecedence::Lambda,
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary {
            op: UnaryOp::Deref,
            operand,
        } => precedence_of(operand),
        Expr::Unary { .. } => CsPrecedence::Unary,
        Expr::Ref {
            mutable: false,
            operand,
            ..
        } => precedence_of(operand),
        Expr::Ref { .. } => CsPrecedence::Unary,
        Expr::Try(inner) => precedence_of(inner),
        Expr::Let { .. } => CsPrecedence::Relational,
        Expr::MacroCall { name, args } => match (name.as_str(), args.as_slice()) {
            ("matches", _) => CsPrecedence::Relational,
            ("dbg", [inner]) => precedence_of(inner),
            _ => CsPrecedence::Primary,
        },
        Expr::Literal(Literal::Byte(_)) => CsPrecedence::Unary,
        Expr::Block(block) if block.statements.is_empty() => {
            block.tail.as_deref().map_or(CsPrecedence::Primary, precedence_of)
        }
        _ => CsPrecedence::Primary,
    }
}

/// `-x` whose output would start with another `-`
fn starts_with_minus(expr: &Expr) -> bool {
    match expr {
        Expr::Unary {
            op: UnaryOp::Neg, ..
        } => true,
        Expr::Unary {
            op: UnaryOp::Deref,
            operand,
        }
        | Expr::Ref {
            mutable: false,
            operand,
            ..
        } => starts_with_minus(operand),
        Expr::Try(inner) => starts_with_minus(inner),
        _ => false,
    }
}

/// Callee spelled like a type (`Point`, `Shape::Circle`): the call constructs it
fn names_a_type(callee: &Expr) -> bool {
    let last = match callee {
        Expr::Name(Name::Ident(name)) => name,
        Expr::Path {
            name: Name::Ident(name),
            ..
        } => name,
        _ => return false,
    };
    let mut chars = last.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.any(|c| c.is_ascii_lowercase())
}

impl Generator {
    /// Emit `expr` inline, in value position
    pub(crate) fn emit_expr(&mut self, expr: &Expr) {
        let mut inline = self.with_context(TranslationContext::Expression);
        inline.emit_value(expr);
    }

    /// Emit `expr`, parenthesised when it binds looser than `required`
    pub(crate) fn emit_operand(&mut self, expr: &Expr, required: CsPrecedence) {
        if precedence_of(expr) < required {
            self.out.write("(");
            self.emit_value(expr);
            self.out.write(")");
        } else {
            self.emit_value(expr);
        }
    }

    pub(crate) fn emit_value(&mut self, expr: &Expr) {
        match expr {
            Expr::Name(name) => {
                let text = self.render_name(name);
                self.out.write(&text);
            }
            Expr::Path { prefix, name } => {
                let text = self.render_path(prefix, name);
                self.out.write(&text);
            }
            Expr::Literal(literal) => match render_literal(literal) {
                Some(text) => self.out.write(&text),
                None => self.gap_inline(format!("out-of-range literal {}", literal_text(literal))),
            },
            Expr::Array(elements) if elements.is_empty() => self.out.write("new dynamic[0]"),
            Expr::Array(elements) => {
                self.out.write("new[] { ");
                self.emit_list(elements);
                self.out.write(" }");
            }
            Expr::ArrayRepeat { value, count } => {
                self.require_using("System.Linq");
                self.out.write("Enumerable.Repeat(");
                self.emit_value(value);
                self.out.write(", ");
                self.emit_value(count);
                self.out.write(").ToArray()");
            }
            Expr::Tuple(elements) if elements.len() == 1 => {
                self.require_using("System");
                self.out.write("ValueTuple.Create(");
                self.emit_list(elements);
                self.out.write(")");
            }
            Expr::Tuple(elements) => {
                self.out.write("(");
                self.emit_list(elements);
                self.out.write(")");
            }
            Expr::Unary { op, operand } => self.emit_unary(*op, operand),
            Expr::Ref {
                mutable, operand, ..
            } => {
                if *mutable {
                    self.out.write("ref ");
                    self.emit_operand(operand, CsPrecedence::Unary);
                } else {
                    self.emit_value(operand);
                }
            }
            Expr::Binary { op, left, right } => self.emit_binary(*op, left, right),
            Expr::Call { callee, args } => {
                if names_a_type(callee) {
                    self.out.write("new ");
                }
                self.emit_operand(callee, CsPrecedence::Primary);
                self.out.write("(");
                self.emit_list(args);
                self.out.write(")");
            }
            Expr::MacroCall { name, args } => self.emit_macro(name, args),
            Expr::Index { target, index } => {
                self.emit_operand(target, CsPrecedence::Primary);
                self.out.write("[");
                self.emit_value(index);
                self.out.write("]");
            }
            Expr::Field { target, field } => {
                self.emit_operand(target, CsPrecedence::Primary);
                self.out.write(".");
                let member = self.render_field(field);
                self.out.write(&member);
            }
            Expr::Try(inner) => self.emit_value(inner),
            Expr::Constructor { ty, fields, base } => self.emit_constructor(ty, fields, base.as_deref()),
            Expr::WithGenerics { target, args, .. } => {
                self.emit_operand(target, CsPrecedence::Primary);
                let args: Vec<String> = args.iter().map(|arg| self.render_type(arg)).collect();
                self.out.write(&format!("<{}>", args.join(", ")));
            }
            Expr::Closure(closure) => self.emit_closure(closure),
            Expr::Block(block) if block.statements.is_empty() => match &block.tail {
                Some(tail) => self.emit_value(tail),
                None => self.out.write("default"),
            },
            Expr::Let { pattern, value } => {
                self.emit_operand(value, CsPrecedence::Relational);
                self.out.write(" is ");
                self.emit_pattern(pattern);
            }
            Expr::Break { .. } => self.gap_inline("break in expression position"),
            Expr::Continue { .. } => self.gap_inline("continue in expression position"),
            Expr::Return(_) => self.gap_inline("return in expression position"),
            Expr::Block(_)
            | Expr::If(_)
            | Expr::Match(_)
            | Expr::Loop { .. }
            | Expr::While { .. }
            | Expr::For { .. } => {
                let mut wrapper = self.wrapped();
                wrapper.emit_wrapped_contents(expr);
            }
        }
    }

    /// Comma-separated values
    pub(crate) fn emit_list(&mut self, values: &[Expr]) {
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                self.out.write(", ");
            }
            self.emit_value(value);
        }
    }

    fn emit_unary(&mut self, op: UnaryOp, operand: &Expr) {
        match op {
            UnaryOp::Deref => self.emit_value(operand),
            UnaryOp::Not => {
                self.out.write("!");
                self.emit_operand(operand, CsPrecedence::Unary);
            }
            UnaryOp::Neg => {
                self.out.write("-");
                if starts_with_minus(operand) {
                    self.out.write("(");
                    self.emit_value(operand);
                    self.out.write(")");
                } else {
                    self.emit_operand(operand, CsPrecedence::Unary);
                }
            }
        }
    }

    fn emit_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) {
        match op {
            BinaryOp::As => {
                let ty = self.render_type(right);
                self.out.write(&format!("({})", ty));
                self.emit_operand(left, CsPrecedence::Unary);
            }
            BinaryOp::Range | BinaryOp::RangeInclusive => {
                if !left.is_unit() {
                    self.emit_operand(left, CsPrecedence::Unary);
                }
                self.out.write("..");
                if right.is_unit() {
                    return;
                }
                if op == BinaryOp::RangeInclusive {
                    self.out.write("(");
                    self.emit_operand(right, CsPrecedence::Additive);
                    self.out.write(" + 1)");
                } else {
                    self.emit_operand(right, CsPrecedence::Unary);
                }
            }
            _ => {
                let precedence = binary_precedence(op);
                let (left_required, right_required) = if op.is_assignment() {
                    (precedence.tighter(), precedence)
                } else {
                    (precedence, precedence.tighter())
                };
                self.emit_operand(left, left_required);
                self.out.write(&format!(" {} ", op.symbol()));
                self.emit_operand(right, right_required);
            }
        }
    }

    /// Member name after `.`; tuple positions become `ItemN`
    pub(crate) fn render_field(&self, field: &Name) -> String {
        match field.ident_str().map(str::parse::<usize>) {
            Some(Ok(position)) => format!("Item{}", position + 1),
            _ => match field {
                Name::Ident(name) => to_pascal_case(name),
                other => self.render_name(other),
            },
        }
    }

    fn emit_constructor(&mut self, ty: &Expr, fields: &[FieldInit], base: Option<&Expr>) {
        match base {
            Some(base) => {
                self.emit_operand(base, CsPrecedence::Primary);
                self.out.write(" with");
            }
            None => {
                let ty = self.render_type(ty);
                self.out.write(&format!("new {}", ty));
                if fields.is_empty() {
                    self.out.write("()");
                    return;
                }
            }
        }

        self.out.write(" { ");
        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                self.out.write(", ");
            }
            let member = self.render_field(&field.name);
            self.out.write(&format!("{} = ", member));
            self.emit_value(&field.value);
        }
        self.out.write(" }");
    }

    fn emit_closure(&mut self, closure: &Closure) {
        let mut scope = self.scope();
        let mut closure_scope = scope.without_loops();

        let typed = !closure.params.is_empty()
            && closure
                .params
                .iter()
                .all(|param| matches!(param, Parameter::Named { ty: Some(_), .. }));
        let mut params = Vec::with_capacity(closure.params.len());
        for param in &closure.params {
            let Parameter::Named { name, ty } = param else {
                continue;
            };
            let name = match name {
                Name::Ident(ident) => to_pascal_case(&closure_scope.scopes.register(ident)),
                other => closure_scope.render_name(other),
            };
            match ty {
                Some(ty) if typed => params.push(format!("{} {}", closure_scope.render_parameter_type(ty), name)),
                _ => params.push(name),
            }
        }
        closure_scope.out.write(&format!("({}) =>", params.join(", ")));

        let body = closure.body.as_ref();
        let statement_shaped = match body {
            Expr::Block(block) => !block.statements.is_empty() || closure.return_type.is_some(),
            Expr::If(_) | Expr::Match(_) | Expr::Loop { .. } | Expr::While { .. } | Expr::For { .. } => true,
            _ => false,
        };
        if !statement_shaped {
            closure_scope.out.write(" ");
            closure_scope.emit_operand(body, CsPrecedence::Lambda);
            return;
        }

        closure_scope.out.newline();
        let context = match body {
            Expr::Block(block) if block.tail.is_none() => TranslationContext::Block,
            _ => TranslationContext::Module,
        };
        let mut context = closure_scope.with_context(context);
        let mut braced = context.braced_inline();
        match body {
            Expr::Block(block) => braced.emit_block_body(block),
            other => braced.emit_returned(other),
        }
    }
}

/// C# spelling of a literal; `None` when the value has no C# form
pub(crate) fn render_literal(literal: &Literal) -> Option<String> {
    let text = match literal {
        Literal::Int(text) => return render_integer(text),
        Literal::Float(text) => render_float(text),
        Literal::Char(c) => {
            let mut out = String::from("'");
            escape_into(*c, '\'', &mut out);
            out.push('\'');
            out
        }
        Literal::Str(text) => quote_string(text),
        Literal::Byte(byte) => format!("(byte){}", byte),
        Literal::ByteStr(bytes) if bytes.is_empty() => "new byte[0]".to_string(),
        Literal::ByteStr(bytes) => {
            let bytes: Vec<String> = bytes.iter().map(u8::to_string).collect();
            format!("new byte[] {{ {} }}", bytes.join(", "))
        }
        Literal::Bool(value) => value.to_string(),
        Literal::Unit => "default".to_string(),
    };
    Some(text)
}

fn literal_text(literal: &Literal) -> &str {
    match literal {
        Literal::Int(text) | Literal::Float(text) => text,
        _ => "",
    }
}

/// Double-quoted C# string literal
pub(crate) fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        escape_into(c, '"', &mut out);
    }
    out.push('"');
    out
}

fn escape_into(c: char, quote: char, out: &mut String) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\0' => out.push_str("\\0"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
        c => out.push(c),
    }
}

/// Integer suffixes and their C# replacements; absent ones are dropped
const INTEGER_SUFFIXES: &[(&str, &str)] = &[
    ("u32", "u"),
    ("i64", "L"),
    ("u64", "UL"),
    ("f32", "f"),
    ("f64", ".0"),
    ("i128", ""),
    ("u128", ""),
    ("isize", ""),
    ("usize", ""),
    ("i8", ""),
    ("i16", ""),
    ("i32", ""),
    ("u8", ""),
    ("u16", ""),
];

fn render_integer(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };

    let mut suffix = "";
    let mut value = body;
    for (rust, csharp) in INTEGER_SUFFIXES {
        // `f` is a hex digit, so hex literals never carry a float suffix
        if radix == 16 && rust.starts_with('f') {
            continue;
        }
        if let Some(stripped) = body.strip_suffix(rust) {
            if !stripped.is_empty() {
                value = stripped;
                suffix = csharp;
                break;
            }
        }
    }

    let value = match radix {
        16 => format!("0x{}", value),
        2 => format!("0b{}", value),
        8 => match u128::from_str_radix(value, 8) {
            Ok(decimal) => decimal.to_string(),
            Err(_) => {
                tracing::debug!(literal = text, "octal literal does not fit in 128 bits");
                return None;
            }
        },
        _ => value.to_string(),
    };
    Some(format!("{}{}", value, suffix))
}

fn render_float(text: &str) -> String {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let (value, suffix) = if let Some(value) = digits.strip_suffix("f32") {
        (value, "f")
    } else if let Some(value) = digits.strip_suffix("f64") {
        (value, "")
    } else {
        (digits.as_str(), "")
    };

    if value.ends_with('.') {
        format!("{}0{}", value, suffix)
    } else {
        format!("{}{}", value, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::parser::Parser;

    fn emit(source: &str) -> String {
        let mut parser = Parser::from_source(source).expect("source should lex");
        let expr = parser.parse_expression().expect("source should parse");
        let mut generator = Generator::new(TranslatorConfig::default());
        generator.emit_expr(&expr);
        generator.out.into_string()
    }

    #[test]
    fn test_parenthesises_only_when_needed() {
        assert_eq!(emit("(a + b) * c"), "(A + B) * C");
        assert_eq!(emit("a + b * c"), "A + B * C");
        assert_eq!(emit("a - (b - c)"), "A - (B - C)");
        assert_eq!(emit("(a - b) - c"), "A - B - C");
        assert_eq!(emit("a = b = c"), "A = B = C");
        // `&` binds tighter than `==` in the source but not in C#
        assert_eq!(emit("x & 1 == 0"), "(X & 1) == 0");
    }

    #[test]
    fn test_casts_and_unary() {
        assert_eq!(emit("x as f64 / 2.0"), "(double)X / 2.0");
        assert_eq!(emit("(a + b) as u8"), "(byte)(A + B)");
        assert_eq!(emit("-(-x)"), "-(-X)");
        assert_eq!(emit("!done"), "!Done");
        assert_eq!(emit("*count + 1"), "Count + 1");
        assert_eq!(emit("swap(&mut a, &b)"), "Swap(ref A, B)");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(emit("0..n"), "0..N");
        assert_eq!(emit("a..=b"), "A..(B + 1)");
        assert_eq!(emit("v[1..]"), "V[1..]");
    }

    #[test]
    fn test_octal_literal_wider_than_128_bits_is_a_gap() {
        let source = format!("0o{}", "7".repeat(43));
        assert_eq!(emit(&source), format!("/* untranslated: out-of-range literal {} */", source));
    }

    #[test]
    fn test_literals() {
        assert_eq!(emit("1_000u32"), "1000u");
        assert_eq!(emit("7i64"), "7L");
        assert_eq!(emit("0o17"), "15");
        assert_eq!(emit("0xffu8"), "0xff");
        assert_eq!(emit("1."), "1.0");
        assert_eq!(emit("2.5f32"), "2.5f");
        assert_eq!(emit("b'a'"), "(byte)97");
        assert_eq!(emit("b\"hi\""), "new byte[] { 104, 105 }");
        assert_eq!(emit("\"say \\\"hi\\\"\\n\""), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(emit("'\\''"), "'\\''");
        assert_eq!(emit("()"), "default");
    }

    #[test]
    fn test_collections_and_members() {
        assert_eq!(emit("[1, 2, 3]"), "new[] { 1, 2, 3 }");
        assert_eq!(emit("[]"), "new dynamic[0]");
        assert_eq!(emit("(a, b)"), "(A, B)");
        assert_eq!(emit("pair.0 + pair.1"), "Pair.Item1 + Pair.Item2");
        assert_eq!(emit("self.origin.x"), "this.Origin.X");
        assert_eq!(emit("Vec::new()"), "List.New()");
    }

    #[test]
    fn test_repeat_requires_linq() {
        let mut parser = Parser::from_source("[0; 8]").expect("source should lex");
        let expr = parser.parse_expression().expect("source should parse");
        let mut generator = Generator::new(TranslatorConfig::default());
        generator.emit_expr(&expr);
        assert_eq!(generator.out.as_str(), "Enumerable.Repeat(0, 8).ToArray()");
        assert!(generator.namespaces.contains("System.Linq"));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(emit("Point { x: 1, y: 2 }"), "new Point { X = 1, Y = 2 }");
        assert_eq!(emit("Point { x, ..origin }"), "Origin with { X = X }");
        assert_eq!(emit("Empty {}"), "new Empty()");
        assert_eq!(emit("Shape::Circle(1.0)"), "new Shape.Circle(1.0)");
        assert_eq!(emit("make_point(1, 2)"), "MakePoint(1, 2)");
    }

    #[test]
    fn test_closures() {
        assert_eq!(emit("|a, b| a + b"), "(A, B) => A + B");
        assert_eq!(emit("|x: i32| x * 2"), "(int X) => X * 2");
        assert_eq!(
            emit("|x| { let y = x + 1; y * 2 }"),
            "(X) =>\n{\n    var Y = X + 1;\n    return Y * 2;\n}"
        );
    }

    #[test]
    fn test_control_flow_in_value_position_is_wrapped() {
        assert_eq!(
            emit("1 + if c { 2 } else { 3 }"),
            "1 + new Func<dynamic>(() =>\n{\n    if (C)\n    {\n        return 2;\n    }\n    else\n    {\n        return 3;\n    }\n})()"
        );
    }

    #[test]
    fn test_if_let_condition() {
        let mut parser = Parser::from_source("if let Some(x) = opt { x } else { 0 }").expect("source should lex");
        let expr = parser.parse_expression().expect("source should parse");
        let Expr::If(if_expr) = expr else {
            panic!("expected an if expression");
        };
        let mut generator = Generator::new(TranslatorConfig::default());
        generator.emit_expr(&if_expr.condition);
        assert_eq!(generator.out.as_str(), "Opt is Some(var X)");
    }

    #[test]
    fn test_jumps_in_value_position_are_gaps() {
        let mut parser = Parser::from_source("a + return").expect("source should lex");
        let expr = parser.parse_expression().expect("source should parse");
        let mut generator = Generator::new(TranslatorConfig::default());
        generator.emit_expr(&expr);
        assert_eq!(generator.out.as_str(), "A + /* untranslated: return in expression position */");
        assert_eq!(generator.gaps.len(), 1);
    }
}
