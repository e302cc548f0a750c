// Statement emission: blocks, tails, let, if, match → switch, loops and jumps

use super::context::{LoopFrame, TranslationContext};
use super::macros::is_diverging_macro;
use super::names::to_pascal_case;
use super::Generator;
use crate::parser::ast::*;

/// How the arms of an emitted switch finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArmMode {
    /// Arm values are discarded; arms end in `break;`
    Statement,
    /// Arm values are returned
    Return,
}

/// Control never reaches the end of `expr`
pub(crate) fn diverges(expr: &Expr) -> bool {
    match expr {
        Expr::Return(_) | Expr::Break { .. } | Expr::Continue { .. } => true,
        Expr::MacroCall { name, .. } => is_diverging_macro(name),
        Expr::Block(block) => block_diverges(block),
        _ => false,
    }
}

fn block_diverges(block: &Block) -> bool {
    match (&block.tail, block.statements.last()) {
        (Some(tail), _) => diverges(tail),
        (None, Some(Stmt::Expr(last))) => diverges(last),
        _ => false,
    }
}

/// Block-like expression that produces no value
fn is_unit_shaped(expr: &Expr) -> bool {
    match expr {
        Expr::While { .. } | Expr::For { .. } => true,
        Expr::If(if_expr) => if_expr.else_branch.is_none() || if_expr.then_branch.tail.is_none(),
        _ => false,
    }
}

/// Expressions C# accepts as statements on their own
fn is_statement_expression(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } | Expr::Constructor { .. } => true,
        Expr::MacroCall { name, .. } => !matches!(name.as_str(), "dbg" | "matches"),
        Expr::Binary { op, .. } => op.is_assignment(),
        Expr::Try(inner) => is_statement_expression(inner),
        _ => false,
    }
}

/// Bare lowercase names in patterns bind; anything else is a constant or type
pub(crate) fn is_binding_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_lowercase() || c == '_')
}

fn is_catch_all(pattern: &Expr) -> bool {
    match pattern {
        Expr::Name(Name::Underscore) => true,
        Expr::Name(Name::Ident(name)) => is_binding_name(name),
        _ => false,
    }
}

/// `for` iterables lowered to a counting loop: both ends present
fn counted_range(iterable: &Expr) -> Option<(&Expr, &Expr, bool)> {
    match iterable {
        Expr::Binary { op, left, right }
            if matches!(op, BinaryOp::Range | BinaryOp::RangeInclusive) && !left.is_unit() && !right.is_unit() =>
        {
            Some((left, right, *op == BinaryOp::RangeInclusive))
        }
        _ => None,
    }
}

fn label_name(label: &Option<Lifetime>) -> Option<String> {
    label.as_ref().map(|Lifetime(name)| name.clone())
}

impl Generator {
    /// Statements and tail of a block whose braces (if any) are already open
    pub(crate) fn emit_block_body(&mut self, block: &Block) {
        for statement in &block.statements {
            self.emit_statement(statement);
        }
        if let Some(tail) = &block.tail {
            match self.context {
                TranslationContext::Module => self.emit_returned(tail),
                _ => self.emit_statement_expr(tail),
            }
        }
    }

    fn emit_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Empty => {}
            Stmt::Let(binding) => self.emit_let(binding),
            Stmt::Item(item) => self.emit_local_item(item),
            Stmt::Expr(expr) => {
                let mut block = self.with_context(TranslationContext::Block);
                block.emit_statement_expr(expr);
            }
        }
    }

    /// Expression evaluated for its effects only
    pub(crate) fn emit_statement_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::If(if_expr) => self.emit_if(if_expr),
            Expr::Match(match_expr) => self.emit_switch(match_expr, ArmMode::Statement),
            Expr::Block(block) => {
                let mut braced = self.braced();
                braced.emit_block_body(block);
            }
            Expr::Loop { label, body } => {
                self.out.line("while (true)");
                self.emit_loop_body(LoopFrame::new(label_name(label), false), body);
            }
            Expr::While {
                label,
                condition,
                body,
            } => self.emit_while(label, condition, body),
            Expr::For {
                label,
                pattern,
                iterable,
                body,
            } => self.emit_for(label, pattern, iterable, body),
            Expr::Break { label, value } => self.emit_break(label.as_ref(), value.as_deref()),
            Expr::Continue { label } => self.emit_continue(label.as_ref()),
            Expr::Return(value) => self.emit_return(value.as_deref()),
            Expr::Literal(Literal::Unit) => {}
            other => {
                if !is_statement_expression(other) {
                    self.out.write("_ = ");
                }
                self.emit_expr(other);
                self.out.line(";");
            }
        }
    }

    /// Tail of a value-producing block: becomes `return` unless it has no value
    pub(crate) fn emit_returned(&mut self, tail: &Expr) {
        match tail {
            _ if diverges(tail) || is_unit_shaped(tail) => {
                let mut block = self.with_context(TranslationContext::Block);
                block.emit_statement_expr(tail);
            }
            Expr::Loop { label, body } => self.emit_value_loop(label, body),
            Expr::Match(match_expr) if !match_expr.arms.iter().all(MatchArm::is_block_shaped) => {
                self.emit_switch(match_expr, ArmMode::Return)
            }
            Expr::Block(block) => {
                let mut braced = self.braced();
                braced.emit_block_body(block);
            }
            other => {
                self.out.write("return ");
                self.emit_expr(other);
                self.out.line(";");
            }
        }
    }

    /// Body of an immediately-invoked wrapper; the context is already `Module`
    pub(crate) fn emit_wrapped_contents(&mut self, expr: &Expr) {
        match expr {
            Expr::If(if_expr) => self.emit_if(if_expr),
            Expr::Match(match_expr) => self.emit_switch(match_expr, ArmMode::Return),
            Expr::Block(block) => self.emit_block_body(block),
            Expr::Loop { label, body } => self.emit_value_loop(label, body),
            other => self.emit_statement_expr(other),
        }

        let valueless = match expr {
            Expr::Block(block) => block.tail.is_none() && !block_diverges(block),
            Expr::Loop { .. } | Expr::Match(_) => false,
            other => is_unit_shaped(other),
        };
        if valueless {
            self.out.line("return default;");
        }
    }

    fn emit_return(&mut self, value: Option<&Expr>) {
        match value {
            Some(value) => {
                self.out.write("return ");
                self.emit_expr(value);
                self.out.line(";");
            }
            None => self.out.line("return;"),
        }
    }

    fn emit_let(&mut self, binding: &Let) {
        match (&binding.pattern, &binding.value) {
            (Expr::Name(Name::Underscore), Some(value)) => {
                self.out.write("_ = ");
                self.emit_expr(value);
                self.out.line(";");
            }
            (Expr::Name(Name::Underscore), None) => {}
            (Expr::Tuple(elements), value) => {
                self.out.write("var (");
                for index in 0..elements.len() {
                    if index > 0 {
                        self.out.write(", ");
                    }
                    self.out.mark_waypoint();
                }
                self.out.write(")");
                if let Some(value) = value {
                    self.out.write(" = ");
                    self.emit_expr(value);
                }
                self.out.line(";");

                let names: Vec<String> = elements.iter().map(|element| self.bind_pattern(element)).collect();
                for name in names.iter().rev() {
                    self.out.fill_waypoint(name);
                }
            }
            (pattern, value) => {
                let declared = match &binding.ty {
                    Some(ty) => self.render_type(ty),
                    None => "var".to_string(),
                };
                self.out.write(&format!("{} ", declared));
                self.out.mark_waypoint();
                if let Some(value) = value {
                    self.out.write(" = ");
                    self.emit_expr(value);
                }
                self.out.line(";");

                let name = self.bind_pattern(pattern);
                self.out.fill_waypoint(&name);
            }
        }
    }

    /// Register the names a declaration pattern introduces; returns its output spelling
    pub(crate) fn bind_pattern(&mut self, pattern: &Expr) -> String {
        match pattern {
            Expr::Name(Name::Ident(name)) => to_pascal_case(&self.scopes.register(name)),
            Expr::Name(Name::Underscore) => "_".to_string(),
            Expr::Tuple(elements) => {
                let names: Vec<String> = elements.iter().map(|element| self.bind_pattern(element)).collect();
                format!("({})", names.join(", "))
            }
            Expr::Ref { operand, .. } => self.bind_pattern(operand),
            _ => self.gap_text("destructuring pattern"),
        }
    }

    pub(crate) fn emit_if(&mut self, if_expr: &If) {
        let mut scope = self.scope();
        scope.out.write("if (");
        scope.emit_expr(&if_expr.condition);
        scope.out.line(")");
        {
            let mut then_branch = scope.braced();
            then_branch.emit_block_body(&if_expr.then_branch);
        }

        match if_expr.else_branch.as_deref() {
            None => {}
            Some(Expr::If(chained)) => {
                scope.out.write("else ");
                scope.emit_if(chained);
            }
            Some(Expr::Block(block)) => {
                scope.out.line("else");
                let mut else_branch = scope.braced();
                else_branch.emit_block_body(block);
            }
            Some(other) => {
                scope.out.line("else");
                let mut else_branch = scope.braced();
                else_branch.emit_block_body(&Block {
                    statements: Vec::new(),
                    tail: Some(Box::new(other.clone())),
                });
            }
        }
    }

    pub(crate) fn emit_switch(&mut self, match_expr: &Match, mode: ArmMode) {
        self.out.write("switch (");
        self.emit_expr(&match_expr.scrutinee);
        self.out.line(")");

        let mut switch = self.in_switch();
        let mut block = switch.braced();
        for (index, arm) in match_expr.arms.iter().enumerate() {
            block.emit_arm(arm, mode);
            if arm.guard.is_none() && is_catch_all(&arm.pattern) {
                let omitted = match_expr.arms.len() - index - 1;
                if omitted > 0 {
                    tracing::debug!(omitted, "match arms after a catch-all arm are unreachable");
                }
                break;
            }
        }
    }

    fn emit_arm(&mut self, arm: &MatchArm, mode: ArmMode) {
        let mut scope = self.scope();
        match (&arm.pattern, &arm.guard) {
            (Expr::Name(Name::Underscore), None) => scope.out.line("default:"),
            (pattern, guard) => {
                scope.out.write("case ");
                if matches!(pattern, Expr::Name(Name::Underscore)) {
                    scope.out.write("var _");
                } else {
                    scope.emit_pattern(pattern);
                }
                if let Some(guard) = guard {
                    scope.out.write(" when ");
                    scope.emit_expr(guard);
                }
                scope.out.line(":");
            }
        }

        match (&arm.body, mode) {
            (Expr::Block(block), ArmMode::Statement) if block.statements.is_empty() && block.tail.is_none() => {
                let mut section = scope.indented();
                section.out.line("break;");
            }
            (Expr::Block(block), _) => {
                let context = match mode {
                    ArmMode::Statement => TranslationContext::Block,
                    ArmMode::Return => TranslationContext::Module,
                };
                let mut context = scope.with_context(context);
                let mut braced = context.braced();
                braced.emit_block_body(block);
                let falls_through = match mode {
                    ArmMode::Statement => !block_diverges(block),
                    ArmMode::Return => block.tail.is_none() && !block_diverges(block),
                };
                if falls_through {
                    braced.out.line("break;");
                }
            }
            (body, ArmMode::Statement) => {
                let mut section = scope.indented();
                let mut context = section.with_context(TranslationContext::Block);
                context.emit_statement_expr(body);
                if !diverges(body) {
                    context.out.line("break;");
                }
            }
            (body, ArmMode::Return) => {
                let mut section = scope.indented();
                let mut context = section.with_context(TranslationContext::Module);
                context.emit_returned(body);
                if is_unit_shaped(body) {
                    context.out.line("break;");
                }
            }
        }
    }

    /// C# pattern for a match arm, `if let` or `matches!`; binds lowercase names
    pub(crate) fn emit_pattern(&mut self, pattern: &Expr) {
        match pattern {
            Expr::Binary {
                op: BinaryOp::BitOr,
                left,
                right,
            } => {
                self.emit_pattern(left);
                self.out.write(" or ");
                self.emit_pattern(right);
            }
            Expr::Binary { op, left, right } if matches!(op, BinaryOp::Range | BinaryOp::RangeInclusive) => {
                let upper = if *op == BinaryOp::Range { "< " } else { "<= " };
                match (left.is_unit(), right.is_unit()) {
                    (false, false) => {
                        self.out.write(">= ");
                        self.emit_expr(left);
                        self.out.write(&format!(" and {}", upper));
                        self.emit_expr(right);
                    }
                    (false, true) => {
                        self.out.write(">= ");
                        self.emit_expr(left);
                    }
                    (true, false) => {
                        self.out.write(upper);
                        self.emit_expr(right);
                    }
                    (true, true) => self.out.write("_"),
                }
            }
            Expr::Name(Name::Ident(name)) if is_binding_name(name) => {
                let bound = to_pascal_case(&self.scopes.register(name));
                self.out.write(&format!("var {}", bound));
            }
            Expr::Name(Name::Underscore) => self.out.write("_"),
            Expr::Name(_) | Expr::Path { .. } | Expr::Literal(_) | Expr::Unary { .. } => self.emit_expr(pattern),
            Expr::Call { callee, args } => {
                self.emit_expr(callee);
                self.out.write("(");
                self.emit_pattern_list(args);
                self.out.write(")");
            }
            Expr::Tuple(elements) => {
                self.out.write("(");
                self.emit_pattern_list(elements);
                self.out.write(")");
            }
            Expr::Constructor { ty, fields, .. } => {
                let ty = self.render_type(ty);
                self.out.write(&format!("{} {{ ", ty));
                for (index, field) in fields.iter().enumerate() {
                    if index > 0 {
                        self.out.write(", ");
                    }
                    let member = self.render_field(&field.name);
                    self.out.write(&format!("{}: ", member));
                    self.emit_pattern(&field.value);
                }
                self.out.write(" }");
            }
            Expr::Ref { operand, .. } => self.emit_pattern(operand),
            _ => self.gap_inline("pattern"),
        }
    }

    fn emit_pattern_list(&mut self, patterns: &[Expr]) {
        for (index, pattern) in patterns.iter().enumerate() {
            if index > 0 {
                self.out.write(", ");
            }
            self.emit_pattern(pattern);
        }
    }

    /// `loop` whose `break value` returns from the enclosing function or wrapper
    fn emit_value_loop(&mut self, label: &Option<Lifetime>, body: &Block) {
        self.out.line("while (true)");
        self.emit_loop_body(LoopFrame::new(label_name(label), true), body);
    }

    fn emit_while(&mut self, label: &Option<Lifetime>, condition: &Expr, body: &Block) {
        let mut scope = self.scope();
        scope.out.write("while (");
        scope.emit_expr(condition);
        scope.out.line(")");
        scope.emit_loop_body(LoopFrame::new(label_name(label), false), body);
    }

    fn emit_for(&mut self, label: &Option<Lifetime>, pattern: &Expr, iterable: &Expr, body: &Block) {
        let mut scope = self.scope();
        let counter = match pattern {
            Expr::Name(Name::Ident(name)) => Some(name.as_str()),
            Expr::Name(Name::Underscore) => Some("_"),
            _ => None,
        };
        match (counter, counted_range(iterable)) {
            (Some(name), Some((start, end, inclusive))) => {
                let bound = match end {
                    Expr::Literal(_) | Expr::Name(_) | Expr::Path { .. } => None,
                    _ => {
                        let temp = to_pascal_case(&scope.scopes.mint_temp());
                        scope.out.write(&format!("var {} = ", temp));
                        scope.emit_expr(end);
                        scope.out.line(";");
                        Some(temp)
                    }
                };

                scope.out.write("for (var ");
                scope.out.mark_waypoint();
                scope.out.write(" = ");
                scope.emit_expr(start);
                scope.out.write("; ");
                scope.out.mark_waypoint();
                scope.out.write(if inclusive { " <= " } else { " < " });
                match bound {
                    Some(temp) => scope.out.write(&temp),
                    None => scope.emit_expr(end),
                }
                scope.out.write("; ");
                scope.out.mark_waypoint();
                scope.out.line("++)");

                let counter = match name {
                    "_" => scope.scopes.mint_temp(),
                    name => scope.scopes.register(name),
                };
                let counter = to_pascal_case(&counter);
                for _ in 0..3 {
                    scope.out.fill_waypoint(&counter);
                }
            }
            _ => {
                scope.out.write("foreach (var ");
                scope.out.mark_waypoint();
                scope.out.write(" in ");
                scope.emit_expr(iterable);
                scope.out.line(")");

                let binding = scope.bind_pattern(pattern);
                scope.out.fill_waypoint(&binding);
            }
        }
        scope.emit_loop_body(LoopFrame::new(label_name(label), false), body);
    }

    /// Braced loop body, followed by the labels that jumps out of it asked for
    fn emit_loop_body(&mut self, frame: LoopFrame, body: &Block) {
        let break_target = {
            let mut looped = self.loop_frame(frame);
            {
                let mut context = looped.with_context(TranslationContext::Block);
                let mut braced = context.braced();
                braced.emit_block_body(body);
                let continue_target = braced.loops.last().and_then(|frame| frame.continue_target.clone());
                if let Some(target) = continue_target {
                    braced.out.line(&format!("{}: ;", target));
                }
            }
            looped.loops.last().and_then(|frame| frame.break_target.clone())
        };
        if let Some(target) = break_target {
            self.out.line(&format!("{}: ;", target));
        }
    }

    fn find_loop(&self, label: Option<&Lifetime>) -> Option<usize> {
        match label {
            None => self.loops.len().checked_sub(1),
            Some(Lifetime(label)) => self
                .loops
                .iter()
                .rposition(|frame| frame.label.as_deref() == Some(label.as_str())),
        }
    }

    /// Label name placed after loop `index`
    fn break_label(&mut self, index: usize) -> String {
        if let Some(target) = &self.loops[index].break_target {
            return target.clone();
        }
        let stem = match self.loops[index].label.clone() {
            Some(label) => label,
            None => self.scopes.mint_temp(),
        };
        let target = format!("{}Break", to_pascal_case(&stem));
        self.loops[index].break_target = Some(target.clone());
        target
    }

    /// Label name placed at the end of loop `index`'s body
    fn continue_label(&mut self, index: usize) -> String {
        if let Some(target) = &self.loops[index].continue_target {
            return target.clone();
        }
        let stem = match self.loops[index].label.clone() {
            Some(label) => label,
            None => self.scopes.mint_temp(),
        };
        let target = format!("{}Continue", to_pascal_case(&stem));
        self.loops[index].continue_target = Some(target.clone());
        target
    }

    fn emit_break(&mut self, label: Option<&Lifetime>, value: Option<&Expr>) {
        let Some(index) = self.find_loop(label) else {
            self.gap_statement("break outside of a translated loop");
            return;
        };

        if let Some(value) = value {
            if self.loops[index].yields {
                self.emit_return(Some(value));
                return;
            }
            tracing::debug!("break value dropped outside a value loop");
        }

        let innermost = index + 1 == self.loops.len();
        if innermost && self.loops[index].switch_depth == 0 {
            self.out.line("break;");
        } else {
            let target = self.break_label(index);
            self.out.line(&format!("goto {};", target));
        }
    }

    fn emit_continue(&mut self, label: Option<&Lifetime>) {
        let Some(index) = self.find_loop(label) else {
            self.gap_statement("continue outside of a translated loop");
            return;
        };

        if index + 1 == self.loops.len() {
            self.out.line("continue;");
        } else {
            let target = self.continue_label(index);
            self.out.line(&format!("goto {};", target));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::parser::Parser;

    /// Emit a block as a function body in the given context
    fn emit_body(source: &str, context: TranslationContext) -> String {
        let mut parser = Parser::from_source(source).expect("source should lex");
        let block = parser.parse_block().expect("source should parse");
        let mut generator = Generator::new(TranslatorConfig::default());
        {
            let mut body = generator.with_context(context);
            body.emit_block_body(&block);
        }
        generator.out.into_string()
    }

    #[test]
    fn test_tail_elevation_depends_on_context() {
        assert_eq!(emit_body("{ let y = 2; y + 1 }", TranslationContext::Module), "var Y = 2;\nreturn Y + 1;\n");
        assert_eq!(emit_body("{ update(); finish() }", TranslationContext::Block), "Update();\nFinish();\n");
    }

    #[test]
    fn test_value_macros_are_discarded_as_statements() {
        assert_eq!(emit_body("{ dbg!(x); }", TranslationContext::Block), "_ = X;\n");
        assert_eq!(
            emit_body("{ matches!(k, 1 | 2); println!(\"done\"); }", TranslationContext::Block),
            "_ = K is 1 or 2;\nConsole.WriteLine(\"done\");\n"
        );
    }

    #[test]
    fn test_sibling_lets_are_renamed() {
        assert_eq!(
            emit_body("{ let x = 1; let x = x + 1; x }", TranslationContext::Module),
            "var X = 1;\nvar X1 = X + 1;\nreturn X1;\n"
        );
    }

    #[test]
    fn test_nested_scope_does_not_reuse_active_name() {
        assert_eq!(
            emit_body("{ let x = 1; { let x = 2; use_it(x); } x }", TranslationContext::Module),
            "var X = 1;\n{\n    var X1 = 2;\n    UseIt(X1);\n}\nreturn X;\n"
        );
    }

    #[test]
    fn test_typed_let_splices_name_before_nested_value() {
        assert_eq!(
            emit_body("{ let total: i64 = match k { 0 => 1, _ => 2 }; }", TranslationContext::Block),
            "long Total = new Func<dynamic>(() =>\n{\n    switch (K)\n    {\n        case 0:\n            return 1;\n        default:\n            return 2;\n    }\n})();\n"
        );
    }

    #[test]
    fn test_declaration_without_value_and_tuple_let() {
        assert_eq!(emit_body("{ let count: u32; }", TranslationContext::Block), "uint Count;\n");
        assert_eq!(
            emit_body("{ let (a, _, b) = triple(); }", TranslationContext::Block),
            "var (A, _, B) = Triple();\n"
        );
    }

    #[test]
    fn test_statement_match_breaks() {
        assert_eq!(
            emit_body(
                "{ match n { 1 | 2 => small(), 3..=9 => { mid(); } _ => {} } }",
                TranslationContext::Block
            ),
            "switch (N)\n{\n    case 1 or 2:\n        Small();\n        break;\n    case >= 3 and <= 9:\n    {\n        Mid();\n        break;\n    }\n    default:\n        break;\n}\n"
        );
    }

    #[test]
    fn test_tail_match_with_scalar_arms_returns_directly() {
        assert_eq!(
            emit_body("{ match opt { Some(v) if v > 0 => v, None => return -1, _ => 0 } }", TranslationContext::Module),
            "switch (Opt)\n{\n    case Some(var V) when V > 0:\n        return V;\n    case None:\n        return -1;\n    default:\n        return 0;\n}\n"
        );
    }

    #[test]
    fn test_tail_match_with_block_arms_is_wrapped() {
        let text = emit_body("{ match k { 0 => { a() } _ => { b() } } }", TranslationContext::Module);
        assert!(text.starts_with("return new Func<dynamic>(() =>\n{\n    switch (K)\n"));
        assert!(text.contains("        case 0:\n        {\n            return A();\n        }\n"));
        assert!(text.ends_with("})();\n"));
    }

    #[test]
    fn test_statement_if_is_not_wrapped() {
        assert_eq!(
            emit_body("{ if a { x(); } else if b { y(); } else { z(); } }", TranslationContext::Block),
            "if (A)\n{\n    X();\n}\nelse if (B)\n{\n    Y();\n}\nelse\n{\n    Z();\n}\n"
        );
    }

    #[test]
    fn test_first_catch_all_wins() {
        let text = emit_body("{ match k { other => f(other), _ => g() } }", TranslationContext::Block);
        assert_eq!(text, "switch (K)\n{\n    case var Other:\n        F(Other);\n        break;\n}\n");
    }

    #[test]
    fn test_counting_for_loop() {
        assert_eq!(
            emit_body("{ for i in 0..n { total += i; } }", TranslationContext::Block),
            "for (var I = 0; I < N; I++)\n{\n    Total += I;\n}\n"
        );
        assert_eq!(
            emit_body("{ for i in 1..=v.len() { } }", TranslationContext::Block),
            "var Temp0 = V.Len();\nfor (var I = 1; I <= Temp0; I++)\n{\n}\n"
        );
    }

    #[test]
    fn test_foreach_loop() {
        assert_eq!(
            emit_body("{ for (k, v) in pairs { show(k, v); } }", TranslationContext::Block),
            "foreach (var (K, V) in Pairs)\n{\n    Show(K, V);\n}\n"
        );
    }

    #[test]
    fn test_while_let_and_loop_value() {
        assert_eq!(
            emit_body("{ while let Some(top) = stack.pop() { use_it(top); } }", TranslationContext::Block),
            "while (Stack.Pop() is Some(var Top))\n{\n    UseIt(Top);\n}\n"
        );
        assert_eq!(
            emit_body("{ loop { if done() { break 7; } } }", TranslationContext::Module),
            "while (true)\n{\n    if (Done())\n    {\n        return 7;\n    }\n}\n"
        );
    }

    #[test]
    fn test_labelled_jumps() {
        assert_eq!(
            emit_body(
                "{ 'outer: for row in grid { for cell in row { if cell { continue 'outer; } if stop { break 'outer; } } } }",
                TranslationContext::Block
            ),
            concat!(
                "foreach (var Row in Grid)\n{\n",
                "    foreach (var Cell in Row)\n    {\n",
                "        if (Cell)\n        {\n            goto OuterContinue;\n        }\n",
                "        if (Stop)\n        {\n            goto OuterBreak;\n        }\n",
                "    }\n",
                "    OuterContinue: ;\n",
                "}\n",
                "OuterBreak: ;\n"
            )
        );
    }

    #[test]
    fn test_break_inside_switch_jumps_past_loop() {
        assert_eq!(
            emit_body("{ loop { match next() { 0 => break, _ => {} } } }", TranslationContext::Block),
            concat!(
                "while (true)\n{\n",
                "    switch (Next())\n    {\n",
                "        case 0:\n            goto Temp0Break;\n",
                "        default:\n            break;\n",
                "    }\n",
                "}\n",
                "Temp0Break: ;\n"
            )
        );
    }

    #[test]
    fn test_break_without_loop_is_a_gap() {
        assert_eq!(
            emit_body("{ break; }", TranslationContext::Block),
            "// untranslated: break outside of a translated loop\n"
        );
    }
}
