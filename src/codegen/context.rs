//! Translation context and scoped generator state
//!
//! Every temporary change to the generator (context, indentation, renaming
//! scope, open braces, loop frames) is made through a [`Scoped`] guard that
//! undoes it on `Drop`. Guards deref to the [`Generator`], so nested guards are
//! taken from the outer guard and unwind in reverse order on every exit path.

use crate::codegen::Generator;
use std::ops::{Deref, DerefMut};

/// How a block's tail expression is lowered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationContext {
    /// Tails produce the enclosing function's (or wrapper's) value: `return tail;`
    Module,
    /// Tails are evaluated for their effects only
    Block,
    /// Inline value position; statement-shaped constructs must be wrapped
    Expression,
}

/// Bookkeeping for one loop being emitted
#[derive(Debug, Clone, Default)]
pub(crate) struct LoopFrame {
    /// Source label, without the quote
    pub(crate) label: Option<String>,
    /// Output label placed after the loop, once a jump needs it
    pub(crate) break_target: Option<String>,
    /// Output label placed at the end of the body, once a jump needs it
    pub(crate) continue_target: Option<String>,
    /// Switches opened inside this loop's body; a plain `break` there would exit the switch
    pub(crate) switch_depth: usize,
    /// `break value` returns the value from the surrounding function or wrapper
    pub(crate) yields: bool,
}

impl LoopFrame {
    pub(crate) fn new(label: Option<String>, yields: bool) -> Self {
        Self {
            label,
            yields,
            ..Self::default()
        }
    }
}

pub(crate) enum Exit {
    Context(TranslationContext),
    Indent,
    Scope,
    /// Closing `}` followed by a newline
    Block,
    /// Closing `}` that continues the current line
    InlineBlock,
    Wrapped {
        context: TranslationContext,
        loops: Vec<LoopFrame>,
    },
    HiddenLoops(Vec<LoopFrame>),
    Loop,
    Switch,
    SelfType(Option<String>),
}

/// Guard restoring one piece of generator state when dropped
pub(crate) struct Scoped<'g> {
    generator: &'g mut Generator,
    exit: Exit,
}

impl Deref for Scoped<'_> {
    type Target = Generator;

    fn deref(&self) -> &Generator {
        self.generator
    }
}

impl DerefMut for Scoped<'_> {
    fn deref_mut(&mut self) -> &mut Generator {
        self.generator
    }
}

impl Drop for Scoped<'_> {
    fn drop(&mut self) {
        let generator = &mut *self.generator;
        match &mut self.exit {
            Exit::Context(previous) => generator.context = *previous,
            Exit::Indent => generator.out.dedent(),
            Exit::Scope => generator.scopes.pop(),
            Exit::Block => {
                generator.out.dedent();
                generator.scopes.pop();
                generator.out.line("}");
            }
            Exit::InlineBlock => {
                generator.out.dedent();
                generator.scopes.pop();
                generator.out.write("}");
            }
            Exit::Wrapped { context, loops } => {
                generator.out.dedent();
                generator.scopes.pop();
                generator.out.write("})()");
                generator.context = *context;
                generator.loops = std::mem::take(loops);
            }
            Exit::HiddenLoops(loops) => generator.loops = std::mem::take(loops),
            Exit::Loop => {
                generator.loops.pop();
            }
            Exit::Switch => {
                if let Some(frame) = generator.loops.last_mut() {
                    frame.switch_depth = frame.switch_depth.saturating_sub(1);
                }
            }
            Exit::SelfType(previous) => generator.self_type = previous.take(),
        }
    }
}

impl Generator {
    fn guard(&mut self, exit: Exit) -> Scoped<'_> {
        Scoped {
            generator: self,
            exit,
        }
    }

    /// Switch the translation context until the guard drops
    pub(crate) fn with_context(&mut self, context: TranslationContext) -> Scoped<'_> {
        let previous = std::mem::replace(&mut self.context, context);
        self.guard(Exit::Context(previous))
    }

    pub(crate) fn indented(&mut self) -> Scoped<'_> {
        self.out.indent();
        self.guard(Exit::Indent)
    }

    /// New renaming scope without any output
    pub(crate) fn scope(&mut self) -> Scoped<'_> {
        self.scopes.push();
        self.guard(Exit::Scope)
    }

    /// `{` on its own line, indented body in a new scope, `}` on drop
    pub(crate) fn braced(&mut self) -> Scoped<'_> {
        self.out.line("{");
        self.out.indent();
        self.scopes.push();
        self.guard(Exit::Block)
    }

    /// Like [`braced`](Self::braced), but the closing `}` does not end the line
    pub(crate) fn braced_inline(&mut self) -> Scoped<'_> {
        self.out.line("{");
        self.out.indent();
        self.scopes.push();
        self.guard(Exit::InlineBlock)
    }

    /// Immediately-invoked closure around statement-shaped code in value position
    ///
    /// Inside, tails return from the closure and enclosing loops are out of reach.
    pub(crate) fn wrapped(&mut self) -> Scoped<'_> {
        self.require_using("System");
        self.out.line("new Func<dynamic>(() =>");
        self.out.line("{");
        self.out.indent();
        self.scopes.push();
        let context = std::mem::replace(&mut self.context, TranslationContext::Module);
        let loops = std::mem::take(&mut self.loops);
        self.guard(Exit::Wrapped { context, loops })
    }

    /// Hide enclosing loops from `break`/`continue` (closure bodies)
    pub(crate) fn without_loops(&mut self) -> Scoped<'_> {
        let loops = std::mem::take(&mut self.loops);
        self.guard(Exit::HiddenLoops(loops))
    }

    pub(crate) fn loop_frame(&mut self, frame: LoopFrame) -> Scoped<'_> {
        self.loops.push(frame);
        self.guard(Exit::Loop)
    }

    /// Mark the innermost loop as being inside one more switch
    pub(crate) fn in_switch(&mut self) -> Scoped<'_> {
        if let Some(frame) = self.loops.last_mut() {
            frame.switch_depth += 1;
        }
        self.guard(Exit::Switch)
    }

    pub(crate) fn with_self_type(&mut self, name: String) -> Scoped<'_> {
        let previous = self.self_type.replace(name);
        self.guard(Exit::SelfType(previous))
    }
}
