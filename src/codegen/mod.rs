//! C# code generation
//!
//! This module lowers a parsed [`SourceFile`] into C# source text:
//! - [`output`]: Indented output buffer with waypoints
//! - [`scope`]: Lexical renaming registry
//! - [`context`]: Translation context and scoped state guards
//! - [`names`]: PascalCase conversion, type names and the primitive [`TypeMap`]
//! - `expressions`, `macros`, `statements`, `items`: emission, one `impl Generator`
//!   block per syntactic family
//!
//! # Lowering Model
//!
//! The source language is expression-oriented; C# is not. Block tails in
//! [`TranslationContext::Module`] become `return` statements, and statement-shaped
//! constructs that appear in value position are wrapped in an
//! immediately-invoked `Func<dynamic>`.
//!
//! Shapes without an emission rule never abort generation. They are written
//! as `untranslated:` comments and reported as [`GenerationGap`]s.

pub mod context;
mod expressions;
mod items;
mod macros;
pub mod names;
pub mod output;
pub mod scope;
mod statements;

pub use context::TranslationContext;
pub use names::{to_pascal_case, TypeMap};
pub use output::OutputBuffer;
pub use scope::ScopeRegistry;

use crate::config::TranslatorConfig;
use crate::parser::ast::SourceFile;
use context::LoopFrame;
use std::collections::BTreeSet;
use std::fmt;

/// A source construct that was replaced by a placeholder comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationGap {
    /// Short description of the construct, as written in the placeholder
    pub what: String,
}

impl fmt::Display for GenerationGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "untranslated: {}", self.what)
    }
}

/// Generated text plus everything that could not be translated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub gaps: Vec<GenerationGap>,
}

/// Single-use C# emitter for one source file
pub struct Generator {
    pub(crate) out: OutputBuffer,
    pub(crate) scopes: ScopeRegistry,
    pub(crate) context: TranslationContext,
    pub(crate) loops: Vec<LoopFrame>,
    /// Output name of the type `Self` refers to
    pub(crate) self_type: Option<String>,
    /// Output names of the `mod` classes being emitted, outermost first
    pub(crate) module_path: Vec<String>,
    /// Namespaces needed by emitted helper calls
    namespaces: BTreeSet<String>,
    /// `using` lines produced by `use` items and type aliases
    hoisted: Vec<String>,
    gaps: Vec<GenerationGap>,
    pub(crate) config: TranslatorConfig,
}

impl Generator {
    pub fn new(config: TranslatorConfig) -> Self {
        Generator {
            out: OutputBuffer::new(config.indent_width),
            scopes: ScopeRegistry::new(),
            context: TranslationContext::Module,
            loops: Vec::new(),
            self_type: None,
            module_path: Vec::new(),
            namespaces: BTreeSet::new(),
            hoisted: Vec::new(),
            gaps: Vec::new(),
            config,
        }
    }

    /// Translate a whole file; the generator is consumed
    pub fn generate(mut self, file: &SourceFile) -> Translation {
        self.emit_root(file);

        let mut header = String::new();
        for namespace in &self.namespaces {
            header.push_str(&format!("using {};\n", namespace));
        }
        for line in &self.hoisted {
            header.push_str(line);
            header.push('\n');
        }
        if !header.is_empty() {
            header.push('\n');
        }

        tracing::debug!(gaps = self.gaps.len(), "generated translation");
        Translation {
            text: header + &self.out.into_string(),
            gaps: self.gaps,
        }
    }

    pub(crate) fn require_using(&mut self, namespace: &str) {
        self.namespaces.insert(namespace.to_string());
    }

    /// Queue a `using` line for the top of the file
    pub(crate) fn hoist(&mut self, line: String) {
        if !self.hoisted.contains(&line) {
            self.hoisted.push(line);
        }
    }

    /// Placeholder occupying a whole line (item or statement position)
    pub(crate) fn gap_statement(&mut self, what: impl Into<String>) {
        let gap = self.record_gap(what.into());
        self.out.line(&format!("// {}", gap));
    }

    /// Placeholder inside an expression
    pub(crate) fn gap_inline(&mut self, what: impl Into<String>) {
        let text = self.gap_text(what);
        self.out.write(&text);
    }

    /// Inline placeholder text for callers that splice it in later
    pub(crate) fn gap_text(&mut self, what: impl Into<String>) -> String {
        let gap = self.record_gap(what.into());
        format!("/* {} */", gap)
    }

    fn record_gap(&mut self, what: String) -> GenerationGap {
        tracing::debug!(what = %what, "generation gap");
        let gap = GenerationGap { what };
        self.gaps.push(gap.clone());
        gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn generate(source: &str) -> Translation {
        let file = parse_source(source).expect("source should parse");
        Generator::new(TranslatorConfig::default()).generate(&file)
    }

    #[test]
    fn test_empty_file_is_empty_root_class() {
        let translation = generate("");
        assert_eq!(translation.text, "public static class Crate\n{\n}\n");
        assert!(translation.gaps.is_empty());
    }

    #[test]
    fn test_namespaces_and_aliases_are_hoisted() {
        let translation = generate("use geometry::shapes::Circle;\nfn main() { println!(\"hi\"); }");
        assert!(translation
            .text
            .starts_with("using System;\nusing Circle = Geometry.Shapes.Circle;\n\npublic static class Crate\n"));
    }

    #[test]
    fn test_gaps_are_recorded_and_rendered() {
        let translation = generate("extern crate alloc;\nmod network;\nfn f() {}");
        let gaps: Vec<String> = translation.gaps.iter().map(|gap| gap.what.clone()).collect();
        assert_eq!(gaps, vec!["extern crate alloc", "mod network;"]);
        assert!(translation.text.contains("    // untranslated: extern crate alloc\n"));
        assert!(translation.text.contains("public static void F()"));
    }
}
