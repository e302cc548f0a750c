//! # Introduction
//!
//! rustsharp translates Rust source text into structurally equivalent C#.
//! The translation is syntactic: no type checking or borrow analysis is
//! performed, and constructs without a C# counterpart are left in the output
//! as `untranslated:` comments instead of failing the run.
//!
//! ## Translation pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Generator → C# text
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST. Lexical and
//!    syntactic errors abort the translation.
//! 2. [`codegen`]: lowers the AST to C#, renaming shadowed bindings,
//!    elevating block tails to `return`s and wrapping statement-shaped
//!    expressions in immediately-invoked lambdas.
//! 3. [`config`]: type map, indentation and root class settings.
//! 4. [`samples`]: source/expected pairs and the placeholder-aware validator.
//! 5. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let text = rustsharp::translate("fn add(a: i32, b: i32) -> i32 { a + b }").unwrap();
//! assert!(text.contains("public static int Add(int A, int B)"));
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;
pub mod samples;
pub mod ui;

pub use codegen::{GenerationGap, Translation};
pub use config::TranslatorConfig;
pub use error::TranslateError;

use codegen::Generator;

/// Translate with the default configuration
pub fn translate(source: &str) -> Result<String, TranslateError> {
    Ok(translate_with(source, &TranslatorConfig::default())?.text)
}

/// Translate and report every construct that was left untranslated
pub fn translate_with(source: &str, config: &TranslatorConfig) -> Result<Translation, TranslateError> {
    let file = parser::parse_source(source)?;
    tracing::debug!(items = file.items.len(), "parsed source file");
    Ok(Generator::new(config.clone()).generate(&file))
}
