//! Translator configuration
//!
//! [`TranslatorConfig`] carries every knob the generator reads. The defaults
//! reproduce the reference translation exactly, including its primitive type
//! table; each table entry can be overridden individually.
//!
//! ```rust,ignore
//! use rustsharp::config::TranslatorConfig;
//!
//! let config = TranslatorConfig::default()
//!     .with_indent_width(2)
//!     .with_type_override("usize", "nuint");
//! ```

use crate::codegen::TypeMap;
use thiserror::Error;

/// Errors for configuration values given as text (command line)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("type override '{0}' must have the form NAME=TARGET")]
    MalformedOverride(String),

    #[error("'{0}' is not a valid C# identifier")]
    InvalidIdentifier(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Source type name → emitted type name
    pub type_map: TypeMap,
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Name of the static class wrapping the whole file
    pub root_class: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            type_map: TypeMap::default(),
            indent_width: 4,
            root_class: "Crate".to_string(),
        }
    }
}

impl TranslatorConfig {
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_root_class(mut self, name: impl Into<String>) -> Self {
        self.root_class = name.into();
        self
    }

    /// Replace (or add) a single type map entry
    pub fn with_type_override(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.type_map.insert(name, target);
        self
    }
}

/// Parse a `NAME=TARGET` type override
pub fn parse_type_override(text: &str) -> Result<(String, String), ConfigError> {
    let (name, target) = text
        .split_once('=')
        .ok_or_else(|| ConfigError::MalformedOverride(text.to_string()))?;
    let (name, target) = (name.trim(), target.trim());
    if name.is_empty() || target.is_empty() {
        return Err(ConfigError::MalformedOverride(text.to_string()));
    }
    Ok((name.to_string(), target.to_string()))
}

/// Check that a root class name can be emitted as a C# identifier
pub fn validate_identifier(name: &str) -> Result<String, ConfigError> {
    let mut chars = name.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_alphanumeric() || c == '_') {
        Ok(name.to_string())
    } else {
        Err(ConfigError::InvalidIdentifier(name.to_string()))
    }
}
