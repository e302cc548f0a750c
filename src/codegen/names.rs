//! Identifier style conversion and type rendering
//!
//! Source identifiers are snake_case; the output uses PascalCase for every
//! identifier it emits. Primitive type names are replaced through the
//! [`TypeMap`] before any conversion, and mapped names are emitted verbatim.

use crate::codegen::Generator;
use crate::parser::ast::*;
use rustc_hash::FxHashMap;

/// `snake_case` → `PascalCase`: the first character and every character
/// after an underscore are upper-cased, underscores are dropped.
///
/// Names made only of underscores (the discard `_`) are kept as they are.
pub fn to_pascal_case(name: &str) -> String {
    if name.chars().all(|c| c == '_') {
        return name.to_string();
    }

    let mut result = String::with_capacity(name.len());
    let mut capitalize = true;
    for ch in name.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            result.extend(ch.to_uppercase());
            capitalize = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// Primitive and standard type name substitutions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    entries: FxHashMap<String, String>,
}

/// Numeric primitives, kept exactly as the reference table has them
const PRIMITIVES: &[(&str, &str)] = &[
    ("i8", "sbyte"),
    ("i16", "byte"),
    ("i32", "int"),
    ("i64", "long"),
    ("isize", "nint"),
    ("u8", "byte"),
    ("u16", "ushort"),
    ("u32", "uint"),
    ("u64", "ulong"),
    ("usize", "nunt"),
    ("f32", "float"),
    ("f64", "double"),
];

/// Names that would otherwise come out as non-existent PascalCase types
const STANDARD: &[(&str, &str)] = &[
    ("bool", "bool"),
    ("char", "char"),
    ("str", "string"),
    ("String", "string"),
    ("Vec", "List"),
    ("HashMap", "Dictionary"),
    ("HashSet", "HashSet"),
];

impl Default for TypeMap {
    fn default() -> Self {
        let entries = PRIMITIVES
            .iter()
            .chain(STANDARD)
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Self { entries }
    }
}

impl TypeMap {
    /// Map without any entries
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, target: impl Into<String>) {
        self.entries.insert(name.into(), target.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Generator {
    /// Output spelling of a bare source identifier, after renaming
    pub(crate) fn render_ident(&self, name: &str) -> String {
        if let Some(resolved) = self.scopes.lookup(name) {
            return to_pascal_case(resolved);
        }
        self.render_member(name)
    }

    /// Output spelling of a name that is never a local binding
    pub(crate) fn render_member(&self, name: &str) -> String {
        match self.config.type_map.get(name) {
            Some(mapped) => mapped.to_string(),
            None => to_pascal_case(name),
        }
    }

    pub(crate) fn render_name(&self, name: &Name) -> String {
        match name {
            Name::Ident(ident) => self.render_ident(ident),
            Name::Underscore => "_".to_string(),
            Name::SelfValue => "this".to_string(),
            Name::SelfType => self.self_type_name(),
            Name::Super => String::new(),
            Name::Crate => self.config.root_class.clone(),
        }
    }

    pub(crate) fn self_type_name(&self) -> String {
        self.self_type.clone().unwrap_or_else(|| "Self".to_string())
    }

    /// `a::b::C` → `A.B.C`; `super::` disappears, members skip the registry
    pub(crate) fn render_path(&self, prefix: &Expr, name: &Name) -> String {
        let head = match prefix {
            Expr::Name(Name::Super) => String::new(),
            Expr::Name(first) => self.render_name(first),
            Expr::Path { prefix, name } => self.render_path(prefix, name),
            other => self.render_type(other),
        };
        let member = match name {
            Name::Ident(ident) => self.render_member(ident),
            other => self.render_name(other),
        };

        if head.is_empty() {
            member
        } else {
            format!("{}.{}", head, member)
        }
    }

    /// Type expression → output type text
    pub(crate) fn render_type(&self, ty: &Expr) -> String {
        match ty {
            Expr::Name(Name::Underscore) => "dynamic".to_string(),
            Expr::Name(Name::Ident(name)) if name == "!" => "void".to_string(),
            Expr::Name(Name::Ident(name)) => self.render_member(name),
            Expr::Name(name) => self.render_name(name),
            Expr::Path { prefix, name } => self.render_path(prefix, name),
            Expr::WithGenerics { target, args, .. } => self.render_generic_type(target, args),
            Expr::Ref { operand, .. } => self.render_type(operand),
            Expr::Array(elements) => match elements.first() {
                Some(element) => format!("{}[]", self.render_type(element)),
                None => "dynamic[]".to_string(),
            },
            Expr::ArrayRepeat { value, .. } => format!("{}[]", self.render_type(value)),
            Expr::Tuple(elements) => format!(
                "({})",
                elements
                    .iter()
                    .map(|element| self.render_type(element))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Expr::Literal(Literal::Unit) => "void".to_string(),
            Expr::Literal(Literal::Int(value)) => value.clone(),
            other => {
                tracing::debug!(?other, "type expression rendered as dynamic");
                "dynamic".to_string()
            }
        }
    }

    fn render_generic_type(&self, target: &Expr, args: &[Expr]) -> String {
        let closure_trait = match target {
            Expr::Name(Name::Ident(name)) => matches!(name.as_str(), "Fn" | "FnMut" | "FnOnce" | "fn"),
            _ => false,
        };

        let mut rendered: Vec<String> = args
            .iter()
            .map(|arg| match arg {
                // Associated type binding `Item = T`
                Expr::Binary {
                    op: BinaryOp::Assign,
                    right,
                    ..
                } => self.render_type(right),
                other => self.render_type(other),
            })
            .collect();

        if closure_trait {
            let returns_unit = args.last().map_or(true, Expr::is_unit);
            if returns_unit {
                rendered.pop();
                if rendered.is_empty() {
                    return "Action".to_string();
                }
                return format!("Action<{}>", rendered.join(", "));
            }
            return format!("Func<{}>", rendered.join(", "));
        }

        format!("{}<{}>", self.render_type(target), rendered.join(", "))
    }

    /// `<T, U>` or nothing
    pub(crate) fn render_generic_params(&self, generics: &[Generic]) -> String {
        if generics.is_empty() {
            return String::new();
        }
        let names: Vec<String> = generics.iter().map(|generic| self.render_name(&generic.name)).collect();
        format!("<{}>", names.join(", "))
    }

    /// ` where T : A, B where U : C` or nothing
    pub(crate) fn render_where_clauses(&self, generics: &[Generic]) -> String {
        generics
            .iter()
            .filter(|generic| !generic.bounds.is_empty())
            .map(|generic| {
                let bounds: Vec<String> = generic.bounds.iter().map(|bound| self.render_type(bound)).collect();
                format!(" where {} : {}", self.render_name(&generic.name), bounds.join(", "))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("add"), "Add");
        assert_eq!(to_pascal_case("my_long_name"), "MyLongName");
        assert_eq!(to_pascal_case("Point"), "Point");
        assert_eq!(to_pascal_case("_private"), "Private");
        assert_eq!(to_pascal_case("x1"), "X1");
        assert_eq!(to_pascal_case("_"), "_");
    }

    #[test]
    fn test_default_type_map_keeps_reference_entries() {
        let map = TypeMap::default();
        assert_eq!(map.get("i32"), Some("int"));
        assert_eq!(map.get("i16"), Some("byte"));
        assert_eq!(map.get("usize"), Some("nunt"));
        assert_eq!(map.get("String"), Some("string"));
        assert_eq!(map.get("Point"), None);
    }

    #[test]
    fn test_render_types() {
        let generator = Generator::new(TranslatorConfig::default());
        let vec_of_u8 = Expr::WithGenerics {
            target: Box::new(Expr::name("Vec")),
            lifetimes: Vec::new(),
            args: vec![Expr::name("u8")],
        };
        assert_eq!(generator.render_type(&vec_of_u8), "List<byte>");

        let callback = Expr::WithGenerics {
            target: Box::new(Expr::name("Fn")),
            lifetimes: Vec::new(),
            args: vec![Expr::name("i32"), Expr::unit()],
        };
        assert_eq!(generator.render_type(&callback), "Action<int>");

        let slice = Expr::Ref {
            lifetime: None,
            mutable: false,
            operand: Box::new(Expr::Array(vec![Expr::name("f64")])),
        };
        assert_eq!(generator.render_type(&slice), "double[]");
    }
}
