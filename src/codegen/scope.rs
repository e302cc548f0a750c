//! Lexical renaming scopes
//!
//! A name is taken when any *active* scope has resolved something to it, so a
//! binding in a nested block never shadows an outer binding under the same
//! output name. Bindings are stored in the innermost scope only and vanish
//! when that scope is popped.
//!
//! Occupancy is decided on the emitted PascalCase spelling, so `a_` and `a`
//! cannot both come out as `A`.

use crate::codegen::names::to_pascal_case;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Default)]
struct Scope {
    /// source name → resolved name
    bindings: FxHashMap<String, String>,
    /// emitted spellings claimed by this scope
    occupied: FxHashSet<String>,
}

#[derive(Debug)]
pub struct ScopeRegistry {
    scopes: Vec<Scope>,
    temp_counter: usize,
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeRegistry {
    /// Registry holding the outermost scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            temp_counter: 0,
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope; the outermost one is never removed
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_occupied(&self, name: &str) -> bool {
        let spelling = to_pascal_case(name);
        self.scopes.iter().any(|scope| scope.occupied.contains(&spelling))
    }

    /// Bind `name` in the innermost scope to the first free spelling of
    /// `name`, `name1`, `name2`, ...
    pub fn register(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while self.is_occupied(&candidate) {
            candidate = format!("{}{}", name, suffix);
            suffix += 1;
        }

        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), candidate.clone());
            scope.occupied.insert(to_pascal_case(&candidate));
        }
        candidate
    }

    /// Innermost binding of `name`, if any
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
            .map(String::as_str)
    }

    /// Resolved spelling, or `name` itself for unbound (external) names
    pub fn resolve(&self, name: &str) -> String {
        self.lookup(name).unwrap_or(name).to_string()
    }

    /// Fresh synthetic name that collides with nothing active
    pub fn mint_temp(&mut self) -> String {
        loop {
            let candidate = format!("temp{}", self.temp_counter);
            self.temp_counter += 1;
            if !self.is_occupied(&candidate) {
                return self.register(&candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_scope_collision_gets_suffix() {
        let mut scopes = ScopeRegistry::new();
        assert_eq!(scopes.register("x"), "x");
        assert_eq!(scopes.register("x"), "x1");
        assert_eq!(scopes.register("x"), "x2");
        assert_eq!(scopes.lookup("x"), Some("x2"));
    }

    #[test]
    fn test_outer_binding_stays_occupied_in_nested_scope() {
        let mut scopes = ScopeRegistry::new();
        scopes.register("x");

        scopes.push();
        assert_eq!(scopes.register("x"), "x1");
        assert_eq!(scopes.resolve("x"), "x1");
        scopes.pop();

        assert_eq!(scopes.resolve("x"), "x");
        scopes.push();
        assert_eq!(scopes.register("x"), "x1");
    }

    #[test]
    fn test_unbound_names_resolve_verbatim() {
        let scopes = ScopeRegistry::new();
        assert_eq!(scopes.resolve("println"), "println");
    }

    #[test]
    fn test_temporaries_skip_source_names() {
        let mut scopes = ScopeRegistry::new();
        scopes.register("temp0");

        assert_eq!(scopes.mint_temp(), "temp1");
        assert_eq!(scopes.mint_temp(), "temp2");
    }

    #[test]
    fn test_names_with_the_same_emitted_spelling_collide() {
        let mut scopes = ScopeRegistry::new();
        assert_eq!(scopes.register("a"), "a");
        assert_eq!(scopes.register("a_"), "a_1");
        assert_eq!(scopes.register("my_var"), "my_var");
        assert_eq!(scopes.register("myVar"), "myVar1");
        assert_eq!(to_pascal_case(&scopes.resolve("a_")), "A1");
        assert!(scopes.is_occupied("A"));
    }

    #[test]
    fn test_root_scope_is_never_popped() {
        let mut scopes = ScopeRegistry::new();
        scopes.pop();
        scopes.register("a");
        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.lookup("a"), Some("a"));
    }
}
