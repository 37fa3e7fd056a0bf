//! Lexical scopes mapping names to their declared type.

use std::collections::HashMap;

/// Stack of scopes, innermost last. The root scope is never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<HashMap<String, String>>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Record `name` with its type text in the innermost scope.
    pub fn declare(&mut self, name: impl Into<String>, ty: impl Into<String>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), ty.into());
        }
    }

    /// Type of the nearest declaration of `name`, or `""`.
    pub fn lookup(&self, name: &str) -> &str {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_restored_on_pop() {
        let mut scopes = ScopeStack::new();
        scopes.declare("x", "T");
        scopes.push();
        scopes.declare("x", "U");
        assert_eq!(scopes.lookup("x"), "U");
        scopes.pop();
        assert_eq!(scopes.lookup("x"), "T");
    }

    #[test]
    fn test_outer_lookup_and_missing() {
        let mut scopes = ScopeStack::new();
        scopes.declare("p", "\\mathbb{R}^2");
        scopes.push();
        scopes.push();
        assert_eq!(scopes.lookup("p"), "\\mathbb{R}^2");
        assert_eq!(scopes.lookup("q"), "");
    }

    #[test]
    fn test_root_is_kept() {
        let mut scopes = ScopeStack::new();
        scopes.pop();
        assert_eq!(scopes.depth(), 1);
        scopes.declare("x", "int");
        assert_eq!(scopes.lookup("x"), "int");
    }
}
