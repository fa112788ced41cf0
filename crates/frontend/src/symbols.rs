//! Scoped symbol table for variables inside one function.

use std::collections::HashMap;

use crate::ast::TypeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Symbol {
    pub ty: TypeName,
    pub initialized: bool,
}

/// A stack of scopes. Lookup walks from the innermost scope outwards.
#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    /// Declare `name` in the innermost scope.
    ///
    /// Returns false if `name` is already visible. Variables share one frame
    /// slot per name at run time, so shadowing an outer declaration is
    /// refused the same way as redeclaring in one scope.
    pub fn declare(&mut self, name: &str, ty: TypeName, initialized: bool) -> bool {
        if self.lookup(name).is_some() {
            return false;
        }
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name.to_string(), Symbol { ty, initialized });
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    pub fn mark_initialized(&mut self, name: &str) {
        if let Some(symbol) = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        {
            symbol.initialized = true;
        }
    }
}
