//! Symbol tables
//!
//! A [`SymbolTable`] maps identifiers to typed [`Variable`]s for one
//! activation: the global scope, or one function call. Block scopes nest
//! inside it; a declaration in an inner block shadows an outer one and the
//! outer binding comes back when the block ends.

use super::value::Value;
use crate::parser::ast::Type;
use rustc_hash::FxHashMap;

/// A declared variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub value: Value,
    pub var_type: Type,
}

impl Variable {
    pub fn new(var_type: Type, value: Value) -> Self {
        Variable { value, var_type }
    }
}

#[derive(Debug, Clone, Default)]
struct ScopeData {
    shadowed: Vec<(String, Variable)>,
    declared: Vec<String>,
}

/// Variables of one activation, with nested block scopes
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pub owner: String,
    locals: FxHashMap<String, Variable>,
    insertion_order: Vec<String>,
    scope_stack: Vec<ScopeData>,
}

impl SymbolTable {
    pub fn new(owner: impl Into<String>) -> Self {
        SymbolTable {
            owner: owner.into(),
            locals: FxHashMap::default(),
            insertion_order: Vec::new(),
            scope_stack: vec![ScopeData::default()],
        }
    }

    /// Enter a new block scope
    pub fn push_scope(&mut self) {
        self.scope_stack.push(ScopeData::default());
    }

    /// Exit the current block scope, restoring anything it shadowed
    pub fn pop_scope(&mut self) {
        if self.scope_stack.len() <= 1 {
            return;
        }
        if let Some(scope) = self.scope_stack.pop() {
            for name in scope.declared {
                self.locals.remove(&name);
                if let Some(pos) = self.insertion_order.iter().rposition(|x| x == &name) {
                    self.insertion_order.remove(pos);
                }
            }

            for (name, var) in scope.shadowed {
                self.locals.insert(name, var);
            }
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }

    /// True when `name` was already declared in the innermost scope.
    pub fn declared_in_current_scope(&self, name: &str) -> bool {
        self.scope_stack.last().is_some_and(|scope| {
            scope.declared.iter().any(|n| n == name)
                || scope.shadowed.iter().any(|(n, _)| n == name)
        })
    }

    /// Declare a variable in the innermost scope.
    pub fn declare(&mut self, name: impl Into<String>, var: Variable) {
        let name = name.into();
        let redeclared = self.declared_in_current_scope(&name);
        let Some(scope) = self.scope_stack.last_mut() else {
            return;
        };

        match self.locals.insert(name.clone(), var) {
            // Same scope: plain overwrite
            Some(_) if redeclared => {}
            Some(old_var) => scope.shadowed.push((name, old_var)),
            None => {
                scope.declared.push(name.clone());
                self.insertion_order.push(name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.locals.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.locals.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    /// Visible variables in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.locals.get(name).map(|var| (name.as_str(), var)))
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::BaseType;

    fn int_var(n: i64) -> Variable {
        Variable::new(Type::new(BaseType::Int), Value::Int(n))
    }

    #[test]
    fn test_shadowing_restores_outer_binding() {
        let mut table = SymbolTable::new("main");
        table.declare("x", int_var(1));

        table.push_scope();
        table.declare("x", int_var(2));
        table.declare("y", int_var(3));
        assert_eq!(table.get("x").unwrap().value, Value::Int(2));
        table.pop_scope();

        assert_eq!(table.get("x").unwrap().value, Value::Int(1));
        assert!(table.get("y").is_none());
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let mut table = SymbolTable::new("main");
        table.declare("x", int_var(1));
        assert!(table.declared_in_current_scope("x"));
        table.declare("x", int_var(5));
        assert_eq!(table.len(), 1);

        table.push_scope();
        assert!(!table.declared_in_current_scope("x"));
        table.pop_scope();
        assert_eq!(table.get("x").unwrap().value, Value::Int(5));
    }

    #[test]
    fn test_outermost_scope_is_never_popped() {
        let mut table = SymbolTable::new("<global>");
        table.declare("g", int_var(7));
        table.pop_scope();
        assert_eq!(table.scope_depth(), 1);
        assert!(table.contains("g"));
    }

    #[test]
    fn test_iter_in_declaration_order() {
        let mut table = SymbolTable::new("main");
        table.declare("b", int_var(1));
        table.declare("a", int_var(2));
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
