//! Function table
//!
//! Built once per run from the parsed program and never modified afterward.
//! `main` is the entry point and is not callable by name.

use crate::parser::ast::{FunctionDef, Program};
use rustc_hash::FxHashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: FxHashMap<String, Rc<FunctionDef>>,
}

impl FunctionTable {
    /// Collect every non-`main` definition. A second definition of the same
    /// name is ignored and reported back to the caller.
    pub fn from_program(program: &Program) -> (Self, Vec<Rc<FunctionDef>>) {
        let mut table = FunctionTable::default();
        let mut duplicates = Vec::new();

        for def in program.functions.iter().filter(|f| f.name != "main") {
            let def = Rc::new(def.clone());
            if table.functions.contains_key(&def.name) {
                duplicates.push(def);
            } else {
                table.functions.insert(def.name.clone(), def);
            }
        }

        (table, duplicates)
    }

    pub fn get(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn test_main_is_excluded_and_duplicates_reported() {
        let program = parse_source(
            "int f() { return 1; }\nint f() { return 2; }\nint g(int a) { return a; }\nint main() { return 0; }",
        )
        .unwrap();
        let (table, duplicates) = FunctionTable::from_program(&program);

        assert_eq!(table.len(), 2);
        assert!(!table.contains("main"));
        assert_eq!(table.get("g").unwrap().params.len(), 1);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].location.line, 2);
    }
}
