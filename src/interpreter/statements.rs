//! Declarations and conditionals.

use crate::interpreter::control::{ControlFrame, FrameKind};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::storage_size;
use crate::memory::symbols::Variable;
use crate::memory::value::Value;
use crate::parser::ast::{Declarator, Expr, SourceLocation, Stmt};

impl Interpreter {
    /// `int a, b = 2, c = a + b;`: declarators are processed left to right,
    /// so later initializers see earlier names.
    pub(crate) fn execute_declaration(
        &mut self,
        declarators: &[Declarator],
    ) -> Result<(), RuntimeError> {
        for decl in declarators {
            let value = match &decl.init {
                Some(init) => self.evaluate_initializer(decl, init)?,
                None => Value::default_for(&decl.var_type),
            };

            self.memory_bytes += storage_size(&decl.var_type, &value);
            self.symbols_mut()
                .declare(decl.name.clone(), Variable::new(decl.var_type.clone(), value));
        }
        Ok(())
    }

    /// An initializer that cannot be converted to the declared type leaves the
    /// variable at its default.
    fn evaluate_initializer(
        &mut self,
        decl: &Declarator,
        init: &Expr,
    ) -> Result<Value, RuntimeError> {
        let value = self.evaluate_expr(init)?;
        match value.coerce_to(&decl.var_type) {
            Ok(value) => Ok(value),
            Err(reason) => {
                self.recover(RuntimeError::AssignmentFailed {
                    name: decl.name.clone(),
                    reason,
                    location: decl.location,
                })?;
                Ok(Value::default_for(&decl.var_type))
            }
        }
    }

    pub(crate) fn execute_if(
        &mut self,
        condition: &Expr,
        then_branch: &[Stmt],
        else_branch: Option<&[Stmt]>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let taken = self.evaluate_condition(condition)?;

        let mut frame = ControlFrame::new(FrameKind::If, location);
        frame.condition = taken;
        frame.else_taken = !taken && else_branch.is_some();
        self.control_mut().push(frame);

        let result = match (taken, else_branch) {
            (true, _) => self.execute_block(then_branch),
            (false, Some(else_branch)) => self.execute_block(else_branch),
            (false, None) => Ok(()),
        };

        self.control_mut().pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::errors::DiagnosticKind;
    use crate::interpreter::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::parse_source;
    use crate::runner::RunConfig;

    fn execute(source: &str) -> Interpreter {
        let program = parse_source(source).unwrap();
        let mut interpreter = Interpreter::new(&program, "", RunConfig::default());
        interpreter.run(&program).unwrap();
        interpreter
    }

    #[test]
    fn test_declaration_coerces_initializer() {
        let interp = execute("int g = 3.9;\nint main() { return 0; }");
        assert_eq!(interp.globals().get("g").unwrap().value, Value::Int(3));
    }

    #[test]
    fn test_uninitialized_variables_hold_defaults() {
        let interp = execute(
            "int main() { int a; double d; char c; char s[8]; printf(\"%d %.1f %d [%s]\", a, d, c, s); return 0; }",
        );
        assert_eq!(interp.console().text(), "0 0.0 0 []");
    }

    #[test]
    fn test_later_declarators_see_earlier_ones() {
        let interp = execute("int main() { int a = 2, b = a * 3; printf(\"%d\", b); return 0; }");
        assert_eq!(interp.console().text(), "6");
    }

    #[test]
    fn test_bad_initializer_falls_back_to_default() {
        let interp = execute("int main() { int n = \"text\"; printf(\"%d\", n); return 0; }");
        assert_eq!(interp.diagnostics().len(), 1);
        assert_eq!(interp.diagnostics()[0].kind, DiagnosticKind::Warning);
        assert!(interp.console().text().ends_with("0"));
    }

    #[test]
    fn test_if_else_chain() {
        let interp = execute(
            "int main() { int x = 7;\n if (x > 10) printf(\"big\");\n else if (x > 5) printf(\"medium\");\n else printf(\"small\");\n return 0; }",
        );
        assert_eq!(interp.console().text(), "medium");
    }

    #[test]
    fn test_memory_estimate_counts_declarations() {
        let interp = execute("int main() { int a; double b; char s[10]; return 0; }");
        // main frame + 4 + 8 + 10
        assert_eq!(interp.memory_bytes(), 16 + 22);
    }
}
