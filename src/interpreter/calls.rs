//! Function calls
//!
//! A call to a name defined in the program runs the user function; anything
//! else is tried as a built-in. User functions get a fresh [`CallFrame`] that
//! sees its parameters, its own locals and the globals, never the caller's
//! locals. Arguments are copied in.

use crate::interpreter::constants::{FRAME_OVERHEAD_BYTES, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::interpreter::engine::{CallFrame, ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::storage_size;
use crate::memory::symbols::{SymbolTable, Variable};
use crate::memory::value::Value;
use crate::parser::ast::{BaseType, Expr, SourceLocation};
use tracing::trace;

impl Interpreter {
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if self.functions.contains(name) {
            return self.call_user_function(name, args, location);
        }
        if let Some(value) = self.call_builtin(name, args, location)? {
            return Ok(value);
        }
        self.recover_value(RuntimeError::UndefinedFunction {
            name: name.to_string(),
            location,
        })
    }

    fn call_user_function(
        &mut self,
        name: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some(func_def) = self.functions.get(name) else {
            return self.recover_value(RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            });
        };

        if args.len() != func_def.params.len() {
            return self.recover_value(RuntimeError::ArgumentCountMismatch {
                function: name.to_string(),
                expected: func_def.params.len(),
                got: args.len(),
                location,
            });
        }

        if self.frames.len() >= self.config.max_call_depth {
            tracing::warn!(function = name, depth = self.frames.len(), "call depth ceiling reached");
            return Err(RuntimeError::CallDepthExceeded {
                function: name.to_string(),
                limit: self.config.max_call_depth,
                location,
            });
        }

        // Evaluate all arguments in the caller's scope
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate_expr(arg)?);
        }

        let mut symbols = SymbolTable::new(name);
        for (param, value) in func_def.params.iter().zip(arg_values) {
            let value = match value.coerce_to(&param.param_type) {
                Ok(value) => value,
                Err(message) => {
                    self.recover(RuntimeError::TypeError { message, location })?;
                    Value::default_for(&param.param_type)
                }
            };
            self.memory_bytes += storage_size(&param.param_type, &value);
            symbols.declare(param.name.clone(), Variable::new(param.param_type.clone(), value));
        }

        trace!(function = name, depth = self.frames.len() + 1, "call");
        self.memory_bytes += FRAME_OVERHEAD_BYTES;
        self.frames
            .push(CallFrame::new(name, symbols, Some(location)));

        let saved_return_value = self.return_value.take();
        // Each C call nests several Rust frames; grow instead of overflowing
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.execute_sequence(&func_def.body)
        });

        self.frames.pop();
        let returned = std::mem::replace(&mut self.return_value, saved_return_value);
        self.control_flow = ControlFlow::Normal;
        self.current_location = location;
        result?;

        if func_def.return_type.base == BaseType::Void {
            return Ok(Value::Int(0));
        }

        match returned {
            Some(value) => match value.coerce_to(&func_def.return_type) {
                Ok(value) => Ok(value),
                Err(message) => self.recover_value(RuntimeError::TypeError { message, location }),
            },
            None => Ok(Value::default_for(&func_def.return_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::errors::{DiagnosticKind, RuntimeError};
    use crate::interpreter::Interpreter;
    use crate::parser::parse_source;
    use crate::runner::RunConfig;

    fn execute_with(source: &str, config: RunConfig) -> (Result<i64, RuntimeError>, Interpreter) {
        let program = parse_source(source).unwrap();
        let mut interpreter = Interpreter::new(&program, "", config);
        let result = interpreter.run(&program);
        (result, interpreter)
    }

    fn execute(source: &str) -> Interpreter {
        let (result, interp) = execute_with(source, RunConfig::default());
        assert!(result.is_ok(), "run failed: {:?}", result);
        interp
    }

    #[test]
    fn test_recursive_fibonacci() {
        let interp = execute(
            "int fib(int n) { if (n <= 1) return n; return fib(n - 1) + fib(n - 2); }\nint main() { printf(\"%d\", fib(10)); return 0; }",
        );
        assert_eq!(interp.console().text(), "55");
    }

    #[test]
    fn test_arguments_are_copied() {
        let interp = execute(
            "void change(int x) { x = 99; }\nint main() { int x = 1; change(x); printf(\"%d\", x); return 0; }",
        );
        assert_eq!(interp.console().text(), "1");
    }

    #[test]
    fn test_callee_cannot_see_caller_locals() {
        let interp = execute("int peek() { return secret; }\nint main() { int secret = 5; printf(\"%d\", peek()); return 0; }");
        assert_eq!(interp.diagnostics().len(), 1);
        assert!(interp.console().text().ends_with("0"));
    }

    #[test]
    fn test_return_value_is_coerced() {
        let interp = execute("int half(double d) { return d / 2; }\ndouble third(int n) { return n / 3.0; }\nint main() { printf(\"%d %.2f\", half(7), third(1)); return 0; }");
        assert_eq!(interp.console().text(), "3 0.33");
    }

    #[test]
    fn test_argument_count_mismatch() {
        let interp = execute("int add(int a, int b) { return a + b; }\nint main() { printf(\"%d\", add(1)); return 0; }");
        assert_eq!(interp.diagnostics().len(), 1);
        assert_eq!(interp.diagnostics()[0].kind, DiagnosticKind::Runtime);
        assert!(interp.console().text().ends_with("0"));
    }

    #[test]
    fn test_undefined_function() {
        let interp = execute("int main() { launch(3); printf(\"done\"); return 0; }");
        assert!(interp.diagnostics()[0].message.contains("launch"));
        assert!(interp.console().text().ends_with("done"));
    }

    #[test]
    fn test_runaway_recursion_hits_depth_ceiling() {
        let config = RunConfig {
            max_call_depth: 20,
            ..RunConfig::default()
        };
        let (result, _) = execute_with("int down(int n) { return down(n + 1); }\nint main() { return down(0); }", config);
        assert!(matches!(result, Err(RuntimeError::CallDepthExceeded { limit: 20, .. })));
    }

    #[test]
    fn test_deep_recursion_on_small_thread_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let interp = execute(
                    "int down(int n) { if (n == 0) return 0; return down(n - 1) + 1; }\nint main() { printf(\"%d\", down(195)); return 0; }",
                );
                interp.console().text()
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), "195");
    }

    #[test]
    fn test_missing_return_defaults() {
        let interp = execute("int nothing() { }\nint main() { printf(\"%d\", nothing()); return 0; }");
        assert_eq!(interp.console().text(), "0");
    }
}
