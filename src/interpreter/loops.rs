//! Loop statement execution (`while`, `do-while`, `for`).
//!
//! Every loop pushes a control frame carrying its iteration counter. Passing
//! the configured ceiling aborts the run with
//! [`RuntimeError::IterationLimit`]. `break` and `continue` are propagated via
//! `LoopBodyResult` so the loop driver can react without inspecting
//! `control_flow` directly.

use crate::interpreter::control::{ControlFrame, FrameKind};
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Expr, SourceLocation, Stmt};

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`
    Continue,
    /// `break` was encountered
    Break,
    /// `return` was executed; unwind and let the caller see it
    Exit,
}

impl Interpreter {
    /// Executes `body` inside a fresh scope and consumes any `break` or
    /// `continue` it raised.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &[Stmt],
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.execute_block(body)?;

        let result = match self.control_flow {
            ControlFlow::Normal => LoopBodyResult::Continue,
            ControlFlow::Continue => {
                self.control_flow = ControlFlow::Normal;
                LoopBodyResult::Continue
            }
            ControlFlow::Break => {
                self.control_flow = ControlFlow::Normal;
                LoopBodyResult::Break
            }
            ControlFlow::Return => LoopBodyResult::Exit,
        };
        Ok(result)
    }

    pub(crate) fn evaluate_condition(&mut self, condition: &Expr) -> Result<bool, RuntimeError> {
        Ok(self.evaluate_expr(condition)?.is_truthy())
    }

    /// Run `drive` with a loop frame pushed for the duration.
    fn with_loop_frame(
        &mut self,
        kind: FrameKind,
        location: SourceLocation,
        drive: impl FnOnce(&mut Self) -> Result<(), RuntimeError>,
    ) -> Result<(), RuntimeError> {
        let frame =
            ControlFrame::new(kind, location).with_ceiling(self.config.max_loop_iterations);
        self.control_mut().push(frame);
        let result = drive(self);
        self.control_mut().pop();
        result
    }

    /// Count one iteration of the innermost loop against its ceiling.
    fn begin_iteration(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        let within_ceiling = self
            .control_mut()
            .top_mut()
            .map_or(true, ControlFrame::record_iteration);

        if within_ceiling {
            Ok(())
        } else {
            tracing::warn!(line = location.line, "loop iteration ceiling reached");
            Err(RuntimeError::IterationLimit {
                limit: self.config.max_loop_iterations,
                location,
            })
        }
    }

    fn test_loop_condition(&mut self, condition: &Expr) -> Result<bool, RuntimeError> {
        let holds = self.evaluate_condition(condition)?;
        if let Some(frame) = self.control_mut().top_mut() {
            frame.condition = holds;
        }
        Ok(holds)
    }

    /// Executes a `while (condition) { body }` loop.
    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &[Stmt],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.with_loop_frame(FrameKind::While, location, |interp| {
            while interp.test_loop_condition(condition)? {
                interp.begin_iteration(location)?;
                match interp.execute_loop_body(body)? {
                    LoopBodyResult::Exit => return Ok(()),
                    LoopBodyResult::Break => break,
                    LoopBodyResult::Continue => {}
                }
            }
            Ok(())
        })
    }

    /// Executes a `do { body } while (condition)` loop.
    ///
    /// The body always runs at least once; the condition is checked after each
    /// iteration.
    pub(crate) fn execute_do_while(
        &mut self,
        body: &[Stmt],
        condition: &Expr,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.with_loop_frame(FrameKind::DoWhile, location, |interp| {
            loop {
                interp.begin_iteration(location)?;
                match interp.execute_loop_body(body)? {
                    LoopBodyResult::Exit => return Ok(()),
                    LoopBodyResult::Break => break,
                    LoopBodyResult::Continue => {}
                }

                if !interp.test_loop_condition(condition)? {
                    break;
                }
            }
            Ok(())
        })
    }

    /// Executes a `for (init; condition; update) { body }` loop.
    ///
    /// All three header parts are optional; a missing condition is always
    /// true. A variable declared in `init` lives in a scope that ends with the
    /// loop. `continue` runs `update` before the condition is re-tested.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        update: Option<&Expr>,
        body: &[Stmt],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.symbols_mut().push_scope();

        let result = init
            .map_or(Ok(()), |stmt| self.execute_statement(stmt))
            .and_then(|()| {
                self.with_loop_frame(FrameKind::For, location, |interp| {
                    loop {
                        if let Some(cond) = condition {
                            if !interp.test_loop_condition(cond)? {
                                break;
                            }
                        }

                        interp.begin_iteration(location)?;
                        match interp.execute_loop_body(body)? {
                            LoopBodyResult::Exit => return Ok(()),
                            LoopBodyResult::Break => break,
                            LoopBodyResult::Continue => {}
                        }

                        if let Some(update) = update {
                            interp.evaluate_expr(update)?;
                        }
                    }
                    Ok(())
                })
            });

        self.symbols_mut().pop_scope();
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::errors::RuntimeError;
    use crate::interpreter::Interpreter;
    use crate::parser::parse_source;
    use crate::runner::RunConfig;

    fn execute_with(source: &str, config: RunConfig) -> (Result<i64, RuntimeError>, String) {
        let program = parse_source(source).unwrap();
        let mut interpreter = Interpreter::new(&program, "", config);
        let result = interpreter.run(&program);
        (result, interpreter.console().text())
    }

    fn execute(source: &str) -> String {
        let (result, text) = execute_with(source, RunConfig::default());
        assert!(result.is_ok(), "run failed: {:?}", result);
        text
    }

    #[test]
    fn test_for_loop() {
        let out = execute("int main() { int i; for (i = 0; i < 5; i++) printf(\"%d \", i); return 0; }");
        assert_eq!(out, "0 1 2 3 4 ");
    }

    #[test]
    fn test_for_with_declaration_and_continue() {
        let out = execute(
            "int main() { for (int i = 0; i < 6; i++) { if (i % 2 == 0) continue; printf(\"%d\", i); } return 0; }",
        );
        assert_eq!(out, "135");
    }

    #[test]
    fn test_while_with_break() {
        let out = execute(
            "int main() { int n = 0; while (1) { n++; if (n == 4) break; } printf(\"%d\", n); return 0; }",
        );
        assert_eq!(out, "4");
    }

    #[test]
    fn test_do_while_runs_once() {
        let out = execute("int main() { int n = 10; do { printf(\"x\"); n++; } while (n < 5); return 0; }");
        assert_eq!(out, "x");
    }

    #[test]
    fn test_nested_break_only_leaves_inner_loop() {
        let out = execute(
            "int main() { for (int i = 0; i < 3; i++) { for (int j = 0; j < 3; j++) { if (j == 1) break; printf(\"%d%d \", i, j); } } return 0; }",
        );
        assert_eq!(out, "00 10 20 ");
    }

    #[test]
    fn test_infinite_loop_hits_ceiling() {
        let config = RunConfig {
            max_loop_iterations: 25,
            ..RunConfig::default()
        };
        let (result, out) = execute_with(
            "int main() { int n = 0; while (1) { printf(\".\"); } return 0; }",
            config,
        );
        assert!(matches!(result, Err(RuntimeError::IterationLimit { limit: 25, .. })));
        assert_eq!(out.len(), 25);
    }

    #[test]
    fn test_return_inside_loop() {
        let out = execute(
            "int find() { for (int i = 0; i < 100; i++) { if (i * i > 50) return i; } return -1; }\nint main() { printf(\"%d\", find()); return 0; }",
        );
        assert_eq!(out, "8");
    }
}
