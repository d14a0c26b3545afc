// Execution engine for the interpreter

use crate::interpreter::constants::{DEFAULT_RAND_SEED, FRAME_OVERHEAD_BYTES};
use crate::interpreter::control::ControlStack;
use crate::interpreter::errors::{Diagnostic, DiagnosticKind, RuntimeError};
use crate::io::{Console, InputQueue};
use crate::memory::functions::FunctionTable;
use crate::memory::symbols::{SymbolTable, Variable};
use crate::memory::value::Value;
use crate::parser::ast::{Program, SourceLocation, Stmt};
use crate::runner::RunConfig;
use tracing::{debug, trace};

/// How the statement that just ran wants execution to continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return,
}

/// One activation of a function
#[derive(Debug, Clone)]
pub struct CallFrame {
    pub function: String,
    pub symbols: SymbolTable,
    pub control: ControlStack,
    pub call_site: Option<SourceLocation>,
}

impl CallFrame {
    pub fn new(function: &str, symbols: SymbolTable, call_site: Option<SourceLocation>) -> Self {
        CallFrame {
            function: function.to_string(),
            symbols,
            control: ControlStack::new(),
            call_site,
        }
    }
}

/// What a run leaves behind, whether it finished or was aborted
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    pub console: Console,
    pub diagnostics: Vec<Diagnostic>,
    pub memory_bytes: usize,
    pub steps: usize,
}

/// The tree-walking interpreter. One value per run; nothing is shared
/// between runs.
pub struct Interpreter {
    /// File-scope variables
    pub(crate) globals: SymbolTable,

    /// Control frames of statements running outside any function
    pub(crate) global_control: ControlStack,

    /// Call stack, `main` at the bottom
    pub(crate) frames: Vec<CallFrame>,

    pub(crate) functions: FunctionTable,

    pub(crate) console: Console,

    /// `scanf` tokens shared by the whole run
    pub(crate) input: InputQueue,

    pub(crate) diagnostics: Vec<Diagnostic>,

    pub(crate) control_flow: ControlFlow,

    /// Value of the last executed `return`
    pub(crate) return_value: Option<Value>,

    pub(crate) current_location: SourceLocation,

    pub(crate) steps: usize,

    pub(crate) rand_state: u32,

    /// Running total for the memory estimate
    pub(crate) memory_bytes: usize,

    pub(crate) config: RunConfig,
}

impl Interpreter {
    pub fn new(program: &Program, stdin: &str, config: RunConfig) -> Self {
        let (functions, duplicates) = FunctionTable::from_program(program);

        let mut interpreter = Interpreter {
            globals: SymbolTable::new("<global>"),
            global_control: ControlStack::new(),
            frames: Vec::new(),
            functions,
            console: Console::new(),
            input: InputQueue::new(stdin),
            diagnostics: Vec::new(),
            control_flow: ControlFlow::Normal,
            return_value: None,
            current_location: SourceLocation::new(1, 1),
            steps: 0,
            rand_state: DEFAULT_RAND_SEED,
            memory_bytes: 0,
            config,
        };

        for def in duplicates {
            interpreter.report(Diagnostic::new(
                DiagnosticKind::Warning,
                format!("函数 {} 重复定义, 已忽略后面的定义", def.name),
                Some(def.location.line),
            ));
        }

        interpreter
    }

    /// Initialize globals, then run `main` to completion.
    ///
    /// Returns `main`'s exit code. Recoverable problems end up in the
    /// diagnostics; only resource-limit errors come back as `Err`.
    pub fn run(&mut self, program: &Program) -> Result<i64, RuntimeError> {
        debug!(
            globals = program.globals.len(),
            functions = self.functions.len(),
            "starting execution"
        );

        for stmt in &program.globals {
            self.execute_statement(stmt)?;
        }

        let Some(main) = program.main() else {
            return Ok(0);
        };

        self.memory_bytes += FRAME_OVERHEAD_BYTES;
        self.frames
            .push(CallFrame::new("main", SymbolTable::new("main"), None));

        self.current_location = main.location;
        self.execute_sequence(&main.body)?;

        let exit_code = self
            .return_value
            .take()
            .and_then(|v| v.as_int())
            .map(|n| i64::from(n as i32))
            .unwrap_or(0);
        self.control_flow = ControlFlow::Normal;
        self.frames.pop();

        debug!(steps = self.steps, exit_code, "main returned");
        Ok(exit_code)
    }

    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        let location = stmt.location();
        self.current_location = location;
        self.tick(location)?;
        trace!(line = location.line, "execute statement");

        match stmt {
            Stmt::Declaration { declarators, .. } => self.execute_declaration(declarators),

            Stmt::Expression { expr, .. } => {
                self.evaluate_expr(expr)?;
                Ok(())
            }

            Stmt::Printf {
                format,
                args,
                location,
            } => {
                self.builtin_printf(format, args, *location)?;
                Ok(())
            }

            Stmt::Scanf {
                format,
                targets,
                location,
            } => {
                self.builtin_scanf(format, targets, *location)?;
                Ok(())
            }

            Stmt::Call {
                name,
                args,
                location,
            } => {
                self.call_function(name, args, *location)?;
                Ok(())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                location,
            } => self.execute_if(condition, then_branch, else_branch.as_deref(), *location),

            Stmt::For {
                init,
                condition,
                update,
                body,
                location,
            } => self.execute_for(
                init.as_deref(),
                condition.as_ref(),
                update.as_ref(),
                body,
                *location,
            ),

            Stmt::While {
                condition,
                body,
                location,
            } => self.execute_while(condition, body, *location),

            Stmt::DoWhile {
                body,
                condition,
                location,
            } => self.execute_do_while(body, condition, *location),

            Stmt::Switch {
                subject,
                cases,
                location,
            } => self.execute_switch(subject, cases, *location),

            Stmt::Break { location } => self.execute_break(*location),

            Stmt::Continue { location } => self.execute_continue(*location),

            Stmt::Return { value, location } => self.execute_return(value.as_ref(), *location),

            Stmt::Block { statements, .. } => self.execute_block(statements),

            Stmt::Empty { .. } => Ok(()),

            Stmt::Unrecognized { reason, location } => {
                self.recover(RuntimeError::UnsupportedStatement {
                    reason: reason.clone(),
                    location: *location,
                })
            }
        }
    }

    /// Run statements in order until one changes the control flow.
    pub(crate) fn execute_sequence(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }

    /// Run statements inside a fresh block scope.
    pub(crate) fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        self.symbols_mut().push_scope();
        let result = self.execute_sequence(statements);
        self.symbols_mut().pop_scope();
        result
    }

    /// Charge one step against the run's budget.
    fn tick(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        self.steps += 1;
        if self.steps > self.config.max_steps {
            return Err(RuntimeError::StepLimit {
                limit: self.config.max_steps,
                location,
            });
        }
        Ok(())
    }

    /// Report a recoverable error and keep going; fatal errors pass through.
    pub(crate) fn recover(&mut self, err: RuntimeError) -> Result<(), RuntimeError> {
        if err.is_fatal() {
            return Err(err);
        }
        debug!(line = err.location().line, error = %err, "recovered runtime error");
        self.report(err.to_diagnostic());
        Ok(())
    }

    /// [`Interpreter::recover`] for expressions: the value becomes 0.
    pub(crate) fn recover_value(&mut self, err: RuntimeError) -> Result<Value, RuntimeError> {
        self.recover(err)?;
        Ok(Value::Int(0))
    }

    /// Record a diagnostic and annotate the output with it.
    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.console
            .note(&diagnostic.to_string(), diagnostic.line.unwrap_or(0));
        self.diagnostics.push(diagnostic);
    }

    /// Symbol table declarations currently go into
    pub(crate) fn symbols_mut(&mut self) -> &mut SymbolTable {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.symbols,
            None => &mut self.globals,
        }
    }

    pub(crate) fn control(&self) -> &ControlStack {
        match self.frames.last() {
            Some(frame) => &frame.control,
            None => &self.global_control,
        }
    }

    pub(crate) fn control_mut(&mut self) -> &mut ControlStack {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.control,
            None => &mut self.global_control,
        }
    }

    /// Resolve `name` in the current call, then in the globals.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Variable> {
        self.frames
            .last()
            .and_then(|frame| frame.symbols.get(name))
            .or_else(|| self.globals.get(name))
    }

    pub(crate) fn lookup_mut(&mut self, name: &str) -> Option<&mut Variable> {
        if let Some(frame) = self.frames.last_mut() {
            if frame.symbols.contains(name) {
                return frame.symbols.get_mut(name);
            }
        }
        self.globals.get_mut(name)
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    pub fn memory_bytes(&self) -> usize {
        self.memory_bytes
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn finish(self) -> ExecutionOutput {
        ExecutionOutput {
            console: self.console,
            diagnostics: self.diagnostics,
            memory_bytes: self.memory_bytes,
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn execute(source: &str, stdin: &str) -> (Result<i64, RuntimeError>, Interpreter) {
        let program = parse_source(source).unwrap();
        let mut interpreter = Interpreter::new(&program, stdin, RunConfig::default());
        let result = interpreter.run(&program);
        (result, interpreter)
    }

    #[test]
    fn test_main_exit_code() {
        let (result, interp) = execute("int main() { return 3; }", "");
        assert_eq!(result, Ok(3));
        assert!(interp.frames().is_empty());
    }

    #[test]
    fn test_globals_are_visible_in_functions() {
        let (result, interp) = execute(
            "int counter = 5;\nvoid bump() { counter += 1; }\nint main() { bump(); bump(); printf(\"%d\", counter); return 0; }",
            "",
        );
        assert_eq!(result, Ok(0));
        assert_eq!(interp.console().text(), "7");
        assert_eq!(interp.globals().get("counter").unwrap().value, Value::Int(7));
    }

    #[test]
    fn test_block_scope_shadowing() {
        let (_, interp) = execute(
            "int main() { int x = 1; { int x = 2; printf(\"%d \", x); } printf(\"%d\", x); return 0; }",
            "",
        );
        assert_eq!(interp.console().text(), "2 1");
    }

    #[test]
    fn test_step_budget() {
        let program = parse_source("int main() { int i = 0; while (1) { i++; i++; i++; } return 0; }").unwrap();
        let config = RunConfig {
            max_steps: 50,
            ..RunConfig::default()
        };
        let mut interpreter = Interpreter::new(&program, "", config);
        let err = interpreter.run(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::StepLimit { limit: 50, .. }));
        assert_eq!(interpreter.steps(), 51);
    }

    #[test]
    fn test_duplicate_function_is_reported() {
        let (_, interp) = execute(
            "int f() { return 1; }\nint f() { return 2; }\nint main() { return f(); }",
            "",
        );
        assert_eq!(interp.diagnostics().len(), 1);
        assert_eq!(interp.diagnostics()[0].kind, DiagnosticKind::Warning);
    }
}
