//! The "compile & run" lifecycle
//!
//! ```text
//! Idle -> SyntaxChecking -> Parsing -> Executing -> Completed
//!              |               |           |
//!              +---------------+-----------+--> Aborted
//! ```
//!
//! [`run`] never fails and never panics on user input: every problem is
//! folded into the returned [`RunResult`].

pub mod guess_game;
pub mod stats;

use crate::interpreter::constants::{MAX_CALL_DEPTH, MAX_LOOP_ITERATIONS, MAX_STEPS};
use crate::interpreter::{Diagnostic, DiagnosticKind, Interpreter};
use crate::io::Console;
use crate::parser::{parse_source, preprocess, SyntaxIssue};
use std::time::Instant;
use tracing::{debug, warn};

/// Resource ceilings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Iterations one loop may run
    pub max_loop_iterations: usize,
    /// Statements the whole run may execute
    pub max_steps: usize,
    /// Nested calls, `main` included
    pub max_call_depth: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            max_loop_iterations: MAX_LOOP_ITERATIONS,
            max_steps: MAX_STEPS,
            max_call_depth: MAX_CALL_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    SyntaxChecking,
    Parsing,
    Executing,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Rejected before execution; nothing ran
    Syntax,
    /// Loop, step or call-depth ceiling; output up to that point is kept
    ResourceLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// The guess-the-number script ran instead of the program
    ScriptedFallback,
    Aborted(AbortReason),
}

impl RunOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, RunOutcome::Aborted(_))
    }
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Program output with inline diagnostic notes
    pub stdout_text: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Wall-clock time of the execution phase
    pub elapsed_ms: f64,
    pub estimated_memory_bytes: usize,
    pub outcome: RunOutcome,
    /// `main`'s return value when it returned
    pub exit_code: Option<i64>,
    /// Output split by origin, for display
    pub console: Console,
}

impl RunResult {
    fn aborted_before_execution(diagnostics: Vec<Diagnostic>) -> Self {
        RunResult {
            stdout_text: String::new(),
            diagnostics,
            elapsed_ms: 0.0,
            estimated_memory_bytes: 0,
            outcome: RunOutcome::Aborted(AbortReason::Syntax),
            exit_code: None,
            console: Console::new(),
        }
    }

    /// The text a student sees: output plus the statistics trailer, or the
    /// list of syntax errors.
    pub fn report(&self) -> String {
        if self.outcome == RunOutcome::Aborted(AbortReason::Syntax) {
            let errors: Vec<String> = self
                .diagnostics
                .iter()
                .filter(|d| d.kind == DiagnosticKind::Syntax)
                .map(|d| d.message.clone())
                .collect();
            return format!("语法错误：{}", errors.join("\n"));
        }

        let mut text = if self.stdout_text.is_empty() {
            stats::NO_OUTPUT_MESSAGE.to_string()
        } else {
            self.stdout_text.clone()
        };
        text.push_str(&stats::trailer(
            self.elapsed_ms,
            self.estimated_memory_bytes,
        ));
        text
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind != DiagnosticKind::Warning)
    }
}

fn transition(state: &mut RunState, next: RunState) {
    debug!(from = ?*state, to = ?next, "run state");
    *state = next;
}

/// Compile and run `source` with `stdin` as the `scanf` input, using the
/// default limits.
pub fn run(source: &str, stdin: &str) -> RunResult {
    run_with_config(source, stdin, &RunConfig::default())
}

pub fn run_with_config(source: &str, stdin: &str, config: &RunConfig) -> RunResult {
    let mut state = RunState::Idle;

    transition(&mut state, RunState::SyntaxChecking);
    let pre = preprocess(source);
    let mut diagnostics: Vec<Diagnostic> = pre.issues.iter().map(Diagnostic::from).collect();
    if pre.has_fatal() {
        transition(&mut state, RunState::Aborted);
        warn!(issues = pre.issues.len(), "syntax check failed");
        return RunResult::aborted_before_execution(diagnostics);
    }

    if guess_game::applies(source) {
        debug!("using the scripted guess-the-number round");
        let transcript = guess_game::play(source, stdin);
        let mut console = Console::new();
        console.print(&transcript, 0, crate::io::OutputKind::Program);
        transition(&mut state, RunState::Completed);
        return RunResult {
            stdout_text: transcript,
            diagnostics,
            elapsed_ms: 0.0,
            estimated_memory_bytes: 0,
            outcome: RunOutcome::ScriptedFallback,
            exit_code: Some(0),
            console,
        };
    }

    transition(&mut state, RunState::Parsing);
    let program = match parse_source(&pre.cleaned) {
        Ok(program) => program,
        Err(err) => {
            transition(&mut state, RunState::Aborted);
            warn!(error = %err, "parse failed");
            diagnostics.push(Diagnostic::from(&err));
            return RunResult::aborted_before_execution(diagnostics);
        }
    };
    if program.main().is_none() {
        transition(&mut state, RunState::Aborted);
        diagnostics.push(Diagnostic::from(&SyntaxIssue::MissingMain));
        return RunResult::aborted_before_execution(diagnostics);
    }

    transition(&mut state, RunState::Executing);
    let mut interpreter = Interpreter::new(&program, stdin, *config);
    let started = Instant::now();
    let result = interpreter.run(&program);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let (outcome, exit_code) = match result {
        Ok(code) => {
            transition(&mut state, RunState::Completed);
            (RunOutcome::Completed, Some(code))
        }
        Err(err) => {
            transition(&mut state, RunState::Aborted);
            warn!(line = err.location().line, error = %err, "run aborted");
            interpreter.report(err.to_diagnostic());
            (RunOutcome::Aborted(AbortReason::ResourceLimit), None)
        }
    };

    let output = interpreter.finish();
    diagnostics.extend(output.diagnostics);
    debug!(
        steps = output.steps,
        memory = output.memory_bytes,
        elapsed_ms,
        "run finished"
    );

    RunResult {
        stdout_text: output.console.text(),
        diagnostics,
        elapsed_ms,
        estimated_memory_bytes: output.memory_bytes,
        outcome,
        exit_code,
        console: output.console,
    }
}
