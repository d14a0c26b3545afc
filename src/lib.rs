//! # Introduction
//!
//! ctutor compiles and runs small C programs written by students, without a
//! C toolchain. Programs are checked, parsed and executed by a tree-walking
//! interpreter that emulates `printf`/`scanf` against pre-supplied input and
//! reports problems as readable (Chinese) diagnostics instead of crashing.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Pre-check → Lexer → Parser → AST → Interpreter → RunResult
//! ```
//!
//! 1. [`parser`]: syntax pre-check, tokenizer and recursive descent parser.
//! 2. [`memory`]: runtime values, scoped symbol tables and the function table.
//! 3. [`interpreter`]: statement executor and expression evaluator, with loop,
//!    step and call-depth ceilings.
//! 4. [`io`]: `printf` formatting, `scanf` input tokens and the output console.
//! 5. [`runner`]: the compile & run lifecycle and the statistics trailer.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ```
//! let result = ctutor::run("int main() { printf(\"%d\\n\", 6 * 7); return 0; }", "");
//! assert_eq!(result.stdout_text, "42\n");
//! ```

pub mod interpreter;
pub mod io;
pub mod memory;
pub mod parser;
pub mod runner;
pub mod samples;
pub mod ui;

pub use runner::{run, run_with_config, AbortReason, RunConfig, RunOutcome, RunResult};
