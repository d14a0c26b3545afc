//! Tree-walking execution of parsed programs
//!
//! - [`engine`]: the [`Interpreter`] context and statement dispatch
//! - [`errors`]: runtime errors and caller-visible diagnostics
//! - [`control`]: control frames for open `if`/loop/`switch` constructs
//! - [`constants`]: default resource ceilings
//!
//! # Execution Model
//!
//! The interpreter walks the AST one statement at a time. Each statement
//! costs one step against the run's budget, each loop iteration is counted
//! against the loop's ceiling, and each user call against the call-depth
//! ceiling. Crossing any of them aborts the run; every other runtime error is
//! reported inline and execution continues.

pub mod constants;
pub mod control;
pub mod engine;
pub mod errors;

mod builtins;
mod calls;
mod expressions;
mod jumps;
mod loops;
mod ops;
mod statements;

pub use engine::{ExecutionOutput, Interpreter};
pub use errors::{Diagnostic, DiagnosticKind, RuntimeError};
