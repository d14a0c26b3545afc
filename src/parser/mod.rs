//! C source code front end
//!
//! This module turns submitted C text into an AST:
//! - [`preprocess`]: syntax pre-check, comment blanking, function headers
//! - [`lexer`]: tokenization (cleaned text → tokens)
//! - [`parse`]: recursive descent parsing (tokens → AST), split across
//!   `declarations`, `statements` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Supported C Subset
//!
//! - Types: `int`, `long`, `short`, `unsigned`, `float`, `double`, `char`,
//!   `void`, `const`, and `char name[N]` string buffers
//! - Statements: declarations, assignments, `if`/`else`, `for`, `while`,
//!   `do`/`while`, `switch`, `break`, `continue`, `return`, blocks
//! - Expressions: arithmetic, comparison, logical, ternary, casts, calls
//! - `#include`/`#define` lines are skipped, not expanded

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod preprocess;
mod statements;

pub use parse::{parse_source, ParseError, Parser};
pub use preprocess::{preprocess, Preprocessed, SyntaxIssue};
