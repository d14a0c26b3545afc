pub mod assign;
pub mod binary;
pub mod unary;

// Everything here is `impl Interpreter`
