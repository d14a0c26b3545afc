//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and error recovery
//! - `declarations`: types, function definitions and declarator lists
//! - `statements`: statements (if, while, for, switch, ...)
//! - `expressions`: expressions with precedence climbing
//!
//! # Error recovery
//!
//! A malformed function header is a hard error. Inside a function body the
//! parser is best-effort: a statement it cannot understand becomes
//! [`Stmt::Unrecognized`] and parsing resumes after the next `;` (or before
//! the `}` closing the enclosing block).

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, Error)]
#[error("第{}行第{}列: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            message: message.into(),
            location,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program: global declarations, prototypes and
    /// function definitions.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();

        while !self.is_at_end() {
            self.parse_top_level(&mut program)?;
        }

        Ok(program)
    }

    /// Parse statements until the closing `}` of the current block.
    /// The caller has consumed the opening `{`.
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) {
            if self.is_at_end() {
                return Err(ParseError::new("代码块缺少结束的 '}'", self.current_location()));
            }
            statements.push(self.parse_statement_recovering());
        }
        self.advance();

        Ok(statements)
    }

    /// Parse one statement, turning a failure into [`Stmt::Unrecognized`].
    pub(crate) fn parse_statement_recovering(&mut self) -> Stmt {
        let start = self.position;
        match self.parse_statement() {
            Ok(stmt) => stmt,
            Err(err) => {
                tracing::debug!(line = err.location.line, "statement skipped: {}", err.message);
                self.position = start;
                self.synchronize();
                Stmt::Unrecognized {
                    reason: err.message,
                    location: self.tokens[start].location(),
                }
            }
        }
    }

    /// Skip to just past the next `;` at this nesting level, or to the `}`
    /// that closes the enclosing block (left unconsumed). A balanced
    /// `{ ... }` group met on the way is skipped as a whole.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        let start = self.position;

        while !self.is_at_end() {
            match self.peek() {
                Token::Semicolon(_) if depth == 0 => {
                    self.advance();
                    return;
                }
                Token::LBrace(_) => depth += 1,
                Token::RBrace(_) if depth == 0 => {
                    // Always make progress, even on a stray `}` at block start
                    if self.position == start {
                        self.advance();
                    }
                    return;
                }
                Token::RBrace(_) => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ===== Helper methods =====

    pub(crate) fn is_type_keyword(&self) -> bool {
        self.peek().is_type_keyword()
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.peek().clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!("{}，实际为 {}", message, self.peek()),
                self.current_location(),
            ))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::LParen(self.current_location()), &format!("{ctx}应为 '('"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::RParen(self.current_location()), &format!("{ctx}应为 ')'"))
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::LBrace(self.current_location()), &format!("{ctx}应为 '{{'"))
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::Semicolon(self.current_location()), &format!("{ctx}应为 ';'"))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::new(
                format!("应为标识符，实际为 {}", self.peek()),
                self.current_location(),
            ))
        }
    }
}

/// Lex and parse cleaned source text in one step.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_function() {
        let program = parse_source("int main() { return 0; }").unwrap();

        assert_eq!(program.functions.len(), 1);
        let main = program.main().unwrap();
        assert_eq!(main.params.len(), 0);
        assert_eq!(main.return_type.base, BaseType::Int);
        assert_eq!(main.body.len(), 1);
    }

    #[test]
    fn test_globals_prototypes_and_functions() {
        let source = "int counter = 0;\nint add(int, int);\nint add(int a, int b) { return a + b; }\nint main(void) { return add(1, 2); }";
        let program = parse_source(source).unwrap();

        assert_eq!(program.globals.len(), 1);
        assert_eq!(program.functions.len(), 2);
        assert_eq!(program.functions[0].params.len(), 2);
        assert_eq!(program.functions[0].params[1].name, "b");
    }

    #[test]
    fn test_bad_statement_is_recovered() {
        let source = "int main() {\n  int x = 1;\n  x = ] 3;\n  x = 2;\n}";
        let program = parse_source(source).unwrap();
        let body = &program.main().unwrap().body;

        assert_eq!(body.len(), 3);
        assert!(matches!(body[1], Stmt::Unrecognized { location, .. } if location.line == 3));
        assert!(matches!(body[2], Stmt::Expression { .. }));
    }

    #[test]
    fn test_bad_block_is_skipped_whole() {
        let source = "int main() {\n  x = | { y = 1; };\n  return 0;\n}";
        let program = parse_source(source).unwrap();
        let body = &program.main().unwrap().body;

        assert!(matches!(body[0], Stmt::Unrecognized { .. }));
        assert!(matches!(body.last(), Some(Stmt::Return { .. })));
    }

    #[test]
    fn test_bad_function_header_is_fatal() {
        let err = parse_source("int main( { return 0; }").unwrap_err();
        assert_eq!(err.location.line, 1);
    }
}
