//! Statement parsing implementation
//!
//! This module handles parsing of all C statement types:
//!
//! - Variable declarations: `int x = 42;`
//! - Control flow: `if`, `while`, `for`, `do-while`, `switch`
//! - Jump statements: `return`, `break`, `continue`
//! - Compound statements: `{ ... }`
//! - Expression statements, with `printf`/`scanf` calls given their own kinds
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | for_stmt
//!             | do_while_stmt | switch_stmt | return_stmt
//!             | break_stmt | continue_stmt | block | expr_stmt | ";"
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        match self.peek() {
            Token::Return(_) => {
                self.advance();
                self.parse_return_statement(loc)
            }
            Token::If(_) => {
                self.advance();
                self.parse_if_statement(loc)
            }
            Token::While(_) => {
                self.advance();
                self.parse_while_statement(loc)
            }
            Token::Do(_) => {
                self.advance();
                self.parse_do_while_statement(loc)
            }
            Token::For(_) => {
                self.advance();
                self.parse_for_statement(loc)
            }
            Token::Switch(_) => {
                self.advance();
                self.parse_switch_statement(loc)
            }
            Token::Break(_) => {
                self.advance();
                self.expect_semicolon("'break' 之后")?;
                Ok(Stmt::Break { location: loc })
            }
            Token::Continue(_) => {
                self.advance();
                self.expect_semicolon("'continue' 之后")?;
                Ok(Stmt::Continue { location: loc })
            }
            Token::LBrace(_) => {
                self.advance();
                let statements = self.parse_block_statements()?;
                Ok(Stmt::Block {
                    statements,
                    location: loc,
                })
            }
            Token::Semicolon(_) => {
                self.advance();
                Ok(Stmt::Empty { location: loc })
            }
            Token::Else(_) => Err(ParseError::new("else语句没有匹配的if语句", loc)),
            Token::Case(_) | Token::Default(_) => {
                Err(ParseError::new("case语句没有匹配的switch语句", loc))
            }
            _ if self.is_type_keyword() => self.parse_variable_declaration(),
            _ => {
                let expr = self.parse_expression()?;
                self.expect_semicolon("表达式之后")?;
                Ok(classify_expression_statement(expr, loc))
            }
        }
    }

    /// Parse return statement
    fn parse_return_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let value = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("return 之后")?;

        Ok(Stmt::Return {
            value,
            location: loc,
        })
    }

    fn parse_condition(&mut self, keyword: &str) -> Result<Expr, ParseError> {
        self.expect_lparen(&format!("'{keyword}' 之后"))?;
        let condition = self.parse_expression()?;
        self.expect_rparen(&format!("'{keyword}' 条件之后"))?;
        Ok(condition)
    }

    /// Parse if statement
    fn parse_if_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let condition = self.parse_condition("if")?;
        let then_branch = self.parse_statement_or_block()?;

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_statement_or_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let condition = self.parse_condition("while")?;
        let body = self.parse_statement_or_block()?;

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let body = self.parse_statement_or_block()?;

        self.expect_token(&Token::While(self.current_location()), "do 循环体之后应为 'while'")?;
        let condition = self.parse_condition("while")?;
        self.expect_semicolon("do-while 之后")?;

        Ok(Stmt::DoWhile {
            body,
            condition,
            location: loc,
        })
    }

    /// Parse for statement
    fn parse_for_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("'for' 之后")?;

        let init = if self.match_token(&Token::Semicolon(self.current_location())) {
            None
        } else if self.is_type_keyword() {
            // The declaration consumes its own ';'
            Some(Box::new(self.parse_variable_declaration()?))
        } else {
            let init_loc = self.current_location();
            let expr = self.parse_expression()?;
            self.expect_semicolon("for 初始化之后")?;
            Some(Box::new(Stmt::Expression {
                expr,
                location: init_loc,
            }))
        };

        let condition = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("for 条件之后")?;

        let update = if self.check(&Token::RParen(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_rparen("for 子句之后")?;

        let body = self.parse_statement_or_block()?;

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
            location: loc,
        })
    }

    /// Parse switch statement
    fn parse_switch_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        let subject = self.parse_condition("switch")?;
        self.expect_lbrace("switch 语句体之前")?;

        let mut cases = Vec::new();

        while !self.match_token(&Token::RBrace(self.current_location())) {
            let case_loc = self.current_location();
            let label = if self.match_token(&Token::Case(case_loc)) {
                let value = self.parse_ternary()?;
                CaseLabel::Case(value)
            } else if self.match_token(&Token::Default(case_loc)) {
                CaseLabel::Default
            } else {
                return Err(ParseError::new(
                    format!("switch 语句体中应为 'case' 或 'default'，实际为 {}", self.peek()),
                    case_loc,
                ));
            };
            self.expect_token(&Token::Colon(self.current_location()), "case 标签之后应为 ':'")?;

            let mut body = Vec::new();
            while !matches!(
                self.peek(),
                Token::Case(_) | Token::Default(_) | Token::RBrace(_) | Token::Eof(_)
            ) {
                body.push(self.parse_statement_recovering());
            }

            if self.is_at_end() {
                return Err(ParseError::new("switch 语句缺少结束的 '}'", loc));
            }

            cases.push(SwitchCase {
                label,
                body,
                location: case_loc,
            });
        }

        Ok(Stmt::Switch {
            subject,
            cases,
            location: loc,
        })
    }

    /// Parse statement or block (for if/while/for bodies)
    pub(crate) fn parse_statement_or_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.match_token(&Token::LBrace(self.current_location())) {
            self.parse_block_statements()
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }
}

/// Give `printf`/`scanf` calls and plain calls their own statement kinds.
fn classify_expression_statement(expr: Expr, location: SourceLocation) -> Stmt {
    match expr {
        Expr::Call { name, args, .. }
            if (name == "printf" || name == "scanf")
                && matches!(args.first(), Some(Expr::StringLiteral(..))) =>
        {
            let mut args = args.into_iter();
            let format = match args.next() {
                Some(Expr::StringLiteral(text, _)) => text,
                _ => String::new(),
            };
            let rest: Vec<Expr> = args.collect();
            if name == "printf" {
                Stmt::Printf {
                    format,
                    args: rest,
                    location,
                }
            } else {
                Stmt::Scanf {
                    format,
                    targets: rest,
                    location,
                }
            }
        }
        Expr::Call { name, args, .. } => Stmt::Call {
            name,
            args,
            location,
        },
        expr => Stmt::Expression { expr, location },
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    fn main_body(source: &str) -> Vec<Stmt> {
        parse_source(source).unwrap().main().unwrap().body.clone()
    }

    #[test]
    fn test_printf_and_scanf_kinds() {
        let body = main_body(
            r#"int main() { int a; printf("a=%d\n", a); scanf("%d", &a); helper(a); a = 3; }"#,
        );

        match &body[1] {
            Stmt::Printf { format, args, .. } => {
                assert_eq!(format, r"a=%d\n");
                assert_eq!(args.len(), 1);
            }
            other => panic!("Expected printf, got {:?}", other),
        }
        assert!(matches!(&body[2], Stmt::Scanf { targets, .. } if targets.len() == 1));
        assert!(matches!(&body[3], Stmt::Call { name, .. } if name == "helper"));
        assert!(matches!(&body[4], Stmt::Expression { .. }));
    }

    #[test]
    fn test_for_with_declaration() {
        let body = main_body("int main() { for (int i = 0; i < 5; i++) x += i; }");
        match &body[0] {
            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                assert!(matches!(init.as_deref(), Some(Stmt::Declaration { .. })));
                assert!(condition.is_some());
                assert!(update.is_some());
                assert_eq!(body.len(), 1);
            }
            other => panic!("Expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_switch_groups() {
        let body = main_body(
            "int main() { switch (x) { case 1: case 2: y = 1; break; default: y = 0; } }",
        );
        match &body[0] {
            Stmt::Switch { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert!(cases[0].body.is_empty());
                assert_eq!(cases[1].body.len(), 2);
                assert!(matches!(cases[2].label, CaseLabel::Default));
            }
            other => panic!("Expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_do_while_and_else_chain() {
        let body = main_body(
            "int main() { do { i++; } while (i < 3); if (a) b = 1; else if (c) b = 2; else b = 3; }",
        );
        assert!(matches!(&body[0], Stmt::DoWhile { body, .. } if body.len() == 1));
        match &body[1] {
            Stmt::If {
                else_branch: Some(else_branch),
                ..
            } => assert!(matches!(else_branch[0], Stmt::If { .. })),
            other => panic!("Expected if/else, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_else_becomes_unrecognized() {
        let body = main_body("int main() { x = 1; else x = 2; }");
        match &body[1] {
            Stmt::Unrecognized { reason, .. } => assert!(reason.contains("else")),
            other => panic!("Expected unrecognized, got {:?}", other),
        }
    }
}
