//! Expression parsing implementation
//!
//! Recursive descent with one method per precedence level, lowest first:
//! assignment → ternary → `||` → `&&` → equality → relational → additive →
//! multiplicative → cast → unary → postfix → primary.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, characters, strings (adjacent strings join)
//! - Identifiers and function calls
//! - Binary operators: arithmetic, comparison, logical
//! - Unary operators: `-`, `+`, `!`, `&`, prefix/postfix `++`/`--`
//! - Ternary `? :`, casts `(type)expr`, `sizeof`
//! - Assignment and compound assignment (`+= -= *= /= %=`) to a variable

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment or ternary (right-associative)
    pub(crate) fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_ternary()?;

        let loc = self.current_location();
        let op = match self.peek() {
            Token::Eq(_) => None,
            Token::PlusEq(_) => Some(BinOp::Add),
            Token::MinusEq(_) => Some(BinOp::Sub),
            Token::StarEq(_) => Some(BinOp::Mul),
            Token::SlashEq(_) => Some(BinOp::Div),
            Token::PercentEq(_) => Some(BinOp::Mod),
            _ => return Ok(expr),
        };
        self.advance();

        let target = match expr {
            Expr::Variable(name, _) => name,
            other => {
                return Err(ParseError::new(
                    "赋值运算符左侧必须是变量",
                    other.location(),
                ))
            }
        };
        let value = Box::new(self.parse_assignment()?);

        Ok(Expr::Assignment {
            target,
            op,
            value,
            location: loc,
        })
    }

    /// Parse ternary: condition ? then_expr : else_expr
    pub(crate) fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_logical_or()?;

        if self.match_token(&Token::Question(self.current_location())) {
            let loc = self.previous_location();
            let then_expr = Box::new(self.parse_expression()?);
            self.expect_token(&Token::Colon(self.current_location()), "条件表达式中应为 ':'")?;
            let else_expr = Box::new(self.parse_ternary()?);

            return Ok(Expr::TernaryOp {
                condition: Box::new(expr),
                then_expr,
                else_expr,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&Token::OrOr(self.current_location())) {
            let loc = self.previous_location();
            let right = self.parse_logical_and()?;
            left = binary(BinOp::Or, left, right, loc);
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&Token::AndAnd(self.current_location())) {
            let loc = self.previous_location();
            let right = self.parse_equality()?;
            left = binary(BinOp::And, left, right, loc);
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let op = match self.peek() {
                Token::EqEq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek() {
                Token::Lt(_) => BinOp::Lt,
                Token::Le(_) => BinOp::Le,
                Token::Gt(_) => BinOp::Gt,
                Token::Ge(_) => BinOp::Ge,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_cast()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                Token::Percent(_) => BinOp::Mod,
                _ => break,
            };
            let loc = self.current_location();
            self.advance();
            let right = self.parse_cast()?;
            left = binary(op, left, right, loc);
        }

        Ok(left)
    }

    /// Parse cast: (type)expr
    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        let is_cast = self.check(&Token::LParen(self.current_location()))
            && self.peek_ahead(1).is_some_and(Token::is_type_keyword);

        if is_cast {
            let loc = self.current_location();
            self.advance();
            let target = self.parse_type()?;
            self.expect_rparen("类型转换之后")?;
            let expr = Box::new(self.parse_cast()?);

            return Ok(Expr::Cast {
                target: target.base,
                expr,
                location: loc,
            });
        }

        self.parse_unary()
    }

    /// Parse unary (! - + & ++ -- sizeof)
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let op = match self.peek() {
            Token::Bang(_) => Some(UnOp::Not),
            Token::Minus(_) => Some(UnOp::Neg),
            Token::Plus(_) => Some(UnOp::Plus),
            Token::Amp(_) => Some(UnOp::AddrOf),
            Token::PlusPlus(_) => Some(UnOp::PreInc),
            Token::MinusMinus(_) => Some(UnOp::PreDec),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = Box::new(self.parse_cast()?);
            return Ok(Expr::UnaryOp {
                op,
                operand,
                location: loc,
            });
        }

        if self.match_token(&Token::Sizeof(loc)) {
            return self.parse_sizeof(loc);
        }

        self.parse_postfix()
    }

    fn parse_sizeof(&mut self, loc: SourceLocation) -> Result<Expr, ParseError> {
        let parenthesized_type = self.check(&Token::LParen(self.current_location()))
            && self.peek_ahead(1).is_some_and(Token::is_type_keyword);

        if parenthesized_type {
            self.advance();
            let mut target = self.parse_type()?;
            if self.match_token(&Token::LBracket(self.current_location())) {
                let size = match self.peek_token() {
                    Token::IntLiteral(n, _) => {
                        self.advance();
                        usize::try_from(n).ok()
                    }
                    _ => None,
                };
                self.expect_token(&Token::RBracket(self.current_location()), "数组长度之后应为 ']'")?;
                target = target.with_array(size);
            }
            self.expect_rparen("sizeof 类型之后")?;
            return Ok(Expr::SizeofType {
                target,
                location: loc,
            });
        }

        let expr = Box::new(self.parse_unary()?);
        Ok(Expr::SizeofExpr {
            expr,
            location: loc,
        })
    }

    /// Parse postfix (call, ++, --)
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.match_token(&Token::PlusPlus(loc)) {
                expr = Expr::UnaryOp {
                    op: UnOp::PostInc,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else if self.match_token(&Token::MinusMinus(loc)) {
                expr = Expr::UnaryOp {
                    op: UnOp::PostDec,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else if self.match_token(&Token::LParen(loc)) {
                let args = self.parse_argument_list()?;
                self.expect_rparen("函数参数之后")?;

                let (name, call_loc) = match expr {
                    Expr::Variable(name, call_loc) => (name, call_loc),
                    other => {
                        return Err(ParseError::new("只能调用命名的函数", other.location()));
                    }
                };

                expr = Expr::Call {
                    name,
                    args,
                    location: call_loc,
                };
            } else if self.check(&Token::LBracket(loc)) {
                return Err(ParseError::new("不支持数组下标访问", loc));
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse argument list: (expr, expr, ...)
    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_assignment()?);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, variables, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::IntLiteral(n, loc) => {
                self.advance();
                Ok(Expr::IntLiteral(n, loc))
            }
            Token::FloatLiteral(n, loc) => {
                self.advance();
                Ok(Expr::FloatLiteral(n, loc))
            }
            Token::CharLiteral(c, loc) => {
                self.advance();
                Ok(Expr::CharLiteral(c, loc))
            }
            Token::StringLiteral(mut s, loc) => {
                self.advance();
                while let Token::StringLiteral(more, _) = self.peek_token() {
                    self.advance();
                    s.push_str(&more);
                }
                Ok(Expr::StringLiteral(s, loc))
            }
            Token::Ident(name, loc) => {
                self.advance();
                Ok(Expr::Variable(name, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("表达式之后")?;
                Ok(expr)
            }
            other => Err(ParseError::new(format!("意外的 {}", other), loc)),
        }
    }
}

fn binary(op: BinOp, left: Expr, right: Expr, location: SourceLocation) -> Expr {
    Expr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
        location,
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_expression().unwrap()
    }

    #[test]
    fn test_precedence() {
        match expr("1 + 2 * 3") {
            Expr::BinaryOp {
                op: BinOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Mul, .. })),
            other => panic!("Expected addition at the root, got {:?}", other),
        }

        match expr("a || b && c") {
            Expr::BinaryOp {
                op: BinOp::Or,
                right,
                ..
            } => assert!(matches!(*right, Expr::BinaryOp { op: BinOp::And, .. })),
            other => panic!("Expected || at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match expr("a = b += 2") {
            Expr::Assignment {
                target, op, value, ..
            } => {
                assert_eq!(target, "a");
                assert_eq!(op, None);
                assert!(matches!(*value, Expr::Assignment { op: Some(BinOp::Add), .. }));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_cast_and_unary() {
        assert!(matches!(
            expr("(float)x / 2"),
            Expr::BinaryOp { op: BinOp::Div, left, .. }
                if matches!(*left, Expr::Cast { target: BaseType::Float, .. })
        ));
        assert!(matches!(
            expr("-x++"),
            Expr::UnaryOp { op: UnOp::Neg, operand, .. }
                if matches!(*operand, Expr::UnaryOp { op: UnOp::PostInc, .. })
        ));
    }

    #[test]
    fn test_adjacent_strings_join() {
        assert!(matches!(expr(r#""ab" "cd""#), Expr::StringLiteral(s, _) if s == "abcd"));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut parser = Parser::new("1 = 2").unwrap();
        assert!(parser.parse_expression().is_err());
    }
}
