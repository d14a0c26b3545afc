//! Expression evaluation
//!
//! [`Interpreter::evaluate_expr`] walks an [`Expr`] tree against the current
//! scope. Operators live in [`super::ops`], calls in [`super::calls`]. A
//! recoverable error inside an expression is reported where it happens and
//! the offending sub-expression evaluates to `0`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::io::unescape;
use crate::memory::{sizeof_type, sizeof_value, storage_size, value::Value};
use crate::parser::ast::*;

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),

            Expr::FloatLiteral(f, _) => Ok(Value::Float(*f)),

            Expr::CharLiteral(c, _) => Ok(Value::Char(*c)),

            Expr::StringLiteral(raw, _) => Ok(Value::Str(unescape(raw))),

            Expr::Variable(name, loc) => self.read_variable(name, *loc),

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => self.evaluate_binary_op(*op, left, right, *location),

            Expr::UnaryOp {
                op,
                operand,
                location,
            } => self.evaluate_unary_op(*op, operand, *location),

            Expr::TernaryOp {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.evaluate_expr(then_expr)
                } else {
                    self.evaluate_expr(else_expr)
                }
            }

            Expr::Assignment {
                target,
                op,
                value,
                location,
            } => self.evaluate_assignment(target, *op, value, *location),

            Expr::Call {
                name,
                args,
                location,
            } => self.call_function(name, args, *location),

            Expr::Cast {
                target,
                expr,
                location,
            } => {
                let value = self.evaluate_expr(expr)?;
                match value.cast_to(*target) {
                    Ok(cast) => Ok(cast),
                    Err(message) => self.recover_value(RuntimeError::TypeError {
                        message,
                        location: *location,
                    }),
                }
            }

            Expr::SizeofType { target, .. } => Ok(Value::Int(sizeof_type(target) as i64)),

            Expr::SizeofExpr { expr, .. } => self.evaluate_sizeof_expr(expr),
        }
    }

    /// `sizeof x` uses the declared type of a variable; any other operand is
    /// sized by its value.
    fn evaluate_sizeof_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        if let Expr::Variable(name, _) = expr {
            if let Some(var) = self.lookup(name) {
                return Ok(Value::Int(storage_size(&var.var_type, &var.value) as i64));
            }
        }
        let value = self.evaluate_expr(expr)?;
        Ok(Value::Int(sizeof_value(&value) as i64))
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::errors::DiagnosticKind;
    use crate::interpreter::Interpreter;
    use crate::parser::parse_source;
    use crate::runner::RunConfig;

    fn output_of(body: &str) -> Interpreter {
        let source = format!("int main() {{ {} return 0; }}", body);
        let program = parse_source(&source).unwrap();
        let mut interpreter = Interpreter::new(&program, "", RunConfig::default());
        interpreter.run(&program).unwrap();
        interpreter
    }

    fn printed(body: &str) -> String {
        output_of(body).console().text()
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(printed("printf(\"%d %d %d\", 5 / 2, -7 / 2, -7 % 2);"), "2 -3 -1");
    }

    #[test]
    fn test_mixed_arithmetic_promotes() {
        assert_eq!(printed("printf(\"%.2f\", 5 / 2.0);"), "2.50");
        assert_eq!(printed("int a = 7; double b = a / 2; printf(\"%.1f\", b);"), "3.0");
    }

    #[test]
    fn test_division_by_zero_recovers() {
        let interp = output_of("int x = 10; int y = x / 0; printf(\"[%d]\", y);");
        assert_eq!(interp.diagnostics().len(), 1);
        assert_eq!(interp.diagnostics()[0].kind, DiagnosticKind::Runtime);
        assert!(interp.console().text().ends_with("[0]"));
    }

    #[test]
    fn test_logical_short_circuit() {
        let interp = output_of("int n = 0; if (n != 0 && 10 / n > 1) printf(\"yes\"); else printf(\"no\");");
        assert!(interp.diagnostics().is_empty());
        assert_eq!(interp.console().text(), "no");
    }

    #[test]
    fn test_comparisons_yield_zero_or_one() {
        assert_eq!(printed("printf(\"%d%d%d%d\", 3 > 2, 3 < 2, 2 == 2, !5);"), "1010");
    }

    #[test]
    fn test_ternary_and_compound_assignment() {
        assert_eq!(printed("int x = 5; x += 3; x *= 2; x -= 1; x /= 3; x %= 4; printf(\"%d %s\", x, x > 2 ? \"big\" : \"small\");"), "1 small");
    }

    #[test]
    fn test_increments() {
        assert_eq!(printed("int i = 5; int a = i++; int b = ++i; printf(\"%d %d %d\", a, b, i);"), "5 7 7");
        assert_eq!(printed("char c = 'a'; c++; printf(\"%c\", c);"), "b");
    }

    #[test]
    fn test_char_arithmetic_and_casts() {
        assert_eq!(printed("printf(\"%c %d\", 'a' + 1, (int)3.99);"), "b 3");
        assert_eq!(printed("printf(\"%.2f\", (float)7 / 2);"), "3.50");
    }

    #[test]
    fn test_sizeof() {
        assert_eq!(printed("int a; double d; char s[12]; printf(\"%d %d %d %d\", sizeof(int), sizeof(d), sizeof s, sizeof(a));"), "4 8 12 4");
    }

    #[test]
    fn test_undefined_variable_is_zero() {
        let interp = output_of("printf(\"%d\", ghost + 1);");
        assert_eq!(interp.diagnostics().len(), 1);
        assert!(interp.console().text().ends_with("1"));
    }

    #[test]
    fn test_assignment_to_undeclared_variable() {
        let interp = output_of("y = 3;");
        assert_eq!(interp.console().text(), "警告: 变量 y 赋值失败: 变量未声明\n");
    }

    #[test]
    fn test_const_is_protected() {
        let interp = output_of("const int k = 4; k = 9; printf(\"%d\", k);");
        assert_eq!(interp.diagnostics().len(), 1);
        assert!(interp.console().text().ends_with("4"));
    }

    #[test]
    fn test_int_assignment_truncates() {
        assert_eq!(printed("int x; x = 3.9; printf(\"%d\", x);"), "3");
    }
}
