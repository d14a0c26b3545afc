//! Binary operator evaluation
//!
//! Operands follow the usual arithmetic conversions: `char` promotes to
//! `int`, and if either side is floating the operation is done in `double`.
//! Integer division truncates toward zero. Dividing by zero is reported and
//! yields `0`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, Expr, SourceLocation};
use std::cmp::Ordering;

impl Interpreter {
    pub(crate) fn evaluate_binary_op(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            // Short-circuit
            BinOp::And => {
                if !self.evaluate_expr(left)?.is_truthy() {
                    return Ok(Value::Int(0));
                }
                let rhs = self.evaluate_expr(right)?;
                Ok(bool_value(rhs.is_truthy()))
            }
            BinOp::Or => {
                if self.evaluate_expr(left)?.is_truthy() {
                    return Ok(Value::Int(1));
                }
                let rhs = self.evaluate_expr(right)?;
                Ok(bool_value(rhs.is_truthy()))
            }
            _ => {
                let lhs = self.evaluate_expr(left)?;
                let rhs = self.evaluate_expr(right)?;
                self.apply_binary(op, &lhs, &rhs, location)
            }
        }
    }

    /// Apply `op` to two already evaluated operands.
    pub(crate) fn apply_binary(
        &mut self,
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinOp::And => return Ok(bool_value(left.is_truthy() && right.is_truthy())),
            BinOp::Or => return Ok(bool_value(left.is_truthy() || right.is_truthy())),
            _ => {}
        }

        if let (Value::Str(a), Value::Str(b)) = (left, right) {
            if let Some(result) = compare(op, a.cmp(b)) {
                return Ok(result);
            }
        }

        if left.is_float() || right.is_float() {
            if let (Some(a), Some(b)) = (left.as_float(), right.as_float()) {
                return self.float_op(op, a, b, location);
            }
        } else if let (Some(a), Some(b)) = (left.as_int(), right.as_int()) {
            return self.int_op(op, a, b, location);
        }

        self.recover_value(RuntimeError::TypeError {
            message: format!(
                "不能对 {} 和 {} 使用 '{}' 运算",
                left.type_name(),
                right.type_name(),
                op.symbol()
            ),
            location,
        })
    }

    #[inline]
    fn int_op(
        &mut self,
        op: BinOp,
        a: i64,
        b: i64,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let result = match op {
            BinOp::Add => a.wrapping_add(b),
            BinOp::Sub => a.wrapping_sub(b),
            BinOp::Mul => a.wrapping_mul(b),
            BinOp::Div | BinOp::Mod if b == 0 => {
                return self.recover_value(RuntimeError::DivisionByZero {
                    operation: format!("{} {} {}", a, op.symbol(), b),
                    location,
                });
            }
            BinOp::Div => a.wrapping_div(b),
            BinOp::Mod => a.wrapping_rem(b),
            _ => return Ok(compare(op, a.cmp(&b)).unwrap_or(Value::Int(0))),
        };
        Ok(Value::Int(result))
    }

    #[inline]
    fn float_op(
        &mut self,
        op: BinOp,
        a: f64,
        b: f64,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let result = match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div if b == 0.0 => {
                return self.recover_value(RuntimeError::DivisionByZero {
                    operation: format!("{} / {}", a, b),
                    location,
                });
            }
            BinOp::Div => a / b,
            BinOp::Mod => {
                return self.recover_value(RuntimeError::TypeError {
                    message: "浮点数不能使用 '%' 运算".to_string(),
                    location,
                });
            }
            _ => {
                // NaN compares unequal to everything
                let result = match a.partial_cmp(&b) {
                    Some(ordering) => compare(op, ordering),
                    None => Some(bool_value(op == BinOp::Ne)),
                };
                return Ok(result.unwrap_or(Value::Int(0)));
            }
        };
        Ok(Value::Float(result))
    }
}

fn bool_value(b: bool) -> Value {
    Value::Int(i64::from(b))
}

/// Comparison operators as `0`/`1`; `None` for non-comparison operators.
fn compare(op: BinOp, ordering: Ordering) -> Option<Value> {
    let result = match op {
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::Ne => ordering != Ordering::Equal,
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Ge => ordering != Ordering::Less,
        _ => return None,
    };
    Some(bool_value(result))
}
