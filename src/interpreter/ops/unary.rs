//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        use UnOp::*;

        match op {
            Neg => self.evaluate_neg_op(operand, location),
            Plus => self.evaluate_plus_op(operand, location),
            Not => {
                let val = self.evaluate_expr(operand)?;
                Ok(Value::Int(i64::from(!val.is_truthy())))
            }
            // Addresses are not modelled; `&x` outside scanf reads x
            AddrOf => self.evaluate_expr(operand),
            PreInc | PreDec | PostInc | PostDec => {
                self.evaluate_inc_dec_op(op, operand, location)
            }
        }
    }

    fn evaluate_neg_op(
        &mut self,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let val = self.evaluate_expr(operand)?;
        match val {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Char(c) => Ok(Value::Int(-i64::from(c))),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Str(_) => self.recover_value(RuntimeError::TypeError {
                message: "字符串不能取负".to_string(),
                location,
            }),
        }
    }

    fn evaluate_plus_op(
        &mut self,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let val = self.evaluate_expr(operand)?;
        match val {
            Value::Char(c) => Ok(Value::Int(i64::from(c))),
            Value::Str(_) => self.recover_value(RuntimeError::TypeError {
                message: "字符串不能使用一元 '+'".to_string(),
                location,
            }),
            other => Ok(other),
        }
    }

    /// `++x`, `x--` and friends. The new value is converted back to the
    /// variable's type, so `char c = 'a'; c++;` stays a `char`.
    fn evaluate_inc_dec_op(
        &mut self,
        op: UnOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Expr::Variable(name, _) = operand else {
            return self.recover_value(RuntimeError::TypeError {
                message: "自增/自减运算的操作数必须是变量".to_string(),
                location,
            });
        };

        let old = self.read_variable(name, location)?;
        if self.lookup(name).is_none() {
            return Ok(old);
        }

        let delta = match op {
            UnOp::PreInc | UnOp::PostInc => BinOp::Add,
            _ => BinOp::Sub,
        };
        let updated = self.apply_binary(delta, &old, &Value::Int(1), location)?;
        let stored = self.store_variable(name, updated, location)?;

        match op {
            UnOp::PostInc | UnOp::PostDec => Ok(old),
            _ => Ok(stored),
        }
    }
}
