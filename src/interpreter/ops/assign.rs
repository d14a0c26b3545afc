//! Variable reads and writes
//!
//! Every write goes through [`Interpreter::store_variable`], which converts
//! the value to the variable's declared type and refuses to touch `const`
//! variables. A write that cannot happen is reported as a warning and the
//! variable keeps its old value.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{BinOp, Expr, SourceLocation};

impl Interpreter {
    pub(crate) fn read_variable(
        &mut self,
        name: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match self.lookup(name) {
            Some(var) => Ok(var.value.clone()),
            None => self.recover_value(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            }),
        }
    }

    /// `x = v` and the compound forms `x op= v`. Evaluates to the stored value.
    pub(crate) fn evaluate_assignment(
        &mut self,
        target: &str,
        op: Option<BinOp>,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some(current) = self.lookup(target).map(|var| var.value.clone()) else {
            return self.recover_value(RuntimeError::AssignmentFailed {
                name: target.to_string(),
                reason: "变量未声明".to_string(),
                location,
            });
        };

        let rhs = self.evaluate_expr(value)?;
        let new_value = match op {
            Some(op) => self.apply_binary(op, &current, &rhs, location)?,
            None => rhs,
        };

        self.store_variable(target, new_value, location)
    }

    /// Convert `value` to the declared type of `name` and store it.
    pub(crate) fn store_variable(
        &mut self,
        name: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some((var_type, current)) = self
            .lookup(name)
            .map(|var| (var.var_type.clone(), var.value.clone()))
        else {
            return self.recover_value(RuntimeError::AssignmentFailed {
                name: name.to_string(),
                reason: "变量未声明".to_string(),
                location,
            });
        };

        if var_type.is_const {
            self.recover(RuntimeError::ConstModification {
                name: name.to_string(),
                location,
            })?;
            return Ok(current);
        }

        let stored = match value.coerce_to(&var_type) {
            Ok(stored) => stored,
            Err(reason) => {
                self.recover(RuntimeError::AssignmentFailed {
                    name: name.to_string(),
                    reason,
                    location,
                })?;
                return Ok(current);
            }
        };

        if let Some(var) = self.lookup_mut(name) {
            var.value = stored.clone();
        }
        Ok(stored)
    }
}
