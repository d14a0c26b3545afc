use crate::interpreter::control::{ControlFrame, FrameKind};
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{CaseLabel, Expr, SourceLocation, SwitchCase};

impl Interpreter {
    pub(crate) fn execute_return(
        &mut self,
        expr: Option<&Expr>,
        _location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.return_value = match expr {
            Some(ret_expr) => Some(self.evaluate_expr(ret_expr)?),
            None => None,
        };
        self.control_flow = ControlFlow::Return;
        Ok(())
    }

    pub(crate) fn execute_break(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        if self.control().nearest_breakable().is_some() {
            self.control_flow = ControlFlow::Break;
            Ok(())
        } else {
            self.recover(RuntimeError::StrayJump {
                keyword: "break",
                location,
            })
        }
    }

    pub(crate) fn execute_continue(
        &mut self,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if self.control().nearest_loop().is_some() {
            self.control_flow = ControlFlow::Continue;
            Ok(())
        } else {
            self.recover(RuntimeError::StrayJump {
                keyword: "continue",
                location,
            })
        }
    }

    /// Jump to the matching `case` (or `default`) and fall through from
    /// there until a `break`. `continue` and `return` propagate outward.
    pub(crate) fn execute_switch(
        &mut self,
        subject: &Expr,
        cases: &[SwitchCase],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let switch_val = self.evaluate_expr(subject)?;

        let mut match_index: Option<usize> = None;
        let mut default_index: Option<usize> = None;

        for (i, case) in cases.iter().enumerate() {
            match &case.label {
                CaseLabel::Case(value) => {
                    let case_val = self.evaluate_expr(value)?;
                    if values_equal(&switch_val, &case_val) {
                        match_index = Some(i);
                        break;
                    }
                }
                CaseLabel::Default => {
                    default_index.get_or_insert(i);
                }
            }
        }

        let Some(start) = match_index.or(default_index) else {
            return Ok(());
        };

        let mut frame = ControlFrame::new(FrameKind::Switch, location);
        frame.matched = true;
        self.control_mut().push(frame);
        self.symbols_mut().push_scope();

        let result = self.execute_cases(&cases[start..]);

        self.symbols_mut().pop_scope();
        self.control_mut().pop();

        if self.control_flow == ControlFlow::Break {
            self.control_flow = ControlFlow::Normal;
        }
        result
    }

    fn execute_cases(&mut self, cases: &[SwitchCase]) -> Result<(), RuntimeError> {
        for case in cases {
            self.current_location = case.location;
            self.execute_sequence(&case.body)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }
}

/// `case` comparison: numeric across int/char/float, textual for strings.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Str(_), _) | (_, Value::Str(_)) => false,
        _ if a.is_float() || b.is_float() => a.as_float() == b.as_float(),
        _ => a.as_int() == b.as_int(),
    }
}
