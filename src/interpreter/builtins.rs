//! Built-in function implementations
//!
//! Library functions handled by the interpreter itself rather than defined
//! in user code. A user function with the same name takes precedence.
//!
//! # Supported Built-ins
//!
//! - `printf(format, ...)`, `puts(s)`, `putchar(c)`: output
//! - `scanf(format, &var, ...)`: reads tokens from the run's input
//! - `abs`, `fabs`, `sqrt`, `pow`, `min`, `max`: math
//! - `rand()`, `srand(seed)`, `time(NULL)`: deterministic pseudo-randomness
//! - `strlen(s)`
//!
//! # Implementation Notes
//!
//! - `rand` is the portable ANSI C linear congruential generator, seeded
//!   with 1, so every run of the same program prints the same numbers
//! - `time` always returns 0 for the same reason

use crate::interpreter::constants::RAND_MAX;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::io::format_printf;
use crate::io::input::{parse_token, scan_specs, ScanKind};
use crate::io::OutputKind;
use crate::memory::value::Value;
use crate::parser::ast::{BaseType, Expr, SourceLocation, UnOp};

impl Interpreter {
    /// Run built-in `name`, or `None` when there is no such built-in.
    pub(crate) fn call_builtin(
        &mut self,
        name: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Option<Value>, RuntimeError> {
        let value = match name {
            "printf" => match args.split_first() {
                Some((Expr::StringLiteral(format, _), rest)) => {
                    self.builtin_printf(format, rest, location)?
                }
                Some((format, rest)) => {
                    let format = self.evaluate_expr(format)?;
                    match format {
                        Value::Str(text) => self.builtin_printf(&text, rest, location)?,
                        other => self.recover_value(RuntimeError::TypeError {
                            message: format!("printf 的格式必须是字符串, 而不是 {}", other.type_name()),
                            location,
                        })?,
                    }
                }
                None => self.arity_error(name, 1, 0, location)?,
            },

            "scanf" => match args.split_first() {
                Some((Expr::StringLiteral(format, _), targets)) => {
                    self.builtin_scanf(format, targets, location)?
                }
                _ => self.recover_value(RuntimeError::TypeError {
                    message: "scanf 的第一个参数必须是格式字符串".to_string(),
                    location,
                })?,
            },

            "puts" => match self.evaluate_args(name, args, 1, location)?.as_deref() {
                Some([text]) => {
                    let line = format!("{}\n", text);
                    self.console.print(&line, location.line, OutputKind::Program);
                    Value::Int(line.len() as i64)
                }
                _ => Value::Int(0),
            },

            "putchar" => match self.evaluate_args(name, args, 1, location)?.as_deref() {
                Some([c]) => {
                    let byte = c.as_int().unwrap_or(0) as u8;
                    self.console
                        .print(&char::from(byte).to_string(), location.line, OutputKind::Program);
                    Value::Int(i64::from(byte))
                }
                _ => Value::Int(0),
            },

            "abs" => match self.numeric_args(name, args, 1, location)?.as_deref() {
                Some([x]) => {
                    let n = x.as_int().unwrap_or(0) as i32;
                    Value::Int(i64::from(n.wrapping_abs()))
                }
                _ => Value::Int(0),
            },

            "fabs" | "sqrt" => match self.numeric_args(name, args, 1, location)?.as_deref() {
                Some([x]) => {
                    let x = x.as_float().unwrap_or(0.0);
                    Value::Float(if name == "fabs" { x.abs() } else { x.sqrt() })
                }
                _ => Value::Int(0),
            },

            "pow" => match self.numeric_args(name, args, 2, location)?.as_deref() {
                Some([base, exp]) => Value::Float(
                    base.as_float()
                        .unwrap_or(0.0)
                        .powf(exp.as_float().unwrap_or(0.0)),
                ),
                _ => Value::Int(0),
            },

            "min" | "max" => match self.numeric_args(name, args, 2, location)?.as_deref() {
                Some([a, b]) => {
                    let a_is_less = if a.is_float() || b.is_float() {
                        a.as_float() < b.as_float()
                    } else {
                        a.as_int() < b.as_int()
                    };
                    let pick_a = a_is_less == (name == "min");
                    if pick_a { a.clone() } else { b.clone() }
                }
                _ => Value::Int(0),
            },

            "rand" => match self.evaluate_args(name, args, 0, location)? {
                Some(_) => Value::Int(self.next_rand()),
                None => Value::Int(0),
            },

            "srand" => match self.numeric_args(name, args, 1, location)?.as_deref() {
                Some([seed]) => {
                    self.rand_state = seed.as_int().unwrap_or(0) as u32;
                    Value::Int(0)
                }
                _ => Value::Int(0),
            },

            "time" => {
                // `time(NULL)` and `time(0)` both fine; the argument is ignored
                for arg in args {
                    if !matches!(arg, Expr::Variable(n, _) if n == "NULL") {
                        self.evaluate_expr(arg)?;
                    }
                }
                Value::Int(0)
            }

            "strlen" => match self.evaluate_args(name, args, 1, location)?.as_deref() {
                Some([Value::Str(s)]) => Value::Int(s.len() as i64),
                Some([other]) => self.recover_value(RuntimeError::TypeError {
                    message: format!("strlen 需要字符串参数, 而不是 {}", other.type_name()),
                    location,
                })?,
                _ => Value::Int(0),
            },

            _ => return Ok(None),
        };

        Ok(Some(value))
    }

    /// `printf` with a raw format string. Returns the number of bytes written.
    pub(crate) fn builtin_printf(
        &mut self,
        format: &str,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate_expr(arg)?);
        }

        let output = format_printf(format, &arg_values);
        self.console.print(&output, location.line, OutputKind::Program);
        Ok(Value::Int(output.len() as i64))
    }

    /// `scanf`: each conversion takes the next input token. Missing tokens
    /// leave zero or empty values. The tokens used are echoed as
    /// `[输入]: a, b`. Returns the number of successful conversions.
    pub(crate) fn builtin_scanf(
        &mut self,
        format: &str,
        targets: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let mut specs = scan_specs(format).into_iter();
        let mut echoed = Vec::with_capacity(targets.len());
        let mut converted = 0;

        for target in targets {
            let Some(name) = scan_target(target) else {
                self.recover(RuntimeError::TypeError {
                    message: "scanf 的参数必须是变量的地址".to_string(),
                    location,
                })?;
                continue;
            };

            let kind = loop {
                match specs.next() {
                    Some(spec) if spec.suppress => echoed.extend(self.input.next_token()),
                    Some(spec) => break spec.kind,
                    None => break self.scan_kind_for(name),
                }
            };

            let value = match self.input.next_token() {
                Some(token) => {
                    let parsed = parse_token(kind, &token);
                    echoed.push(token);
                    match parsed {
                        Ok(value) => {
                            converted += 1;
                            value
                        }
                        Err(reason) => {
                            self.recover(RuntimeError::AssignmentFailed {
                                name: name.to_string(),
                                reason,
                                location,
                            })?;
                            Value::Int(0)
                        }
                    }
                }
                None => {
                    echoed.push(kind.placeholder().to_string());
                    kind.default_value()
                }
            };

            self.store_variable(name, value, location)?;
        }

        let echo = format!("[输入]: {}\n", echoed.join(", "));
        self.console.print(&echo, location.line, OutputKind::InputEcho);
        Ok(Value::Int(converted))
    }

    /// Conversion used when the format runs out before the targets do
    fn scan_kind_for(&self, name: &str) -> ScanKind {
        match self.lookup(name).map(|var| &var.var_type) {
            Some(t) if t.is_string() => ScanKind::Str,
            Some(t) if t.base.is_floating() => ScanKind::Float,
            Some(t) if t.base == BaseType::Char => ScanKind::Char,
            _ => ScanKind::Int,
        }
    }

    /// ANSI C `rand()`
    pub(crate) fn next_rand(&mut self) -> i64 {
        self.rand_state = self
            .rand_state
            .wrapping_mul(1_103_515_245)
            .wrapping_add(12_345);
        i64::from(self.rand_state / 65_536) % (RAND_MAX + 1)
    }

    /// Evaluate arguments after checking their count; `None` on a mismatch.
    fn evaluate_args(
        &mut self,
        name: &str,
        args: &[Expr],
        expected: usize,
        location: SourceLocation,
    ) -> Result<Option<Vec<Value>>, RuntimeError> {
        if args.len() != expected {
            self.arity_error(name, expected, args.len(), location)?;
            return Ok(None);
        }
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate_expr(arg)?);
        }
        Ok(Some(values))
    }

    /// Like [`Interpreter::evaluate_args`], also rejecting strings.
    fn numeric_args(
        &mut self,
        name: &str,
        args: &[Expr],
        expected: usize,
        location: SourceLocation,
    ) -> Result<Option<Vec<Value>>, RuntimeError> {
        let Some(values) = self.evaluate_args(name, args, expected, location)? else {
            return Ok(None);
        };
        if let Some(text) = values.iter().find(|v| matches!(v, Value::Str(_))) {
            self.recover(RuntimeError::TypeError {
                message: format!("{} 需要数值参数, 而不是 {}", name, text.type_name()),
                location,
            })?;
            return Ok(None);
        }
        Ok(Some(values))
    }

    fn arity_error(
        &mut self,
        name: &str,
        expected: usize,
        got: usize,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        self.recover_value(RuntimeError::ArgumentCountMismatch {
            function: name.to_string(),
            expected,
            got,
            location,
        })
    }
}

/// Variable named by a `scanf` argument: `&x`, or `buf` for a char array
fn scan_target(target: &Expr) -> Option<&str> {
    match target {
        Expr::UnaryOp {
            op: UnOp::AddrOf,
            operand,
            ..
        } => match operand.as_ref() {
            Expr::Variable(name, _) => Some(name),
            _ => None,
        },
        Expr::Variable(name, _) => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::parser::parse_source;
    use crate::runner::RunConfig;

    fn execute(source: &str, stdin: &str) -> Interpreter {
        let program = parse_source(source).unwrap();
        let mut interpreter = Interpreter::new(&program, stdin, RunConfig::default());
        interpreter.run(&program).unwrap();
        interpreter
    }

    fn main_with(body: &str, stdin: &str) -> Interpreter {
        execute(&format!("int main() {{ {} return 0; }}", body), stdin)
    }

    #[test]
    fn test_scanf_binds_tokens() {
        let interp = main_with("int a, b; scanf(\"%d %d\", &a, &b); printf(\"%d\", a + b);", "3,4");
        assert_eq!(interp.console().text(), "[输入]: 3, 4\n7");
    }

    #[test]
    fn test_scanf_without_input_binds_zero() {
        let interp = main_with("int a = 5, b = 6; scanf(\"%d %d\", &a, &b); printf(\"%d %d\", a, b);", "");
        assert_eq!(interp.console().text(), "[输入]: 0, 0\n0 0");
        assert!(interp.diagnostics().is_empty());
    }

    #[test]
    fn test_scanf_queue_is_shared() {
        let interp = main_with(
            "int a; double d; char c; char name[16]; scanf(\"%d\", &a); scanf(\"%lf %c\", &d, &c); scanf(\"%s\", name); printf(\"%d %.1f %c %s\", a, d, c, name);",
            "1 2.5 xyz Mars",
        );
        assert!(interp.console().text().ends_with("1 2.5 x Mars"));
    }

    #[test]
    fn test_scanf_return_counts_conversions() {
        let interp = main_with("int a, b; int n = scanf(\"%d %d\", &a, &b); printf(\"%d\", n);", "8");
        assert!(interp.console().text().ends_with("1"));
    }

    #[test]
    fn test_scanf_bad_token_warns_and_assigns_zero() {
        let interp = main_with("int a = 9; scanf(\"%d\", &a); printf(\"%d\", a);", "abc");
        let text = interp.console().text();
        assert!(text.contains("警告: 变量 a 赋值失败"));
        assert!(text.ends_with("0"));
    }

    #[test]
    fn test_math_builtins() {
        let interp = main_with(
            "printf(\"%d %.1f %.1f %.0f %d %.1f\", abs(-4), fabs(-2.5), sqrt(16), pow(2, 10), max(3, 9), min(1.5, 2));",
            "",
        );
        assert_eq!(interp.console().text(), "4 2.5 4.0 1024 9 1.5");
    }

    #[test]
    fn test_rand_is_deterministic() {
        let interp = main_with("printf(\"%d %d\", rand(), rand());", "");
        assert_eq!(interp.console().text(), "16838 5758");

        let seeded = main_with("srand(time(NULL)); printf(\"%d\", rand() % 100 + 1);", "");
        assert_eq!(seeded.console().text(), "1");
    }

    #[test]
    fn test_puts_putchar_strlen() {
        let interp = main_with("puts(\"hi\"); putchar('A'); putchar(10); printf(\"%d\", strlen(\"four\"));", "");
        assert_eq!(interp.console().text(), "hi\nA\n4");
    }

    #[test]
    fn test_user_function_shadows_builtin() {
        let interp = execute("int max(int a, int b) { return 42; }\nint main() { printf(\"%d\", max(1, 2)); return 0; }", "");
        assert_eq!(interp.console().text(), "42");
    }

    #[test]
    fn test_builtin_arity_mismatch() {
        let interp = main_with("int x = abs(1, 2); printf(\"%d\", x);", "");
        assert_eq!(interp.diagnostics().len(), 1);
        assert!(interp.diagnostics()[0].message.contains("abs"));
        assert!(interp.console().text().ends_with("0"));
    }
}
