//! Runtime value representation
//!
//! Values are tagged rather than raw bytes. Every variable still behaves like
//! its declared C type: assignment goes through [`Value::coerce_to`], which
//! truncates, widens or narrows the way a C compiler would.
//!
//! # Value Types
//!
//! - [`Value::Int`]: any integer type, held as `i64` and wrapped to the
//!   declared width on assignment
//! - [`Value::Float`]: `float` and `double` (`float` is rounded to `f32`)
//! - [`Value::Char`]: one byte
//! - [`Value::Str`]: string literals and `char name[N]` buffers

use crate::parser::ast::{BaseType, Type};
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Char(u8),
    Str(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl Value {
    /// The value a freshly declared variable of `var_type` holds.
    pub fn default_for(var_type: &Type) -> Value {
        if var_type.is_string() {
            return Value::Str(String::new());
        }
        match var_type.base {
            BaseType::Float | BaseType::Double => Value::Float(0.0),
            BaseType::Char => Value::Char(0),
            _ => Value::Int(0),
        }
    }

    /// Integer view: chars widen, floats truncate toward zero.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Char(c) => Some(i64::from(*c)),
            Value::Float(f) => Some(*f as i64),
            Value::Str(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Char(c) => Some(f64::from(*c)),
            Value::Float(f) => Some(*f),
            Value::Str(_) => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// C truthiness: non-zero numbers; strings count as non-null pointers.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Char(c) => *c != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "double",
            Value::Char(_) => "char",
            Value::Str(_) => "字符串",
        }
    }

    /// Convert to a variable's declared type, as C assignment does.
    pub fn coerce_to(&self, target: &Type) -> Result<Value, String> {
        if target.is_string() {
            return match self {
                Value::Str(s) => Ok(Value::Str(s.clone())),
                other => Err(format!(
                    "类型不匹配: 不能把 {} 赋给字符数组",
                    other.type_name()
                )),
            };
        }
        self.cast_to(target.base)
    }

    /// Explicit `(type)value` conversion.
    pub fn cast_to(&self, base: BaseType) -> Result<Value, String> {
        if let Value::Str(_) = self {
            return Err(format!("类型不匹配: 不能把字符串转换为 {}", base.name()));
        }

        let converted = match base {
            BaseType::Float => Value::Float(self.as_float().unwrap_or(0.0) as f32 as f64),
            BaseType::Double => Value::Float(self.as_float().unwrap_or(0.0)),
            BaseType::Char => Value::Char(self.integer_part() as u8),
            BaseType::Short => Value::Int(i64::from(self.integer_part() as i16)),
            BaseType::Int => Value::Int(i64::from(self.integer_part() as i32)),
            BaseType::Unsigned => Value::Int(i64::from(self.integer_part() as u32)),
            BaseType::Long => Value::Int(self.integer_part()),
            BaseType::Void => Value::Int(0),
        };
        Ok(converted)
    }

    /// Integer part used by narrowing conversions; floats saturate.
    fn integer_part(&self) -> i64 {
        match self {
            Value::Float(f) if f.is_nan() => 0,
            other => other.as_int().unwrap_or(0),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{}", *c as char),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_declared_type() {
        assert_eq!(Value::default_for(&Type::new(BaseType::Int)), Value::Int(0));
        assert_eq!(Value::default_for(&Type::new(BaseType::Double)), Value::Float(0.0));
        assert_eq!(Value::default_for(&Type::new(BaseType::Char)), Value::Char(0));
        assert_eq!(
            Value::default_for(&Type::new(BaseType::Char).with_array(Some(8))),
            Value::Str(String::new())
        );
    }

    #[test]
    fn test_int_coercion_truncates() {
        let int = Type::new(BaseType::Int);
        assert_eq!(Value::Float(3.9).coerce_to(&int), Ok(Value::Int(3)));
        assert_eq!(Value::Float(-3.9).coerce_to(&int), Ok(Value::Int(-3)));
        assert_eq!(Value::Char(b'A').coerce_to(&int), Ok(Value::Int(65)));
        assert_eq!(Value::Int(i64::from(i32::MAX) + 1).coerce_to(&int), Ok(Value::Int(i64::from(i32::MIN))));
    }

    #[test]
    fn test_narrow_types_wrap() {
        assert_eq!(Value::Int(-1).cast_to(BaseType::Unsigned), Ok(Value::Int(4_294_967_295)));
        assert_eq!(Value::Int(70_000).cast_to(BaseType::Short), Ok(Value::Int(4464)));
        assert_eq!(Value::Int(321).cast_to(BaseType::Char), Ok(Value::Char(65)));
    }

    #[test]
    fn test_float_is_single_precision() {
        match Value::Float(0.1).cast_to(BaseType::Float) {
            Ok(Value::Float(f)) => assert_eq!(f, 0.1f32 as f64),
            other => panic!("Expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_string_into_number_is_rejected() {
        let err = Value::Str("hi".into()).coerce_to(&Type::new(BaseType::Int)).unwrap_err();
        assert!(err.contains("类型不匹配"));
        assert!(Value::Int(3).coerce_to(&Type::new(BaseType::Char).with_array(None)).is_err());
    }
}
