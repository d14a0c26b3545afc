//! Memory model for the interpreter
//!
//! - [`value`]: runtime value representation (Int, Float, Char, Str)
//! - [`symbols`]: per-activation symbol tables with block scopes
//! - [`functions`]: the function table built from the parsed program
//!
//! # Type Sizes
//!
//! Sizes are fixed and platform-independent. They feed `sizeof` and the
//! memory estimate reported after a run:
//! - `char`: 1 byte
//! - `short`: 2 bytes
//! - `int`, `unsigned`, `float`: 4 bytes
//! - `long`, `double`: 8 bytes
//! - `char name[N]`: N bytes; a string value: its length + 1

pub mod functions;
pub mod symbols;
pub mod value;

use crate::parser::ast::{BaseType, Type};
use value::Value;

/// Size of one element of `base` in bytes
pub fn sizeof_base(base: BaseType) -> usize {
    match base {
        BaseType::Char => 1,
        BaseType::Short => 2,
        BaseType::Int | BaseType::Unsigned | BaseType::Float => 4,
        BaseType::Long | BaseType::Double => 8,
        BaseType::Void => 1,
    }
}

/// Calculate the size of a type in bytes; unsized arrays count one element
pub fn sizeof_type(t: &Type) -> usize {
    let base_size = sizeof_base(t.base);
    match t.array {
        Some(Some(n)) => base_size * n,
        _ => base_size,
    }
}

/// Bytes a stored value occupies
pub fn sizeof_value(value: &Value) -> usize {
    match value {
        Value::Int(_) => 4,
        Value::Float(_) => 8,
        Value::Char(_) => 1,
        Value::Str(s) => s.len() + 1,
    }
}

/// Bytes reserved for a variable of `var_type` currently holding `value`
pub fn storage_size(var_type: &Type, value: &Value) -> usize {
    match (var_type.array, value) {
        (Some(Some(n)), _) => sizeof_base(var_type.base) * n,
        (Some(None), v) => sizeof_value(v),
        _ => sizeof_type(var_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(sizeof_type(&Type::new(BaseType::Int)), 4);
        assert_eq!(sizeof_type(&Type::new(BaseType::Double)), 8);
        assert_eq!(sizeof_type(&Type::new(BaseType::Char).with_array(Some(20))), 20);
        assert_eq!(
            storage_size(&Type::new(BaseType::Char).with_array(None), &Value::Str("hey".into())),
            4
        );
    }
}
