//! Value-level operator implementations.
//!
//! Shared between the VM's instruction loop and the compiler's constant
//! folder, so folded and evaluated results agree exactly.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{RuntimeError, Value};

/// Addition: integer, float (promoting), or string concatenation.
pub fn add(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => l
            .checked_add(*r)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "+" }),
        (Value::Str(l), Value::Str(r)) => {
            let mut s = String::with_capacity(l.len() + r.len());
            s.push_str(l);
            s.push_str(r);
            Ok(Value::Str(Arc::from(s.as_str())))
        }
        _ => float_pair(left, right)
            .map(|(l, r)| Value::Float(l + r))
            .ok_or_else(|| unsupported("+", left, right)),
    }
}

/// Subtraction over numbers.
pub fn sub(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => l
            .checked_sub(*r)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "-" }),
        _ => float_pair(left, right)
            .map(|(l, r)| Value::Float(l - r))
            .ok_or_else(|| unsupported("-", left, right)),
    }
}

/// Multiplication over numbers.
pub fn mul(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => l
            .checked_mul(*r)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "*" }),
        _ => float_pair(left, right)
            .map(|(l, r)| Value::Float(l * r))
            .ok_or_else(|| unsupported("*", left, right)),
    }
}

/// Division. Integer division truncates; division by integer zero errors.
pub fn div(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(_), Value::Int(0)) => Err(RuntimeError::DivisionByZero),
        (Value::Int(l), Value::Int(r)) => l
            .checked_div(*r)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "/" }),
        _ => float_pair(left, right)
            .map(|(l, r)| Value::Float(l / r))
            .ok_or_else(|| unsupported("/", left, right)),
    }
}

/// Remainder. Follows the sign of the dividend, like Rust's `%`.
pub fn rem(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(_), Value::Int(0)) => Err(RuntimeError::DivisionByZero),
        (Value::Int(l), Value::Int(r)) => l
            .checked_rem(*r)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "%" }),
        _ => float_pair(left, right)
            .map(|(l, r)| Value::Float(l % r))
            .ok_or_else(|| unsupported("%", left, right)),
    }
}

/// Exponentiation. Always produces a float.
pub fn pow(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    float_pair(left, right)
        .map(|(l, r)| Value::Float(l.powf(r)))
        .ok_or_else(|| unsupported("**", left, right))
}

/// Numeric negation.
pub fn neg(operand: &Value) -> Result<Value, RuntimeError> {
    match operand {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "-" }),
        Value::Float(x) => Ok(Value::Float(-x)),
        _ => Err(RuntimeError::UnsupportedUnary {
            op: "-",
            operand: operand.type_name(),
        }),
    }
}

/// Logical negation.
pub fn not(operand: &Value) -> Result<Value, RuntimeError> {
    match operand {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        _ => Err(RuntimeError::UnsupportedUnary {
            op: "!",
            operand: operand.type_name(),
        }),
    }
}

/// Numeric identity (`+x`): verifies the operand is a number.
pub fn plus(operand: &Value) -> Result<Value, RuntimeError> {
    match operand {
        Value::Int(_) | Value::Float(_) => Ok(operand.clone()),
        _ => Err(RuntimeError::UnsupportedUnary {
            op: "+",
            operand: operand.type_name(),
        }),
    }
}

/// Ordering comparison over numbers (promoting) or strings.
///
/// `op` is only used for error reporting.
pub fn compare(op: &'static str, left: &Value, right: &Value) -> Result<Ordering, RuntimeError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => Ok(l.cmp(r)),
        (Value::Str(l), Value::Str(r)) => Ok(l.cmp(r)),
        _ => float_pair(left, right)
            .and_then(|(l, r)| l.partial_cmp(&r))
            .ok_or_else(|| unsupported(op, left, right)),
    }
}

/// Promote both operands to floats when both are numeric.
fn float_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    let l = match left {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        _ => return None,
    };
    let r = match right {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        _ => return None,
    };
    Some((l, r))
}

fn unsupported(op: &'static str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnsupportedBinary {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}
