//! Standard-library builtin functions.
//!
//! Every builtin is pure and deterministic: same arguments, same result,
//! no observable side effects. This is what makes builtin invocations
//! safe candidates for compile-time folding and subexpression reuse.

use std::sync::Arc;

use crate::{ops, Function, RuntimeError, Value};

/// Construct the full builtin set.
///
/// The compiler's configuration pre-populates its builtin table from this
/// list; entries are removed from visibility only by disabling them.
pub fn all() -> Vec<Function> {
    vec![
        Function::new("len", Some(1), builtin_len),
        Function::new("abs", Some(1), builtin_abs),
        Function::new("min", None, |args| builtin_extremum("min", args, false)),
        Function::new("max", None, |args| builtin_extremum("max", args, true)),
        Function::new("int", Some(1), builtin_int),
        Function::new("float", Some(1), builtin_float),
        Function::new("string", Some(1), builtin_string),
        Function::new("upper", Some(1), builtin_upper),
        Function::new("lower", Some(1), builtin_lower),
        Function::new("contains", Some(2), builtin_contains),
    ]
}

fn builtin_len(args: &[Value]) -> Result<Value, RuntimeError> {
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(elements) => elements.len(),
        Value::Map(entries) => entries.len(),
        other => {
            return Err(RuntimeError::Custom(format!(
                "len expects string, list or map, got {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(len as i64))
}

fn builtin_abs(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "abs" }),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(RuntimeError::Custom(format!(
            "abs expects a number, got {}",
            other.type_name()
        ))),
    }
}

/// Variadic `min`/`max` over numbers or strings.
fn builtin_extremum(
    name: &'static str,
    args: &[Value],
    want_greater: bool,
) -> Result<Value, RuntimeError> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| RuntimeError::Custom(format!("{name} expects at least one argument")))?;
    let mut best = first.clone();
    for candidate in rest {
        let ordering = ops::compare(name, candidate, &best)?;
        if (ordering == std::cmp::Ordering::Greater) == want_greater
            && ordering != std::cmp::Ordering::Equal
        {
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn builtin_int(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => {
            let truncated = x.trunc();
            if truncated.is_finite()
                && truncated >= i64::MIN as f64
                && truncated <= i64::MAX as f64
            {
                Ok(Value::Int(truncated as i64))
            } else {
                Err(RuntimeError::Custom(format!(
                    "cannot convert {x} to int"
                )))
            }
        }
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| RuntimeError::Custom(format!("cannot convert {s:?} to int"))),
        other => Err(RuntimeError::Custom(format!(
            "cannot convert {} to int",
            other.type_name()
        ))),
    }
}

fn builtin_float(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| RuntimeError::Custom(format!("cannot convert {s:?} to float"))),
        other => Err(RuntimeError::Custom(format!(
            "cannot convert {} to float",
            other.type_name()
        ))),
    }
}

fn builtin_string(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Str(Arc::from(args[0].to_string().as_str())))
}

fn builtin_upper(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Str(s) => Ok(Value::Str(Arc::from(s.to_uppercase().as_str()))),
        other => Err(RuntimeError::Custom(format!(
            "upper expects a string, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_lower(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Str(s) => Ok(Value::Str(Arc::from(s.to_lowercase().as_str()))),
        other => Err(RuntimeError::Custom(format!(
            "lower expects a string, got {}",
            other.type_name()
        ))),
    }
}

fn builtin_contains(args: &[Value]) -> Result<Value, RuntimeError> {
    let found = match (&args[0], &args[1]) {
        (Value::Str(haystack), Value::Str(needle)) => haystack.contains(needle.as_ref()),
        (Value::List(elements), needle) => elements.iter().any(|e| e.loose_eq(needle)),
        (Value::Map(entries), Value::Str(key)) => entries.contains_key(key.as_ref()),
        (haystack, needle) => {
            return Err(RuntimeError::Custom(format!(
                "contains expects string, list or map as haystack, got {} and {}",
                haystack.type_name(),
                needle.type_name()
            )))
        }
    };
    Ok(Value::Bool(found))
}
