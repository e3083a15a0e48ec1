//! Runtime function descriptors.

use std::fmt;

use crate::{RuntimeError, Value};

/// A native function implementation.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync;

/// A callable registered with the compiler: a user function or a builtin.
pub struct Function {
    name: String,
    /// Fixed argument count, or `None` for variadic functions.
    arity: Option<usize>,
    fun: Box<NativeFn>,
}

impl Function {
    /// Create a function descriptor.
    pub fn new<F>(name: impl Into<String>, arity: Option<usize>, fun: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Function {
            name: name.into(),
            arity,
            fun: Box::new(fun),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Invoke the function, enforcing arity.
    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        if let Some(expected) = self.arity {
            if args.len() != expected {
                return Err(RuntimeError::ArityMismatch {
                    name: self.name.clone(),
                    expected,
                    got: args.len(),
                });
            }
        }
        (self.fun)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
