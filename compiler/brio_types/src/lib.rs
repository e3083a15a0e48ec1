//! Brio types - environment descriptors and static checking.
//!
//! The checker runs after parsing and before compilation. It resolves
//! calls against the configured function and builtin tables (rewriting
//! calls that target available builtins into `Builtin` nodes), enforces
//! strict-mode identifier resolution against the environment descriptor,
//! and checks operator/operand compatibility where types are known.
//! `Type::Any` absorbs: there are no inference variables, unknown shapes
//! simply defer to runtime.

mod check;
mod env;
mod error;
mod types;

pub use check::{check, CalleeInfo, CheckOptions};
pub use env::EnvDescriptor;
pub use error::CheckError;
pub use types::Type;
