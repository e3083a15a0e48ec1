//! Brio VM - runtime values, bytecode and the stack machine.
//!
//! This crate is standalone: it has no `brio_*` dependencies, so embedders
//! that only run pre-compiled programs don't pull in the compiler.
//!
//! A compiled [`Program`] is a flat instruction stream over a constant
//! pool, a name pool and a resolved function table. Evaluation is a plain
//! stack machine; the only per-evaluation state besides the value stack is
//! the reuse-slot storage (see [`Op::StoreSlot`] / [`Op::LoadSlot`]),
//! allocated fresh for every top-level evaluation.

pub mod builtins;
mod bytecode;
mod error;
mod function;
mod machine;
pub mod ops;
mod value;

pub use bytecode::{Op, Program};
pub use error::RuntimeError;
pub use function::{Function, NativeFn};
pub use machine::Vm;
pub use value::Value;
