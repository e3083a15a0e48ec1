//! Brio compile - configuration and code generation.
//!
//! This crate turns a checked AST into an executable `brio_vm::Program`,
//! applying common-subexpression elimination along the way.
//!
//! # Pipeline Position
//!
//! ```text
//! Source → Lex → Parse → Static visitors → Check → **Fold → Count → Emit**
//! ```
//!
//! # What Happens During Compilation
//!
//! 1. **Constant folding** (`fold`, when `Config::optimize` is set):
//!    pure-literal operators and conditionals are pre-evaluated in place;
//!    calls to `const_expr`-registered functions and to builtins fold when
//!    every argument is a literal.
//!
//! 2. **Occurrence counting** (`cse`, when `Config::reuse_common_subexpr`
//!    is set): one pre-pass over the whole tree counts, per canonical
//!    identity, how often each eligible subexpression occurs. Short-circuit
//!    operators (`??`, `and`, `or`) are never counted; merging them would
//!    change evaluation order and side-effect visibility.
//!
//! 3. **Emission** (`emit`): a second walk in program order generates
//!    bytecode. At each eligible node the reuse resolver classifies the
//!    site: the first-visited occurrence of a repeated identity computes
//!    normally and persists its result (`StoreSlot`); every later
//!    occurrence loads the stored value instead (`LoadSlot`).
//!
//! The registry backing steps 2 and 3 is owned by one compilation and
//! dropped with it; concurrent compilations never share state.

mod conf;
mod cse;
mod emit;
mod error;
mod fold;

pub use conf::{Config, ConfigError, FunctionTable, StaticCheck};
pub use cse::{canonical, CseRegistry, OccurrenceCounter, Reuse};
pub use emit::compile;
pub use error::CompileError;
