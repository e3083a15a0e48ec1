//! Brio IR - shared representation types
//!
//! This crate contains the core data structures for the Brio compiler:
//! - Spans for source locations
//! - Names for interned identifiers
//! - AST nodes (`Expr`, `ExprKind`, operators)
//! - Arena allocation for expressions
//! - Generic AST traversal (`Visitor`)
//! - The plain unparser (natural textual rendering of a subtree)
//!
//! # Design Philosophy
//!
//! - **Intern everything**: strings become `Name(u32)`
//! - **Flatten everything**: no `Box<Expr>`, children are `ExprId(u32)`
//!   indices into a contiguous `ExprArena`
//!
//! Floats are stored as `u64` bits so every node type is `Copy + Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod name;
mod span;
mod unparse;
pub mod visitor;

pub use arena::ExprArena;
pub use ast::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use expr_id::{ExprId, ExprRange};
pub use interner::StringInterner;
pub use name::Name;
pub use span::{Span, SpanError};
pub use unparse::unparse;
pub use visitor::{walk_expr, Visitor};
