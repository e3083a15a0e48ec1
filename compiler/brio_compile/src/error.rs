//! Compile errors.

use brio_ir::Span;
use thiserror::Error;

/// Error produced by bytecode emission.
///
/// Most of these are unreachable for programs that went through the
/// checker; they exist so the emitter never panics on a malformed tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String, span: Span },

    #[error("unknown builtin `{name}`")]
    UnknownBuiltin { name: String, span: Span },

    #[error("only named functions can be called")]
    NotCallable { span: Span },

    #[error("program exceeds {what} limit")]
    LimitExceeded { what: &'static str },
}
