//! Check errors.

use brio_ir::Span;
use thiserror::Error;

use crate::Type;

/// Error produced by static checking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("unknown identifier `{name}`")]
    UnknownIdentifier { name: String, span: Span },

    #[error("unknown function `{name}`")]
    UnknownFunction { name: String, span: Span },

    #[error("only named functions can be called")]
    NotCallable { span: Span },

    #[error("builtin `{name}` is disabled")]
    DisabledBuiltin { name: String, span: Span },

    #[error("`{name}` expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("cannot access members of {found}")]
    InvalidMemberAccess { found: Type, span: Span },

    #[error("cannot index {found}")]
    CannotIndex { found: Type, span: Span },

    #[error("cannot index {target} with {index}")]
    InvalidIndexType {
        target: Type,
        index: Type,
        span: Span,
    },

    #[error("unsupported operand type for `{op}`: {found}")]
    InvalidUnaryOperand {
        op: &'static str,
        found: Type,
        span: Span,
    },

    #[error("unsupported operand types for `{op}`: {left} and {right}")]
    InvalidBinaryOperands {
        op: &'static str,
        left: Type,
        right: Type,
        span: Span,
    },

    #[error("condition must be bool, found {found}")]
    NonBoolCondition { found: Type, span: Span },

    #[error("invalid argument to `{name}`: {found}")]
    InvalidArgument {
        name: String,
        found: Type,
        span: Span,
    },

    #[error("expected result type {expected}, found {found}")]
    ExpectedType {
        expected: Type,
        found: Type,
        span: Span,
    },

    /// Failure reported by a pluggable static-check visitor.
    #[error("{message}")]
    Visitor { message: String, span: Span },
}

impl CheckError {
    /// Source span the error is attached to.
    pub const fn span(&self) -> Span {
        match self {
            CheckError::UnknownIdentifier { span, .. }
            | CheckError::UnknownFunction { span, .. }
            | CheckError::NotCallable { span }
            | CheckError::DisabledBuiltin { span, .. }
            | CheckError::ArityMismatch { span, .. }
            | CheckError::InvalidMemberAccess { span, .. }
            | CheckError::CannotIndex { span, .. }
            | CheckError::InvalidIndexType { span, .. }
            | CheckError::InvalidUnaryOperand { span, .. }
            | CheckError::InvalidBinaryOperands { span, .. }
            | CheckError::NonBoolCondition { span, .. }
            | CheckError::InvalidArgument { span, .. }
            | CheckError::ExpectedType { span, .. }
            | CheckError::Visitor { span, .. } => *span,
        }
    }
}
