//! Runtime error taxonomy.

use thiserror::Error;

/// Error raised during evaluation of a compiled program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("unsupported operand types for `{op}`: {left} and {right}")]
    UnsupportedBinary {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("unsupported operand type for `{op}`: {operand}")]
    UnsupportedUnary {
        op: &'static str,
        operand: &'static str,
    },

    #[error("integer overflow in `{op}`")]
    IntegerOverflow { op: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("cannot index {target} with {index}")]
    InvalidIndex {
        target: &'static str,
        index: &'static str,
    },

    #[error("cannot access member `{member}` of {target}")]
    InvalidMember {
        member: String,
        target: &'static str,
    },

    #[error("condition must be bool, found {found}")]
    NonBoolCondition { found: &'static str },

    #[error("function `{name}` expects {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Failure raised by a native function implementation.
    #[error("{0}")]
    Custom(String),

    /// A reuse slot was read before any anchor site wrote it. Possible when
    /// the designated compute-and-store site sits on an untaken conditional
    /// path; surfaced as an error rather than a silently wrong value.
    #[error("reuse slot {0} read before it was written")]
    SlotUnset(u32),

    #[error("value stack underflow")]
    StackUnderflow,

    #[error("environment must be a map, found {0}")]
    InvalidEnvironment(&'static str),
}
