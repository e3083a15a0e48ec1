//! Expression nodes and variants.
//!
//! All children are arena indices, not boxes. Floats are stored as `u64`
//! bits so `ExprKind` stays `Copy + Eq + Hash`.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use crate::{ExprId, ExprRange, Name, Span};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum ExprKind {
    /// Integer literal: `42`, `1_000`
    Int(i64),

    /// Float literal: `3.14`, `2.5e-8` (stored as bits for `Hash`)
    Float(u64),

    /// Boolean literal: `true`, `false`
    Bool(bool),

    /// String literal (interned)
    Str(Name),

    /// Nil literal: `nil`
    Nil,

    /// Environment member reference
    Ident(Name),

    /// Member access: `object.property`
    Member { object: ExprId, property: Name },

    /// Index access: `object[index]`
    Index { object: ExprId, index: ExprId },

    /// Array literal: `[a, b, c]`
    List(ExprRange),

    /// Unary operation: `op operand`
    Unary { op: UnaryOp, operand: ExprId },

    /// Binary operation: `left op right`
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// Conditional: `cond ? then : otherwise`
    Conditional {
        cond: ExprId,
        then: ExprId,
        otherwise: ExprId,
    },

    /// Call of a registered function: `f(args...)`
    ///
    /// `func` is the callee expression; only identifier callees are
    /// resolvable (functions are registered by name).
    Call { func: ExprId, args: ExprRange },

    /// Invocation of a standard-library builtin: `len(x)`
    ///
    /// Produced by the checker when a call resolves to a builtin that is
    /// neither disabled nor shadowed.
    Builtin { name: Name, args: ExprRange },
}

impl fmt::Debug for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Int(n) => write!(f, "Int({n})"),
            ExprKind::Float(bits) => write!(f, "Float({})", f64::from_bits(*bits)),
            ExprKind::Bool(b) => write!(f, "Bool({b})"),
            ExprKind::Str(n) => write!(f, "Str({n:?})"),
            ExprKind::Nil => write!(f, "Nil"),
            ExprKind::Ident(n) => write!(f, "Ident({n:?})"),
            ExprKind::Member { object, property } => {
                write!(f, "Member({object:?}, {property:?})")
            }
            ExprKind::Index { object, index } => {
                write!(f, "Index({object:?}, {index:?})")
            }
            ExprKind::List(range) => write!(f, "List({range:?})"),
            ExprKind::Unary { op, operand } => write!(f, "Unary({op:?}, {operand:?})"),
            ExprKind::Binary { op, left, right } => {
                write!(f, "Binary({op:?}, {left:?}, {right:?})")
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => write!(f, "Conditional({cond:?}, {then:?}, {otherwise:?})"),
            ExprKind::Call { func, args } => write!(f, "Call({func:?}, {args:?})"),
            ExprKind::Builtin { name, args } => write!(f, "Builtin({name:?}, {args:?})"),
        }
    }
}
