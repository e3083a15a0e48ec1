//! AST visitor.
//!
//! Generic pre-order traversal over the arena-allocated AST. The visitor
//! can mutate its own state during traversal; the AST remains immutable.
//!
//! Override `visit_expr` to add behavior at each node and call `walk_expr`
//! to continue into children.

use crate::ast::ExprKind;
use crate::{ExprArena, ExprId};

/// AST visitor trait.
pub trait Visitor {
    /// Visit an expression. The default implementation just walks children.
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        walk_expr(self, id, arena);
    }
}

/// Traverse the children of `id`, visiting each exactly once.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, arena: &ExprArena) {
    match arena.kind(id) {
        ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Nil
        | ExprKind::Ident(_) => {}
        ExprKind::Member { object, .. } => {
            visitor.visit_expr(object, arena);
        }
        ExprKind::Index { object, index } => {
            visitor.visit_expr(object, arena);
            visitor.visit_expr(index, arena);
        }
        ExprKind::List(range) => {
            for &element in arena.get_expr_list(range) {
                visitor.visit_expr(element, arena);
            }
        }
        ExprKind::Unary { operand, .. } => {
            visitor.visit_expr(operand, arena);
        }
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left, arena);
            visitor.visit_expr(right, arena);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            visitor.visit_expr(cond, arena);
            visitor.visit_expr(then, arena);
            visitor.visit_expr(otherwise, arena);
        }
        ExprKind::Call { func, args } => {
            visitor.visit_expr(func, arena);
            for &arg in arena.get_expr_list(args) {
                visitor.visit_expr(arg, arena);
            }
        }
        ExprKind::Builtin { args, .. } => {
            for &arg in arena.get_expr_list(args) {
                visitor.visit_expr(arg, arena);
            }
        }
    }
}
