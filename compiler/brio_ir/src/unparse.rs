//! Plain unparser: natural textual rendering of a subtree.
//!
//! Renders an expression the way it would be written in source, with
//! parentheses inserted only where re-parsing would otherwise change the
//! tree. Deterministic: two structurally identical subtrees always render
//! to the same text.

use std::fmt::Write as _;

use crate::ast::ExprKind;
use crate::{ExprArena, ExprId, StringInterner};

/// Render the subtree rooted at `id` to its natural source form.
pub fn unparse(arena: &ExprArena, id: ExprId, interner: &StringInterner) -> String {
    let mut buf = String::new();
    write_expr(&mut buf, arena, id, interner);
    buf
}

fn write_expr(buf: &mut String, arena: &ExprArena, id: ExprId, interner: &StringInterner) {
    match arena.kind(id) {
        ExprKind::Int(n) => {
            let _ = write!(buf, "{n}");
        }
        ExprKind::Float(bits) => {
            let _ = write!(buf, "{:?}", f64::from_bits(bits));
        }
        ExprKind::Bool(b) => {
            let _ = write!(buf, "{b}");
        }
        ExprKind::Str(name) => {
            let _ = write!(buf, "{:?}", interner.resolve(name));
        }
        ExprKind::Nil => buf.push_str("nil"),
        ExprKind::Ident(name) => buf.push_str(interner.resolve(name)),
        ExprKind::Member { object, property } => {
            write_postfix_target(buf, arena, object, interner);
            buf.push('.');
            buf.push_str(interner.resolve(property));
        }
        ExprKind::Index { object, index } => {
            write_postfix_target(buf, arena, object, interner);
            buf.push('[');
            write_expr(buf, arena, index, interner);
            buf.push(']');
        }
        ExprKind::List(range) => {
            buf.push('[');
            for (i, &element) in arena.get_expr_list(range).iter().enumerate() {
                if i > 0 {
                    buf.push_str(", ");
                }
                write_expr(buf, arena, element, interner);
            }
            buf.push(']');
        }
        ExprKind::Unary { op, operand } => {
            buf.push_str(op.as_symbol());
            let needs_parens = matches!(
                arena.kind(operand),
                ExprKind::Binary { .. } | ExprKind::Conditional { .. }
            );
            if needs_parens {
                buf.push('(');
                write_expr(buf, arena, operand, interner);
                buf.push(')');
            } else {
                write_expr(buf, arena, operand, interner);
            }
        }
        ExprKind::Binary { op, left, right } => {
            write_binary_side(buf, arena, left, op, false, interner);
            let _ = write!(buf, " {} ", op.as_symbol());
            write_binary_side(buf, arena, right, op, true, interner);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            let cond_parens = matches!(arena.kind(cond), ExprKind::Conditional { .. });
            if cond_parens {
                buf.push('(');
                write_expr(buf, arena, cond, interner);
                buf.push(')');
            } else {
                write_expr(buf, arena, cond, interner);
            }
            buf.push_str(" ? ");
            write_expr(buf, arena, then, interner);
            buf.push_str(" : ");
            write_expr(buf, arena, otherwise, interner);
        }
        ExprKind::Call { func, args } => {
            write_postfix_target(buf, arena, func, interner);
            write_args(buf, arena, args, interner);
        }
        ExprKind::Builtin { name, args } => {
            buf.push_str(interner.resolve(name));
            write_args(buf, arena, args, interner);
        }
    }
}

/// Render one side of a binary expression, parenthesized when the child
/// would not re-parse into the same position, or is a conditional.
fn write_binary_side(
    buf: &mut String,
    arena: &ExprArena,
    side: ExprId,
    parent: crate::BinaryOp,
    right_side: bool,
    interner: &StringInterner,
) {
    let needs_parens = match arena.kind(side) {
        ExprKind::Binary { op, .. } => op.needs_parens_under(parent, right_side),
        ExprKind::Conditional { .. } => true,
        _ => false,
    };
    if needs_parens {
        buf.push('(');
        write_expr(buf, arena, side, interner);
        buf.push(')');
    } else {
        write_expr(buf, arena, side, interner);
    }
}

/// Render the target of a postfix operation (member, index, call),
/// parenthesized unless it is itself atomic or postfix.
fn write_postfix_target(
    buf: &mut String,
    arena: &ExprArena,
    target: ExprId,
    interner: &StringInterner,
) {
    let needs_parens = matches!(
        arena.kind(target),
        ExprKind::Binary { .. } | ExprKind::Conditional { .. } | ExprKind::Unary { .. }
    );
    if needs_parens {
        buf.push('(');
        write_expr(buf, arena, target, interner);
        buf.push(')');
    } else {
        write_expr(buf, arena, target, interner);
    }
}

fn write_args(
    buf: &mut String,
    arena: &ExprArena,
    args: crate::ExprRange,
    interner: &StringInterner,
) {
    buf.push('(');
    for (i, &arg) in arena.get_expr_list(args).iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        write_expr(buf, arena, arg, interner);
    }
    buf.push(')');
}
