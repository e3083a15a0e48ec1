//! Constant folding.
//!
//! Post-order arena rewrite, run before the CSE passes when
//! `Config::optimize` is set. Folds:
//! - pure-literal unary and binary operators (delegating to the VM's
//!   value operations, so folded and evaluated results agree exactly),
//! - short-circuit operators with a literal left operand, and
//!   conditionals with a literal condition (dead-branch elimination),
//! - builtin invocations with all-literal arguments (builtins are pure),
//! - calls to `const_expr`-registered functions with all-literal
//!   arguments.
//!
//! Folding is best-effort: any evaluation failure (overflow, division by
//! zero, a const fn reporting an error) leaves the node unfolded so the
//! failure surfaces at runtime, exactly where it would have without the
//! optimizer. Folding itself never fails a compilation.

use std::cmp::Ordering;

use brio_ir::{BinaryOp, ExprArena, ExprId, ExprKind, StringInterner, UnaryOp};
use brio_vm::{ops, Value};

use crate::Config;

/// Fold the subtree rooted at `root` in place.
pub(crate) fn fold(
    arena: &mut ExprArena,
    root: ExprId,
    interner: &mut StringInterner,
    config: &Config,
) {
    fold_expr(arena, root, interner, config);
}

fn fold_expr(arena: &mut ExprArena, id: ExprId, interner: &mut StringInterner, config: &Config) {
    // Children first.
    match arena.kind(id) {
        ExprKind::Member { object, .. } => fold_expr(arena, object, interner, config),
        ExprKind::Index { object, index } => {
            fold_expr(arena, object, interner, config);
            fold_expr(arena, index, interner, config);
        }
        ExprKind::List(range) => {
            for element in arena.get_expr_list(range).to_vec() {
                fold_expr(arena, element, interner, config);
            }
        }
        ExprKind::Unary { operand, .. } => fold_expr(arena, operand, interner, config),
        ExprKind::Binary { left, right, .. } => {
            fold_expr(arena, left, interner, config);
            fold_expr(arena, right, interner, config);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            fold_expr(arena, cond, interner, config);
            fold_expr(arena, then, interner, config);
            fold_expr(arena, otherwise, interner, config);
        }
        ExprKind::Call { args, .. } | ExprKind::Builtin { args, .. } => {
            for arg in arena.get_expr_list(args).to_vec() {
                fold_expr(arena, arg, interner, config);
            }
        }
        _ => return,
    }

    if let Some(kind) = try_fold(arena, id, interner, config) {
        arena.get_expr_mut(id).kind = kind;
    }
}

/// Compute the folded replacement kind for `id`, if any.
fn try_fold(
    arena: &ExprArena,
    id: ExprId,
    interner: &mut StringInterner,
    config: &Config,
) -> Option<ExprKind> {
    match arena.kind(id) {
        ExprKind::Unary { op, operand } => {
            let value = literal_value(arena, operand, interner)?;
            let folded = match op {
                UnaryOp::Neg => ops::neg(&value),
                UnaryOp::Not => ops::not(&value),
                UnaryOp::Plus => ops::plus(&value),
            };
            value_kind(&folded.ok()?, interner)
        }
        ExprKind::Binary { op, left, right } => match op {
            // Short-circuit operators fold on a literal left operand
            // alone; the skipped side would not have been evaluated.
            BinaryOp::And => match arena.kind(left) {
                ExprKind::Bool(false) => Some(ExprKind::Bool(false)),
                ExprKind::Bool(true) => Some(arena.kind(right)),
                _ => None,
            },
            BinaryOp::Or => match arena.kind(left) {
                ExprKind::Bool(true) => Some(ExprKind::Bool(true)),
                ExprKind::Bool(false) => Some(arena.kind(right)),
                _ => None,
            },
            BinaryOp::Coalesce => match arena.kind(left) {
                ExprKind::Nil => Some(arena.kind(right)),
                ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::Bool(_)
                | ExprKind::Str(_) => Some(arena.kind(left)),
                _ => None,
            },
            _ => {
                let lv = literal_value(arena, left, interner)?;
                let rv = literal_value(arena, right, interner)?;
                let folded = eval_binary(op, &lv, &rv)?;
                value_kind(&folded, interner)
            }
        },
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => match arena.kind(cond) {
            ExprKind::Bool(true) => Some(arena.kind(then)),
            ExprKind::Bool(false) => Some(arena.kind(otherwise)),
            _ => None,
        },
        ExprKind::Call { func, args } => {
            let ExprKind::Ident(name) = arena.kind(func) else {
                return None;
            };
            let text = interner.resolve(name);
            if !config.is_const_fn(text) {
                return None;
            }
            let function = config.functions().get(text)?.clone();
            let arg_values = literal_args(arena, args, interner)?;
            value_kind(&function.call(&arg_values).ok()?, interner)
        }
        ExprKind::Builtin { name, args } => {
            let function = config.builtins().get(interner.resolve(name))?.clone();
            let arg_values = literal_args(arena, args, interner)?;
            value_kind(&function.call(&arg_values).ok()?, interner)
        }
        _ => None,
    }
}

fn eval_binary(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    let value = match op {
        BinaryOp::Add => ops::add(left, right).ok()?,
        BinaryOp::Sub => ops::sub(left, right).ok()?,
        BinaryOp::Mul => ops::mul(left, right).ok()?,
        BinaryOp::Div => ops::div(left, right).ok()?,
        BinaryOp::Mod => ops::rem(left, right).ok()?,
        BinaryOp::Pow => ops::pow(left, right).ok()?,
        BinaryOp::Eq => Value::Bool(left.loose_eq(right)),
        BinaryOp::NotEq => Value::Bool(!left.loose_eq(right)),
        BinaryOp::Lt => compare(op, left, right, |o| o == Ordering::Less)?,
        BinaryOp::LtEq => compare(op, left, right, |o| o != Ordering::Greater)?,
        BinaryOp::Gt => compare(op, left, right, |o| o == Ordering::Greater)?,
        BinaryOp::GtEq => compare(op, left, right, |o| o != Ordering::Less)?,
        BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce => return None,
    };
    Some(value)
}

fn compare(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    accept: impl Fn(Ordering) -> bool,
) -> Option<Value> {
    ops::compare(op.as_symbol(), left, right)
        .ok()
        .map(|ordering| Value::Bool(accept(ordering)))
}

/// Literal value of a node, if it is a literal.
fn literal_value(arena: &ExprArena, id: ExprId, interner: &StringInterner) -> Option<Value> {
    match arena.kind(id) {
        ExprKind::Int(n) => Some(Value::Int(n)),
        ExprKind::Float(bits) => Some(Value::Float(f64::from_bits(bits))),
        ExprKind::Bool(b) => Some(Value::Bool(b)),
        ExprKind::Str(name) => Some(Value::from(interner.resolve(name))),
        ExprKind::Nil => Some(Value::Nil),
        _ => None,
    }
}

fn literal_args(
    arena: &ExprArena,
    args: brio_ir::ExprRange,
    interner: &StringInterner,
) -> Option<Vec<Value>> {
    arena
        .get_expr_list(args)
        .iter()
        .map(|&arg| literal_value(arena, arg, interner))
        .collect()
}

/// Literal node kind representing a folded value, when one exists.
fn value_kind(value: &Value, interner: &mut StringInterner) -> Option<ExprKind> {
    match value {
        Value::Int(n) => Some(ExprKind::Int(*n)),
        Value::Float(x) => Some(ExprKind::Float(x.to_bits())),
        Value::Bool(b) => Some(ExprKind::Bool(*b)),
        Value::Str(s) => Some(ExprKind::Str(interner.intern(s))),
        Value::Nil => Some(ExprKind::Nil),
        // Lists and maps have no literal node form worth synthesizing.
        Value::List(_) | Value::Map(_) => None,
    }
}

#[cfg(test)]
mod tests;
