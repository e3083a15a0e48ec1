//! Static checking pass.
//!
//! One post-parse walk that:
//! - resolves identifiers against the environment descriptor (strict mode
//!   turns unknown identifiers into errors),
//! - resolves calls: user functions take priority, then environment
//!   members (which shadow builtins but are not callable), then builtins;
//!   calls reaching an available builtin are rewritten into `Builtin`
//!   nodes, disabled builtins are rejected,
//! - checks operator/operand compatibility wherever types are known,
//! - checks the inferred result type against the expected one.

use brio_ir::{BinaryOp, ExprArena, ExprId, ExprKind, ExprRange, Span, StringInterner, UnaryOp};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{CheckError, EnvDescriptor, Type};

/// Arity and result type of a registered callee.
#[derive(Copy, Clone, Debug)]
pub struct CalleeInfo {
    /// Fixed argument count, or `None` for variadic callees.
    pub arity: Option<usize>,
    /// Result type; `Type::Any` when unknown.
    pub result: Type,
}

/// Read-only view of the configuration the checker needs.
pub struct CheckOptions<'a> {
    pub env: Option<&'a EnvDescriptor>,
    pub strict: bool,
    pub expect: Option<Type>,
    pub disabled: &'a FxHashSet<String>,
    /// User-registered functions, name → callee info.
    pub functions: &'a FxHashMap<String, CalleeInfo>,
    /// Builtin table, name → callee info.
    pub builtins: &'a FxHashMap<String, CalleeInfo>,
}

/// Check the program rooted at `root`, returning its inferred type.
///
/// Mutates the arena only to rewrite builtin-resolving `Call` nodes into
/// `Builtin` nodes.
pub fn check(
    arena: &mut ExprArena,
    root: ExprId,
    interner: &StringInterner,
    opts: &CheckOptions<'_>,
) -> Result<Type, CheckError> {
    let mut checker = Checker {
        arena,
        interner,
        opts,
    };
    let inferred = checker.infer(root)?;
    if let Some(expected) = opts.expect {
        if inferred != Type::Any && expected != Type::Any && inferred != expected {
            return Err(CheckError::ExpectedType {
                expected,
                found: inferred,
                span: checker.arena.span(root),
            });
        }
    }
    Ok(inferred)
}

struct Checker<'a> {
    arena: &'a mut ExprArena,
    interner: &'a StringInterner,
    opts: &'a CheckOptions<'a>,
}

impl Checker<'_> {
    fn infer(&mut self, id: ExprId) -> Result<Type, CheckError> {
        let span = self.arena.span(id);
        match self.arena.kind(id) {
            ExprKind::Int(_) => Ok(Type::Int),
            ExprKind::Float(_) => Ok(Type::Float),
            ExprKind::Bool(_) => Ok(Type::Bool),
            ExprKind::Str(_) => Ok(Type::Str),
            ExprKind::Nil => Ok(Type::Nil),
            ExprKind::Ident(name) => {
                let text = self.interner.resolve(name);
                match self.opts.env {
                    Some(env) => match env.get(text) {
                        Some(ty) => Ok(ty),
                        None if self.opts.strict => Err(CheckError::UnknownIdentifier {
                            name: text.to_string(),
                            span,
                        }),
                        None => Ok(Type::Any),
                    },
                    None => Ok(Type::Any),
                }
            }
            ExprKind::Member { object, .. } => {
                let object_ty = self.infer(object)?;
                match object_ty {
                    Type::Map | Type::Any => Ok(Type::Any),
                    found => Err(CheckError::InvalidMemberAccess { found, span }),
                }
            }
            ExprKind::Index { object, index } => {
                let object_ty = self.infer(object)?;
                let index_ty = self.infer(index)?;
                let valid_index = match object_ty {
                    Type::List => matches!(index_ty, Type::Int | Type::Any),
                    Type::Map => matches!(index_ty, Type::Str | Type::Any),
                    Type::Any => true,
                    found => return Err(CheckError::CannotIndex { found, span }),
                };
                if valid_index {
                    Ok(Type::Any)
                } else {
                    Err(CheckError::InvalidIndexType {
                        target: object_ty,
                        index: index_ty,
                        span,
                    })
                }
            }
            ExprKind::List(range) => {
                self.infer_all(range)?;
                Ok(Type::List)
            }
            ExprKind::Unary { op, operand } => {
                let ty = self.infer(operand)?;
                match op {
                    UnaryOp::Plus | UnaryOp::Neg => {
                        if ty.is_numeric() {
                            Ok(ty)
                        } else {
                            Err(CheckError::InvalidUnaryOperand {
                                op: op.as_symbol(),
                                found: ty,
                                span,
                            })
                        }
                    }
                    UnaryOp::Not => match ty {
                        Type::Bool | Type::Any => Ok(Type::Bool),
                        found => Err(CheckError::InvalidUnaryOperand {
                            op: op.as_symbol(),
                            found,
                            span,
                        }),
                    },
                }
            }
            ExprKind::Binary { op, left, right } => {
                let lt = self.infer(left)?;
                let rt = self.infer(right)?;
                binary_result(op, lt, rt, span)
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                let cond_ty = self.infer(cond)?;
                if !matches!(cond_ty, Type::Bool | Type::Any) {
                    return Err(CheckError::NonBoolCondition {
                        found: cond_ty,
                        span: self.arena.span(cond),
                    });
                }
                let then_ty = self.infer(then)?;
                let otherwise_ty = self.infer(otherwise)?;
                if then_ty == otherwise_ty {
                    Ok(then_ty)
                } else {
                    Ok(Type::Any)
                }
            }
            ExprKind::Call { func, args } => self.infer_call(id, func, args, span),
            ExprKind::Builtin { name, args } => {
                let text = self.interner.resolve(name).to_string();
                self.infer_builtin(&text, args, span)
            }
        }
    }

    fn infer_all(&mut self, range: ExprRange) -> Result<Vec<Type>, CheckError> {
        // Collect the ids first: the arena cannot be borrowed across infer.
        let ids: Vec<ExprId> = self.arena.get_expr_list(range).to_vec();
        ids.into_iter().map(|id| self.infer(id)).collect()
    }

    fn infer_call(
        &mut self,
        id: ExprId,
        func: ExprId,
        args: ExprRange,
        span: Span,
    ) -> Result<Type, CheckError> {
        let ExprKind::Ident(name) = self.arena.kind(func) else {
            return Err(CheckError::NotCallable { span });
        };
        let text = self.interner.resolve(name).to_string();

        if let Some(info) = self.opts.functions.get(&text) {
            let info = *info;
            let arg_types = self.infer_all(args)?;
            check_arity(&text, info.arity, arg_types.len(), span)?;
            return Ok(info.result);
        }

        // An environment member shadows a builtin of the same name, but
        // members are plain values and cannot be called.
        if self.opts.env.is_some_and(|env| env.has(&text)) {
            return Err(CheckError::NotCallable { span });
        }

        if self.opts.builtins.contains_key(&text) {
            if self.opts.disabled.contains(&text) {
                return Err(CheckError::DisabledBuiltin { name: text, span });
            }
            // Resolved: rewrite into a builtin invocation node.
            self.arena.get_expr_mut(id).kind = ExprKind::Builtin { name, args };
            return self.infer_builtin(&text, args, span);
        }

        Err(CheckError::UnknownFunction { name: text, span })
    }

    fn infer_builtin(
        &mut self,
        name: &str,
        args: ExprRange,
        span: Span,
    ) -> Result<Type, CheckError> {
        let Some(info) = self.opts.builtins.get(name).copied() else {
            return Err(CheckError::UnknownFunction {
                name: name.to_string(),
                span,
            });
        };
        if self.opts.disabled.contains(name) {
            return Err(CheckError::DisabledBuiltin {
                name: name.to_string(),
                span,
            });
        }
        let arg_types = self.infer_all(args)?;
        check_arity(name, info.arity, arg_types.len(), span)?;
        check_builtin_args(name, &arg_types, span)?;
        Ok(info.result)
    }
}

fn check_arity(
    name: &str,
    arity: Option<usize>,
    found: usize,
    span: Span,
) -> Result<(), CheckError> {
    match arity {
        Some(expected) if expected != found => Err(CheckError::ArityMismatch {
            name: name.to_string(),
            expected,
            found,
            span,
        }),
        _ => Ok(()),
    }
}

/// Argument compatibility for builtins whose domain is known statically.
fn check_builtin_args(name: &str, arg_types: &[Type], span: Span) -> Result<(), CheckError> {
    let reject = |found: Type| {
        Err(CheckError::InvalidArgument {
            name: name.to_string(),
            found,
            span,
        })
    };
    match name {
        "len" | "contains" => match arg_types[0] {
            Type::Str | Type::List | Type::Map | Type::Any => Ok(()),
            found => reject(found),
        },
        "abs" => {
            if arg_types[0].is_numeric() {
                Ok(())
            } else {
                reject(arg_types[0])
            }
        }
        "upper" | "lower" => match arg_types[0] {
            Type::Str | Type::Any => Ok(()),
            found => reject(found),
        },
        "int" | "float" => match arg_types[0] {
            Type::Int | Type::Float | Type::Str | Type::Any => Ok(()),
            found => reject(found),
        },
        "min" | "max" => {
            for &ty in arg_types {
                if !matches!(ty, Type::Int | Type::Float | Type::Str | Type::Any) {
                    return reject(ty);
                }
            }
            Ok(())
        }
        // Unconstrained (`string`) or externally registered.
        _ => Ok(()),
    }
}

/// Result type of a binary operation, or an operand error.
fn binary_result(op: BinaryOp, lt: Type, rt: Type, span: Span) -> Result<Type, CheckError> {
    let mismatch = || {
        Err(CheckError::InvalidBinaryOperands {
            op: op.as_symbol(),
            left: lt,
            right: rt,
            span,
        })
    };
    match op {
        BinaryOp::Add => match (lt, rt) {
            (Type::Int, Type::Int) => Ok(Type::Int),
            (Type::Str, Type::Str) => Ok(Type::Str),
            (Type::Any, _) | (_, Type::Any) => Ok(Type::Any),
            _ if lt.is_numeric() && rt.is_numeric() => Ok(Type::Float),
            _ => mismatch(),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            match (lt, rt) {
                (Type::Int, Type::Int) => Ok(Type::Int),
                (Type::Any, _) | (_, Type::Any) => Ok(Type::Any),
                _ if lt.is_numeric() && rt.is_numeric() => Ok(Type::Float),
                _ => mismatch(),
            }
        }
        BinaryOp::Pow => {
            if lt.is_numeric() && rt.is_numeric() {
                Ok(Type::Float)
            } else {
                mismatch()
            }
        }
        BinaryOp::Eq | BinaryOp::NotEq => Ok(Type::Bool),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let comparable = (lt.is_numeric() && rt.is_numeric())
                || matches!((lt, rt), (Type::Str, Type::Str))
                || lt == Type::Any
                || rt == Type::Any;
            if comparable {
                Ok(Type::Bool)
            } else {
                mismatch()
            }
        }
        BinaryOp::And | BinaryOp::Or => match (lt, rt) {
            (Type::Bool | Type::Any, Type::Bool | Type::Any) => Ok(Type::Bool),
            _ => mismatch(),
        },
        BinaryOp::Coalesce => match (lt, rt) {
            (Type::Nil, _) => Ok(rt),
            _ if lt == rt => Ok(lt),
            _ => Ok(Type::Any),
        },
    }
}
