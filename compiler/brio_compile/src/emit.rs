//! Bytecode emission.
//!
//! Walks the checked (and optionally folded) AST in program order and
//! produces a `brio_vm` [`Program`]. At each CSE-eligible node the reuse
//! resolver is consulted: an anchor site evaluates normally and then
//! persists its result (`StoreSlot`); a non-anchor reuse site skips
//! evaluation entirely and loads the stored value (`LoadSlot`).

use std::sync::Arc;

use brio_ir::{
    BinaryOp, ExprArena, ExprId, ExprKind, ExprRange, StringInterner, UnaryOp, Visitor,
};
use brio_vm::{Function, Op, Program, Value};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::cse::{is_eligible, CseRegistry, OccurrenceCounter, Reuse};
use crate::fold::fold;
use crate::{CompileError, Config};

/// Compile the checked AST rooted at `root` into an executable program.
///
/// Runs constant folding (if `config.optimize`), then the CSE counting
/// pre-pass (if `config.reuse_common_subexpr`), then emission. The two
/// traversals are never interleaved: slot assignment needs global
/// occurrence counts before any single site can be classified.
pub fn compile(
    arena: &mut ExprArena,
    root: ExprId,
    interner: &mut StringInterner,
    config: &Config,
) -> Result<Program, CompileError> {
    if config.optimize {
        fold(arena, root, interner, config);
    }

    let mut registry = if config.reuse_common_subexpr {
        let mut registry = CseRegistry::new();
        let mut counter = OccurrenceCounter::new(&mut registry, interner);
        counter.visit_expr(root, arena);
        Some(registry)
    } else {
        None
    };

    let mut emitter = Emitter {
        arena,
        interner,
        config,
        registry: registry.as_mut(),
        ops: Vec::new(),
        constants: Vec::new(),
        names: Vec::new(),
        name_index: FxHashMap::default(),
        functions: Vec::new(),
        function_index: FxHashMap::default(),
    };
    emitter.emit_expr(root)?;
    let Emitter {
        ops,
        constants,
        names,
        functions,
        ..
    } = emitter;

    let (slot_count, slot_exprs) = match registry {
        Some(registry) => (registry.slot_count(), registry.into_slot_exprs()),
        None => (0, Vec::new()),
    };
    debug!(
        ops = ops.len(),
        constants = constants.len(),
        slots = slot_count,
        "compiled program"
    );
    Ok(Program {
        ops,
        constants,
        names,
        functions,
        slot_count,
        slot_exprs,
    })
}

struct Emitter<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    config: &'a Config,
    registry: Option<&'a mut CseRegistry>,
    ops: Vec<Op>,
    constants: Vec<Value>,
    names: Vec<Arc<str>>,
    name_index: FxHashMap<String, u16>,
    functions: Vec<Arc<Function>>,
    function_index: FxHashMap<String, u16>,
}

impl Emitter<'_> {
    fn emit_expr(&mut self, id: ExprId) -> Result<(), CompileError> {
        let reuse = match self.registry.as_deref_mut() {
            Some(registry) if is_eligible(self.arena.kind(id)) => {
                registry.resolve(self.arena, id, self.interner)
            }
            _ => None,
        };

        if let Some(Reuse {
            slot,
            is_anchor: false,
        }) = reuse
        {
            // Reuse site: load the stored result, skipping evaluation.
            let slot = self.slot_operand(slot)?;
            self.ops.push(Op::LoadSlot(slot));
            return Ok(());
        }

        self.emit_node(id)?;

        if let Some(Reuse {
            slot,
            is_anchor: true,
        }) = reuse
        {
            // Anchor site: persist the just-computed result.
            let slot = self.slot_operand(slot)?;
            self.ops.push(Op::StoreSlot(slot));
        }
        Ok(())
    }

    fn emit_node(&mut self, id: ExprId) -> Result<(), CompileError> {
        let span = self.arena.span(id);
        match self.arena.kind(id) {
            ExprKind::Int(value) => self.emit_const(Value::Int(value)),
            ExprKind::Float(bits) => self.emit_const(Value::Float(f64::from_bits(bits))),
            ExprKind::Bool(value) => self.emit_const(Value::Bool(value)),
            ExprKind::Str(name) => {
                let value = Value::Str(Arc::from(self.interner.resolve(name)));
                self.emit_const(value)
            }
            ExprKind::Nil => self.emit_const(Value::Nil),
            ExprKind::Ident(name) => {
                let name = self.add_name(name)?;
                self.ops.push(Op::LoadVar(name));
                Ok(())
            }
            ExprKind::Member { object, property } => {
                self.emit_expr(object)?;
                let property = self.add_name(property)?;
                self.ops.push(Op::Member(property));
                Ok(())
            }
            ExprKind::Index { object, index } => {
                self.emit_expr(object)?;
                self.emit_expr(index)?;
                self.ops.push(Op::Index);
                Ok(())
            }
            ExprKind::List(elements) => {
                let count = self.emit_list(elements)?;
                self.ops.push(Op::MakeList(count));
                Ok(())
            }
            ExprKind::Unary { op, operand } => {
                self.emit_expr(operand)?;
                self.ops.push(match op {
                    UnaryOp::Neg => Op::Neg,
                    UnaryOp::Not => Op::Not,
                    UnaryOp::Plus => Op::AssertNumeric,
                });
                Ok(())
            }
            ExprKind::Binary { op, left, right } => self.emit_binary(op, left, right),
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                self.emit_expr(cond)?;
                let to_else = self.emit_jump(Op::JumpIfFalse(0));
                self.ops.push(Op::Pop);
                self.emit_expr(then)?;
                let to_end = self.emit_jump(Op::Jump(0));
                self.patch_jump(to_else)?;
                self.ops.push(Op::Pop);
                self.emit_expr(otherwise)?;
                self.patch_jump(to_end)?;
                Ok(())
            }
            ExprKind::Call { func, args } => {
                let ExprKind::Ident(name) = self.arena.kind(func) else {
                    return Err(CompileError::NotCallable { span });
                };
                let text = self.interner.resolve(name);
                let Some(function) = self.config.functions().get(text).map(Arc::clone) else {
                    return Err(CompileError::UnknownFunction {
                        name: text.to_string(),
                        span,
                    });
                };
                let func = self.add_function(text, function)?;
                let argc = self.emit_args(args)?;
                self.ops.push(Op::Call { func, argc });
                Ok(())
            }
            ExprKind::Builtin { name, args } => {
                let text = self.interner.resolve(name);
                let Some(function) = self.config.builtins().get(text).map(Arc::clone) else {
                    return Err(CompileError::UnknownBuiltin {
                        name: text.to_string(),
                        span,
                    });
                };
                let func = self.add_function(text, function)?;
                let argc = self.emit_args(args)?;
                self.ops.push(Op::Call { func, argc });
                Ok(())
            }
        }
    }

    /// Short-circuit operators compile to peek-style jumps; everything
    /// else evaluates both sides and applies the instruction.
    fn emit_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    ) -> Result<(), CompileError> {
        match op {
            BinaryOp::And => {
                self.emit_expr(left)?;
                let end = self.emit_jump(Op::JumpIfFalse(0));
                self.ops.push(Op::Pop);
                self.emit_expr(right)?;
                self.patch_jump(end)
            }
            BinaryOp::Or => {
                self.emit_expr(left)?;
                let end = self.emit_jump(Op::JumpIfTrue(0));
                self.ops.push(Op::Pop);
                self.emit_expr(right)?;
                self.patch_jump(end)
            }
            BinaryOp::Coalesce => {
                self.emit_expr(left)?;
                let end = self.emit_jump(Op::JumpIfNotNil(0));
                self.ops.push(Op::Pop);
                self.emit_expr(right)?;
                self.patch_jump(end)
            }
            _ => {
                self.emit_expr(left)?;
                self.emit_expr(right)?;
                self.ops.push(match op {
                    BinaryOp::Add => Op::Add,
                    BinaryOp::Sub => Op::Sub,
                    BinaryOp::Mul => Op::Mul,
                    BinaryOp::Div => Op::Div,
                    BinaryOp::Mod => Op::Mod,
                    BinaryOp::Pow => Op::Pow,
                    BinaryOp::Eq => Op::Eq,
                    BinaryOp::NotEq => Op::Ne,
                    BinaryOp::Lt => Op::Lt,
                    BinaryOp::LtEq => Op::Le,
                    BinaryOp::Gt => Op::Gt,
                    BinaryOp::GtEq => Op::Ge,
                    BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce => {
                        unreachable!("short-circuit operators are compiled to jumps")
                    }
                });
                Ok(())
            }
        }
    }

    fn emit_list(&mut self, range: ExprRange) -> Result<u16, CompileError> {
        let ids = self.arena.get_expr_list(range).to_vec();
        for id in &ids {
            self.emit_expr(*id)?;
        }
        u16::try_from(ids.len()).map_err(|_| CompileError::LimitExceeded {
            what: "list elements",
        })
    }

    fn emit_args(&mut self, range: ExprRange) -> Result<u8, CompileError> {
        let ids = self.arena.get_expr_list(range).to_vec();
        for id in &ids {
            self.emit_expr(*id)?;
        }
        u8::try_from(ids.len()).map_err(|_| CompileError::LimitExceeded { what: "arguments" })
    }

    fn emit_const(&mut self, value: Value) -> Result<(), CompileError> {
        let index = u16::try_from(self.constants.len())
            .map_err(|_| CompileError::LimitExceeded { what: "constants" })?;
        self.constants.push(value);
        self.ops.push(Op::PushConst(index));
        Ok(())
    }

    fn add_name(&mut self, name: brio_ir::Name) -> Result<u16, CompileError> {
        let text = self.interner.resolve(name);
        if let Some(&index) = self.name_index.get(text) {
            return Ok(index);
        }
        let index = u16::try_from(self.names.len())
            .map_err(|_| CompileError::LimitExceeded { what: "names" })?;
        self.names.push(Arc::from(text));
        self.name_index.insert(text.to_string(), index);
        Ok(index)
    }

    fn add_function(
        &mut self,
        name: &str,
        function: Arc<Function>,
    ) -> Result<u16, CompileError> {
        if let Some(&index) = self.function_index.get(name) {
            return Ok(index);
        }
        let index = u16::try_from(self.functions.len())
            .map_err(|_| CompileError::LimitExceeded { what: "functions" })?;
        self.functions.push(function);
        self.function_index.insert(name.to_string(), index);
        Ok(index)
    }

    fn slot_operand(&self, slot: u32) -> Result<u16, CompileError> {
        u16::try_from(slot).map_err(|_| CompileError::LimitExceeded { what: "reuse slots" })
    }

    /// Emit a jump with a placeholder target, returning its position.
    fn emit_jump(&mut self, op: Op) -> usize {
        let at = self.ops.len();
        self.ops.push(op);
        at
    }

    /// Point the jump at `at` to the next emitted instruction.
    fn patch_jump(&mut self, at: usize) -> Result<(), CompileError> {
        let target = u32::try_from(self.ops.len())
            .map_err(|_| CompileError::LimitExceeded { what: "instructions" })?;
        self.ops[at] = match self.ops[at] {
            Op::Jump(_) => Op::Jump(target),
            Op::JumpIfFalse(_) => Op::JumpIfFalse(target),
            Op::JumpIfTrue(_) => Op::JumpIfTrue(target),
            Op::JumpIfNotNil(_) => Op::JumpIfNotNil(target),
            other => other,
        };
        Ok(())
    }
}
