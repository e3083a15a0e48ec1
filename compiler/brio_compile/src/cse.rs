//! Common-subexpression elimination.
//!
//! Three pieces:
//! - [`canonical`]: maps semantically equivalent subtrees to identical
//!   textual identities regardless of surface syntax (operand order,
//!   operator spelling, sign folding).
//! - [`OccurrenceCounter`]: a pre-pass visitor that counts, per canonical
//!   identity, how often each eligible subexpression occurs in the whole
//!   program. Counting only aggregates; it never assigns anything.
//! - [`CseRegistry::resolve`]: consulted during emission, in program
//!   order. Assigns dense reuse slots to identities that occur more than
//!   once and classifies each site as the anchor (compute and store) or a
//!   reuse site (load).
//!
//! Eligible nodes are binary operations outside the short-circuit set
//! (`??`, `and`, `or`) plus call and builtin invocations. Short-circuit
//! operators are excluded because merging them would evaluate their right
//! operand unconditionally.
//!
//! The registry is keyed by a SHA-256 digest of the canonical identity
//! rather than by tree comparison; identities are stored only in the slot
//! table, for diagnostics. Treating digest equality as identity is a
//! documented trust assumption, with the hash width chosen to make the
//! collision risk negligible.

use brio_ir::{
    unparse, walk_expr, BinaryOp, ExprArena, ExprId, ExprKind, Span, StringInterner, UnaryOp,
    Visitor,
};
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use tracing::trace;

/// Fixed-width digest of a canonical identity.
type ContentKey = [u8; 32];

/// Per-identity bookkeeping.
///
/// `count` is fixed once the counting pass completes; resolution reads it
/// but only ever writes `slot` and `anchor`.
#[derive(Debug)]
struct ExprRecord {
    /// Occurrences across the whole program; monotonically incremented.
    count: u32,
    /// Assigned reuse slot, once the resolver first meets this identity.
    slot: Option<u32>,
    /// Source span of the designated compute-and-store site.
    anchor: Span,
}

/// Decision for one eligible site during emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reuse {
    /// Reuse slot holding the shared result.
    pub slot: u32,
    /// True at exactly one site per identity: the one that computes and
    /// stores. Every other site loads.
    pub is_anchor: bool,
}

/// Registry of repeated subexpressions, owned by one compilation.
#[derive(Debug, Default)]
pub struct CseRegistry {
    records: FxHashMap<ContentKey, ExprRecord>,
    /// Slot id → canonical identity, in assignment order.
    slots: Vec<String>,
}

impl CseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `id`'s canonical identity.
    fn count_occurrence(&mut self, arena: &ExprArena, id: ExprId, interner: &StringInterner) {
        let identity = canonical(arena, id, interner);
        if identity.is_empty() {
            return;
        }
        let key = content_key(&identity);
        self.records
            .entry(key)
            .and_modify(|record| record.count += 1)
            .or_insert_with(|| ExprRecord {
                count: 1,
                slot: None,
                anchor: arena.span(id),
            });
    }

    /// Classify an eligible site during emission.
    ///
    /// Returns `None` for identities that occur at most once (no benefit
    /// in caching a one-off computation). Otherwise assigns the next
    /// sequential slot on the first visit, making that site the anchor,
    /// and reports whether this site is the anchor by exact positional
    /// identity.
    pub fn resolve(
        &mut self,
        arena: &ExprArena,
        id: ExprId,
        interner: &StringInterner,
    ) -> Option<Reuse> {
        let identity = canonical(arena, id, interner);
        if identity.is_empty() {
            return None;
        }
        let key = content_key(&identity);
        let record = self.records.get_mut(&key)?;
        if record.count <= 1 {
            return None;
        }
        let slot = match record.slot {
            Some(slot) => slot,
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(identity);
                record.slot = Some(slot);
                record.anchor = arena.span(id);
                trace!(slot, identity = %self.slots[slot as usize], "assigned reuse slot");
                slot
            }
        };
        Some(Reuse {
            slot,
            is_anchor: arena.span(id) == record.anchor,
        })
    }

    /// Occurrence count recorded for a canonical identity, if any.
    pub fn occurrence_count(&self, identity: &str) -> Option<u32> {
        self.records
            .get(&content_key(identity))
            .map(|record| record.count)
    }

    /// Number of assigned reuse slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot table: slot id → canonical identity. Diagnostics only.
    pub fn slot_exprs(&self) -> &[String] {
        &self.slots
    }

    /// Consume the registry, keeping the slot table.
    pub fn into_slot_exprs(self) -> Vec<String> {
        self.slots
    }
}

/// Eligibility for counting and resolution.
///
/// Binary nodes are eligible unless short-circuiting; call and builtin
/// invocations are eligible under the configuration's determinism
/// assumption. Everything else is left alone (though its descendants are
/// still visited and may themselves be eligible).
pub(crate) fn is_eligible(kind: ExprKind) -> bool {
    match kind {
        ExprKind::Binary { op, .. } => !op.is_short_circuit(),
        ExprKind::Call { .. } | ExprKind::Builtin { .. } => true,
        _ => false,
    }
}

/// The counting pre-pass: visits every node exactly once, in pre-order,
/// and counts the eligible ones. Reuse decisions do not depend on the
/// traversal order because counting only aggregates.
pub struct OccurrenceCounter<'a> {
    registry: &'a mut CseRegistry,
    interner: &'a StringInterner,
}

impl<'a> OccurrenceCounter<'a> {
    pub fn new(registry: &'a mut CseRegistry, interner: &'a StringInterner) -> Self {
        OccurrenceCounter { registry, interner }
    }
}

impl Visitor for OccurrenceCounter<'_> {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        if is_eligible(arena.kind(id)) {
            self.registry.count_occurrence(arena, id, self.interner);
        }
        walk_expr(self, id, arena);
    }
}

/// Canonical identity of the subtree rooted at `id`.
///
/// Two subtrees are interchangeable for reuse purposes iff their
/// canonical identities are byte-equal:
/// - unary `+` leaves no textual trace;
/// - symmetric operators order their operands lexicographically, so
///   `a + b` and `b + a` render identically;
/// - `>` and `>=` are re-expressed through `<` and `<=` with swapped
///   operands, so `a > b` and `b < a` render identically;
/// - spelling aliases render canonically (`and`, `or`, `**`).
///
/// Other node kinds render in their natural unparsed form.
pub fn canonical(arena: &ExprArena, id: ExprId, interner: &StringInterner) -> String {
    match arena.kind(id) {
        ExprKind::Unary { op, operand } => {
            let mut buf = String::new();
            match op {
                UnaryOp::Plus => {}
                UnaryOp::Neg => buf.push('-'),
                UnaryOp::Not => buf.push_str("not "),
            }
            let inner = canonical(arena, operand, interner);
            if matches!(
                arena.kind(operand),
                ExprKind::Binary { .. } | ExprKind::Conditional { .. }
            ) {
                buf.push('(');
                buf.push_str(&inner);
                buf.push(')');
            } else {
                buf.push_str(&inner);
            }
            buf
        }
        ExprKind::Binary { op, left, right } => {
            let mut ls = canonical(arena, left, interner);
            let mut rs = canonical(arena, right, interner);
            let mut lw = match arena.kind(left) {
                ExprKind::Binary { op: lop, .. } => {
                    lop.needs_parens_under(op, false)
                        || lop == BinaryOp::Coalesce
                        || (lop.is_boolean() && lop != op)
                }
                ExprKind::Conditional { .. } => true,
                _ => false,
            };
            let mut rw = match arena.kind(right) {
                ExprKind::Binary { op: rop, .. } => {
                    rop.needs_parens_under(op, true) || (rop.is_boolean() && rop != op)
                }
                ExprKind::Conditional { .. } => true,
                _ => false,
            };
            let symbol = match op {
                // Symmetric or flip-convertible: pick a canonical operand
                // order. `>` and `>=` always swap (re-expressed through
                // `<`/`<=`); the rest swap when the right rendering is
                // lexicographically <= the left.
                BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Add
                | BinaryOp::Mul
                | BinaryOp::GtEq
                | BinaryOp::Gt => {
                    if matches!(op, BinaryOp::GtEq | BinaryOp::Gt) || rs <= ls {
                        std::mem::swap(&mut ls, &mut rs);
                        std::mem::swap(&mut lw, &mut rw);
                    }
                    match op {
                        BinaryOp::And => "and",
                        BinaryOp::Or => "or",
                        BinaryOp::GtEq => "<=",
                        BinaryOp::Gt => "<",
                        other => other.as_symbol(),
                    }
                }
                BinaryOp::Pow => "**",
                other => other.as_symbol(),
            };

            let mut buf = String::with_capacity(ls.len() + rs.len() + symbol.len() + 6);
            if lw {
                buf.push('(');
                buf.push_str(&ls);
                buf.push(')');
            } else {
                buf.push_str(&ls);
            }
            buf.push(' ');
            buf.push_str(symbol);
            buf.push(' ');
            if rw {
                buf.push('(');
                buf.push_str(&rs);
                buf.push(')');
            } else {
                buf.push_str(&rs);
            }
            buf
        }
        _ => unparse(arena, id, interner),
    }
}

fn content_key(identity: &str) -> ContentKey {
    Sha256::digest(identity.as_bytes()).into()
}

#[cfg(test)]
mod tests;
