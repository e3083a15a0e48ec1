use brio_ir::Visitor as _;
use brio_parse::parse;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn canonical_of(source: &str) -> String {
    let parsed = match parse(source) {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    };
    canonical(&parsed.arena, parsed.root, &parsed.interner)
}

/// Run the counting pre-pass over a whole program.
fn counted(source: &str) -> (brio_parse::Parsed, CseRegistry) {
    let parsed = match parse(source) {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    };
    let mut registry = CseRegistry::new();
    let mut counter = OccurrenceCounter::new(&mut registry, &parsed.interner);
    counter.visit_expr(parsed.root, &parsed.arena);
    (parsed, registry)
}

// ===== Canonicalization =====

#[test]
fn commutative_operators_order_operands() {
    for (a, b) in [
        ("a + b", "b + a"),
        ("a * b", "b * a"),
        ("a == b", "b == a"),
        ("a != b", "b != a"),
        ("a and b", "b and a"),
        ("a or b", "b or a"),
        ("a && b", "b && a"),
        ("a || b", "b || a"),
    ] {
        assert_eq!(canonical_of(a), canonical_of(b), "{a} vs {b}");
    }
}

#[test]
fn relational_flips() {
    assert_eq!(canonical_of("a > b"), canonical_of("b < a"));
    assert_eq!(canonical_of("a >= b"), canonical_of("b <= a"));
    assert_eq!(canonical_of("a > b"), "b < a");
    assert_eq!(canonical_of("a >= b"), "b <= a");
}

#[test]
fn operator_aliases_unify() {
    assert_eq!(canonical_of("a && b"), canonical_of("a and b"));
    assert_eq!(canonical_of("a || b"), canonical_of("a or b"));
    assert_eq!(canonical_of("a ^ b"), canonical_of("a ** b"));
    assert_eq!(canonical_of("a && b"), "a and b");
    assert_eq!(canonical_of("a ** b"), "a ** b");
}

#[test]
fn unary_plus_leaves_no_trace() {
    assert_eq!(canonical_of("+x"), "x");
    assert_eq!(canonical_of("x + +y"), canonical_of("x + y"));
}

#[test]
fn unary_rendering() {
    assert_eq!(canonical_of("-x"), "-x");
    assert_eq!(canonical_of("-(a + b)"), "-(a + b)");
    assert_eq!(canonical_of("!x"), "not x");
    assert_eq!(canonical_of("not (a and b)"), "not (a and b)");
}

#[test]
fn parenthesization_follows_binding() {
    // A weaker-binding child keeps its parens.
    assert_eq!(canonical_of("(a + b) * c"), "(a + b) * c");
    // A tighter-binding child drops them.
    assert_eq!(canonical_of("(a * b) + c"), "a * b + c");
}

#[test]
fn boolean_mixing_keeps_parens() {
    // A boolean child under a different boolean parent stays grouped.
    assert_eq!(canonical_of("(a or b) and c"), "(a or b) and c");
}

#[test]
fn operand_order_normalizes_lexicographically() {
    // Both orders render with the lexicographically smaller side first.
    assert_eq!(canonical_of("b + a"), "a + b");
    assert_eq!(canonical_of("a + b"), "a + b");
    assert_eq!(canonical_of("z * (a + b)"), "(a + b) * z");
}

#[test]
fn sign_and_order_insensitivity_compose() {
    // Operand order and operator spelling both normalize away.
    assert_eq!(canonical_of("b * a + +c"), canonical_of("c + a * b"));
}

#[test]
fn distinct_expressions_stay_distinct() {
    assert_ne!(canonical_of("a + b"), canonical_of("a - b"));
    assert_ne!(canonical_of("a < b"), canonical_of("a <= b"));
    assert_ne!(canonical_of("f(a)"), canonical_of("f(b)"));
    assert_ne!(canonical_of("1"), canonical_of("1.0"));
}

#[test]
fn non_associative_groupings_stay_distinct() {
    // Merging these would change program results.
    assert_ne!(canonical_of("a - (b - c)"), canonical_of("(a - b) - c"));
    assert_ne!(canonical_of("a / (b * c)"), canonical_of("a / b * c"));
    assert_ne!(canonical_of("(x ** y) ** z"), canonical_of("x ** y ** z"));
}

#[test]
fn default_case_renders_naturally() {
    // Call arguments render in their written order: the canonicalizer
    // does not recurse canonically into non-operator nodes.
    assert_ne!(canonical_of("f(a + b)"), canonical_of("f(b + a)"));
    assert_eq!(canonical_of("f(x, y)"), "f(x, y)");
    assert_eq!(canonical_of("user.age"), "user.age");
}

proptest! {
    /// Commutativity holds for arbitrary operand identifiers.
    #[test]
    fn commutativity_over_identifiers(
        a in "[a-z]{1,6}",
        b in "[a-z]{1,6}",
        op in prop::sample::select(vec!["+", "*", "==", "!=", "&&", "||"]),
    ) {
        // Keyword collisions would change the parse, not the property.
        prop_assume!(!["and", "or", "not", "nil", "true", "false"]
            .contains(&a.as_str()));
        prop_assume!(!["and", "or", "not", "nil", "true", "false"]
            .contains(&b.as_str()));
        let forward = canonical_of(&format!("{a} {op} {b}"));
        let reversed = canonical_of(&format!("{b} {op} {a}"));
        prop_assert_eq!(forward, reversed);
    }
}

// ===== Occurrence counting =====

#[test]
fn counts_repeated_eligible_expressions() {
    let (_, registry) = counted("a + b == b + a");
    assert_eq!(registry.occurrence_count("a + b"), Some(2));
}

#[test]
fn short_circuit_operators_never_counted() {
    let (_, registry) = counted("(x && y) + (x && y)");
    // The inner `&&` nodes never enter the registry; the enclosing `+`
    // is the only counted node.
    assert_eq!(registry.occurrence_count("x and y"), None);
    assert_eq!(
        registry.occurrence_count("(x and y) + (x and y)"),
        Some(1)
    );
    let (_, registry) = counted("a ?? b");
    assert_eq!(registry.occurrence_count("a ?? b"), None);
}

#[test]
fn calls_and_builtins_are_counted() {
    let (_, registry) = counted("f(x) + f(x)");
    assert_eq!(registry.occurrence_count("f(x)"), Some(2));
    let (_, registry) = counted("len(s) * len(s)");
    assert_eq!(registry.occurrence_count("len(s)"), Some(2));
}

#[test]
fn leaves_are_not_counted() {
    let (_, registry) = counted("x + x");
    assert_eq!(registry.occurrence_count("x"), None);
    assert_eq!(registry.occurrence_count("x + x"), Some(1));
}

#[test]
fn semantically_equal_sites_share_one_record() {
    // `a > b` and `b < a` canonicalize identically: one record, count 2.
    let (_, registry) = counted("a > b || b < a");
    assert_eq!(registry.occurrence_count("b < a"), Some(2));
    // The top-level `||` is never in the registry.
    assert_eq!(registry.occurrence_count("b < a or b < a"), None);
}

#[test]
fn counting_assigns_no_slots() {
    let (_, registry) = counted("f(x) + f(x)");
    assert_eq!(registry.slot_count(), 0);
}

// ===== Reuse resolution =====

#[test]
fn single_occurrence_is_never_rewritten() {
    let (parsed, mut registry) = counted("f(x) + g(x)");
    let brio_ir::ExprKind::Binary { left, right, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected binary root");
    };
    assert_eq!(
        registry.resolve(&parsed.arena, left, &parsed.interner),
        None
    );
    assert_eq!(
        registry.resolve(&parsed.arena, right, &parsed.interner),
        None
    );
    assert_eq!(registry.slot_count(), 0);
}

#[test]
fn first_resolved_site_is_the_anchor() {
    let (parsed, mut registry) = counted("f(x) + f(x)");
    let brio_ir::ExprKind::Binary { left, right, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected binary root");
    };
    assert_eq!(
        registry.resolve(&parsed.arena, left, &parsed.interner),
        Some(Reuse {
            slot: 0,
            is_anchor: true,
        })
    );
    assert_eq!(
        registry.resolve(&parsed.arena, right, &parsed.interner),
        Some(Reuse {
            slot: 0,
            is_anchor: false,
        })
    );
    assert_eq!(registry.slot_count(), 1);
    assert_eq!(registry.slot_exprs(), ["f(x)"]);
}

#[test]
fn anchor_is_stable_across_repeated_resolution() {
    // Resolving the anchor site again still reports it as the anchor:
    // anchor identity is positional, not first-caller-wins.
    let (parsed, mut registry) = counted("f(x) + f(x)");
    let brio_ir::ExprKind::Binary { left, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected binary root");
    };
    let first = registry.resolve(&parsed.arena, left, &parsed.interner);
    let again = registry.resolve(&parsed.arena, left, &parsed.interner);
    assert_eq!(first, again);
}

#[test]
fn slots_are_dense_and_sequential() {
    let (parsed, mut registry) = counted("f(x) + f(x) + g(y) + g(y)");
    // Resolve in program order: walk eligible nodes the way the emitter
    // would and collect slot assignments.
    struct Resolver<'a> {
        registry: &'a mut CseRegistry,
        interner: &'a brio_ir::StringInterner,
        seen: Vec<Reuse>,
    }
    impl brio_ir::Visitor for Resolver<'_> {
        fn visit_expr(&mut self, id: brio_ir::ExprId, arena: &brio_ir::ExprArena) {
            if is_eligible(arena.kind(id)) {
                if let Some(reuse) = self.registry.resolve(arena, id, self.interner) {
                    self.seen.push(reuse);
                }
            }
            brio_ir::walk_expr(self, id, arena);
        }
    }
    let mut resolver = Resolver {
        registry: &mut registry,
        interner: &parsed.interner,
        seen: Vec::new(),
    };
    resolver.visit_expr(parsed.root, &parsed.arena);
    let slots: Vec<u32> = resolver.seen.iter().map(|r| r.slot).collect();
    let anchors: Vec<bool> = resolver.seen.iter().map(|r| r.is_anchor).collect();
    assert_eq!(slots, [0, 0, 1, 1]);
    assert_eq!(anchors, [true, false, true, false]);
    assert_eq!(registry.slot_count(), 2);
    assert_eq!(registry.slot_exprs(), ["f(x)", "g(y)"]);
}

#[test]
fn anchor_uniqueness() {
    // Exactly one site per identity is flagged as the anchor.
    let (parsed, mut registry) = counted("h(z) + h(z) + h(z)");
    struct Collect<'a> {
        registry: &'a mut CseRegistry,
        interner: &'a brio_ir::StringInterner,
        anchors: usize,
        sites: usize,
    }
    impl brio_ir::Visitor for Collect<'_> {
        fn visit_expr(&mut self, id: brio_ir::ExprId, arena: &brio_ir::ExprArena) {
            if is_eligible(arena.kind(id)) {
                if let Some(reuse) = self.registry.resolve(arena, id, self.interner) {
                    self.sites += 1;
                    if reuse.is_anchor {
                        self.anchors += 1;
                    }
                }
            }
            brio_ir::walk_expr(self, id, arena);
        }
    }
    let mut collect = Collect {
        registry: &mut registry,
        interner: &parsed.interner,
        anchors: 0,
        sites: 0,
    };
    collect.visit_expr(parsed.root, &parsed.arena);
    assert_eq!(collect.sites, 3);
    assert_eq!(collect.anchors, 1);
}

#[test]
fn unseen_identity_resolves_to_none() {
    let (parsed, mut registry) = counted("f(x) + f(x)");
    // The root `+` was counted once; an uncounted subtree (the ident `x`)
    // resolves to nothing.
    let brio_ir::ExprKind::Binary { left, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected binary root");
    };
    let brio_ir::ExprKind::Call { args, .. } = parsed.arena.kind(left) else {
        panic!("expected call");
    };
    let x = parsed.arena.get_expr_list(args)[0];
    assert_eq!(registry.resolve(&parsed.arena, x, &parsed.interner), None);
}
