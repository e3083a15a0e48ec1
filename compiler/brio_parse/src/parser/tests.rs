use brio_ir::{unparse, BinaryOp, ExprKind, UnaryOp};
use pretty_assertions::assert_eq;

use super::*;

fn parse_ok(source: &str) -> Parsed {
    match parse(source) {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    }
}

/// Round-trip through the unparser, which normalizes spacing and spelling.
fn rendered(source: &str) -> String {
    let parsed = parse_ok(source);
    unparse(&parsed.arena, parsed.root, &parsed.interner)
}

#[test]
fn precedence_shapes() {
    assert_eq!(rendered("1+2*3"), "1 + 2 * 3");
    assert_eq!(rendered("(1+2)*3"), "(1 + 2) * 3");
    assert_eq!(rendered("a or b and c"), "a || b && c");
    // Comparison binds tighter than equality; no parens needed.
    assert_eq!(rendered("a == b < c"), "a == b < c");
    assert_eq!(rendered("a ?? b or c"), "a ?? b || c");
}

#[test]
fn spelling_pairs_unify() {
    let symbolic = parse_ok("a && b || !c");
    let keyword = parse_ok("a and b or not c");
    assert_eq!(
        unparse(&symbolic.arena, symbolic.root, &symbolic.interner),
        unparse(&keyword.arena, keyword.root, &keyword.interner),
    );

    let starstar = parse_ok("a ** b");
    let ExprKind::Binary { op, .. } = starstar.arena.kind(starstar.root) else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Pow);
    let caret = parse_ok("a ^ b");
    let ExprKind::Binary { op, .. } = caret.arena.kind(caret.root) else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Pow);
}

#[test]
fn power_is_right_associative() {
    assert_eq!(rendered("2 ** 3 ** 2"), "2 ** 3 ** 2");
    let parsed = parse_ok("2 ** 3 ** 2");
    let ExprKind::Binary { op, right, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Pow);
    // The right operand is itself a power: 2 ** (3 ** 2).
    assert!(matches!(
        parsed.arena.kind(right),
        ExprKind::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));
}

#[test]
fn conditional_is_right_associative() {
    assert_eq!(rendered("a ? 1 : b ? 2 : 3"), "a ? 1 : b ? 2 : 3");
    let parsed = parse_ok("a ? 1 : b ? 2 : 3");
    let ExprKind::Conditional { otherwise, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected conditional");
    };
    assert!(matches!(
        parsed.arena.kind(otherwise),
        ExprKind::Conditional { .. }
    ));
}

#[test]
fn unary_forms() {
    let parsed = parse_ok("-x");
    assert!(matches!(
        parsed.arena.kind(parsed.root),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            ..
        }
    ));
    let parsed = parse_ok("+x");
    assert!(matches!(
        parsed.arena.kind(parsed.root),
        ExprKind::Unary {
            op: UnaryOp::Plus,
            ..
        }
    ));
    assert_eq!(rendered("!(a and b)"), "!(a && b)");
}

#[test]
fn postfix_chains() {
    assert_eq!(rendered("user.address.city"), "user.address.city");
    assert_eq!(rendered("items[0].name"), "items[0].name");
    assert_eq!(rendered("f(x)(y)"), "f(x)(y)");
    assert_eq!(rendered("f(a, b)[1]"), "f(a, b)[1]");
}

#[test]
fn calls_parse_as_plain_calls() {
    // Builtin classification happens in the checker, not here.
    let parsed = parse_ok("len(x)");
    let ExprKind::Call { func, args } = parsed.arena.kind(parsed.root) else {
        panic!("expected call");
    };
    assert!(matches!(parsed.arena.kind(func), ExprKind::Ident(_)));
    assert_eq!(args.len(), 1);
}

#[test]
fn list_literals() {
    assert_eq!(rendered("[1, 2, 3]"), "[1, 2, 3]");
    assert_eq!(rendered("[]"), "[]");
    assert_eq!(rendered("[[1], [2]]"), "[[1], [2]]");
}

#[test]
fn spans_cover_sources() {
    let parsed = parse_ok("ab + cd");
    let span = parsed.arena.span(parsed.root);
    assert_eq!((span.start, span.end), (0, 7));
}

#[test]
fn identical_subexpressions_have_distinct_spans() {
    let parsed = parse_ok("f(x) + f(x)");
    let ExprKind::Binary { left, right, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected binary");
    };
    assert_ne!(parsed.arena.span(left), parsed.arena.span(right));
}

#[test]
fn errors() {
    assert!(matches!(
        parse("1 +"),
        Err(ParseError::UnexpectedEof { .. })
    ));
    assert!(matches!(
        parse("1 + * 2"),
        Err(ParseError::UnexpectedToken { .. })
    ));
    assert!(matches!(parse(""), Err(ParseError::UnexpectedEof { .. })));
    assert!(matches!(
        parse("a ? b"),
        Err(ParseError::UnexpectedEof { .. })
    ));
    assert!(matches!(
        parse("1 2"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn deep_nesting_is_rejected() {
    let source = format!("{}x{}", "(".repeat(500), ")".repeat(500));
    assert!(matches!(parse(&source), Err(ParseError::TooDeep { .. })));
}
