use pretty_assertions::assert_eq;

use super::{BinaryOp, UnaryOp};

#[test]
fn binary_symbols_round_out() {
    assert_eq!(BinaryOp::Add.as_symbol(), "+");
    assert_eq!(BinaryOp::Pow.as_symbol(), "**");
    assert_eq!(BinaryOp::Coalesce.as_symbol(), "??");
    assert_eq!(UnaryOp::Not.as_symbol(), "!");
}

#[test]
fn precedence_ordering() {
    // Higher number binds less tightly.
    assert!(BinaryOp::Add.binds_weaker_than(BinaryOp::Mul));
    assert!(BinaryOp::Or.binds_weaker_than(BinaryOp::And));
    assert!(BinaryOp::Coalesce.binds_weaker_than(BinaryOp::Or));
    assert!(!BinaryOp::Mul.binds_weaker_than(BinaryOp::Add));
    assert!(!BinaryOp::Add.binds_weaker_than(BinaryOp::Sub));
    assert!(BinaryOp::Eq.binds_weaker_than(BinaryOp::Lt));
}

#[test]
fn boolean_and_short_circuit_classes() {
    assert!(BinaryOp::And.is_boolean());
    assert!(BinaryOp::Or.is_boolean());
    assert!(!BinaryOp::Eq.is_boolean());

    assert!(BinaryOp::And.is_short_circuit());
    assert!(BinaryOp::Or.is_short_circuit());
    assert!(BinaryOp::Coalesce.is_short_circuit());
    assert!(!BinaryOp::Add.is_short_circuit());
}
