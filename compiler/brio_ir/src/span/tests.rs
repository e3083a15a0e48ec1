use super::*;
use pretty_assertions::assert_eq;

#[test]
fn span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn span_merge() {
    let a = Span::new(10, 20);
    let b = Span::new(15, 30);
    let merged = a.merge(b);
    assert_eq!(merged.start, 10);
    assert_eq!(merged.end, 30);
}

#[test]
fn span_positional_identity() {
    // Equal offsets are the same site; shifted offsets are not.
    assert_eq!(Span::new(3, 7), Span::new(3, 7));
    assert_ne!(Span::new(3, 7), Span::new(4, 8));
}

#[test]
fn span_try_from_range() {
    let result = Span::try_from_range(50..100);
    let Ok(span) = result else {
        panic!("expected Ok for valid range");
    };
    assert_eq!(span.start, 50);
    assert_eq!(span.end, 100);
}

#[test]
fn span_try_from_range_too_large() {
    let big = u32::MAX as usize + 1;
    assert_eq!(
        Span::try_from_range(big..big + 1),
        Err(SpanError::StartTooLarge(big))
    );
    assert_eq!(
        Span::try_from_range(0..big),
        Err(SpanError::EndTooLarge(big))
    );
}
