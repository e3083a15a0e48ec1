use brio_ir::ExprKind;
use brio_parse::parse;
use brio_types::EnvDescriptor;
use brio_vm::{Function, RuntimeError, Value};
use pretty_assertions::assert_eq;

use super::*;

fn folded_kind(source: &str, config: &Config) -> ExprKind {
    let mut parsed = match parse(source) {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    };
    fold(&mut parsed.arena, parsed.root, &mut parsed.interner, config);
    parsed.arena.kind(parsed.root)
}

#[test]
fn arithmetic_literals_fold() {
    let config = Config::new();
    assert_eq!(folded_kind("1 + 2 * 3", &config), ExprKind::Int(7));
    assert_eq!(
        folded_kind("1.0 + 1", &config),
        ExprKind::Float(2.0f64.to_bits())
    );
    assert_eq!(folded_kind("-(2 + 3)", &config), ExprKind::Int(-5));
    assert_eq!(
        folded_kind("2 ** 10", &config),
        ExprKind::Float(1024.0f64.to_bits())
    );
}

#[test]
fn comparisons_and_equality_fold() {
    let config = Config::new();
    assert_eq!(folded_kind("1 < 2", &config), ExprKind::Bool(true));
    assert_eq!(folded_kind("1 == 1.0", &config), ExprKind::Bool(true));
    assert_eq!(folded_kind("'a' != 'b'", &config), ExprKind::Bool(true));
}

#[test]
fn short_circuit_folds_on_literal_left() {
    let config = Config::new();
    assert_eq!(folded_kind("false && x", &config), ExprKind::Bool(false));
    assert_eq!(folded_kind("true || x", &config), ExprKind::Bool(true));
    let kind = folded_kind("true && x", &config);
    assert!(matches!(kind, ExprKind::Ident(_)), "got {kind:?}");
    assert_eq!(folded_kind("nil ?? 3", &config), ExprKind::Int(3));
    assert_eq!(folded_kind("2 ?? 3", &config), ExprKind::Int(2));
}

#[test]
fn dead_branches_eliminate() {
    let config = Config::new();
    assert_eq!(folded_kind("1 < 2 ? 10 : 20", &config), ExprKind::Int(10));
    assert_eq!(folded_kind("false ? 10 : 20", &config), ExprKind::Int(20));
    // A runtime condition keeps the conditional.
    assert!(matches!(
        folded_kind("x ? 10 : 20", &config),
        ExprKind::Conditional { .. }
    ));
}

#[test]
fn failures_leave_the_node_unfolded() {
    let config = Config::new();
    assert!(matches!(
        folded_kind("1 / 0", &config),
        ExprKind::Binary { .. }
    ));
    assert!(matches!(
        folded_kind("1 + 'a'", &config),
        ExprKind::Binary { .. }
    ));
}

#[test]
fn runtime_operands_stay() {
    let config = Config::new();
    assert!(matches!(
        folded_kind("x + 1", &config),
        ExprKind::Binary { .. }
    ));
    // But literal subtrees inside still fold.
    let mut parsed = match parse("x + (1 + 2)") {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed: {e}"),
    };
    fold(
        &mut parsed.arena,
        parsed.root,
        &mut parsed.interner,
        &config,
    );
    let ExprKind::Binary { right, .. } = parsed.arena.kind(parsed.root) else {
        panic!("expected binary");
    };
    assert_eq!(parsed.arena.kind(right), ExprKind::Int(3));
}

#[test]
fn builtins_fold_with_literal_arguments() {
    let config = Config::new();
    // The checker rewrites calls to builtins; fold operates on the
    // rewritten tree. Simulate by checking first.
    let mut parsed = match parse("len('abc') + 1") {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed: {e}"),
    };
    let (functions, builtins) = config.callee_infos();
    let opts = brio_types::CheckOptions {
        env: None,
        strict: false,
        expect: None,
        disabled: config.disabled(),
        functions: &functions,
        builtins: &builtins,
    };
    let checked = brio_types::check(&mut parsed.arena, parsed.root, &parsed.interner, &opts);
    assert!(checked.is_ok());
    fold(
        &mut parsed.arena,
        parsed.root,
        &mut parsed.interner,
        &config,
    );
    assert_eq!(parsed.arena.kind(parsed.root), ExprKind::Int(4));
}

#[test]
fn builtin_failure_stays_for_runtime() {
    let config = Config::new();
    let mut parsed = match parse("int('nope')") {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed: {e}"),
    };
    let (functions, builtins) = config.callee_infos();
    let opts = brio_types::CheckOptions {
        env: None,
        strict: false,
        expect: None,
        disabled: config.disabled(),
        functions: &functions,
        builtins: &builtins,
    };
    assert!(brio_types::check(&mut parsed.arena, parsed.root, &parsed.interner, &opts).is_ok());
    fold(
        &mut parsed.arena,
        parsed.root,
        &mut parsed.interner,
        &config,
    );
    assert!(matches!(
        parsed.arena.kind(parsed.root),
        ExprKind::Builtin { .. }
    ));
}

#[test]
fn const_fns_fold_and_unregistered_calls_do_not() {
    let mut config = Config::with_env(EnvDescriptor::new());
    config.register_function(Function::new("area", Some(1), |args| match &args[0] {
        Value::Int(r) => Ok(Value::Int(r * r)),
        other => Err(RuntimeError::Custom(format!(
            "area expects int, got {}",
            other.type_name()
        ))),
    }));
    config.register_function(Function::new("rand", Some(0), |_| Ok(Value::Int(4))));
    assert_eq!(config.const_expr("area"), Ok(()));

    assert_eq!(folded_kind("area(3)", &config), ExprKind::Int(9));
    // Not registered as const: stays a call even with literal args.
    assert!(matches!(
        folded_kind("rand()", &config),
        ExprKind::Call { .. }
    ));
    // Non-literal argument: stays a call.
    assert!(matches!(
        folded_kind("area(x)", &config),
        ExprKind::Call { .. }
    ));
}

#[test]
fn string_folding_interns_results() {
    let config = Config::new();
    let mut parsed = match parse("'foo' + 'bar'") {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed: {e}"),
    };
    fold(
        &mut parsed.arena,
        parsed.root,
        &mut parsed.interner,
        &config,
    );
    let ExprKind::Str(name) = parsed.arena.kind(parsed.root) else {
        panic!("expected folded string");
    };
    assert_eq!(parsed.interner.resolve(name), "foobar");
}
