//! Brio - an embeddable expression language.
//!
//! Compile an expression once, evaluate it many times against different
//! environments:
//!
//! ```
//! use brio::Value;
//!
//! let program = brio::compile("price * quantity > 100")?;
//! let env = Value::map([
//!     ("price", Value::Int(30)),
//!     ("quantity", Value::Int(4)),
//! ]);
//! assert_eq!(brio::run(&program, &env), Ok(Value::Bool(true)));
//! # Ok::<(), brio::Error>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Source → Lex → Parse → Static visitors → Check → Fold → CSE → Emit → Program
//! ```
//!
//! One [`Config`] value parameterizes a compilation: environment typing
//! and strict mode, the expected result type, user function and builtin
//! tables, constant-folding registrations, pluggable static-check
//! visitors, and the common-subexpression reuse switch.

use std::time::Instant;

use tracing::{debug, trace};

pub use brio_compile::{canonical, CompileError, Config, ConfigError, FunctionTable, StaticCheck};
pub use brio_ir::{ExprArena, ExprId, ExprKind, Span, StringInterner};
pub use brio_parse::ParseError;
pub use brio_types::{CheckError, EnvDescriptor, Type};
pub use brio_vm::{ops, Function, Op, Program, RuntimeError, Value, Vm};

use thiserror::Error;

/// Any failure between source text and evaluated value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("check error: {0}")]
    Check(#[from] CheckError),

    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Compile with a default configuration.
pub fn compile(source: &str) -> Result<Program, Error> {
    compile_with_config(source, Config::new())
}

/// Compile with an explicit configuration.
///
/// The configuration is consumed: it is constructed before parsing,
/// threaded through checking and compiling, and discarded with the
/// compilation.
pub fn compile_with_config(source: &str, mut config: Config) -> Result<Program, Error> {
    let started = Instant::now();

    let mut parsed = brio_parse::parse(source)?;
    config.run_static_checks(&parsed.arena, parsed.root, &parsed.interner)?;

    let (functions, builtins) = config.callee_infos();
    let opts = brio_types::CheckOptions {
        env: config.env(),
        strict: config.strict,
        expect: config.expect,
        disabled: config.disabled(),
        functions: &functions,
        builtins: &builtins,
    };
    brio_types::check(&mut parsed.arena, parsed.root, &parsed.interner, &opts)?;

    let program = brio_compile::compile(
        &mut parsed.arena,
        parsed.root,
        &mut parsed.interner,
        &config,
    )?;

    let elapsed = started.elapsed();
    if config.profile {
        debug!(?elapsed, source, "compiled");
    } else {
        trace!(?elapsed, "compiled");
    }
    Ok(program)
}

/// Evaluate a compiled program against an environment.
///
/// `env` must be a map value (or nil); identifiers resolve to its
/// members. Programs may be evaluated repeatedly and concurrently; each
/// evaluation owns its stack and reuse-slot storage.
pub fn run(program: &Program, env: &Value) -> Result<Value, Error> {
    Ok(Vm::run(program, env)?)
}

/// Compile and evaluate in one step, with a default configuration.
pub fn eval(source: &str, env: &Value) -> Result<Value, Error> {
    let program = compile(source)?;
    run(&program, env)
}
