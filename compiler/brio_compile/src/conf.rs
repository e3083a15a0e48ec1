//! Per-compilation configuration.
//!
//! One `Config` value is constructed before parsing, threaded read-only
//! through checking and compiling, and discarded after one compilation.
//! The two `const_expr` failure modes are configuration errors reported
//! immediately at registration time, never deferred to compile time.

use std::sync::Arc;

use brio_ir::{walk_expr, ExprArena, ExprId, StringInterner, Visitor};
use brio_types::{CalleeInfo, CheckError, EnvDescriptor, Type};
use brio_vm::{builtins, Function};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// Name → function descriptor table.
pub type FunctionTable = FxHashMap<String, Arc<Function>>;

/// Fatal configuration mistake, reported at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no environment is configured for const_expr")]
    NoEnvironment,

    #[error("const expression `{0}` must be a registered function")]
    NotAFunction(String),
}

/// A pluggable static-check visitor, run between parsing and checking.
///
/// Visitors may accumulate internal state across `visit_expr` calls;
/// `finish` is invoked once after the traversal to report a verdict.
pub trait StaticCheck {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena, interner: &StringInterner);

    fn finish(&self) -> Result<(), CheckError> {
        Ok(())
    }
}

/// Per-compilation configuration.
pub struct Config {
    /// Declared environment shape; setting one turns on strict mode.
    env: Option<EnvDescriptor>,
    /// Expected result type; `None` accepts any result.
    pub expect: Option<Type>,
    /// Reject unknown identifiers at check time.
    pub strict: bool,
    /// Enable constant folding.
    pub optimize: bool,
    /// Log phase timings at debug level instead of trace.
    pub profile: bool,
    /// Master switch for common-subexpression reuse.
    ///
    /// Off by default: enabling it asserts that every registered function
    /// is deterministic and side-effect free within one evaluation, so
    /// repeated identical calls may be computed once. That assertion is
    /// the caller's responsibility; it is not verified.
    pub reuse_common_subexpr: bool,
    functions: FunctionTable,
    builtins: FunctionTable,
    disabled: FxHashSet<String>,
    const_fns: FxHashSet<String>,
    visitors: Vec<Box<dyn StaticCheck>>,
}

impl Config {
    /// New configuration with default values and the standard builtin set.
    pub fn new() -> Self {
        let mut table = FunctionTable::default();
        for function in builtins::all() {
            table.insert(function.name().to_string(), Arc::new(function));
        }
        Config {
            env: None,
            expect: None,
            strict: false,
            optimize: true,
            profile: false,
            reuse_common_subexpr: false,
            functions: FunctionTable::default(),
            builtins: table,
            disabled: FxHashSet::default(),
            const_fns: FxHashSet::default(),
            visitors: Vec::new(),
        }
    }

    /// New configuration with an environment descriptor; enables strict
    /// mode.
    pub fn with_env(env: EnvDescriptor) -> Self {
        let mut config = Config::new();
        config.set_env(env);
        config
    }

    /// Attach an environment descriptor, enabling strict mode.
    pub fn set_env(&mut self, env: EnvDescriptor) {
        self.strict = true;
        self.env = Some(env);
    }

    pub fn env(&self) -> Option<&EnvDescriptor> {
        self.env.as_ref()
    }

    /// Register a user function, shadowing any builtin of the same name.
    pub fn register_function(&mut self, function: Function) {
        self.functions
            .insert(function.name().to_string(), Arc::new(function));
    }

    /// Remove a builtin from visibility.
    pub fn disable_builtin(&mut self, name: impl Into<String>) {
        self.disabled.insert(name.into());
    }

    /// Register a function whose calls with all-constant arguments are
    /// evaluated at compile time.
    ///
    /// Fails fast: requires a configured environment and a registered
    /// function of that name.
    pub fn const_expr(&mut self, name: &str) -> Result<(), ConfigError> {
        if self.env.is_none() {
            return Err(ConfigError::NoEnvironment);
        }
        if !self.functions.contains_key(name) {
            return Err(ConfigError::NotAFunction(name.to_string()));
        }
        self.const_fns.insert(name.to_string());
        Ok(())
    }

    /// Append a static-check visitor; visitors run in registration order.
    pub fn add_visitor(&mut self, visitor: Box<dyn StaticCheck>) {
        self.visitors.push(visitor);
    }

    /// True if a user function or environment member shadows `name`.
    pub fn is_overridden(&self, name: &str) -> bool {
        if self.functions.contains_key(name) {
            return true;
        }
        self.env.as_ref().is_some_and(|env| env.has(name))
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn builtins(&self) -> &FunctionTable {
        &self.builtins
    }

    pub fn disabled(&self) -> &FxHashSet<String> {
        &self.disabled
    }

    pub fn is_const_fn(&self, name: &str) -> bool {
        self.const_fns.contains(name)
    }

    /// Run every registered visitor over the tree, in order, then collect
    /// each visitor's verdict.
    pub fn run_static_checks(
        &mut self,
        arena: &ExprArena,
        root: ExprId,
        interner: &StringInterner,
    ) -> Result<(), CheckError> {
        for visitor in &mut self.visitors {
            let mut adapter = VisitorAdapter {
                inner: visitor.as_mut(),
                interner,
            };
            adapter.visit_expr(root, arena);
        }
        for visitor in &self.visitors {
            visitor.finish()?;
        }
        Ok(())
    }

    /// Callee tables for the checker: user functions and builtins with
    /// their arities and result types.
    pub fn callee_infos(
        &self,
    ) -> (
        FxHashMap<String, CalleeInfo>,
        FxHashMap<String, CalleeInfo>,
    ) {
        let functions = self
            .functions
            .iter()
            .map(|(name, function)| {
                (
                    name.clone(),
                    CalleeInfo {
                        arity: function.arity(),
                        result: Type::Any,
                    },
                )
            })
            .collect();
        let builtins = self
            .builtins
            .iter()
            .map(|(name, function)| {
                (
                    name.clone(),
                    CalleeInfo {
                        arity: function.arity(),
                        result: builtin_result_type(name),
                    },
                )
            })
            .collect();
        (functions, builtins)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Result types of the standard builtins.
fn builtin_result_type(name: &str) -> Type {
    match name {
        "len" | "int" => Type::Int,
        "float" => Type::Float,
        "string" | "upper" | "lower" => Type::Str,
        "contains" => Type::Bool,
        // `abs`, `min`, `max` follow their arguments.
        _ => Type::Any,
    }
}

/// Bridges a `StaticCheck` onto the generic AST traversal.
struct VisitorAdapter<'a> {
    inner: &'a mut dyn StaticCheck,
    interner: &'a StringInterner,
}

impl Visitor for VisitorAdapter<'_> {
    fn visit_expr(&mut self, id: ExprId, arena: &ExprArena) {
        self.inner.visit_expr(id, arena, self.interner);
        walk_expr(self, id, arena);
    }
}
