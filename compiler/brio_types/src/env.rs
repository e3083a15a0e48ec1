//! Host environment type descriptor.

use rustc_hash::FxHashMap;

use crate::Type;

/// Declared shape of the host environment: member name → type.
///
/// Built by the embedder before compilation; read-only afterwards. Under
/// strict mode, identifiers that are not declared here are check errors.
#[derive(Clone, Debug, Default)]
pub struct EnvDescriptor {
    members: FxHashMap<String, Type>,
}

impl EnvDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a member, builder-style.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.members.insert(name.into(), ty);
        self
    }

    /// Look up a member's declared type.
    pub fn get(&self, name: &str) -> Option<Type> {
        self.members.get(name).copied()
    }

    /// Whether a member is declared.
    pub fn has(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }
}
