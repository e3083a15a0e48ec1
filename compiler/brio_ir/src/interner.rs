//! String interner for identifier and string-literal storage.
//!
//! Each compilation owns exactly one interner, created by the parser and
//! threaded through checking and compiling. There is no shared mutable
//! compile state, so no locking is needed.

use rustc_hash::FxHashMap;

use crate::Name;

/// Owned string interner.
///
/// Provides O(1) lookup and equality comparison for interned strings.
/// The empty string is pre-interned as [`Name::EMPTY`].
pub struct StringInterner {
    map: FxHashMap<Box<str>, u32>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: Box<str> = Box::from("");
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        StringInterner {
            map,
            strings: vec![empty],
        }
    }

    /// Intern a string, returning its handle.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&index) = self.map.get(s) {
            return Name::new(index);
        }
        let index = self.strings.len() as u32;
        let owned: Box<str> = Box::from(s);
        self.map.insert(owned.clone(), index);
        self.strings.push(owned);
        Name::new(index)
    }

    /// Resolve a handle back to its text.
    ///
    /// # Panics
    /// Panics if `name` was produced by a different interner.
    #[inline]
    #[track_caller]
    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.index()]
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.map.get(s).map(|&index| Name::new(index))
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        // The empty string is always present.
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
