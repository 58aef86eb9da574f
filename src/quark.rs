//! Interned string identity for headers, groups, servers and Message-IDs.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

fn table() -> &'static RwLock<HashMap<Box<str>, Arc<str>>> {
    static TABLE: OnceLock<RwLock<HashMap<Box<str>, Arc<str>>>> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// An interned, cheaply-comparable string identity.
///
/// Two `Quark`s built from identical bytes always point at the same
/// backing allocation, so equality is a pointer comparison and cloning
/// is an `Arc` bump. Lifetime is process-wide: interned strings are
/// never evicted.
#[derive(Clone)]
pub struct Quark(Arc<str>);

impl Quark {
    /// Intern `s`, reusing an existing entry if one exists.
    pub fn new(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        if let Some(existing) = table().read().unwrap().get(s) {
            return Quark(Arc::clone(existing));
        }
        let mut guard = table().write().unwrap();
        if let Some(existing) = guard.get(s) {
            return Quark(Arc::clone(existing));
        }
        let arc: Arc<str> = Arc::from(s);
        guard.insert(s.into(), Arc::clone(&arc));
        Quark(arc)
    }

    /// The empty quark. Not special-cased; interned like any other string.
    pub fn empty() -> Self {
        Quark::new("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct strings interned so far. Test/diagnostic use.
    pub fn table_len() -> usize {
        table().read().unwrap().len()
    }
}

impl PartialEq for Quark {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}
impl Eq for Quark {}

impl PartialOrd for Quark {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Quark {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::hash::Hash for Quark {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Quark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quark({:?})", self.0)
    }
}

impl fmt::Display for Quark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Quark {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Quark {
    fn from(s: &str) -> Self {
        Quark::new(s)
    }
}

impl From<String> for Quark {
    fn from(s: String) -> Self {
        Quark::new(s)
    }
}

impl Default for Quark {
    fn default() -> Self {
        Quark::empty()
    }
}
