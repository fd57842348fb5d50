//! Values exchanged between compiled modules and the runtime.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// A value as seen by the loader.
///
/// Hosts convert their engine's values into this shape at the runtime
/// boundary. Objects are shared export namespaces, so a namespace import
/// observes later writes.
#[derive(Debug, Clone)]
pub enum Value {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(Exports),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Exports> for Value {
    fn from(value: Exports) -> Self {
        Value::Object(value)
    }
}

/// A shared, mutable export namespace.
///
/// Cloning yields another handle to the same object.
#[derive(Clone, Default)]
pub struct Exports {
    inner: Arc<RwLock<FxHashMap<String, Value>>>,
}

impl Exports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.read().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.inner.write().insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    /// Property names, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Whether both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Exports) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Exports {
    // Namespaces can contain themselves
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exports").field("keys", &self.keys()).finish()
    }
}

/// Reads a local export; `None` while the binding is uninitialised.
pub type Getter = Arc<dyn Fn() -> Option<Value> + Send + Sync>;

/// Writes an importer's local binding.
pub type Setter = Arc<dyn Fn(Value) + Send + Sync>;
