//! Per-module bookkeeping for live bindings.

use crate::module::Module;
use crate::value::{Exports, Getter, Setter, Value};
use parking_lot::{Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use spacey_compiler::CompileOutput;
use std::sync::{Arc, Weak};

/// Where an entry is in its load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unloaded,
    Compiling,
    Compiled,
    Executing,
    Loaded,
    /// Terminal
    Failed,
}

/// Forwards a star re-export: receives each exported name and value.
pub type StarSetter = Arc<dyn Fn(&str, Value) + Send + Sync>;

/// A subscription to another entry's exports.
#[derive(Clone)]
pub enum Watcher {
    /// One named export
    Binding { name: String, setter: Setter },
    /// The namespace object itself
    Namespace { setter: Setter },
    /// Every export except `default`
    Star { setter: StarSetter },
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Watcher::Binding { name, .. } => f.debug_struct("Binding").field("name", name).finish(),
            Watcher::Namespace { .. } => f.write_str("Namespace"),
            Watcher::Star { .. } => f.write_str("Star"),
        }
    }
}

/// Identity, exports and compiled form of one module unit.
///
/// There is one canonical entry per id; it is mutated in place and never
/// replaced, so importers holding it keep seeing current values. Locks are
/// released before any getter or setter runs, because those may re-enter
/// the loader.
pub struct Entry {
    id: String,
    module: RwLock<Weak<Module>>,
    exports: RwLock<Exports>,
    state: RwLock<EntryState>,
    output: RwLock<Option<CompileOutput>>,
    getters: RwLock<FxHashMap<String, Getter>>,
    watchers: Mutex<Vec<Watcher>>,
    /// Names whose update is on the stack; breaks star re-export cycles
    updating: Mutex<FxHashSet<String>>,
}

impl Entry {
    pub(crate) fn new(module: &Arc<Module>) -> Self {
        Self {
            id: module.id().to_string(),
            module: RwLock::new(Arc::downgrade(module)),
            exports: RwLock::new(module.exports()),
            state: RwLock::new(EntryState::Unloaded),
            output: RwLock::new(None),
            getters: RwLock::new(FxHashMap::default()),
            watchers: Mutex::new(Vec::new()),
            updating: Mutex::new(FxHashSet::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The owning module, if it is still alive.
    pub fn module(&self) -> Option<Arc<Module>> {
        self.module.read().upgrade()
    }

    pub fn exports(&self) -> Exports {
        self.exports.read().clone()
    }

    pub fn state(&self) -> EntryState {
        *self.state.read()
    }

    pub(crate) fn set_state(&self, state: EntryState) {
        *self.state.write() = state;
    }

    /// The compiled form, once compilation succeeded.
    pub fn output(&self) -> Option<CompileOutput> {
        self.output.read().clone()
    }

    pub(crate) fn set_output(&self, output: CompileOutput) {
        *self.output.write() = Some(output);
    }

    fn is_esm(&self) -> bool {
        self.output.read().as_ref().is_some_and(|output| output.esm)
    }

    /// Makes `module` the owner of this entry and adopts its exports.
    pub(crate) fn adopt(&self, module: &Arc<Module>) {
        *self.module.write() = Arc::downgrade(module);
        self.set_exports(module.exports());
    }

    /// Points the entry at a new exports object, re-notifying namespace
    /// watchers when the object changed.
    pub(crate) fn set_exports(&self, exports: Exports) {
        let changed = {
            let mut current = self.exports.write();
            let changed = !current.ptr_eq(&exports);
            *current = exports.clone();
            changed
        };
        if !changed {
            return;
        }

        let watchers = self.watchers.lock().clone();
        for watcher in watchers {
            if let Watcher::Namespace { setter } = watcher {
                setter(Value::Object(exports.clone()));
            }
        }
    }

    /// Registers a getter for a local export. A later registration for the
    /// same name replaces the earlier one.
    pub fn add_getter(&self, name: impl Into<String>, getter: Getter) {
        self.getters.write().insert(name.into(), getter);
    }

    /// Registers a getter unless the name is already exported.
    pub fn add_getter_if_absent(&self, name: &str, getter: Getter) -> bool {
        let mut getters = self.getters.write();
        if getters.contains_key(name) {
            return false;
        }
        getters.insert(name.to_string(), getter);
        true
    }

    /// Names with a registered getter or an exports property, sorted.
    pub fn export_names(&self) -> Vec<String> {
        let mut names = self.exports().keys();
        names.extend(self.getters.read().keys().cloned());
        names.sort();
        names.dedup();
        names
    }

    /// The current value of export `name`; `None` while uninitialised.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        let getter = self.getters.read().get(name).cloned();
        match getter {
            Some(getter) => getter(),
            None if name == "default" && !self.is_esm() => Some(Value::Object(self.exports())),
            None => self.exports().get(name),
        }
    }

    /// Subscribes to this entry and immediately delivers the current
    /// values.
    pub fn watch(&self, watcher: Watcher) {
        self.watchers.lock().push(watcher.clone());

        match &watcher {
            Watcher::Binding { name, setter } => {
                if let Some(value) = self.value_of(name) {
                    setter(value);
                }
            }
            Watcher::Namespace { setter } => setter(Value::Object(self.exports())),
            Watcher::Star { setter } => {
                for name in self.export_names() {
                    if name == "default" {
                        continue;
                    }
                    if let Some(value) = self.value_of(&name) {
                        setter(&name, value);
                    }
                }
            }
        }
    }

    /// Re-reads the named exports, stores them on the exports object and
    /// pushes them to every watcher. Safe to repeat.
    pub fn update<S: AsRef<str>>(&self, names: &[S]) {
        let watchers = self.watchers.lock().clone();
        let exports = self.exports();

        for name in names {
            let name = name.as_ref();
            if !self.updating.lock().insert(name.to_string()) {
                continue;
            }

            if let Some(value) = self.value_of(name) {
                // A CommonJS `default` is the exports object itself
                if !matches!(&value, Value::Object(object) if object.ptr_eq(&exports)) {
                    exports.set(name, value.clone());
                }

                for watcher in &watchers {
                    match watcher {
                        Watcher::Binding { name: watched, setter } if watched == name => {
                            setter(value.clone())
                        }
                        Watcher::Star { setter } if name != "default" => {
                            setter(name, value.clone())
                        }
                        _ => {}
                    }
                }
            }

            self.updating.lock().remove(name);
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("exports", &self.exports())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Setter, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let setter: Setter = Arc::new(move |value: Value| sink.lock().push(value));
        (setter, seen)
    }

    fn cell(value: Option<f64>) -> (Getter, Arc<Mutex<Option<f64>>>) {
        let cell = Arc::new(Mutex::new(value));
        let source = Arc::clone(&cell);
        let getter: Getter = Arc::new(move || source.lock().map(Value::Number));
        (getter, cell)
    }

    #[test]
    fn test_binding_watchers_follow_updates() {
        let module = Module::new("m");
        let entry = module.entry();
        let (getter, count) = cell(None);
        entry.add_getter("count", getter);

        let (setter, seen) = recorder();
        entry.watch(Watcher::Binding {
            name: "count".to_string(),
            setter,
        });
        assert!(seen.lock().is_empty());

        *count.lock() = Some(1.0);
        entry.update(&["count"]);
        entry.update(&["count"]);
        *count.lock() = Some(2.0);
        entry.update(&["count", "missing"]);

        assert_eq!(
            *seen.lock(),
            vec![Value::Number(1.0), Value::Number(1.0), Value::Number(2.0)]
        );
        assert_eq!(entry.exports().get("count"), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_star_watchers_skip_default() {
        let module = Module::new("m");
        let entry = module.entry();
        entry.add_getter("a", cell(Some(1.0)).0);
        entry.add_getter("default", cell(Some(2.0)).0);

        let names = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&names);
        entry.watch(Watcher::Star {
            setter: Arc::new(move |name: &str, _: Value| sink.lock().push(name.to_string())),
        });
        entry.update(&["default", "a"]);

        assert_eq!(*names.lock(), vec!["a", "a"]);
    }

    #[test]
    fn test_commonjs_default_is_the_exports_object() {
        let module = Module::new("m");
        let entry = module.entry();
        module.exports().set("x", Value::from(1.0));

        assert_eq!(entry.value_of("default"), Some(Value::Object(module.exports())));
        assert_eq!(entry.value_of("x"), Some(Value::Number(1.0)));
        assert_eq!(entry.export_names(), vec!["x"]);
    }

    #[test]
    fn test_namespace_watchers_see_replaced_exports() {
        let module = Module::new("m");
        let entry = module.entry();
        let (setter, seen) = recorder();
        entry.watch(Watcher::Namespace { setter });

        let other = Module::new("m");
        entry.adopt(&other);
        entry.adopt(&other);

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], Value::Object(other.exports()));
        assert!(Arc::ptr_eq(&entry.module().unwrap(), &other));
    }

    #[test]
    fn test_first_getter_wins_for_star_exports() {
        let module = Module::new("m");
        let entry = module.entry();
        assert!(entry.add_getter_if_absent("a", cell(Some(1.0)).0));
        assert!(!entry.add_getter_if_absent("a", cell(Some(2.0)).0));
        assert_eq!(entry.value_of("a"), Some(Value::Number(1.0)));
    }
}
