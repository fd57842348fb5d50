//! The runtime object that compiled code calls into.
//!
//! Each compiled module receives its own [`Runtime`], named by
//! `CompileOutput::runtime_name` in the generated text:
//!
//! | Call | Method |
//! |------|--------|
//! | `_.a("x",x)` | [`Runtime::a`] |
//! | `_.j(["x"])` | [`Runtime::j`] |
//! | `_.x([["x",function(){return x}]])` | [`Runtime::x`] |
//! | `_.w("m",[["x",function(v){x=v}]])` | [`Runtime::w`] |
//! | `_.r("m",[["x","y"]])` | [`Runtime::r`] |
//! | `_.i("m")` | [`Runtime::i`] |

use crate::entry::{Entry, StarSetter, Watcher};
use crate::error::{LoaderError, Result};
use crate::loader::Loader;
use crate::value::{Exports, Getter, Setter, Value};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use spacey_compiler::ImportBinding;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::trace;

/// `(specifier, imported name)`
type ImportKey = (String, String);

/// Live-binding operations for one executing module.
#[derive(Debug, Clone)]
pub struct Runtime {
    loader: Loader,
    entry: Arc<Entry>,
    filename: PathBuf,
    /// Imported local name to where it comes from
    imports: Arc<FxHashMap<String, ImportKey>>,
    /// Imports whose setter has run at least once
    delivered: Arc<Mutex<FxHashSet<ImportKey>>>,
}

impl Runtime {
    pub(crate) fn new(
        loader: Loader,
        entry: Arc<Entry>,
        filename: &Path,
        imports: &[ImportBinding],
    ) -> Self {
        let imports = imports
            .iter()
            .map(|binding| {
                let key = (binding.specifier.clone(), binding.imported.clone());
                (binding.local.clone(), key)
            })
            .collect();
        Self {
            loader,
            entry,
            filename: filename.to_path_buf(),
            imports: Arc::new(imports),
            delivered: Arc::new(Mutex::new(FxHashSet::default())),
        }
    }

    /// The entry of the module this runtime belongs to.
    pub fn entry(&self) -> &Arc<Entry> {
        &self.entry
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Guarded read of imported binding `name`, whose current local value
    /// is `value`.
    ///
    /// Fails with [`LoaderError::TemporalAccess`] until the exporter has
    /// delivered the binding through [`Runtime::w`], whatever `value` the
    /// host passes, and whenever `value` is `None`.
    pub fn a(&self, name: &str, value: Option<Value>) -> Result<Value> {
        let initialised = match self.imports.get(name) {
            Some(key) => self.delivered.lock().contains(key),
            None => true,
        };
        match value {
            Some(value) if initialised => Ok(value),
            _ => Err(LoaderError::temporal_access(name)),
        }
    }

    /// Pushes the current values of `names` to importers.
    pub fn j(&self, names: &[&str]) {
        trace!(id = self.entry.id(), ?names, "join");
        self.entry.update(names);
    }

    /// Registers getters for this module's local exports.
    pub fn x(&self, getters: Vec<(&str, Getter)>) {
        for (name, getter) in getters {
            self.entry.add_getter(name, getter);
        }
    }

    /// Loads `specifier` and subscribes `setters` to its exports. An
    /// imported name of `"*"` receives the namespace object.
    pub fn w(&self, specifier: &str, setters: Vec<(&str, Setter)>) -> Result<()> {
        let child = self.loader.require(specifier, &self.filename)?;

        for (imported, setter) in setters {
            let setter = self.recording(specifier, imported, setter);
            let watcher = match imported {
                "*" => Watcher::Namespace { setter },
                name => Watcher::Binding {
                    name: name.to_string(),
                    setter,
                },
            };
            child.watch(watcher);
        }
        Ok(())
    }

    /// Wraps `setter` so that its first call marks the import delivered.
    fn recording(&self, specifier: &str, imported: &str, setter: Setter) -> Setter {
        let delivered = Arc::clone(&self.delivered);
        let key = (specifier.to_string(), imported.to_string());
        Arc::new(move |value: Value| {
            delivered.lock().insert(key.clone());
            setter(value);
        })
    }

    /// Re-exports bindings of `specifier` as `(imported, exported)` pairs.
    ///
    /// `("*", "*")` re-exports every name but `default`; `("*", name)`
    /// exports the namespace object as `name`.
    pub fn r(&self, specifier: &str, pairs: &[(&str, &str)]) -> Result<()> {
        let child = self.loader.require(specifier, &self.filename)?;
        let parent = Arc::downgrade(&self.entry);

        for &(imported, exported) in pairs {
            match (imported, exported) {
                ("*", "*") => {
                    let setter: StarSetter = {
                        let parent = Weak::clone(&parent);
                        let child = Arc::downgrade(&child);
                        Arc::new(move |name: &str, _: Value| {
                            let Some(parent) = parent.upgrade() else {
                                return;
                            };
                            parent.add_getter_if_absent(name, forward(&child, name));
                            parent.update(&[name]);
                        })
                    };
                    child.watch(Watcher::Star { setter });
                }
                ("*", exported) => {
                    let namespace = Arc::downgrade(&child);
                    let getter: Getter =
                        Arc::new(move || namespace.upgrade().map(|child| Value::Object(child.exports())));
                    self.entry.add_getter(exported, getter);
                    self.entry.update(&[exported]);
                }
                (imported, exported) => {
                    self.entry
                        .add_getter(exported, forward(&Arc::downgrade(&child), imported));

                    let parent = Weak::clone(&parent);
                    let exported = exported.to_string();
                    let setter: Setter = Arc::new(move |_: Value| {
                        if let Some(parent) = parent.upgrade() {
                            parent.update(&[exported.as_str()]);
                        }
                    });
                    child.watch(Watcher::Binding {
                        name: imported.to_string(),
                        setter,
                    });
                }
            }
        }
        Ok(())
    }

    /// Dynamic `import()`: loads `specifier` and returns its namespace.
    pub fn i(&self, specifier: &str) -> Result<Exports> {
        let child = self.loader.require(specifier, &self.filename)?;
        Ok(child.exports())
    }
}

/// A getter that reads export `name` of `entry`.
fn forward(entry: &Weak<Entry>, name: &str) -> Getter {
    let entry = Weak::clone(entry);
    let name = name.to_string();
    Arc::new(move || entry.upgrade().and_then(|entry| entry.value_of(&name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Host, Module};
    use spacey_compiler::CompileOutput;

    struct NoopHost;

    impl Host for NoopHost {
        fn execute(&self, _: &Arc<Module>, _: &CompileOutput, _: &Runtime) -> Result<()> {
            Ok(())
        }
    }

    fn runtime(module: &Arc<Module>) -> Runtime {
        Runtime::new(Loader::new(NoopHost), module.entry(), Path::new("m.js"), &[])
    }

    #[test]
    fn test_temporal_guard() {
        let runtime = runtime(&Module::new("m"));

        assert_eq!(runtime.a("x", Some(Value::from(1.0))).unwrap(), Value::Number(1.0));
        assert!(matches!(
            runtime.a("x", None),
            Err(LoaderError::TemporalAccess(name)) if name == "x"
        ));
    }

    #[test]
    fn test_undelivered_import_is_uninitialised() {
        let module = Module::new("m");
        let imports = [ImportBinding {
            local: "y".to_string(),
            specifier: "./n.js".to_string(),
            imported: "x".to_string(),
        }];
        let runtime = Runtime::new(
            Loader::new(NoopHost),
            module.entry(),
            Path::new("m.js"),
            &imports,
        );

        assert!(matches!(
            runtime.a("y", Some(Value::Undefined)),
            Err(LoaderError::TemporalAccess(name)) if name == "y"
        ));
        assert_eq!(runtime.a("z", Some(Value::Undefined)).unwrap(), Value::Undefined);
    }

    #[test]
    fn test_local_exports() {
        let module = Module::new("m");
        let runtime = runtime(&module);

        let getter: Getter = Arc::new(|| Some(Value::from("v")));
        runtime.x(vec![("name", getter)]);
        runtime.j(&["name"]);
        runtime.j(&["name"]);

        assert_eq!(module.exports().get("name"), Some(Value::from("v")));
    }
}
