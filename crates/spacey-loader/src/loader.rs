//! Load orchestration: reconcile, compile, execute.

use crate::config::LoaderConfig;
use crate::entry::{Entry, EntryState};
use crate::error::{LoaderError, Result};
use crate::host::Host;
use crate::module::Module;
use crate::runtime::Runtime;
use crate::scratch::ScratchCache;
use dashmap::DashMap;
use parking_lot::Mutex;
use spacey_compiler::Compiler;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, debug_span, warn};

/// A loader session.
///
/// Owns the id table, the module cache, the scratch cache and a reusable
/// compiler. Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct Loader {
    inner: Arc<Inner>,
}

struct Inner {
    host: Box<dyn Host>,
    config: LoaderConfig,
    compiler: Mutex<Compiler>,
    scratch: ScratchCache,
    /// Canonical entry per id
    entries: DashMap<String, Arc<Entry>>,
    /// Modules that have started loading
    modules: DashMap<String, Arc<Module>>,
}

impl Loader {
    /// Create a loader with default configuration
    pub fn new(host: impl Host + 'static) -> Self {
        Self::with_config(host, LoaderConfig::default())
    }

    /// Create a loader with explicit configuration
    pub fn with_config(host: impl Host + 'static, config: LoaderConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                host: Box::new(host),
                config,
                compiler: Mutex::new(Compiler::new()),
                scratch: ScratchCache::new(),
                entries: DashMap::new(),
                modules: DashMap::new(),
            }),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    pub fn scratch(&self) -> &ScratchCache {
        &self.inner.scratch
    }

    /// The canonical entry registered for `id`.
    pub fn entry(&self, id: &str) -> Option<Arc<Entry>> {
        self.inner.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// The module that loaded (or is loading) as `id`.
    pub fn module(&self, id: &str) -> Option<Arc<Module>> {
        self.inner.modules.get(id).map(|module| Arc::clone(module.value()))
    }

    /// Builds a module for `id` before its source is known, as `new
    /// Module(id)` would. Its entry becomes canonical for `id` and is merged
    /// into whichever module is loaded for that id later.
    pub fn construct(&self, id: impl Into<String>) -> Arc<Module> {
        let module = Module::new(id);
        self.inner
            .entries
            .insert(module.id().to_string(), module.entry());
        self.inner.scratch.insert(Arc::clone(&module));
        debug!(id = module.id(), "constructed provisional module");
        module
    }

    /// Loads `filename` as a fresh main module.
    ///
    /// The id is the canonical path when the file exists, matching the ids
    /// [`Host::resolve`] produces for imports of the same file.
    pub fn load_main(&self, filename: &Path) -> Result<Arc<Module>> {
        let filename = filename
            .canonicalize()
            .unwrap_or_else(|_| filename.to_path_buf());
        let module = Module::new(filename.display().to_string());
        self.load(&module, &filename)?;
        Ok(module)
    }

    /// Resolves `specifier` from `parent` and returns the entry of the
    /// module it names, loading it first unless it has started loading
    /// already. A module in the middle of loading is returned as is, so
    /// circular imports see its live, partially initialised entry.
    pub fn require(&self, specifier: &str, parent: &Path) -> Result<Arc<Entry>> {
        let filename = self.inner.host.resolve(specifier, parent)?;
        let id = filename.display().to_string();

        if let Some(module) = self.module(&id) {
            return Ok(module.entry());
        }

        let module = Module::new(id);
        self.load(&module, &filename)?;
        Ok(module.entry())
    }

    /// Loads `module` from `filename`.
    ///
    /// Fails with [`LoaderError::AlreadyLoaded`] when the module has
    /// finished loading before. Any other failure leaves the entry in
    /// [`EntryState::Failed`] and is returned unchanged.
    pub fn load(&self, module: &Arc<Module>, filename: &Path) -> Result<()> {
        let span = debug_span!("load", id = module.id());
        let _enter = span.enter();

        if module.loaded() {
            return Err(LoaderError::already_loaded(module.id()));
        }

        let entry = self.reconcile(module);
        self.inner
            .modules
            .insert(module.id().to_string(), Arc::clone(module));

        let result = self.compile_and_execute(module, &entry, filename);
        if let Err(error) = &result {
            warn!(%error, "load failed");
            entry.set_state(EntryState::Failed);
            if self.inner.config.cleanup_on_failure {
                self.cleanup(module, &entry);
            }
        }
        result
    }

    /// Makes the provisional entry constructed for this id, if any, the
    /// module's canonical entry.
    fn reconcile(&self, module: &Arc<Module>) -> Arc<Entry> {
        let id = module.id();
        let mut entry = module.entry();

        if let Some(provisional) = self.inner.scratch.remove(id) {
            let scratch_entry = provisional.entry();
            if !Arc::ptr_eq(&entry, &scratch_entry) {
                debug!("merging provisional entry");
                scratch_entry.adopt(module);
                module.set_entry(Arc::clone(&scratch_entry));
                entry = scratch_entry;
            }
        }

        self.inner.entries.insert(id.to_string(), Arc::clone(&entry));
        entry
    }

    fn compile_and_execute(
        &self,
        module: &Arc<Module>,
        entry: &Arc<Entry>,
        filename: &Path,
    ) -> Result<()> {
        entry.set_state(EntryState::Compiling);
        let source = self.inner.host.read_source(filename)?;
        let options = self.inner.config.compile_options(filename);
        let output = self.inner.compiler.lock().compile(&source, &options)?;
        debug!(esm = output.esm, changed = output.changed, "compiled");

        entry.set_output(output.clone());
        entry.set_state(EntryState::Compiled);

        let runtime = Runtime::new(self.clone(), Arc::clone(entry), filename, &output.imports);
        entry.set_state(EntryState::Executing);
        self.inner.host.execute(module, &output, &runtime)?;

        entry.set_exports(module.exports());
        module.mark_loaded();

        let mut names = entry.export_names();
        if !output.esm && !names.iter().any(|name| name == "default") {
            names.push("default".to_string());
        }
        entry.update(&names);
        entry.set_state(EntryState::Loaded);
        debug!(exports = names.len(), "loaded");
        Ok(())
    }

    fn cleanup(&self, module: &Arc<Module>, entry: &Arc<Entry>) {
        let id = module.id();
        self.inner.scratch.remove(id);
        self.inner
            .entries
            .remove_if(id, |_, registered| Arc::ptr_eq(registered, entry));
        self.inner
            .modules
            .remove_if(id, |_, registered| Arc::ptr_eq(registered, module));
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("config", &self.inner.config)
            .field("entries", &self.inner.entries.len())
            .field("scratch", &self.inner.scratch.len())
            .finish()
    }
}
