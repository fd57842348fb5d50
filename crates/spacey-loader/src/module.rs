//! The host-facing module object.

use crate::entry::Entry;
use crate::value::Exports;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A CommonJS-style module: an id, a mutable `exports` object and a
/// `loaded` flag.
///
/// The bookkeeping needed for live bindings lives in the module's
/// [`Entry`], which may be swapped for a canonical one during loading.
#[derive(Debug)]
pub struct Module {
    id: String,
    exports: RwLock<Exports>,
    loaded: AtomicBool,
    entry: RwLock<Option<Arc<Entry>>>,
}

impl Module {
    /// A fresh, unloaded module with empty exports.
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            exports: RwLock::new(Exports::new()),
            loaded: AtomicBool::new(false),
            entry: RwLock::new(None),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Handle to the current `module.exports`.
    pub fn exports(&self) -> Exports {
        self.exports.read().clone()
    }

    /// Replaces `module.exports`.
    pub fn set_exports(&self, exports: Exports) {
        *self.exports.write() = exports;
    }

    pub fn loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub(crate) fn mark_loaded(&self) {
        self.loaded.store(true, Ordering::Release);
    }

    /// The module's entry, created on first use.
    pub fn entry(self: &Arc<Self>) -> Arc<Entry> {
        if let Some(entry) = self.entry.read().as_ref() {
            return Arc::clone(entry);
        }

        let mut slot = self.entry.write();
        Arc::clone(slot.get_or_insert_with(|| Arc::new(Entry::new(self))))
    }

    pub(crate) fn set_entry(&self, entry: Arc<Entry>) {
        *self.entry.write() = Some(entry);
    }
}
