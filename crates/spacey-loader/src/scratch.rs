//! Provisional modules created before their source is known.

use crate::module::Module;
use dashmap::DashMap;
use std::sync::Arc;

/// Maps module ids to modules built by explicit construction.
///
/// Populated by [`Loader::construct`](crate::Loader::construct) and drained
/// when the real module for that id is loaded.
#[derive(Debug, Default)]
pub struct ScratchCache {
    modules: DashMap<String, Arc<Module>>,
}

impl ScratchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Module>> {
        self.modules.get(id).map(|module| Arc::clone(module.value()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn insert(&self, module: Arc<Module>) {
        self.modules.insert(module.id().to_string(), module);
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Module>> {
        self.modules.remove(id).map(|(_, module)| module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let cache = ScratchCache::new();
        let module = Module::new("/app/a.js");
        cache.insert(Arc::clone(&module));

        assert!(cache.contains("/app/a.js"));
        assert!(Arc::ptr_eq(&cache.get("/app/a.js").unwrap(), &module));
        assert!(cache.remove("/app/a.js").is_some());
        assert!(cache.remove("/app/a.js").is_none());
        assert!(cache.is_empty());
    }
}
