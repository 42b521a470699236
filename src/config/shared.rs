//! Shared, atomically swapped registry snapshots.
//!
//! Readers take a full snapshot and never see a registry mid-rebuild.
//! Reloads are serialised; each builds a new registry off to the side and
//! swaps it in once complete.

use super::diff::RegistryDiff;
use super::loader::{ConfigLoader, LoadReport};
use super::registry::Registry;
use super::store::ConfigStore;
use super::symbols::SymbolTable;
use crate::error::Result;
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex};

/// A registry shared between threads.
#[derive(Debug)]
pub struct SharedRegistry {
    current: ArcSwap<Registry>,
    reload_lock: Mutex<()>,
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
            reload_lock: Mutex::new(()),
        }
    }

    /// The current registry.
    pub fn snapshot(&self) -> Arc<Registry> {
        self.current.load_full()
    }

    /// Rebuild from `loader` and `store`, then swap in the result.
    ///
    /// On error the previous registry stays in place.
    pub fn reload(
        &self,
        loader: &ConfigLoader,
        store: &dyn ConfigStore,
        symbols: Option<&SymbolTable>,
    ) -> Result<(RegistryDiff, LoadReport)> {
        let _guard = self.reload_lock.lock().unwrap_or_else(|e| e.into_inner());
        let (registry, report) = loader.load_with_symbols(store, symbols)?;
        let previous = self.current.swap(Arc::new(registry));
        let diff = previous.diff(&self.current.load());
        Ok((diff, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfigRecord;
    use tempfile::TempDir;

    #[test]
    fn test_reload_swaps_and_reports_changes() {
        let temp = TempDir::new().unwrap();
        let conf = temp.path().join("zm.conf");
        std::fs::write(&conf, "MAX_EVENTS = 10\n").unwrap();
        let loader = ConfigLoader::new(&conf).with_working_dir(temp.path().join("cwd"));
        let shared = SharedRegistry::default();

        let (diff, _) = shared.reload(&loader, &Vec::<ConfigRecord>::new(), None).unwrap();
        assert_eq!(diff.added.len(), 1);
        let before = shared.snapshot();

        let rows = vec![ConfigRecord::from_store(1, "MAX_EVENTS", "20", "system")];
        let (diff, _) = shared.reload(&loader, &rows, None).unwrap();
        assert_eq!(diff.modified.len(), 1);

        assert_eq!(before.value("MAX_EVENTS"), Some("10"));
        assert_eq!(shared.snapshot().value("MAX_EVENTS"), Some("20"));
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let temp = TempDir::new().unwrap();
        let conf = temp.path().join("zm.conf");
        std::fs::write(&conf, "A=1\n").unwrap();
        let loader = ConfigLoader::new(&conf).with_working_dir(temp.path().join("cwd"));
        let shared = SharedRegistry::default();
        shared.reload(&loader, &Vec::<ConfigRecord>::new(), None).unwrap();

        std::fs::remove_file(&conf).unwrap();
        assert!(shared.reload(&loader, &Vec::<ConfigRecord>::new(), None).is_err());
        assert_eq!(shared.snapshot().value("A"), Some("1"));
    }
}
