//! Store row loading.

use crate::error::Result;
use crate::types::ConfigRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Source of configuration rows.
pub trait ConfigStore {
    /// All configuration rows, ascending by id.
    fn fetch_all_config(&self) -> Result<Vec<ConfigRecord>>;
}

/// A fixed set of rows; useful when no store is configured.
impl ConfigStore for Vec<ConfigRecord> {
    fn fetch_all_config(&self) -> Result<Vec<ConfigRecord>> {
        let mut rows = self.clone();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }
}

/// What to do when the store query fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorePolicy {
    /// Log the failure and continue with no store rows.
    #[default]
    Lenient,
    /// Propagate the failure.
    Strict,
}

/// Fetch store rows, applying `policy` on failure.
pub fn load_store_rows(store: &dyn ConfigStore, policy: StorePolicy) -> Result<Vec<ConfigRecord>> {
    match store.fetch_all_config() {
        Ok(rows) => {
            debug!(rows = rows.len(), "Loaded config rows from store");
            Ok(rows)
        }
        Err(e) => match policy {
            StorePolicy::Strict => Err(e),
            StorePolicy::Lenient => {
                error!("{}; continuing without store configuration", e);
                Ok(Vec::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    struct BrokenStore;

    impl ConfigStore for BrokenStore {
        fn fetch_all_config(&self) -> Result<Vec<ConfigRecord>> {
            Err(ConfigError::store("no such table: Config"))
        }
    }

    #[test]
    fn test_lenient_policy_yields_no_rows() {
        let rows = load_store_rows(&BrokenStore, StorePolicy::Lenient).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_strict_policy_propagates() {
        let err = load_store_rows(&BrokenStore, StorePolicy::Strict).unwrap_err();
        assert!(matches!(err, ConfigError::StoreUnavailable(_)));
    }

    #[test]
    fn test_static_rows_are_ordered_by_id() {
        let rows = vec![
            ConfigRecord::from_store(2, "B", "2", "system"),
            ConfigRecord::from_store(1, "A", "1", "system"),
        ];
        let loaded = load_store_rows(&rows, StorePolicy::Strict).unwrap();
        assert_eq!(loaded[0].name, "A");
        assert_eq!(loaded[1].name, "B");
    }
}
