//! Process-wide named constants.
//!
//! A [`SymbolTable`] mirrors the registry as plain `name -> value` pairs for
//! code that wants direct access without a registry handle. A name holds one
//! value; redefining it with a different value is a conflict unless the
//! caller asks to overwrite.

use crate::error::{ConfigError, Result};
use crate::types::ConfigRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};
use tracing::{debug, warn};

/// How projection handles a name that already holds a different value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPolicy {
    /// Keep the existing value and log a warning.
    #[default]
    DefineOnce,
    /// Replace the existing value.
    Overwrite,
}

/// Outcome of a single definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defined {
    New,
    Unchanged,
    Replaced,
}

/// Counts from projecting a registry into a symbol table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    pub defined: usize,
    pub unchanged: usize,
    pub replaced: usize,
    pub conflicts: usize,
}

/// Thread-safe name/value table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: RwLock<HashMap<String, String>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`. Identical redefinition is a no-op; a different value
    /// is a [`ConfigError::SymbolConflict`].
    pub fn define(&self, name: &str, value: &str) -> Result<Defined> {
        let mut symbols = self.symbols.write().unwrap_or_else(|e| e.into_inner());
        match symbols.get(name) {
            Some(existing) if existing == value => Ok(Defined::Unchanged),
            Some(existing) => Err(ConfigError::SymbolConflict {
                name: name.to_string(),
                existing: existing.clone(),
                attempted: value.to_string(),
            }),
            None => {
                symbols.insert(name.to_string(), value.to_string());
                Ok(Defined::New)
            }
        }
    }

    /// Define or replace `name`.
    pub fn redefine(&self, name: &str, value: &str) -> Defined {
        let mut symbols = self.symbols.write().unwrap_or_else(|e| e.into_inner());
        match symbols.insert(name.to_string(), value.to_string()) {
            None => Defined::New,
            Some(old) if old == value => Defined::Unchanged,
            Some(_) => Defined::Replaced,
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        let symbols = self.symbols.read().unwrap_or_else(|e| e.into_inner());
        symbols.get(name).cloned()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        let symbols = self.symbols.read().unwrap_or_else(|e| e.into_inner());
        symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Publish each record as a symbol. Conflicts are logged, never fatal.
    pub fn project<'a>(
        &self,
        records: impl IntoIterator<Item = &'a ConfigRecord>,
        policy: SymbolPolicy,
    ) -> ProjectionStats {
        let mut stats = ProjectionStats::default();
        for record in records {
            let outcome = match policy {
                SymbolPolicy::Overwrite => Ok(self.redefine(&record.name, &record.value)),
                SymbolPolicy::DefineOnce => self.define(&record.name, &record.value),
            };
            match outcome {
                Ok(Defined::New) => stats.defined += 1,
                Ok(Defined::Unchanged) => stats.unchanged += 1,
                Ok(Defined::Replaced) => {
                    debug!(name = %record.name, "Symbol replaced");
                    stats.replaced += 1;
                }
                Err(e) => {
                    warn!("{}; keeping existing value", e);
                    stats.conflicts += 1;
                }
            }
        }
        stats
    }
}

static GLOBAL: OnceLock<SymbolTable> = OnceLock::new();

/// The process-wide symbol table, created on first use.
pub fn global() -> &'static SymbolTable {
    GLOBAL.get_or_init(SymbolTable::new)
}

/// Resolve a process-wide symbol.
pub fn symbol(name: &str) -> Option<String> {
    global().get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_redefinition_is_noop() {
        let table = SymbolTable::new();
        assert_eq!(table.define("ZM_PATH_BIN", "/usr/bin").unwrap(), Defined::New);
        assert_eq!(
            table.define("ZM_PATH_BIN", "/usr/bin").unwrap(),
            Defined::Unchanged
        );
    }

    #[test]
    fn test_conflicting_definition_fails() {
        let table = SymbolTable::new();
        table.define("ZM_PATH_BIN", "/usr/bin").unwrap();
        let err = table.define("ZM_PATH_BIN", "/opt/bin").unwrap_err();
        assert!(matches!(err, ConfigError::SymbolConflict { .. }));
        assert_eq!(table.get("ZM_PATH_BIN").as_deref(), Some("/usr/bin"));
    }

    #[test]
    fn test_project_define_once_keeps_first() {
        let table = SymbolTable::new();
        let first = [ConfigRecord::from_file("A", "1")];
        let second = [ConfigRecord::from_file("A", "2"), ConfigRecord::from_file("B", "3")];

        table.project(&first, SymbolPolicy::DefineOnce);
        let stats = table.project(&second, SymbolPolicy::DefineOnce);

        assert_eq!(stats.conflicts, 1);
        assert_eq!(stats.defined, 1);
        assert_eq!(table.get("A").as_deref(), Some("1"));
    }

    #[test]
    fn test_project_overwrite_replaces() {
        let table = SymbolTable::new();
        table.project(&[ConfigRecord::from_file("A", "1")], SymbolPolicy::Overwrite);
        let stats = table.project(&[ConfigRecord::from_file("A", "2")], SymbolPolicy::Overwrite);

        assert_eq!(stats.replaced, 1);
        assert_eq!(table.get("A").as_deref(), Some("2"));
    }

    #[test]
    fn test_global_is_shared() {
        global().redefine("ZMCONF_TEST_GLOBAL_SYMBOL", "yes");
        assert_eq!(symbol("ZMCONF_TEST_GLOBAL_SYMBOL").as_deref(), Some("yes"));
    }
}
