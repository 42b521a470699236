//! Layered configuration loader.
//!
//! Layers are applied in a fixed order, each replacing same-named records
//! from the one before:
//! 1. **Defaults** - supplied by the application
//! 2. **File** - the resolved key/value config file
//! 3. **Store** - rows of the `Config` table, ascending by id
//! 4. **Derived** - templates over the above, only for names still undefined
//!
//! Records are built first; publishing them as process-wide symbols is a
//! separate, optional pass over the finished registry.

use super::derived;
use super::files::{FileResolver, ResolvedFile};
use super::parser::{LineLimit, parse_lines};
use super::registry::Registry;
use super::settings::AppSettings;
use super::store::{ConfigStore, StorePolicy, load_store_rows};
use super::symbols::{self, ProjectionStats, SymbolPolicy, SymbolTable};
use crate::error::{ConfigError, Result};
use crate::logging::ExecutionContext;
use crate::types::{ConfigRecord, RecordSource};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Summary of one load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub file: ResolvedFile,
    pub file_entries: usize,
    pub store_rows: usize,
    pub derived: usize,
    pub symbols: Option<ProjectionStats>,
    pub loaded_at: DateTime<Utc>,
}

/// Builds a [`Registry`] from the config file and a store.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    resolver: FileResolver,
    line_limit: LineLimit,
    store_policy: StorePolicy,
    symbol_policy: SymbolPolicy,
    defaults: IndexMap<String, String>,
    derived: IndexMap<String, String>,
}

impl ConfigLoader {
    /// Loader for the installed config file at `canonical`.
    pub fn new(canonical: impl Into<PathBuf>) -> Self {
        Self {
            resolver: FileResolver::new(canonical),
            line_limit: LineLimit::default(),
            store_policy: StorePolicy::default(),
            symbol_policy: SymbolPolicy::default(),
            defaults: IndexMap::new(),
            derived: IndexMap::new(),
        }
    }

    /// Loader configured from the tool's settings.
    pub fn from_settings(settings: &AppSettings) -> Self {
        let mut loader = Self::new(&settings.config_file)
            .with_line_limit(LineLimit::from_setting(settings.max_line_len))
            .with_store_policy(settings.store_policy)
            .with_symbol_policy(settings.symbol_policy)
            .with_defaults(settings.defaults.clone())
            .with_derived(settings.derived.clone());
        if let Some(ref dir) = settings.working_dir {
            loader = loader.with_working_dir(dir);
        }
        loader
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resolver = self.resolver.with_working_dir(dir);
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.resolver = self.resolver.with_context(context);
        self
    }

    pub fn with_line_limit(mut self, limit: LineLimit) -> Self {
        self.line_limit = limit;
        self
    }

    pub fn with_store_policy(mut self, policy: StorePolicy) -> Self {
        self.store_policy = policy;
        self
    }

    pub fn with_symbol_policy(mut self, policy: SymbolPolicy) -> Self {
        self.symbol_policy = policy;
        self
    }

    pub fn with_defaults(mut self, defaults: IndexMap<String, String>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_derived(mut self, derived: IndexMap<String, String>) -> Self {
        self.derived = derived;
        self
    }

    pub fn resolver(&self) -> &FileResolver {
        &self.resolver
    }

    /// Rebuild `registry` from scratch.
    pub fn load_into(&self, registry: &mut Registry, store: &dyn ConfigStore) -> Result<LoadReport> {
        registry.clear();

        for (name, value) in &self.defaults {
            registry.insert(
                ConfigRecord::from_file(name, value).with_source(RecordSource::Default),
            );
        }

        // Handle is closed when `reader` drops, on every path out of this block.
        let (file, file_entries) = {
            let (resolved, handle) = self.resolver.open()?;
            let reader = BufReader::new(handle);
            let mut count = 0;
            for pair in parse_lines(reader, self.line_limit) {
                let (name, value) = pair.map_err(|e| {
                    ConfigError::Io(std::io::Error::new(
                        e.kind(),
                        format!("reading {}: {}", resolved.path.display(), e),
                    ))
                })?;
                registry.insert(ConfigRecord::from_file(name, value));
                count += 1;
            }
            (resolved, count)
        };
        debug!(path = %file.path.display(), entries = file_entries, "Parsed config file");

        let rows = load_store_rows(store, self.store_policy)?;
        let store_rows = rows.len();
        for row in rows {
            registry.insert_categorized(row);
        }

        let mut derived_count = 0;
        for (name, template) in &self.derived {
            if registry.contains(name) {
                continue;
            }
            match derived::expand(template, registry) {
                Ok(value) => {
                    registry.insert(
                        ConfigRecord::from_file(name, value).with_source(RecordSource::Derived),
                    );
                    derived_count += 1;
                }
                Err(missing) => {
                    warn!(name = %name, missing = %missing, "Cannot derive value, reference undefined");
                }
            }
        }

        info!(
            path = %file.path.display(),
            source = %file.source,
            file_entries,
            store_rows,
            total = registry.len(),
            "Configuration loaded"
        );

        Ok(LoadReport {
            file,
            file_entries,
            store_rows,
            derived: derived_count,
            symbols: None,
            loaded_at: Utc::now(),
        })
    }

    /// Build a fresh registry, optionally publishing it to `symbols`.
    pub fn load_with_symbols(
        &self,
        store: &dyn ConfigStore,
        symbols: Option<&SymbolTable>,
    ) -> Result<(Registry, LoadReport)> {
        let mut registry = Registry::new();
        let mut report = self.load_into(&mut registry, store)?;
        if let Some(table) = symbols {
            let stats = table.project(registry.records(), self.symbol_policy);
            if stats.conflicts > 0 {
                warn!(conflicts = stats.conflicts, "Some symbols kept earlier values");
            }
            report.symbols = Some(stats);
        }
        Ok((registry, report))
    }

    /// Build a fresh registry; with `define_symbols`, also publish it to the
    /// process-wide symbol table.
    pub fn load(&self, store: &dyn ConfigStore, define_symbols: bool) -> Result<Registry> {
        let table = define_symbols.then(symbols::global);
        self.load_with_symbols(store, table)
            .map(|(registry, _)| registry)
    }
}
