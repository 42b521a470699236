//! Layered configuration.
//!
//! Resolves the key/value config file (preferring a non-empty local copy over
//! the installed one), parses it, merges rows from the `Config` table on top,
//! and exposes the result as a flat registry with per-category views.
//!
//! ## Layer order
//! defaults < file < store < derived (derived only fills undefined names)
//!
//! ## Environment Variables
//! - `ZMCONF_SETTINGS` - Explicit settings file
//! - `ZMCONF_CONFIG_FILE` - Installed config file path
//! - `ZMCONF_DB_PATH` - SQLite database path

mod derived;
mod diff;
mod files;
mod loader;
mod parser;
mod registry;
mod settings;
mod shared;
mod store;
pub mod symbols;
pub mod watcher;

pub use diff::{ModifiedRecord, RegistryDiff};
pub use files::{FileResolver, FileSource, ResolvedFile};
pub use loader::{ConfigLoader, LoadReport};
pub use parser::{Assignments, Line, LineLimit, parse_line, parse_lines};
pub use registry::{CategoryMap, Registry};
pub use settings::AppSettings;
pub use shared::SharedRegistry;
pub use store::{ConfigStore, StorePolicy, load_store_rows};
pub use symbols::{Defined, ProjectionStats, SymbolPolicy, SymbolTable};
