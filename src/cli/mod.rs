//! CLI command definitions for zmconf.
//!
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod show;
pub mod watch;

use crate::config::{AppSettings, ConfigLoader, ConfigStore, StorePolicy};
use crate::db::Database;
use crate::logging::ExecutionContext;
use crate::types::ConfigRecord;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use show::{CategoryArgs, GetArgs, ShowArgs};
use std::path::PathBuf;
use tracing::error;

/// Layered configuration resolver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings file
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Installed config file (overrides settings)
    #[arg(short, long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Path to database file (overrides settings)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Fail when the store cannot be queried instead of continuing without it
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show which config file would be used and why
    Resolve,

    /// Load and print every active configuration value
    Show(ShowArgs),

    /// Print the value of one name
    Get(GetArgs),

    /// Print the records of one category
    Category(CategoryArgs),

    /// List category names in first-seen order
    Categories,

    /// Load, then reload whenever the config file changes
    Watch,
}

impl Cli {
    /// Resolve settings: file or discovery, then CLI overrides.
    pub fn settings(&self) -> Result<AppSettings> {
        let mut settings = match self.settings {
            Some(ref path) => {
                let mut settings = AppSettings::load(path)?;
                settings.apply_env_overrides();
                settings
            }
            None => AppSettings::discover()?,
        };
        if let Some(ref config_file) = self.config_file {
            settings.config_file = config_file.clone();
        }
        if let Some(ref database) = self.database {
            settings.db_path = database.clone();
        }
        if self.strict {
            settings.store_policy = StorePolicy::Strict;
        }
        Ok(settings)
    }
}

/// Build a loader for the current process.
pub fn loader_for(settings: &AppSettings) -> ConfigLoader {
    ConfigLoader::from_settings(settings).with_context(ExecutionContext::detect())
}

/// Open the configured store read-only.
///
/// Under the lenient policy an unopenable database is logged and replaced
/// by an empty store, so file configuration still loads.
pub fn open_store(settings: &AppSettings) -> Result<Box<dyn ConfigStore>> {
    match Database::open_read_only(&settings.db_path) {
        Ok(db) => Ok(Box::new(db)),
        Err(e) => match settings.store_policy {
            StorePolicy::Strict => Err(e)
                .with_context(|| format!("opening database {}", settings.db_path.display())),
            StorePolicy::Lenient => {
                error!(
                    path = %settings.db_path.display(),
                    "{}; continuing without store configuration", e
                );
                Ok(Box::new(Vec::<ConfigRecord>::new()))
            }
        },
    }
}
