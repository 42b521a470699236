//! Settings for the loader itself.
//!
//! Discovery order (first found wins):
//! 1. `ZMCONF_SETTINGS` - explicit settings file
//! 2. `./zmconf.yaml`
//! 3. `~/.zmconf/zmconf.yaml`
//! 4. Built-in defaults
//!
//! `ZMCONF_CONFIG_FILE` and `ZMCONF_DB_PATH` are applied on top.

use super::store::StorePolicy;
use super::symbols::SymbolPolicy;
use crate::error::{ConfigError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Installed key/value config file.
    #[serde(default = "default_config_file")]
    pub config_file: PathBuf,

    /// Directory searched for a local override (default: current directory).
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// SQLite database holding the `Config` table.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default)]
    pub store_policy: StorePolicy,

    #[serde(default)]
    pub symbol_policy: SymbolPolicy,

    /// Legacy per-line read bound; unbounded when absent.
    #[serde(default)]
    pub max_line_len: Option<usize>,

    /// Values applied below the config file.
    #[serde(default)]
    pub defaults: IndexMap<String, String>,

    /// `${NAME}` templates evaluated after loading.
    #[serde(default)]
    pub derived: IndexMap<String, String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            config_file: default_config_file(),
            working_dir: None,
            db_path: default_db_path(),
            store_policy: StorePolicy::default(),
            symbol_policy: SymbolPolicy::default(),
            max_line_len: None,
            defaults: IndexMap::new(),
            derived: IndexMap::new(),
        }
    }
}

fn default_config_file() -> PathBuf {
    PathBuf::from("/etc/zm/zm.conf")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("zm.db")
}

impl AppSettings {
    /// Load settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Settings(format!("{}: {}", path.display(), e)))?;
        let settings: AppSettings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Candidate settings files in priority order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(explicit) = std::env::var("ZMCONF_SETTINGS") {
            paths.push(PathBuf::from(explicit));
            return paths;
        }
        paths.push(PathBuf::from("zmconf.yaml"));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".zmconf").join("zmconf.yaml"));
        }
        paths
    }

    /// Discover settings, then apply environment overrides.
    ///
    /// An explicit `ZMCONF_SETTINGS` file must exist; discovered files are
    /// optional.
    pub fn discover() -> Result<Self> {
        let explicit = std::env::var_os("ZMCONF_SETTINGS").is_some();
        let mut settings = None;
        for path in Self::search_paths() {
            if explicit || path.exists() {
                settings = Some(Self::load(&path)?);
                break;
            }
        }
        let mut settings = settings.unwrap_or_default();
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Apply `ZMCONF_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(config_file) = std::env::var("ZMCONF_CONFIG_FILE") {
            self.config_file = PathBuf::from(config_file);
        }
        if let Ok(db_path) = std::env::var("ZMCONF_DB_PATH") {
            self.db_path = PathBuf::from(db_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.config_file, PathBuf::from("/etc/zm/zm.conf"));
        assert_eq!(settings.store_policy, StorePolicy::Lenient);
        assert_eq!(settings.symbol_policy, SymbolPolicy::DefineOnce);
        assert!(settings.max_line_len.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("zmconf.yaml");
        std::fs::write(
            &path,
            r#"
config_file: /usr/local/etc/zm.conf
store_policy: strict
max_line_len: 256
derived:
  ZMU_PATH: "${ZM_PATH_BIN}/zmu"
"#,
        )
        .unwrap();

        let settings = AppSettings::load(&path).unwrap();
        assert_eq!(settings.config_file, PathBuf::from("/usr/local/etc/zm.conf"));
        assert_eq!(settings.store_policy, StorePolicy::Strict);
        assert_eq!(settings.max_line_len, Some(256));
        assert_eq!(settings.db_path, PathBuf::from("zm.db"));
        assert_eq!(settings.derived["ZMU_PATH"], "${ZM_PATH_BIN}/zmu");
    }

    #[test]
    fn test_malformed_yaml_is_settings_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("zmconf.yaml");
        std::fs::write(&path, "store_policy: [not, a, policy]\n").unwrap();

        let err = AppSettings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn test_missing_file_is_settings_error() {
        let temp = TempDir::new().unwrap();
        let err = AppSettings::load(temp.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }
}
