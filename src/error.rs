//! Structured error types for configuration loading.

use std::path::PathBuf;

/// Errors raised while resolving, parsing or merging configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither the local override nor the installed file could be opened.
    #[error(
        "could not open config file: tried {} and {}",
        .local.display(),
        .canonical.display()
    )]
    FileUnavailable { canonical: PathBuf, local: PathBuf },

    /// The backing store query could not run.
    #[error("config store unavailable: {0}")]
    StoreUnavailable(String),

    /// A process-wide symbol already holds a different value.
    #[error("symbol {name} already defined as {existing:?}, refusing {attempted:?}")]
    SymbolConflict {
        name: String,
        existing: String,
        attempted: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tool's own settings file is unreadable or malformed.
    #[error("invalid settings: {0}")]
    Settings(String),
}

impl ConfigError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(err.to_string())
    }

    /// Whether the error must abort startup regardless of policy.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConfigError::FileUnavailable { .. } | ConfigError::Io(_) | ConfigError::Settings(_)
        )
    }
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::store(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Settings(err.to_string())
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_unavailable_names_both_paths() {
        let err = ConfigError::FileUnavailable {
            canonical: PathBuf::from("/etc/zm/zm.conf"),
            local: PathBuf::from("zm.conf"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/zm/zm.conf"));
        assert!(msg.contains("zm.conf"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_symbol_conflict_is_not_fatal() {
        let err = ConfigError::SymbolConflict {
            name: "ZM_PATH_WEB".into(),
            existing: "/a".into(),
            attempted: "/b".into(),
        };
        assert!(!err.is_fatal());
        assert!(!ConfigError::store("locked").is_fatal());
    }
}
