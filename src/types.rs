//! Core types for configuration records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned to records that do not come from the store.
pub const UNCATEGORIZED: &str = "";

/// Layer a record was loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Application-supplied default, below the file layer.
    Default,
    /// Line from the key/value config file.
    #[default]
    File,
    /// Row from the `Config` table.
    Store,
    /// Computed from other records after loading.
    Derived,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSource::Default => write!(f, "default"),
            RecordSource::File => write!(f, "file"),
            RecordSource::Store => write!(f, "store"),
            RecordSource::Derived => write!(f, "derived"),
        }
    }
}

/// One configuration entry. Values are opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Store row id; 0 for records that did not come from the store.
    pub id: i64,
    pub name: String,
    pub value: String,
    pub category: String,
    #[serde(default)]
    pub source: RecordSource,
}

impl ConfigRecord {
    /// A record parsed from the config file.
    pub fn from_file(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            value: value.into(),
            category: UNCATEGORIZED.to_string(),
            source: RecordSource::File,
        }
    }

    /// A row fetched from the store.
    pub fn from_store(
        id: i64,
        name: impl Into<String>,
        value: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            value: value.into(),
            category: category.into(),
            source: RecordSource::Store,
        }
    }

    pub fn with_source(mut self, source: RecordSource) -> Self {
        self.source = source;
        self
    }
}
