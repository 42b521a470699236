//! Flat and per-category configuration registries.

use crate::types::ConfigRecord;
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

/// Records of one category, keyed by name.
pub type CategoryMap = IndexMap<String, ConfigRecord>;

/// The result of a load: one active record per name, plus category views of
/// the store rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registry {
    config: IndexMap<String, ConfigRecord>,
    categories: IndexMap<String, CategoryMap>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert into the flat map only, replacing any record with the same name.
    pub fn insert(&mut self, record: ConfigRecord) {
        self.config.insert(record.name.clone(), record);
    }

    /// Insert into the flat map and the record's category bucket.
    ///
    /// The bucket is created on first use; bucket order is first-seen order.
    pub fn insert_categorized(&mut self, record: ConfigRecord) {
        self.categories
            .entry(record.category.clone())
            .or_default()
            .insert(record.name.clone(), record.clone());
        self.insert(record);
    }

    /// Drop everything. Called at the start of each load.
    pub fn clear(&mut self) {
        self.config.clear();
        self.categories.clear();
    }

    /// Flat lookup.
    pub fn get(&self, name: &str) -> Option<&ConfigRecord> {
        self.config.get(name)
    }

    /// Flat lookup returning a zero-value record and `false` on a miss.
    pub fn lookup(&self, name: &str) -> (ConfigRecord, bool) {
        match self.config.get(name) {
            Some(record) => (record.clone(), true),
            None => (ConfigRecord::default(), false),
        }
    }

    /// Value of `name`, if defined.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.config.get(name).map(|r| r.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.config.contains_key(name)
    }

    /// Category-scoped view; empty when the category is unknown.
    pub fn get_category(&self, category: &str) -> Cow<'_, CategoryMap> {
        match self.categories.get(category) {
            Some(map) => Cow::Borrowed(map),
            None => Cow::Owned(CategoryMap::new()),
        }
    }

    /// Category names in first-seen order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// All active records in first-defined order.
    ///
    /// A name replaced by a later layer keeps its original position.
    pub fn records(&self) -> impl Iterator<Item = &ConfigRecord> {
        self.config.values()
    }

    pub fn categories(&self) -> &IndexMap<String, CategoryMap> {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_insert_replaces_earlier() {
        let mut registry = Registry::new();
        registry.insert(ConfigRecord::from_file("MAX_EVENTS", "10"));
        registry.insert_categorized(ConfigRecord::from_store(1, "MAX_EVENTS", "20", "system"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.value("MAX_EVENTS"), Some("20"));
    }

    #[test]
    fn test_lookup_miss_returns_zero_value() {
        let registry = Registry::new();
        let (record, found) = registry.lookup("NoSuchName");
        assert!(!found);
        assert_eq!(record, ConfigRecord::default());
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let registry = Registry::new();
        assert!(registry.get_category("web").is_empty());
    }

    #[test]
    fn test_category_order_is_first_seen() {
        let mut registry = Registry::new();
        registry.insert_categorized(ConfigRecord::from_store(1, "A", "1", "system"));
        registry.insert_categorized(ConfigRecord::from_store(2, "B", "2", "paths"));
        registry.insert_categorized(ConfigRecord::from_store(3, "C", "3", "system"));

        let names: Vec<&str> = registry.category_names().collect();
        assert_eq!(names, vec!["system", "paths"]);
        assert_eq!(registry.get_category("system").len(), 2);
    }

    #[test]
    fn test_uncategorized_records_stay_out_of_buckets() {
        let mut registry = Registry::new();
        registry.insert(ConfigRecord::from_file("ZM_PATH_BIN", "/usr/bin"));
        assert_eq!(registry.category_names().count(), 0);
        assert!(registry.contains("ZM_PATH_BIN"));
    }

    #[test]
    fn test_records_keep_first_defined_position() {
        let mut registry = Registry::new();
        registry.insert(ConfigRecord::from_file("A", "1"));
        registry.insert(ConfigRecord::from_file("B", "2"));
        registry.insert_categorized(ConfigRecord::from_store(1, "A", "3", "system"));

        let names: Vec<&str> = registry.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(registry.value("A"), Some("3"));
    }

    #[test]
    fn test_clear_empties_both_maps() {
        let mut registry = Registry::new();
        registry.insert_categorized(ConfigRecord::from_store(1, "A", "1", "system"));
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.category_names().count(), 0);
    }
}
