//! Comparison of two registries, used to report what a reload changed.

use super::registry::Registry;
use crate::types::ConfigRecord;
use serde::Serialize;
use std::fmt;

/// A record whose value or category differs between two registries.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModifiedRecord {
    pub name: String,
    pub old: ConfigRecord,
    pub new: ConfigRecord,
}

/// Differences between an old and a new registry.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RegistryDiff {
    /// Names present only in the new registry.
    pub added: Vec<ConfigRecord>,
    /// Names present only in the old registry.
    pub removed: Vec<ConfigRecord>,
    pub modified: Vec<ModifiedRecord>,
}

impl RegistryDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

impl Registry {
    /// Compare `self` (old) against `newer`.
    pub fn diff(&self, newer: &Registry) -> RegistryDiff {
        let mut diff = RegistryDiff::default();

        for old in self.records() {
            match newer.get(&old.name) {
                None => diff.removed.push(old.clone()),
                Some(new) if new.value != old.value || new.category != old.category => {
                    diff.modified.push(ModifiedRecord {
                        name: old.name.clone(),
                        old: old.clone(),
                        new: new.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        for new in newer.records() {
            if !self.contains(&new.name) {
                diff.added.push(new.clone());
            }
        }

        diff
    }
}

impl fmt::Display for RegistryDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No differences found.");
        }

        if !self.added.is_empty() {
            writeln!(f, "Added ({}):", self.added.len())?;
            for record in &self.added {
                writeln!(f, "  + {} = {}", record.name, record.value)?;
            }
        }
        if !self.removed.is_empty() {
            writeln!(f, "Removed ({}):", self.removed.len())?;
            for record in &self.removed {
                writeln!(f, "  - {} = {}", record.name, record.value)?;
            }
        }
        if !self.modified.is_empty() {
            writeln!(f, "Modified ({}):", self.modified.len())?;
            for m in &self.modified {
                writeln!(f, "  ~ {}: {} -> {}", m.name, m.old.value, m.new.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: &[(&str, &str)]) -> Registry {
        let mut registry = Registry::new();
        for (name, value) in entries {
            registry.insert(ConfigRecord::from_file(*name, *value));
        }
        registry
    }

    #[test]
    fn test_identical_registries_have_no_diff() {
        let a = registry(&[("A", "1"), ("B", "2")]);
        let diff = a.diff(&a.clone());
        assert!(diff.is_empty());
        assert_eq!(diff.to_string(), "No differences found.\n");
    }

    #[test]
    fn test_added_removed_modified() {
        let old = registry(&[("A", "1"), ("B", "2")]);
        let new = registry(&[("B", "3"), ("C", "4")]);
        let diff = old.diff(&new);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].name, "C");
        assert_eq!(diff.removed[0].name, "A");
        assert_eq!(diff.modified[0].name, "B");
        assert_eq!(diff.change_count(), 3);

        let text = diff.to_string();
        assert!(text.contains("~ B: 2 -> 3"));
    }

    #[test]
    fn test_category_change_is_modification() {
        let mut old = Registry::new();
        old.insert_categorized(ConfigRecord::from_store(1, "A", "1", "system"));
        let mut new = Registry::new();
        new.insert_categorized(ConfigRecord::from_store(1, "A", "1", "web"));

        assert_eq!(old.diff(&new).modified.len(), 1);
    }
}
