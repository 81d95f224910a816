//! Record store
//!
//! Base records as loaded from game data, and the working copies the
//! editor mutates. Every name has at most one base and at most one
//! working record; records without a base were created in the editor.
//!
//! Author: Moroya Sakamoto

use std::collections::BTreeMap;

use crate::emit::Record;

/// Read access to base and working records by name.
pub trait RecordStore<R> {
    /// Working copy of `name`.
    fn lookup(&self, name: &str) -> Option<&R>;

    /// Unedited base definition of `name`, if it came from game data.
    fn base_lookup(&self, name: &str) -> Option<&R>;

    /// Is there a working copy of `name`?
    fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// In-memory store for one record kind, ordered by name.
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    base: BTreeMap<String, R>,
    working: BTreeMap<String, R>,
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Self {
            base: BTreeMap::new(),
            working: BTreeMap::new(),
        }
    }
}

impl<R: Record> Catalog<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a record from game data: it becomes both the base and the
    /// working copy.
    pub fn insert_base(&mut self, record: R) {
        let name = String::from(record.name());
        self.working.insert(name.clone(), record.clone());
        self.base.insert(name, record);
    }

    /// Working copy of `name`, creating an empty record if missing.
    pub fn get_or_create(&mut self, name: &str) -> &mut R {
        self.working
            .entry(String::from(name))
            .or_insert_with(|| R::named(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut R> {
        self.working.get_mut(name)
    }

    pub fn has_base(&self, name: &str) -> bool {
        self.base.contains_key(name)
    }

    /// Move the working copy of `old` to `new`. Fails if `old` is missing
    /// or `new` is taken.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.working.contains_key(new) {
            return false;
        }
        let Some(mut record) = self.working.remove(old) else {
            return false;
        };
        record.set_name(new);
        self.working.insert(String::from(new), record);
        true
    }

    /// Drop the working copy of `name`. The base, if any, is untouched.
    pub fn erase(&mut self, name: &str) -> Option<R> {
        self.working.remove(name)
    }

    /// Replace (or recreate) a working copy with `record`.
    pub fn restore(&mut self, record: R) {
        self.working.insert(String::from(record.name()), record);
    }

    /// Working record names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.working.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }
}

impl<R: Record> RecordStore<R> for Catalog<R> {
    fn lookup(&self, name: &str) -> Option<&R> {
        self.working.get(name)
    }

    fn base_lookup(&self, name: &str) -> Option<&R> {
        self.base.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Fleet;

    fn catalog() -> Catalog<Fleet> {
        let mut catalog = Catalog::new();
        let mut raid = Fleet::new("Pirate Raid");
        raid.cargo = 0;
        catalog.insert_base(raid);
        catalog
    }

    #[test]
    fn test_insert_base_loads_both_copies() {
        let catalog = catalog();
        assert!(catalog.exists("Pirate Raid"));
        assert_eq!(catalog.lookup("Pirate Raid"), catalog.base_lookup("Pirate Raid"));
        assert!(catalog.has_base("Pirate Raid"));
    }

    #[test]
    fn test_edits_leave_base_untouched() {
        let mut catalog = catalog();
        catalog.get_mut("Pirate Raid").unwrap().cargo = 5;
        assert_eq!(catalog.lookup("Pirate Raid").unwrap().cargo, 5);
        assert_eq!(catalog.base_lookup("Pirate Raid").unwrap().cargo, 0);
    }

    #[test]
    fn test_get_or_create_has_no_base() {
        let mut catalog = catalog();
        catalog.get_or_create("Merchants").cargo = 2;
        assert!(catalog.exists("Merchants"));
        assert!(catalog.base_lookup("Merchants").is_none());
        assert_eq!(catalog.get_or_create("Merchants").cargo, 2);
    }

    #[test]
    fn test_rename_updates_record_name() {
        let mut catalog = catalog();
        catalog.get_or_create("Scouts");
        assert!(catalog.rename("Scouts", "Recon"));
        assert!(!catalog.exists("Scouts"));
        assert_eq!(catalog.lookup("Recon").unwrap().name, "Recon");
    }

    #[test]
    fn test_rename_rejects_taken_or_missing() {
        let mut catalog = catalog();
        catalog.get_or_create("Scouts");
        assert!(!catalog.rename("Scouts", "Pirate Raid"));
        assert!(!catalog.rename("Nobody", "Someone"));
        assert!(catalog.exists("Scouts"));
    }

    #[test]
    fn test_erase_and_restore() {
        let mut catalog = catalog();
        let erased = catalog.erase("Pirate Raid").unwrap();
        assert!(!catalog.exists("Pirate Raid"));
        assert!(catalog.base_lookup("Pirate Raid").is_some());
        catalog.restore(erased);
        assert!(catalog.exists("Pirate Raid"));
    }

    #[test]
    fn test_names_sorted() {
        let mut catalog = catalog();
        catalog.get_or_create("Alpha");
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["Alpha", "Pirate Raid"]);
        assert_eq!(catalog.len(), 2);
    }
}
