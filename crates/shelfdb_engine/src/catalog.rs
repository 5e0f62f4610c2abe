//! Per-database schema state and the upgrade window.

use crate::error::{EngineError, EngineResult};
use crate::store::ObjectStore;
use std::collections::HashMap;

/// The stored state of one named database: its version and its stores.
#[derive(Debug, Clone)]
pub(crate) struct DatabaseState {
    pub(crate) name: String,
    pub(crate) version: u64,
    pub(crate) stores: HashMap<String, ObjectStore>,
}

impl DatabaseState {
    /// A fresh database at version 0 (never opened with a schema).
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 0,
            stores: HashMap::new(),
        }
    }

    /// Store names in sorted order.
    pub(crate) fn store_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stores.keys().cloned().collect();
        names.sort();
        names
    }
}

/// The window in which schema changes are legal.
///
/// Handed to the upgrade hook of a version-raising open. Store creation and
/// deletion are only possible through this context; outside the window the
/// schema is immutable.
pub struct UpgradeContext<'a> {
    db: &'a mut DatabaseState,
    old_version: u64,
    new_version: u64,
}

impl<'a> UpgradeContext<'a> {
    pub(crate) fn new(db: &'a mut DatabaseState, old_version: u64, new_version: u64) -> Self {
        Self {
            db,
            old_version,
            new_version,
        }
    }

    /// The version stored before this upgrade began.
    #[must_use]
    pub fn old_version(&self) -> u64 {
        self.old_version
    }

    /// The version this upgrade is raising the database to.
    #[must_use]
    pub fn new_version(&self) -> u64 {
        self.new_version
    }

    /// Whether a store of this name exists in the schema.
    #[must_use]
    pub fn contains_store(&self, name: &str) -> bool {
        self.db.stores.contains_key(name)
    }

    /// Creates a store keyed by `key_path`. Fails if the name is taken.
    pub fn create_store(&mut self, name: &str, key_path: &str) -> EngineResult<()> {
        if self.db.stores.contains_key(name) {
            return Err(EngineError::upgrade(format!(
                "object store {name} already exists in database {}",
                self.db.name
            )));
        }
        self.db
            .stores
            .insert(name.to_string(), ObjectStore::new(name, key_path));
        Ok(())
    }

    /// Deletes a store and all its records. Fails if the store is absent.
    pub fn delete_store(&mut self, name: &str) -> EngineResult<()> {
        self.db
            .stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EngineError::store_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_contains() {
        let mut db = DatabaseState::new("app");
        let mut ctx = UpgradeContext::new(&mut db, 0, 1);

        assert!(!ctx.contains_store("todos"));
        ctx.create_store("todos", "id").unwrap();
        assert!(ctx.contains_store("todos"));
    }

    #[test]
    fn create_duplicate_store_fails() {
        let mut db = DatabaseState::new("app");
        let mut ctx = UpgradeContext::new(&mut db, 0, 1);

        ctx.create_store("todos", "id").unwrap();
        assert!(matches!(
            ctx.create_store("todos", "id"),
            Err(EngineError::Upgrade { .. })
        ));
    }

    #[test]
    fn delete_store() {
        let mut db = DatabaseState::new("app");
        let mut ctx = UpgradeContext::new(&mut db, 1, 2);

        ctx.create_store("todos", "id").unwrap();
        ctx.delete_store("todos").unwrap();
        assert!(!ctx.contains_store("todos"));

        assert!(matches!(
            ctx.delete_store("todos"),
            Err(EngineError::StoreNotFound { .. })
        ));
    }

    #[test]
    fn versions_are_visible_to_the_hook() {
        let mut db = DatabaseState::new("app");
        db.version = 3;
        let ctx = UpgradeContext::new(&mut db, 3, 5);

        assert_eq!(ctx.old_version(), 3);
        assert_eq!(ctx.new_version(), 5);
    }

    #[test]
    fn store_names_are_sorted() {
        let mut db = DatabaseState::new("app");
        let mut ctx = UpgradeContext::new(&mut db, 0, 1);
        ctx.create_store("todo_notes", "title").unwrap();
        ctx.create_store("personal_notes", "title").unwrap();

        assert_eq!(db.store_names(), vec!["personal_notes", "todo_notes"]);
    }
}
