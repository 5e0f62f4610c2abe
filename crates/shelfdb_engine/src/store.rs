//! Object store: a named table of records keyed by a declared field.

use crate::error::{EngineError, EngineResult};
use crate::key::Key;
use serde_json::Value;
use std::collections::BTreeMap;

/// A named table of JSON records keyed by the field named by `key_path`.
///
/// Records are held in key order; `get_all` iterates ascending. The store
/// does not interpret record contents beyond extracting the key field.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    name: String,
    key_path: String,
    records: BTreeMap<Key, Value>,
}

impl ObjectStore {
    /// Creates an empty store with the given key path.
    #[must_use]
    pub fn new(name: impl Into<String>, key_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_path: key_path.into(),
            records: BTreeMap::new(),
        }
    }

    /// Returns the store name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key path.
    #[must_use]
    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    /// Inserts a record, failing if its key already exists.
    ///
    /// The key is extracted from the record's key-path field. Returns the
    /// extracted key on success.
    pub fn add(&mut self, record: Value) -> EngineResult<Key> {
        let key = self.extract_key(&record)?;
        if self.records.contains_key(&key) {
            return Err(EngineError::Constraint {
                store: self.name.clone(),
                key,
            });
        }
        self.records.insert(key.clone(), record);
        Ok(key)
    }

    /// Fetches the record at `key`, or `None` if absent.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.records.get(key)
    }

    /// Returns all records in ascending key order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Value> {
        self.records.values().cloned().collect()
    }

    /// Stores `record` at `key`, overwriting any existing record.
    pub fn put(&mut self, key: Key, record: Value) {
        self.records.insert(key, record);
    }

    /// Removes the record at `key`. Returns whether a record was present.
    pub fn delete(&mut self, key: &Key) -> bool {
        self.records.remove(key).is_some()
    }

    /// Returns the number of records in the store.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Removes all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Extracts the primary key from a record via the store's key path.
    pub fn extract_key(&self, record: &Value) -> EngineResult<Key> {
        let field = record.get(&self.key_path).ok_or_else(|| {
            EngineError::data(format!(
                "record is missing key field \"{}\"",
                self.key_path
            ))
        })?;
        Key::from_value(field).ok_or_else(|| {
            EngineError::data(format!(
                "key field \"{}\" must be an integer or a string",
                self.key_path
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn todos() -> ObjectStore {
        ObjectStore::new("todos", "id")
    }

    #[test]
    fn add_and_get() {
        let mut store = todos();
        let key = store.add(json!({"id": 1, "text": "Buy milk"})).unwrap();

        assert_eq!(key, Key::Int(1));
        assert_eq!(
            store.get(&Key::Int(1)),
            Some(&json!({"id": 1, "text": "Buy milk"}))
        );
    }

    #[test]
    fn add_duplicate_key_fails_and_keeps_original() {
        let mut store = todos();
        store.add(json!({"id": 1, "text": "original"})).unwrap();

        let result = store.add(json!({"id": 1, "text": "imposter"}));
        assert!(matches!(result, Err(EngineError::Constraint { .. })));

        // The first record is untouched.
        assert_eq!(
            store.get(&Key::Int(1)).unwrap()["text"],
            json!("original")
        );
    }

    #[test]
    fn add_without_key_field_fails() {
        let mut store = todos();
        let result = store.add(json!({"text": "no id"}));
        assert!(matches!(result, Err(EngineError::Data { .. })));
    }

    #[test]
    fn add_with_unusable_key_type_fails() {
        let mut store = todos();
        let result = store.add(json!({"id": 1.5, "text": "float key"}));
        assert!(matches!(result, Err(EngineError::Data { .. })));
    }

    #[test]
    fn put_overwrites_or_inserts() {
        let mut store = todos();

        store.put(Key::Int(1), json!({"id": 1, "text": "v1"}));
        store.put(Key::Int(1), json!({"id": 1, "text": "v2"}));

        assert_eq!(store.count(), 1);
        assert_eq!(store.get(&Key::Int(1)).unwrap()["text"], json!("v2"));
    }

    #[test]
    fn delete_is_quiet_on_absent_key() {
        let mut store = todos();
        store.add(json!({"id": 1})).unwrap();

        assert!(store.delete(&Key::Int(1)));
        assert!(!store.delete(&Key::Int(1)));
        assert!(store.get(&Key::Int(1)).is_none());
    }

    #[test]
    fn get_all_is_key_ordered() {
        let mut store = todos();
        store.add(json!({"id": 3})).unwrap();
        store.add(json!({"id": 1})).unwrap();
        store.add(json!({"id": 2})).unwrap();

        let all = store.get_all();
        let ids: Vec<i64> = all.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn string_keys() {
        let mut store = ObjectStore::new("personal_notes", "title");
        store
            .add(json!({"title": "note1", "text": "This is my note"}))
            .unwrap();

        assert!(store.get(&Key::from("note1")).is_some());
        assert!(store.get(&Key::from("note2")).is_none());
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = todos();
        store.add(json!({"id": 1})).unwrap();
        store.add(json!({"id": 2})).unwrap();

        store.clear();
        assert_eq!(store.count(), 0);
        assert!(store.get_all().is_empty());
    }
}
