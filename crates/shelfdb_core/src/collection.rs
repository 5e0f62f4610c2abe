//! Typed record CRUD against one object store.

use crate::error::{DbError, DbResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelfdb_engine::{DatabaseHandle, EngineError, Key};
use std::marker::PhantomData;

/// A typed view over one object store.
///
/// `Collection<T>` serializes values of `T` to JSON records on the way in
/// and deserializes on the way out. `serde_json::Value` itself satisfies the
/// bounds, so an untyped collection is just `Collection<serde_json::Value>`.
///
/// Every method is a single request to the engine: one completion, one
/// failure path, no retries. Instances are created by
/// [`crate::Database::collection`] and are cheap to drop — nothing is cached
/// on them beyond the connection snapshot they were bound to.
pub struct Collection<T> {
    name: String,
    handle: DatabaseHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(name: &str, handle: DatabaseHandle) -> Self {
        Self {
            name: name.to_string(),
            handle,
            _marker: PhantomData,
        }
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a record, returning its key.
    ///
    /// Fails with [`DbError::DuplicateKey`] if a record with the same key
    /// already exists; the existing record is left unchanged.
    pub async fn add(&self, item: &T) -> DbResult<Key> {
        let record = serde_json::to_value(item)
            .map_err(|e| DbError::write(&self.name, e.to_string()))?;
        match self.handle.add(&self.name, record).await {
            Ok(key) => Ok(key),
            Err(EngineError::Constraint { key, .. }) => Err(DbError::DuplicateKey {
                collection: self.name.clone(),
                key,
            }),
            Err(e) => Err(DbError::write(&self.name, e.to_string())),
        }
    }

    /// Fetches the record at `key`, or `None` if absent.
    pub async fn get(&self, key: impl Into<Key>) -> DbResult<Option<T>> {
        match self.handle.get(&self.name, key.into()).await {
            Ok(Some(record)) => serde_json::from_value(record)
                .map(Some)
                .map_err(|e| DbError::read(&self.name, e.to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::read(&self.name, e.to_string())),
        }
    }

    /// Fetches every record, in the engine's iteration order.
    pub async fn get_all(&self) -> DbResult<Vec<T>> {
        let records = self
            .handle
            .get_all(&self.name)
            .await
            .map_err(|e| DbError::read(&self.name, e.to_string()))?;
        records
            .into_iter()
            .map(|r| {
                serde_json::from_value(r).map_err(|e| DbError::read(&self.name, e.to_string()))
            })
            .collect()
    }

    /// Stores `item` at `key`, overwriting any existing record.
    pub async fn update(&self, key: impl Into<Key>, item: &T) -> DbResult<()> {
        let record = serde_json::to_value(item)
            .map_err(|e| DbError::write(&self.name, e.to_string()))?;
        self.handle
            .put(&self.name, key.into(), record)
            .await
            .map_err(|e| DbError::write(&self.name, e.to_string()))
    }

    /// Removes the record at `key`. Succeeds whether or not it existed.
    pub async fn delete(&self, key: impl Into<Key>) -> DbResult<()> {
        self.handle
            .delete(&self.name, key.into())
            .await
            .map_err(|e| DbError::write(&self.name, e.to_string()))
    }

    /// The number of records in the collection.
    pub async fn count(&self) -> DbResult<usize> {
        self.handle
            .count(&self.name)
            .await
            .map_err(|e| DbError::read(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use shelfdb_engine::StorageEngine;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: i64,
        text: String,
    }

    async fn notes_collection() -> Collection<Note> {
        let engine = StorageEngine::spawn();
        let db = Database::new(engine, "test");
        db.add_collection("notes").await.unwrap();
        db.collection("notes").await.unwrap()
    }

    #[tokio::test]
    async fn duplicate_add_fails_and_preserves_original() {
        let notes = notes_collection().await;

        notes
            .add(&Note {
                id: 1,
                text: "original".to_string(),
            })
            .await
            .unwrap();

        let result = notes
            .add(&Note {
                id: 1,
                text: "imposter".to_string(),
            })
            .await;
        assert!(matches!(result, Err(DbError::DuplicateKey { .. })));

        let kept = notes.get(1).await.unwrap().unwrap();
        assert_eq!(kept.text, "original");
    }

    #[tokio::test]
    async fn update_then_get_returns_exactly_the_update() {
        let notes = notes_collection().await;

        notes
            .add(&Note {
                id: 7,
                text: "v1".to_string(),
            })
            .await
            .unwrap();

        let replacement = Note {
            id: 7,
            text: "v2".to_string(),
        };
        notes.update(7, &replacement).await.unwrap();

        assert_eq!(notes.get(7).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn update_inserts_when_absent() {
        let notes = notes_collection().await;

        let fresh = Note {
            id: 9,
            text: "born by update".to_string(),
        };
        notes.update(9, &fresh).await.unwrap();

        assert_eq!(notes.get(9).await.unwrap(), Some(fresh));
    }

    #[tokio::test]
    async fn delete_then_get_is_absent_either_way() {
        let notes = notes_collection().await;

        notes
            .add(&Note {
                id: 1,
                text: "doomed".to_string(),
            })
            .await
            .unwrap();

        // Key that existed.
        notes.delete(1).await.unwrap();
        assert_eq!(notes.get(1).await.unwrap(), None);

        // Key that never existed.
        notes.delete(99).await.unwrap();
        assert_eq!(notes.get(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_all_returns_every_distinct_record() {
        let notes = notes_collection().await;

        for id in 0..10 {
            notes
                .add(&Note {
                    id,
                    text: format!("note {id}"),
                })
                .await
                .unwrap();
        }

        let all = notes.get_all().await.unwrap();
        assert_eq!(all.len(), 10);
        for id in 0..10 {
            assert!(all.iter().any(|n| n.id == id));
        }
        assert_eq!(notes.count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn untyped_collections_work_on_raw_values() {
        let engine = StorageEngine::spawn();
        let db = Database::new(engine, "test");
        db.add_collection("raw").await.unwrap();
        let raw = db.collection::<Value>("raw").await.unwrap();

        raw.add(&json!({"id": 1, "anything": [1, 2, 3]}))
            .await
            .unwrap();

        let got = raw.get(1).await.unwrap().unwrap();
        assert_eq!(got["anything"], json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn add_without_key_field_is_a_write_error() {
        let engine = StorageEngine::spawn();
        let db = Database::new(engine, "test");
        db.add_collection("raw").await.unwrap();
        let raw = db.collection::<Value>("raw").await.unwrap();

        let result = raw.add(&json!({"text": "keyless"})).await;
        assert!(matches!(result, Err(DbError::Write { .. })));
    }

    #[tokio::test]
    async fn shape_mismatch_on_read_is_a_read_error() {
        let engine = StorageEngine::spawn();
        let db = Database::new(engine, "test");
        db.add_collection("notes").await.unwrap();

        // Write a record the typed view cannot decode.
        let raw = db.collection::<Value>("notes").await.unwrap();
        raw.add(&json!({"id": 1, "text": 42})).await.unwrap();

        let typed = db.collection::<Note>("notes").await.unwrap();
        let result = typed.get(1).await;
        assert!(matches!(result, Err(DbError::Read { .. })));
    }
}
