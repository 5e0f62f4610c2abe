//! Database connection lifecycle and collection lookup.

use crate::collection::Collection;
use crate::config::Config;
use crate::error::{DbError, DbResult};
use crate::schema::{SchemaPlan, SchemaStep};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelfdb_engine::{DatabaseHandle, EngineHandle};
use tracing::debug;

/// Connection state: the current version and the cached handle.
///
/// Locked only to read or swap its contents, never across an await.
/// Concurrent schema changes are therefore not coordinated by this layer;
/// the engine serializes whatever arrives.
struct ConnState {
    version: u64,
    handle: Option<DatabaseHandle>,
}

/// A named, versioned database.
///
/// Owns one connection to the storage engine, opened lazily on first use.
/// Adding a collection bumps the version and re-opens the connection; the
/// upgrade window of that open is where the store is created.
///
/// # Example
///
/// ```rust,ignore
/// use shelfdb_core::Database;
/// use shelfdb_engine::StorageEngine;
///
/// let engine = StorageEngine::spawn();
/// let db = Database::new(engine, "app");
///
/// db.add_collection("todos").await?;
/// let todos = db.collection::<Todo>("todos").await?;
/// todos.add(&Todo { id: 1, text: "Buy milk".into() }).await?;
/// ```
pub struct Database {
    name: String,
    config: Config,
    engine: EngineHandle,
    plan: Mutex<SchemaPlan>,
    state: Mutex<ConnState>,
}

impl Database {
    /// Creates a database with the default configuration.
    ///
    /// No connection is opened until the first operation needs one.
    #[must_use]
    pub fn new(engine: EngineHandle, name: impl Into<String>) -> Self {
        Self::with_config(engine, name, Config::default())
    }

    /// Creates a database with a custom configuration.
    #[must_use]
    pub fn with_config(engine: EngineHandle, name: impl Into<String>, config: Config) -> Self {
        let version = config.initial_version;
        Self {
            name: name.into(),
            config,
            engine,
            plan: Mutex::new(SchemaPlan::new()),
            state: Mutex::new(ConnState {
                version,
                handle: None,
            }),
        }
    }

    /// The database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current schema version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    /// Opens a connection at the current version and caches the handle.
    ///
    /// Pending schema steps are replayed if the engine's stored version is
    /// older than the requested one.
    pub async fn initialize(&self) -> DbResult<DatabaseHandle> {
        let version = self.state.lock().version;
        let plan = self.plan.lock().clone();

        debug!(database = %self.name, version, "opening connection");
        let handle = self
            .engine
            .open_with_upgrade(&self.name, version, Box::new(move |ctx| plan.apply(ctx)))
            .await
            .map_err(|e| DbError::connection(self.name.clone(), e))?;

        self.state.lock().handle = Some(handle.clone());
        Ok(handle)
    }

    /// Returns the cached connection handle, opening one if necessary.
    ///
    /// Idempotent after the first success.
    pub async fn handle(&self) -> DbResult<DatabaseHandle> {
        if let Some(handle) = self.state.lock().handle.clone() {
            return Ok(handle);
        }
        self.initialize().await
    }

    /// Adds a collection, creating its store through a version-bump upgrade.
    ///
    /// This is the only schema-mutating path: the connection is re-opened at
    /// `version + 1` and the store is created inside the upgrade window if
    /// it does not already exist — calling this twice with the same name is
    /// harmless and leaves the store's contents intact. On failure the
    /// version is unchanged.
    pub async fn add_collection(&self, name: &str) -> DbResult<()> {
        let next = self.state.lock().version + 1;
        let plan = {
            let mut plan = self.plan.lock();
            plan.insert(
                next,
                SchemaStep::CreateStore {
                    name: name.to_string(),
                    key_path: self.config.key_path.clone(),
                },
            );
            plan.clone()
        };

        debug!(database = %self.name, collection = name, version = next, "adding collection");
        match self
            .engine
            .open_with_upgrade(&self.name, next, Box::new(move |ctx| plan.apply(ctx)))
            .await
        {
            Ok(handle) => {
                let mut state = self.state.lock();
                state.version = next;
                state.handle = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.plan.lock().remove(next);
                Err(DbError::collection_creation(name, e))
            }
        }
    }

    /// Looks up a collection, failing if its store is not in the schema.
    ///
    /// Returns a fresh [`Collection`] bound to the current connection;
    /// instances are not cached across calls.
    pub async fn collection<T>(&self, name: &str) -> DbResult<Collection<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let handle = self.handle().await?;
        if !handle.contains_store(name) {
            return Err(DbError::collection_not_found(name));
        }
        Ok(Collection::new(name, handle))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}
