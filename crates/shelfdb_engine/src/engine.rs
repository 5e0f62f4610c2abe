//! The engine worker and its handles.

use crate::catalog::{DatabaseState, UpgradeContext};
use crate::error::{EngineError, EngineResult};
use crate::key::Key;
use crate::request::{EngineRequest, OpenedDb, Reply, UpgradeHook};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// The storage engine worker.
///
/// Owns every database and serializes all operations: requests are applied
/// one at a time in arrival order, so each is atomic with respect to every
/// other. Spawn it with [`StorageEngine::spawn`] and talk to it through the
/// returned [`EngineHandle`]; the worker exits once every handle is dropped.
pub struct StorageEngine {
    databases: HashMap<String, DatabaseState>,
    rx: mpsc::UnboundedReceiver<EngineRequest>,
}

impl StorageEngine {
    /// Starts the worker task and returns a handle to it.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn() -> EngineHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            databases: HashMap::new(),
            rx,
        };
        tokio::spawn(engine.run());
        EngineHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            self.dispatch(request);
        }
        debug!("storage engine worker stopped");
    }

    fn dispatch(&mut self, request: EngineRequest) {
        match request {
            EngineRequest::Open {
                name,
                version,
                upgrade,
                reply,
            } => send(reply, self.open(&name, version, upgrade)),
            EngineRequest::DeleteDatabase { name, reply } => {
                debug!(database = %name, "delete database");
                self.databases.remove(&name);
                send(reply, Ok(()));
            }
            EngineRequest::Add {
                db,
                store,
                record,
                reply,
            } => send(reply, self.store_mut(&db, &store).and_then(|s| s.add(record))),
            EngineRequest::Get {
                db,
                store,
                key,
                reply,
            } => send(
                reply,
                self.store_mut(&db, &store).map(|s| s.get(&key).cloned()),
            ),
            EngineRequest::GetAll { db, store, reply } => {
                send(reply, self.store_mut(&db, &store).map(|s| s.get_all()));
            }
            EngineRequest::Put {
                db,
                store,
                key,
                record,
                reply,
            } => send(
                reply,
                self.store_mut(&db, &store).map(|s| s.put(key, record)),
            ),
            EngineRequest::Delete {
                db,
                store,
                key,
                reply,
            } => send(
                reply,
                self.store_mut(&db, &store).map(|s| {
                    s.delete(&key);
                }),
            ),
            EngineRequest::Count { db, store, reply } => {
                send(reply, self.store_mut(&db, &store).map(|s| s.count()));
            }
            EngineRequest::Clear { db, store, reply } => {
                send(reply, self.store_mut(&db, &store).map(|s| s.clear()));
            }
        }
    }

    /// Opens `name` at `version`, running the upgrade hook if the stored
    /// version is older.
    ///
    /// The upgrade runs against a scratch copy of the database; a failed
    /// hook leaves the stored state untouched.
    fn open(
        &mut self,
        name: &str,
        version: u64,
        upgrade: Option<UpgradeHook>,
    ) -> EngineResult<OpenedDb> {
        if version == 0 {
            return Err(EngineError::data("database version must be at least 1"));
        }

        let stored = self.databases.get(name).map_or(0, |db| db.version);
        if version < stored {
            return Err(EngineError::VersionConflict {
                name: name.to_string(),
                requested: version,
                stored,
            });
        }

        if version > stored {
            let mut scratch = self
                .databases
                .get(name)
                .cloned()
                .unwrap_or_else(|| DatabaseState::new(name));
            if let Some(hook) = upgrade {
                let mut ctx = UpgradeContext::new(&mut scratch, stored, version);
                hook(&mut ctx)?;
            }
            scratch.version = version;
            info!(database = %name, from = stored, to = version, "schema upgraded");
            self.databases.insert(name.to_string(), scratch);
        }

        let db = self
            .databases
            .get(name)
            .ok_or_else(|| EngineError::database_not_found(name))?;
        debug!(database = %name, version = db.version, "database opened");
        Ok(OpenedDb {
            version: db.version,
            store_names: db.store_names(),
        })
    }

    fn store_mut(&mut self, db: &str, store: &str) -> EngineResult<&mut crate::ObjectStore> {
        self.databases
            .get_mut(db)
            .ok_or_else(|| EngineError::database_not_found(db))?
            .stores
            .get_mut(store)
            .ok_or_else(|| EngineError::store_not_found(store))
    }
}

fn send<T>(reply: Reply<T>, result: EngineResult<T>) {
    // The requester may have given up waiting; nothing to do then.
    let _ = reply.send(result);
}

/// Cloneable handle to a running [`StorageEngine`].
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineRequest>,
}

impl EngineHandle {
    /// Opens a database at `version` with no schema changes.
    ///
    /// A database that has never been opened has stored version 0, so any
    /// first open raises the version (and may create the database empty).
    pub async fn open(&self, name: &str, version: u64) -> EngineResult<DatabaseHandle> {
        self.open_inner(name, version, None).await
    }

    /// Opens a database at `version`, running `upgrade` inside the upgrade
    /// window if `version` exceeds the stored version.
    pub async fn open_with_upgrade(
        &self,
        name: &str,
        version: u64,
        upgrade: UpgradeHook,
    ) -> EngineResult<DatabaseHandle> {
        self.open_inner(name, version, Some(upgrade)).await
    }

    async fn open_inner(
        &self,
        name: &str,
        version: u64,
        upgrade: Option<UpgradeHook>,
    ) -> EngineResult<DatabaseHandle> {
        let opened = self
            .request(|reply| EngineRequest::Open {
                name: name.to_string(),
                version,
                upgrade,
                reply,
            })
            .await?;
        Ok(DatabaseHandle {
            name: name.to_string(),
            version: opened.version,
            store_names: opened.store_names,
            engine: self.clone(),
        })
    }

    /// Deletes a database and everything in it. Quiet if it never existed.
    pub async fn delete_database(&self, name: &str) -> EngineResult<()> {
        self.request(|reply| EngineRequest::DeleteDatabase {
            name: name.to_string(),
            reply,
        })
        .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> EngineRequest,
    ) -> EngineResult<T> {
        let (tx, rx) = oneshot::channel();
        self.tx.send(build(tx)).map_err(|_| EngineError::Closed)?;
        rx.await.unwrap_or(Err(EngineError::Closed))
    }
}

/// An open connection to one database.
///
/// Carries a snapshot of the schema (version and store names) taken at open
/// time, plus the engine handle used for store operations. Snapshots from
/// older opens do not see later schema changes; re-open to refresh.
#[derive(Debug, Clone)]
pub struct DatabaseHandle {
    name: String,
    version: u64,
    store_names: Vec<String>,
    engine: EngineHandle,
}

impl DatabaseHandle {
    /// The database name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version this connection was opened at.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Store names in the schema at open time, sorted.
    #[must_use]
    pub fn store_names(&self) -> &[String] {
        &self.store_names
    }

    /// Whether the schema contained a store of this name at open time.
    #[must_use]
    pub fn contains_store(&self, name: &str) -> bool {
        self.store_names.iter().any(|s| s == name)
    }

    /// Inserts a record into `store`; fails on key collision.
    pub async fn add(&self, store: &str, record: Value) -> EngineResult<Key> {
        self.engine
            .request(|reply| EngineRequest::Add {
                db: self.name.clone(),
                store: store.to_string(),
                record,
                reply,
            })
            .await
    }

    /// Fetches the record at `key` from `store`, or `None`.
    pub async fn get(&self, store: &str, key: Key) -> EngineResult<Option<Value>> {
        self.engine
            .request(|reply| EngineRequest::Get {
                db: self.name.clone(),
                store: store.to_string(),
                key,
                reply,
            })
            .await
    }

    /// Fetches every record in `store`, in ascending key order.
    pub async fn get_all(&self, store: &str) -> EngineResult<Vec<Value>> {
        self.engine
            .request(|reply| EngineRequest::GetAll {
                db: self.name.clone(),
                store: store.to_string(),
                reply,
            })
            .await
    }

    /// Stores `record` at `key` in `store`, inserting or overwriting.
    pub async fn put(&self, store: &str, key: Key, record: Value) -> EngineResult<()> {
        self.engine
            .request(|reply| EngineRequest::Put {
                db: self.name.clone(),
                store: store.to_string(),
                key,
                record,
                reply,
            })
            .await
    }

    /// Removes the record at `key` from `store`. Quiet if absent.
    pub async fn delete(&self, store: &str, key: Key) -> EngineResult<()> {
        self.engine
            .request(|reply| EngineRequest::Delete {
                db: self.name.clone(),
                store: store.to_string(),
                key,
                reply,
            })
            .await
    }

    /// The number of records in `store`.
    pub async fn count(&self, store: &str) -> EngineResult<usize> {
        self.engine
            .request(|reply| EngineRequest::Count {
                db: self.name.clone(),
                store: store.to_string(),
                reply,
            })
            .await
    }

    /// Removes every record in `store`.
    pub async fn clear(&self, store: &str) -> EngineResult<()> {
        self.engine
            .request(|reply| EngineRequest::Clear {
                db: self.name.clone(),
                store: store.to_string(),
                reply,
            })
            .await
    }
}
