//! Request messages carried from handles to the engine worker.

use crate::catalog::UpgradeContext;
use crate::error::EngineResult;
use crate::key::Key;
use serde_json::Value;
use tokio::sync::oneshot;

/// Completion channel for one request: resolved exactly once, with either
/// the operation's value or the engine's failure.
pub(crate) type Reply<T> = oneshot::Sender<EngineResult<T>>;

/// Schema-change callback run inside the upgrade window of a
/// version-raising open.
pub type UpgradeHook = Box<dyn FnOnce(&mut UpgradeContext<'_>) -> EngineResult<()> + Send>;

/// Snapshot returned by a successful open.
pub(crate) struct OpenedDb {
    pub(crate) version: u64,
    pub(crate) store_names: Vec<String>,
}

/// One operation against the engine.
pub(crate) enum EngineRequest {
    Open {
        name: String,
        version: u64,
        upgrade: Option<UpgradeHook>,
        reply: Reply<OpenedDb>,
    },
    DeleteDatabase {
        name: String,
        reply: Reply<()>,
    },
    Add {
        db: String,
        store: String,
        record: Value,
        reply: Reply<Key>,
    },
    Get {
        db: String,
        store: String,
        key: Key,
        reply: Reply<Option<Value>>,
    },
    GetAll {
        db: String,
        store: String,
        reply: Reply<Vec<Value>>,
    },
    Put {
        db: String,
        store: String,
        key: Key,
        record: Value,
        reply: Reply<()>,
    },
    Delete {
        db: String,
        store: String,
        key: Key,
        reply: Reply<()>,
    },
    Count {
        db: String,
        store: String,
        reply: Reply<usize>,
    },
    Clear {
        db: String,
        store: String,
        reply: Reply<()>,
    },
}
