//! Error types for engine operations.

use crate::key::Key;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported by the storage engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An open requested a version older than the stored one.
    #[error("version conflict on database {name}: requested {requested}, stored {stored}")]
    VersionConflict {
        /// Database name.
        name: String,
        /// The version the caller asked for.
        requested: u64,
        /// The version the engine has stored.
        stored: u64,
    },

    /// A key collided with an existing record.
    #[error("constraint violation: key {key} already exists in store {store}")]
    Constraint {
        /// Store where the collision happened.
        store: String,
        /// The colliding key.
        key: Key,
    },

    /// A record could not yield a usable key.
    #[error("data error: {message}")]
    Data {
        /// Description of the problem.
        message: String,
    },

    /// The named database does not exist.
    #[error("database not found: {name}")]
    DatabaseNotFound {
        /// Database name.
        name: String,
    },

    /// The named object store does not exist in the database schema.
    #[error("object store not found: {name}")]
    StoreNotFound {
        /// Store name.
        name: String,
    },

    /// A schema change outside or inside the upgrade window failed.
    #[error("upgrade failed: {message}")]
    Upgrade {
        /// Description of the failure.
        message: String,
    },

    /// The engine worker is gone; no further requests can be served.
    #[error("storage engine is closed")]
    Closed,
}

impl EngineError {
    /// Creates a data error.
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }

    /// Creates an upgrade error.
    pub fn upgrade(message: impl Into<String>) -> Self {
        Self::Upgrade {
            message: message.into(),
        }
    }

    /// Creates a store-not-found error.
    pub fn store_not_found(name: impl Into<String>) -> Self {
        Self::StoreNotFound { name: name.into() }
    }

    /// Creates a database-not-found error.
    pub fn database_not_found(name: impl Into<String>) -> Self {
        Self::DatabaseNotFound { name: name.into() }
    }
}
