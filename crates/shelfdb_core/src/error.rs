//! Error types for the database layer.

use shelfdb_engine::{EngineError, Key};
use thiserror::Error;

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors surfaced by [`crate::Database`] and [`crate::Collection`].
///
/// Every failure is terminal for its operation; nothing is retried.
#[derive(Debug, Error)]
pub enum DbError {
    /// Opening the database connection failed.
    #[error("failed to open database {name}")]
    Connection {
        /// Database name.
        name: String,
        /// The engine failure.
        #[source]
        source: EngineError,
    },

    /// A schema change adding a collection failed.
    #[error("failed to add collection {name}")]
    CollectionCreation {
        /// Collection name.
        name: String,
        /// The engine failure.
        #[source]
        source: EngineError,
    },

    /// The requested collection is not in the current schema.
    #[error("collection {name} does not exist")]
    CollectionNotFound {
        /// Collection name.
        name: String,
    },

    /// An `add` collided with an existing record.
    #[error("record with key {key} already exists in collection {collection}")]
    DuplicateKey {
        /// Collection name.
        collection: String,
        /// The colliding key.
        key: Key,
    },

    /// A read operation failed.
    #[error("failed to read from collection {collection}: {message}")]
    Read {
        /// Collection name.
        collection: String,
        /// Description of the failure.
        message: String,
    },

    /// A write operation failed.
    #[error("failed to write to collection {collection}: {message}")]
    Write {
        /// Collection name.
        collection: String,
        /// Description of the failure.
        message: String,
    },
}

impl DbError {
    /// Creates a connection error.
    pub fn connection(name: impl Into<String>, source: EngineError) -> Self {
        Self::Connection {
            name: name.into(),
            source,
        }
    }

    /// Creates a collection-creation error.
    pub fn collection_creation(name: impl Into<String>, source: EngineError) -> Self {
        Self::CollectionCreation {
            name: name.into(),
            source,
        }
    }

    /// Creates a collection-not-found error.
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound { name: name.into() }
    }

    /// Creates a read error.
    pub fn read(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Creates a write error.
    pub fn write(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            collection: collection.into(),
            message: message.into(),
        }
    }
}
