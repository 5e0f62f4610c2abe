//! # ShelfDB Core
//!
//! Database and collection layer for ShelfDB.
//!
//! This crate is the client side of ShelfDB: a [`Database`] owns one named,
//! versioned connection to the storage engine, and a [`Collection`] performs
//! typed single-record CRUD against one of its object stores. Schema changes
//! go through [`Database::add_collection`], which bumps the version and
//! re-opens the connection so the store can be created inside the engine's
//! upgrade window.
//!
//! ## Example
//!
//! ```rust,ignore
//! use serde::{Deserialize, Serialize};
//! use shelfdb_core::Database;
//! use shelfdb_engine::StorageEngine;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Todo {
//!     id: i64,
//!     text: String,
//! }
//!
//! let engine = StorageEngine::spawn();
//! let db = Database::new(engine, "app");
//!
//! db.add_collection("todos").await?;
//! let todos = db.collection::<Todo>("todos").await?;
//!
//! todos.add(&Todo { id: 1, text: "Buy milk".into() }).await?;
//! todos.delete(1).await?;
//! assert!(todos.get(1).await?.is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod config;
mod database;
mod error;
mod schema;

pub use collection::Collection;
pub use config::Config;
pub use database::Database;
pub use error::{DbError, DbResult};
pub use schema::{SchemaPlan, SchemaStep};

// Engine types that appear in this crate's public API.
pub use shelfdb_engine::{DatabaseHandle, EngineError, EngineHandle, Key, StorageEngine};
