//! # ShelfDB Engine
//!
//! In-process versioned record storage engine for ShelfDB.
//!
//! The engine owns named, versioned databases of object stores. Each store
//! holds JSON records keyed by a declared key path. All state lives inside a
//! single worker task; callers talk to it through an [`EngineHandle`], and
//! every operation is a single-shot request answered through a oneshot
//! channel — success or failure, nothing in between.
//!
//! ## Design Principles
//!
//! - One worker task owns all state; requests are serialized in arrival order
//! - Schema changes are legal only inside the upgrade window of a
//!   version-raising [`EngineHandle::open`]
//! - A failed upgrade leaves the stored state untouched
//! - Absence of a record is a value (`None`), not an error
//!
//! ## Example
//!
//! ```rust,ignore
//! use shelfdb_engine::StorageEngine;
//!
//! let engine = StorageEngine::spawn();
//! let db = engine
//!     .open_with_upgrade("app", 1, Box::new(|ctx| ctx.create_store("todos", "id")))
//!     .await?;
//! db.add("todos", serde_json::json!({"id": 1, "text": "Buy milk"})).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod engine;
mod error;
mod key;
mod request;
mod store;

pub use catalog::UpgradeContext;
pub use engine::{DatabaseHandle, EngineHandle, StorageEngine};
pub use error::{EngineError, EngineResult};
pub use key::Key;
pub use request::UpgradeHook;
pub use store::ObjectStore;

/// A stored record: a JSON object whose key-path field holds the primary key.
pub type Record = serde_json::Value;
