//! ShelfDB Example - Note Keeper
//!
//! Demonstrates title-keyed collections:
//! - A custom key path ("title" instead of the default "id")
//! - Two collections in one database
//! - Duplicate-key rejection on add
//!
//! Run with: cargo run -p rust_notes

use serde::{Deserialize, Serialize};
use shelfdb_core::{Config, Database, DbError};
use shelfdb_engine::StorageEngine;
use tracing_subscriber::EnvFilter;

/// A note, uniquely identified by its title.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Note {
    title: String,
    text: String,
}

impl Note {
    fn new(title: &str, text: &str) -> Self {
        Self {
            title: title.to_string(),
            text: text.to_string(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Note Keeper Example");
    println!("===================\n");

    let engine = StorageEngine::spawn();
    let config = Config::new().key_path("title");
    let db = Database::with_config(engine, "notes", config);

    db.add_collection("personal_notes").await?;
    db.add_collection("todo_notes").await?;
    println!(
        "[OK] Database \"notes\" ready at version {} with 2 collections",
        db.version()
    );

    let personal = db.collection::<Note>("personal_notes").await?;
    let todo = db.collection::<Note>("todo_notes").await?;

    println!("\n[+] Adding notes...");
    personal
        .add(&Note::new("note1", "This is my note"))
        .await?;
    personal
        .add(&Note::new("groceries", "milk, eggs, bread"))
        .await?;
    todo.add(&Note::new("deadline", "file taxes by Friday"))
        .await?;

    // Titles are primary keys: a second "note1" must be rejected
    match personal.add(&Note::new("note1", "an imposter")).await {
        Err(DbError::DuplicateKey { .. }) => {
            println!("[OK] Duplicate title rejected, original kept");
        }
        other => println!("[??] Unexpected outcome: {other:?}"),
    }

    println!("\n[*] Personal notes:");
    for note in personal.get_all().await? {
        println!("  {} - {}", note.title, note.text);
    }

    // Revise a note in place
    println!("\n[~] Revising \"groceries\"...");
    personal
        .update("groceries", &Note::new("groceries", "milk, eggs, bread, butter"))
        .await?;
    if let Some(note) = personal.get("groceries").await? {
        println!("  {} - {}", note.title, note.text);
    }

    println!("\n[#] Summary:");
    println!("  Personal notes: {}", personal.count().await?);
    println!("  Todo notes: {}", todo.count().await?);

    Ok(())
}
