//! Basic ShelfDB Example - Todo Application
//!
//! This example demonstrates core ShelfDB functionality:
//! - Spawning the storage engine and opening a database
//! - Creating a collection through a schema upgrade
//! - Typed CRUD operations with serde entities
//! - Filtering using native Rust iterators
//!
//! Run with: cargo run -p rust_todo

use serde::{Deserialize, Serialize};
use shelfdb_core::Database;
use shelfdb_engine::StorageEngine;
use tracing_subscriber::EnvFilter;

/// A simple Todo item.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Todo {
    id: i64,
    text: String,
    done: bool,
    priority: u8,
}

impl Todo {
    fn new(id: i64, text: &str, priority: u8) -> Self {
        Self {
            id,
            text: text.to_string(),
            done: false,
            priority,
        }
    }

    /// Creates a copy with done set to true.
    fn complete(self) -> Self {
        Self { done: true, ..self }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Todo Application Example");
    println!("========================\n");

    // Spawn the engine and open a database against it
    let engine = StorageEngine::spawn();
    let db = Database::new(engine, "app");

    db.add_collection("todos").await?;
    println!("[OK] Database \"app\" ready at version {}", db.version());

    let todos = db.collection::<Todo>("todos").await?;

    // Create some todos
    let items = vec![
        Todo::new(1, "Buy milk", 1),
        Todo::new(2, "Buy eggs", 2),
        Todo::new(3, "Buy bread", 1),
        Todo::new(4, "Buy butter", 3),
    ];

    println!("\n[+] Inserting {} todos...", items.len());
    for item in &items {
        todos.add(item).await?;
    }
    println!("[OK] Todos inserted");

    // Read everything back
    println!("\n[*] All todos:");
    for todo in todos.get_all().await? {
        let status = if todo.done { "x" } else { "o" };
        println!("  {} [P{}] {}", status, todo.priority, todo.text);
    }

    // Filter high-priority todos using native Rust iterators
    println!("\n[!] High-priority todos:");
    let urgent: Vec<Todo> = todos
        .get_all()
        .await?
        .into_iter()
        .filter(|t| !t.done && t.priority == 1)
        .collect();
    for todo in &urgent {
        println!("  o {}", todo.text);
    }

    // Complete one via upsert
    println!("\n[~] Completing \"Buy milk\"...");
    let done = items[0].clone().complete();
    todos.update(done.id, &done).await?;

    // Delete one and confirm it is gone
    println!("[-] Deleting todo 2...");
    todos.delete(2).await?;
    match todos.get(2).await? {
        Some(_) => println!("[??] Todo 2 still present"),
        None => println!("[OK] Todo 2 is gone"),
    }

    let remaining = todos.get_all().await?;
    println!("\n[#] Summary:");
    println!("  Remaining: {}", remaining.len());
    println!(
        "  Completed: {}",
        remaining.iter().filter(|t| t.done).count()
    );

    Ok(())
}
