//! Direct store subcommands (no model involved)

use std::path::PathBuf;

use anyhow::Result;

use crate::config::{resolve_db_path, UserConfig};
use crate::store::{Todo, TodoStore};

// ANSI colors
const CYAN: &str = "\x1b[96m";
const GREEN: &str = "\x1b[92m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

async fn open_store(db: Option<PathBuf>) -> Result<TodoStore> {
    let config = UserConfig::load().unwrap_or_default();
    let path = resolve_db_path(db, &config);
    Ok(TodoStore::open(&path).await?)
}

fn print_todos(todos: &[Todo]) {
    for t in todos {
        println!(
            "  {}[{}]{} {} {}({}){}",
            CYAN,
            t.id,
            RESET,
            t.todo,
            DIM,
            t.created_at.format("%Y-%m-%d %H:%M"),
            RESET
        );
    }
}

/// List every todo
pub async fn todos_list(db: Option<PathBuf>) -> Result<()> {
    let store = open_store(db).await?;
    let todos = store.list_all().await?;

    if todos.is_empty() {
        println!("No todos");
    } else {
        println!("{}Todos:{}", BOLD, RESET);
        print_todos(&todos);
    }

    Ok(())
}

/// Add a todo
pub async fn todos_add(text: &str, db: Option<PathBuf>) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("Refusing to add an empty todo");
    }

    let store = open_store(db).await?;
    let id = store.create(text).await?;
    println!("{}Added:{} [{}] {}", GREEN, RESET, id, text);

    Ok(())
}

/// Remove a todo by id
pub async fn todos_rm(id: i64, db: Option<PathBuf>) -> Result<()> {
    let store = open_store(db).await?;
    let removed = store.delete_by_id(id).await?;

    if removed == 0 {
        println!("No todo with id {}", id);
    } else {
        println!("{}Removed:{} [{}]", GREEN, RESET, id);
    }

    Ok(())
}

/// Remove every todo
pub async fn todos_clear(db: Option<PathBuf>) -> Result<()> {
    let store = open_store(db).await?;
    let removed = store.clear_all().await?;
    println!("{}Cleared:{} {} todo(s)", GREEN, RESET, removed);

    Ok(())
}

/// Search todos by keyword
pub async fn todos_search(keyword: &str, db: Option<PathBuf>) -> Result<()> {
    let store = open_store(db).await?;
    let todos = store.search(keyword).await?;

    if todos.is_empty() {
        println!("No todos matching '{}'", keyword);
    } else {
        println!("{}Matches:{}", BOLD, RESET);
        print_todos(&todos);
    }

    Ok(())
}
