//! SQLite-backed todo store
//!
//! One table, five operations, each issuing a single statement. Every
//! failure propagates as a `StorageError`; the agent loop turns those into
//! observations the model can react to.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// A persisted todo item
///
/// Field names serialize with the wire/schema spelling so observation
/// payloads match the schema the system prompt documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Failures from the persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create database directory {path}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open database at {path}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Store for the single `todos` table
///
/// The sqlite connection is synchronous; the async surface serializes
/// access through a tokio mutex so the store is `Send + Sync`.
pub struct TodoStore {
    conn: Mutex<Connection>,
}

impl TodoStore {
    /// Open (or create) the database at the given path
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.display().to_string(),
            source,
        })?;

        Self::init_schema(&conn)?;
        debug!(path = %path.display(), "Opened todo database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (tests, throwaway sessions)
    #[allow(dead_code)]
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                todo      TEXT NOT NULL,
                createdAt TEXT NOT NULL,
                updatedAt TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// List every todo; no ordering guarantee
    pub async fn list_all(&self) -> Result<Vec<Todo>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, todo, createdAt, updatedAt FROM todos")?;
        let rows = stmt.query_map([], row_to_todo)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Insert a new todo and return its assigned id
    ///
    /// Body policy (e.g. non-empty) is the caller's concern.
    pub async fn create(&self, body: &str) -> Result<i64, StorageError> {
        let now = Utc::now();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO todos (todo, createdAt, updatedAt) VALUES (?1, ?2, ?3)",
            (body, now, now),
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "Todo inserted");
        Ok(id)
    }

    /// Case-insensitive substring search
    ///
    /// The keyword's own wildcard characters are escaped; the pattern is
    /// wrapped in `%` on both sides, so an empty keyword matches every row.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Todo>, StorageError> {
        let pattern = format!("%{}%", escape_like(keyword));
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, todo, createdAt, updatedAt FROM todos WHERE todo LIKE ?1 ESCAPE '\\'",
        )?;
        let rows = stmt.query_map([&pattern], row_to_todo)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete one todo by id; returns the number of rows removed
    ///
    /// Deleting an absent id is a no-op, not an error.
    pub async fn delete_by_id(&self, id: i64) -> Result<usize, StorageError> {
        let conn = self.conn.lock().await;
        let removed = conn.execute("DELETE FROM todos WHERE id = ?1", [&id])?;
        debug!(id, removed, "Todo delete");
        Ok(removed)
    }

    /// Delete every todo; returns the number of rows removed
    pub async fn clear_all(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().await;
        let removed = conn.execute("DELETE FROM todos", [])?;
        debug!(removed, "Todos cleared");
        Ok(removed)
    }
}

fn row_to_todo(row: &rusqlite::Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        todo: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

/// Escape LIKE wildcards in a keyword (backslash is the escape character)
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list_roundtrip() {
        let store = TodoStore::open_in_memory().await.unwrap();
        let id = store.create("buy milk").await.unwrap();
        assert!(id > 0);

        let todos = store.list_all().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, id);
        assert_eq!(todos[0].todo, "buy milk");
        assert_eq!(todos[0].created_at, todos[0].updated_at);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let store = TodoStore::open_in_memory().await.unwrap();
        store.create("buy milk").await.unwrap();
        store.create("walk the dog").await.unwrap();

        let hits = store.search("MILK").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].todo, "buy milk");
    }

    #[tokio::test]
    async fn test_search_empty_keyword_matches_all() {
        let store = TodoStore::open_in_memory().await.unwrap();
        store.create("a").await.unwrap();
        store.create("b").await.unwrap();

        let hits = store.search("").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let store = TodoStore::open_in_memory().await.unwrap();
        store.create("give 100% effort").await.unwrap();
        store.create("unrelated").await.unwrap();

        // A literal % must not act as a wildcard
        let hits = store.search("100%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].todo, "give 100% effort");

        let hits = store.search("0%e").await.unwrap();
        assert!(hits.is_empty());

        let hits = store.search("_").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_id_is_idempotent() {
        let store = TodoStore::open_in_memory().await.unwrap();
        let id = store.create("buy milk").await.unwrap();

        assert_eq!(store.delete_by_id(id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(id).await.unwrap(), 0);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_is_idempotent() {
        let store = TodoStore::open_in_memory().await.unwrap();
        store.create("a").await.unwrap();
        store.create("b").await.unwrap();

        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert_eq!(store.clear_all().await.unwrap(), 0);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_created_then_deleted_is_absent() {
        let store = TodoStore::open_in_memory().await.unwrap();
        let id = store.create("milk").await.unwrap();
        assert_eq!(store.search("milk").await.unwrap().len(), 1);

        store.delete_by_id(id).await.unwrap();
        assert!(store.search("milk").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("todos.db");
        let store = TodoStore::open(&path).await.unwrap();
        store.create("persisted").await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_todo_serializes_wire_names() {
        let todo = Todo {
            id: 1,
            todo: "buy milk".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
