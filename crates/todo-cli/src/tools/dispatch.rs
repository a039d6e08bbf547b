//! Tool execution against the todo store

use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{ToolError, ToolRequest};
use crate::store::TodoStore;

/// Execute a tool request and return its raw observation payload
#[instrument(skip(store, request), fields(tool = request.name()))]
pub async fn dispatch(store: &TodoStore, request: ToolRequest) -> Result<Value, ToolError> {
    debug!("Executing tool");

    let result = match request {
        ToolRequest::GetAllTodos => serde_json::to_value(store.list_all().await?)?,
        ToolRequest::CreateTodo { todo } => json!(store.create(&todo).await?),
        ToolRequest::SearchTodo { keyword } => serde_json::to_value(store.search(&keyword).await?)?,
        ToolRequest::DeleteTodoById { id } => json!(store.delete_by_id(id).await?),
        ToolRequest::ClearAllTodos => json!(store.clear_all().await?),
    };

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_create_returns_id() {
        let store = TodoStore::open_in_memory().await.unwrap();
        let result = dispatch(
            &store,
            ToolRequest::CreateTodo {
                todo: "buy milk".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result, json!(1));
    }

    #[tokio::test]
    async fn test_dispatch_get_all_returns_rows() {
        let store = TodoStore::open_in_memory().await.unwrap();
        store.create("buy milk").await.unwrap();

        let result = dispatch(&store, ToolRequest::GetAllTodos).await.unwrap();
        let rows = result.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["todo"], "buy milk");
        assert!(rows[0].get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_dispatch_search() {
        let store = TodoStore::open_in_memory().await.unwrap();
        store.create("buy milk").await.unwrap();
        store.create("walk dog").await.unwrap();

        let result = dispatch(
            &store,
            ToolRequest::SearchTodo {
                keyword: "MILK".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_delete_reports_count() {
        let store = TodoStore::open_in_memory().await.unwrap();
        let id = store.create("buy milk").await.unwrap();

        let result = dispatch(&store, ToolRequest::DeleteTodoById { id }).await.unwrap();
        assert_eq!(result, json!(1));

        // Absent id: still success, zero rows
        let result = dispatch(&store, ToolRequest::DeleteTodoById { id }).await.unwrap();
        assert_eq!(result, json!(0));
    }

    #[tokio::test]
    async fn test_dispatch_clear_all() {
        let store = TodoStore::open_in_memory().await.unwrap();
        store.create("a").await.unwrap();
        store.create("b").await.unwrap();

        let result = dispatch(&store, ToolRequest::ClearAllTodos).await.unwrap();
        assert_eq!(result, json!(2));
    }
}
