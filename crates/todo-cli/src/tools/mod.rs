//! Tool requests the model may issue via `action` envelopes
//!
//! The tool set is a closed enum rather than a runtime name lookup, so an
//! unrecognized name is an explicit outcome the loop reports back to the
//! model instead of a silent stall.

pub mod dispatch;

pub use dispatch::dispatch;

use serde_json::Value;
use thiserror::Error;

use crate::store::StorageError;

/// One-line tool descriptions, shared by the system prompt and the
/// unknown-tool observation
pub const CATALOG: &[(&str, &str)] = &[
    ("getAllTodos", "Return every todo in the database."),
    (
        "createTodo",
        "Create a new todo from the given text and return its id.",
    ),
    (
        "searchTodo",
        "Search todos whose text contains the given keyword (case-insensitive).",
    ),
    ("deleteTodoById", "Delete the todo with the given id."),
    ("clearAllTodos", "Delete every todo."),
];

/// A parsed, well-formed tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    GetAllTodos,
    CreateTodo { todo: String },
    SearchTodo { keyword: String },
    DeleteTodoById { id: i64 },
    ClearAllTodos,
}

/// Ways an `action` envelope can fail to execute
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("tool {tool} requires {expected} input")]
    MissingInput {
        tool: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode tool result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolRequest {
    /// Resolve a wire-level function name and input into a request
    ///
    /// Input checks are existence checks only; anything deeper is left to
    /// the store and the model.
    pub fn parse(function: &str, input: Option<&Value>) -> Result<Self, ToolError> {
        match function {
            "getAllTodos" => Ok(Self::GetAllTodos),
            "clearAllTodos" => Ok(Self::ClearAllTodos),
            "createTodo" => {
                let todo = input.and_then(Value::as_str).ok_or(ToolError::MissingInput {
                    tool: "createTodo",
                    expected: "a string",
                })?;
                Ok(Self::CreateTodo {
                    todo: todo.to_string(),
                })
            }
            "searchTodo" => {
                let keyword = input.and_then(Value::as_str).ok_or(ToolError::MissingInput {
                    tool: "searchTodo",
                    expected: "a string",
                })?;
                Ok(Self::SearchTodo {
                    keyword: keyword.to_string(),
                })
            }
            "deleteTodoById" => {
                // Accept a bare integer or a numeric string
                let id = input
                    .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
                    .ok_or(ToolError::MissingInput {
                        tool: "deleteTodoById",
                        expected: "an integer id",
                    })?;
                Ok(Self::DeleteTodoById { id })
            }
            other => Err(ToolError::UnknownTool {
                name: other.to_string(),
            }),
        }
    }

    /// Wire name of this request
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAllTodos => "getAllTodos",
            Self::CreateTodo { .. } => "createTodo",
            Self::SearchTodo { .. } => "searchTodo",
            Self::DeleteTodoById { .. } => "deleteTodoById",
            Self::ClearAllTodos => "clearAllTodos",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_no_input_tools() {
        assert_eq!(
            ToolRequest::parse("getAllTodos", None).unwrap(),
            ToolRequest::GetAllTodos
        );
        assert_eq!(
            ToolRequest::parse("clearAllTodos", Some(&json!("ignored"))).unwrap(),
            ToolRequest::ClearAllTodos
        );
    }

    #[test]
    fn test_parse_create_todo() {
        let req = ToolRequest::parse("createTodo", Some(&json!("Shop for milk."))).unwrap();
        assert_eq!(
            req,
            ToolRequest::CreateTodo {
                todo: "Shop for milk.".to_string()
            }
        );
    }

    #[test]
    fn test_parse_create_todo_missing_input() {
        let err = ToolRequest::parse("createTodo", None).unwrap_err();
        assert!(matches!(err, ToolError::MissingInput { tool: "createTodo", .. }));
    }

    #[test]
    fn test_parse_delete_accepts_number_or_string() {
        assert_eq!(
            ToolRequest::parse("deleteTodoById", Some(&json!(2))).unwrap(),
            ToolRequest::DeleteTodoById { id: 2 }
        );
        assert_eq!(
            ToolRequest::parse("deleteTodoById", Some(&json!("7"))).unwrap(),
            ToolRequest::DeleteTodoById { id: 7 }
        );
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolRequest::parse("dropTables", None).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { .. }));
        assert_eq!(err.to_string(), "unknown tool: dropTables");
    }

    #[test]
    fn test_catalog_covers_every_request() {
        let names: Vec<&str> = CATALOG.iter().map(|(name, _)| *name).collect();
        for req in [
            ToolRequest::GetAllTodos,
            ToolRequest::CreateTodo {
                todo: String::new(),
            },
            ToolRequest::SearchTodo {
                keyword: String::new(),
            },
            ToolRequest::DeleteTodoById { id: 0 },
            ToolRequest::ClearAllTodos,
        ] {
            assert!(names.contains(&req.name()));
        }
    }
}
