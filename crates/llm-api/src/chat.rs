//! Chat message types and the client trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Failure modes of a chat-completion call
///
/// All of these abort the current turn; none are retried here.
#[derive(Debug, Error)]
pub enum ModelCallError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected by provider (status {status})")]
    Auth { status: u16 },

    #[error("rate limited by provider")]
    RateLimited,

    #[error("provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("model response contained no message content")]
    EmptyResponse,
}

/// A chat-completion backend
///
/// `complete` sends the full ordered transcript and returns the raw text
/// content of one assistant message. Parsing that text is the caller's job.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ModelCallError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::system("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::user("x").role, Role::User);
        assert_eq!(ChatMessage::assistant("x").role, Role::Assistant);
    }
}
