//! llm-api: chat-completion client for OpenAI-compatible providers
//!
//! Provides:
//! - Role-tagged chat message types
//! - The `LlmClient` trait (the seam the agent loop calls through)
//! - A DeepSeek client with JSON-object constrained responses

pub mod chat;
pub mod deepseek;

pub use chat::{ChatMessage, LlmClient, ModelCallError, Role};
pub use deepseek::{DeepSeekClient, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
