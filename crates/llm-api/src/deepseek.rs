//! DeepSeek API client (OpenAI-compatible chat completions)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chat::{ChatMessage, LlmClient, ModelCallError};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Default chat model
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// DeepSeek chat-completion client
#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl DeepSeekClient {
    /// Create a new client with default timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        }
    }
}

#[async_trait]
impl LlmClient for DeepSeekClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, ModelCallError> {
        let url = format!("{}/chat/completions", self.base_url);

        let req = ChatRequest {
            model,
            messages,
            // Constrain output to a single well-formed JSON object
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            stream: false,
        };

        debug!(model, messages = messages.len(), "Sending chat completion");

        let resp = self.client.post(&url).bearer_auth(&self.api_key).json(&req).send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "Provider rejected credentials");
            return Err(ModelCallError::Auth {
                status: status.as_u16(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Provider rate limit hit");
            return Err(ModelCallError::RateLimited);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Provider returned an error");
            return Err(ModelCallError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = resp.json().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ModelCallError::EmptyResponse)
    }
}
