//! Conversation state and agent configuration

use llm_api::{ChatMessage, Role};

/// Configuration for the agent loop
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model to use
    pub model: String,
    /// Protocol violations (malformed JSON, stray tags) tolerated per turn
    pub max_protocol_retries: usize,
    /// Whether to print protocol steps
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: llm_api::DEFAULT_MODEL.to_string(),
            max_protocol_retries: 3,
            verbose: false,
        }
    }
}

impl AgentConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    #[allow(dead_code)]
    pub fn with_max_protocol_retries(mut self, max: usize) -> Self {
        self.max_protocol_retries = max;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// The ordered transcript sent to the model
///
/// Element 0 is always the fixed system instructions. `reset` and `append`
/// are the only mutators; the agent loop owns the transcript outright.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create a transcript holding only the system instructions
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system)],
        }
    }

    /// Truncate back to the system message
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Append one message, preserving order
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    /// The full ordered message list
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Message count, system instructions included
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}
