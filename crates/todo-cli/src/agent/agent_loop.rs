//! Agent loop implementation
//!
//! Drives one user turn through the protocol: user envelope in, model
//! responses parsed and dispatched by tag until a terminal `output` is
//! produced, observations fed back after every action.

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use llm_api::{LlmClient, ModelCallError, Role};

use crate::store::TodoStore;
use crate::tools::{dispatch, ToolError, ToolRequest, CATALOG};

use super::envelope::Envelope;
use super::prompt::build_system_prompt;
use super::state::{AgentConfig, Transcript};

// ANSI colors
const CYAN: &str = "\x1b[96m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Ways a turn fails visibly instead of producing output
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Model(#[from] ModelCallError),

    #[error("model failed to follow the protocol after {attempts} attempts")]
    ProtocolExhausted { attempts: usize },
}

/// The agent loop orchestrator
///
/// Owns the transcript outright; nothing else reads or mutates it.
pub struct AgentLoop {
    client: Box<dyn LlmClient>,
    store: TodoStore,
    transcript: Transcript,
    config: AgentConfig,
}

impl AgentLoop {
    /// Create a new agent loop
    pub fn new(client: Box<dyn LlmClient>, store: TodoStore, config: AgentConfig) -> Self {
        let transcript = Transcript::new(build_system_prompt());
        Self {
            client,
            store,
            transcript,
            config,
        }
    }

    /// The backing store (for direct inspection, e.g. the /todos command)
    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Run one full user turn, returning the terminal output text
    ///
    /// The transcript is truncated back to the system instructions on every
    /// exit path, so the next turn always starts clean.
    #[instrument(skip(self, user_text), fields(model = %self.config.model))]
    pub async fn run_turn(&mut self, user_text: &str) -> Result<String, TurnError> {
        let result = self.drive_turn(user_text).await;
        self.transcript.reset();
        result
    }

    async fn drive_turn(&mut self, user_text: &str) -> Result<String, TurnError> {
        let user_env = Envelope::User {
            user: user_text.to_string(),
        };
        self.transcript.append(Role::User, user_env.to_json());

        let mut violations = 0usize;

        loop {
            debug!(messages = self.transcript.len(), "Calling model");
            let content = self.complete_with_spinner().await?;

            let envelope = match Envelope::parse(&content) {
                Ok(env) => env,
                Err(e) => {
                    // Discard the malformed assistant turn; the transcript
                    // stays unchanged for the retry.
                    warn!(error = %e.source, raw = %e.raw, "Malformed assistant turn");
                    violations += 1;
                    if violations >= self.config.max_protocol_retries {
                        return Err(TurnError::ProtocolExhausted {
                            attempts: violations,
                        });
                    }
                    continue;
                }
            };

            match envelope {
                Envelope::Plan { plan } => {
                    debug!(plan = %plan, "Model planned");
                    if self.config.verbose {
                        println!("{}[plan]{} {}", DIM, RESET, plan);
                    }
                    self.transcript.append(Role::Assistant, content);
                }
                Envelope::Action { function, input } => {
                    if self.config.verbose {
                        println!("{}[action]{} {}", CYAN, RESET, function);
                    }
                    let observation = self.perform_action(&function, input.as_ref()).await;
                    if self.config.verbose {
                        println!("{}[observation]{} {}", DIM, RESET, observation);
                    }
                    let obs_env = Envelope::Observation { observation };
                    self.transcript.append(Role::Assistant, obs_env.to_json());
                }
                Envelope::Output { output } => {
                    info!("Turn complete");
                    return Ok(output);
                }
                Envelope::User { .. } | Envelope::Observation { .. } => {
                    // Only the loop itself may emit these tags; a model
                    // echoing them makes no progress.
                    warn!(tag = envelope.tag(), "Model emitted a loop-owned tag");
                    violations += 1;
                    if violations >= self.config.max_protocol_retries {
                        return Err(TurnError::ProtocolExhausted {
                            attempts: violations,
                        });
                    }
                }
            }
        }
    }

    /// Resolve and execute one action, always yielding an observation payload
    ///
    /// Unknown tools, missing input, and storage failures all come back as
    /// error payloads the model can read and correct.
    async fn perform_action(&self, function: &str, input: Option<&Value>) -> Value {
        match ToolRequest::parse(function, input) {
            Ok(request) => match dispatch(&self.store, request).await {
                Ok(result) => json!({ "result": result }),
                Err(e) => {
                    warn!(tool = function, error = %e, "Tool execution failed");
                    json!({ "error": e.to_string() })
                }
            },
            Err(e @ ToolError::UnknownTool { .. }) => {
                warn!(tool = function, "Unknown tool requested");
                let names: Vec<&str> = CATALOG.iter().map(|(name, _)| *name).collect();
                json!({
                    "error": format!("{}. Available tools: {}", e, names.join(", "))
                })
            }
            Err(e) => {
                warn!(tool = function, error = %e, "Malformed tool invocation");
                json!({ "error": e.to_string() })
            }
        }
    }

    async fn complete_with_spinner(&self) -> Result<String, ModelCallError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let result = self
            .client
            .complete(&self.config.model, self.transcript.messages())
            .await;

        spinner.finish_and_clear();
        result
    }
}
