//! The tagged JSON envelope exchanged with the model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One protocol message, as carried in chat message content
///
/// Wire schema, one variant per tag:
/// - `{"type":"user","user": string}`
/// - `{"type":"plan","plan": string}`
/// - `{"type":"action","function": string, "input"?: any}`
/// - `{"type":"observation","observation": any}`
/// - `{"type":"output","output": string}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    User {
        user: String,
    },
    Plan {
        plan: String,
    },
    Action {
        function: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<Value>,
    },
    Observation {
        observation: Value,
    },
    Output {
        output: String,
    },
}

/// Malformed model output, kept with the raw text for logging
#[derive(Debug, Error)]
#[error("malformed envelope: {source}")]
pub struct EnvelopeParseError {
    #[source]
    pub source: serde_json::Error,
    pub raw: String,
}

impl Envelope {
    /// Parse assistant text into an envelope
    pub fn parse(raw: &str) -> Result<Self, EnvelopeParseError> {
        serde_json::from_str(raw).map_err(|source| EnvelopeParseError {
            source,
            raw: raw.to_string(),
        })
    }

    /// Serialize for transcript content
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("envelope serializes to JSON")
    }

    /// The wire tag of this envelope
    pub fn tag(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Plan { .. } => "plan",
            Self::Action { .. } => "action",
            Self::Observation { .. } => "observation",
            Self::Output { .. } => "output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_user() {
        let env = Envelope::parse(r#"{"type":"user","user":"Add a task"}"#).unwrap();
        assert_eq!(
            env,
            Envelope::User {
                user: "Add a task".to_string()
            }
        );
    }

    #[test]
    fn test_parse_plan() {
        let env = Envelope::parse(r#"{"type":"plan","plan":"I will ask for details."}"#).unwrap();
        assert_eq!(env.tag(), "plan");
    }

    #[test]
    fn test_parse_action_with_input() {
        let env = Envelope::parse(
            r#"{"type":"action","function":"createTodo","input":"Shop for milk."}"#,
        )
        .unwrap();
        assert_eq!(
            env,
            Envelope::Action {
                function: "createTodo".to_string(),
                input: Some(json!("Shop for milk.")),
            }
        );
    }

    #[test]
    fn test_parse_action_without_input() {
        let env = Envelope::parse(r#"{"type":"action","function":"getAllTodos"}"#).unwrap();
        assert_eq!(
            env,
            Envelope::Action {
                function: "getAllTodos".to_string(),
                input: None,
            }
        );
    }

    #[test]
    fn test_action_without_input_omits_field() {
        let env = Envelope::Action {
            function: "getAllTodos".to_string(),
            input: None,
        };
        assert_eq!(env.to_json(), r#"{"type":"action","function":"getAllTodos"}"#);
    }

    #[test]
    fn test_parse_observation_any_payload() {
        let env = Envelope::parse(r#"{"type":"observation","observation":{"result":2}}"#).unwrap();
        assert_eq!(
            env,
            Envelope::Observation {
                observation: json!({"result": 2}),
            }
        );
    }

    #[test]
    fn test_output_roundtrip() {
        let env = Envelope::Output {
            output: "Done!".to_string(),
        };
        assert_eq!(env.to_json(), r#"{"type":"output","output":"Done!"}"#);
        assert_eq!(Envelope::parse(&env.to_json()).unwrap(), env);
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = Envelope::parse("Sure! Here's your answer.").unwrap_err();
        assert_eq!(err.raw, "Sure! Here's your answer.");
    }

    #[test]
    fn test_parse_rejects_unknown_tag() {
        assert!(Envelope::parse(r#"{"type":"thought","thought":"hmm"}"#).is_err());
    }
}
