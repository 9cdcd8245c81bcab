use std::fmt;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::DecodeError;

/// The structured payload the model is constrained to return.
#[derive(Debug, Deserialize)]
struct CommitMessageResponse {
    commit_message: String,
}

/// JSON schema sent as the strict `response_format`; mirrors `CommitMessageResponse`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

impl Default for ResponseSchema {
    fn default() -> Self {
        ResponseSchema {
            name: "commit_message".to_string(),
            description: "Commit message".to_string(),
            schema: json!({
                "type": "object",
                "properties": {
                    "commit_message": { "type": "string" }
                },
                "required": ["commit_message"],
                "additionalProperties": false
            }),
        }
    }
}

impl ResponseSchema {
    /// The `response_format` request field.
    pub fn response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "description": self.description,
                "strict": true,
                "schema": self.schema,
            }
        })
    }
}

/// A generated commit message; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode the raw completion text into a commit message.
pub fn decode_commit_message(payload: &str) -> Result<CommitMessage, DecodeError> {
    let parsed: CommitMessageResponse =
        serde_json::from_str(payload).map_err(|e| DecodeError {
            reason: e.to_string(),
            payload: payload.to_string(),
        })?;

    if parsed.commit_message.trim().is_empty() {
        return Err(DecodeError {
            reason: "commit_message is empty".to_string(),
            payload: payload.to_string(),
        });
    }

    Ok(CommitMessage(parsed.commit_message))
}
