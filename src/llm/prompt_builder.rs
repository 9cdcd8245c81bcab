use serde::Serialize;

use crate::llm::prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged entry of a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Build the fixed system instruction followed by the branch, diff and log,
/// one user message each and always in that order.
pub fn commit_message_prompt(branch: &str, diff: &str, log: &str) -> Vec<ChatMessage> {
    let branch = if branch.is_empty() {
        prompts::DETACHED_HEAD
    } else {
        branch
    };

    vec![
        ChatMessage::system(prompts::SYSTEM_INSTRUCTIONS),
        ChatMessage::user(format!("Current branch: {branch}")),
        ChatMessage::user(format!("Git diff:\n{diff}")),
        ChatMessage::user(format!("Git log:\n{log}")),
    ]
}
