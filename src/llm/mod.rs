pub mod openai;
pub mod prompt_builder;
mod prompts;
pub mod response;

use crate::error::CompletionError;
use prompt_builder::ChatMessage;

/// Trait for talking to a chat completion backend.
pub trait LlmClient {
    /// Send the composed messages and return the raw text of the first choice.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}
