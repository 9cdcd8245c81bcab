use super::LlmClient;
use super::prompt_builder::ChatMessage;
use super::response::ResponseSchema;
use crate::error::CompletionError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
    refusal: Option<String>,
}

/// Only logged; compatible servers often send a partial block.
#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI-based implementation of LlmClient.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
    schema: ResponseSchema,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        model: String,
        api_base_url: String,
        timeout: Duration,
        schema: ResponseSchema,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CompletionError::ClientBuild)?;

        Ok(OpenAiClient {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            schema,
        })
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }
}

impl LlmClient for OpenAiClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let url = self.chat_url();
        let req = ChatRequest {
            model: &self.model,
            messages,
            response_format: self.schema.response_format(),
        };

        log::info!("Calling OpenAI model {:?}", self.model);
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .map_err(|source| CompletionError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let chat_resp: ChatResponse = resp.json().map_err(CompletionError::Envelope)?;

        if let Some(usage) = &chat_resp.usage {
            log::info!(
                "Token usage: prompt={}, completion={}, total={}",
                tokens(usage.prompt_tokens),
                tokens(usage.completion_tokens),
                tokens(usage.total_tokens)
            );
        }

        let message = chat_resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(CompletionError::NoChoices)?;

        if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
            return Err(CompletionError::Refused(refusal));
        }

        let content = message.content.ok_or(CompletionError::EmptyContent)?;
        log::trace!("Raw completion content:\n{}", truncate(&content, 2000));
        Ok(content)
    }
}

fn tokens(count: Option<u32>) -> String {
    count.map_or_else(|| "?".to_string(), |n| n.to_string())
}

/// Pull `error.message` out of an OpenAI error body, else flatten the raw text.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error.message;
    }
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.is_empty() {
        "empty response body".to_string()
    } else {
        truncate(&flat, 500)
    }
}

/// Truncate long strings for debug logging.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...[truncated {} bytes]", &s[..cut], s.len() - cut)
}
