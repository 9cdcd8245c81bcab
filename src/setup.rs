use log::debug;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::LlmClient;
use crate::llm::openai::OpenAiClient;

/// Build the completion client from the resolved config.
pub fn build_llm_client(cfg: &Config) -> Result<Box<dyn LlmClient>, AppError> {
    debug!(
        "Using OpenAiClient with model {} at {} (timeout {:?})",
        cfg.model, cfg.base_url, cfg.timeout
    );

    let client = OpenAiClient::new(
        cfg.openai_api_key.clone(),
        cfg.model.clone(),
        cfg.base_url.clone(),
        cfg.timeout,
        cfg.schema.clone(),
    )?;
    Ok(Box::new(client))
}
