use crate::error::AppError;
use crate::llm::response::ResponseSchema;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use toml::{Table, Value};

pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;
pub const DEFAULT_LOG_DEPTH: usize = 30;

/// Final resolved configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub log_depth: usize,
    pub schema: ResponseSchema,
}

impl Config {
    /// Build the final config from the environment, TOML file, and defaults.
    ///
    /// The API key comes from `OPENAI_API_KEY` only and is checked before
    /// anything else is read. Other settings take precedence:
    ///   1. Env vars (`CCAI_MODEL`, `OPENAI_BASE_URL`, `CCAI_TIMEOUT_SECS`, `CCAI_LOG_DEPTH`)
    ///   2. TOML `~/.config/conventional-commits-ai.toml`
    ///   3. Hardcoded defaults
    pub fn from_sources() -> Result<Self, AppError> {
        Self::resolve(
            |key| env::var(key).ok(),
            || load_file_config().unwrap_or_default(),
        )
    }

    fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        load_file: impl FnOnce() -> FileConfig,
    ) -> Result<Self, AppError> {
        let openai_api_key =
            non_empty(lookup("OPENAI_API_KEY")).ok_or(AppError::MissingCredential)?;
        let file_cfg = load_file();

        let model = non_empty(lookup("CCAI_MODEL"))
            .or(file_cfg.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = non_empty(lookup("OPENAI_BASE_URL"))
            .or(file_cfg.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = parse_env(&lookup, "CCAI_TIMEOUT_SECS")
            .filter(|secs: &u64| *secs > 0)
            .or(file_cfg.timeout_secs.filter(|secs| *secs > 0))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let log_depth = parse_env(&lookup, "CCAI_LOG_DEPTH")
            .filter(|n: &usize| *n > 0)
            .or(file_cfg.log_depth.filter(|n| *n > 0))
            .unwrap_or(DEFAULT_LOG_DEPTH);

        Ok(Config {
            openai_api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            log_depth,
            schema: ResponseSchema::default(),
        })
    }
}

#[derive(Debug, Default)]
struct FileConfig {
    /// Default model to use when not provided via env.
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    log_depth: Option<usize>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_env<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = non_empty(lookup(key))?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}

/// Return `~/.config/conventional-commits-ai.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("conventional-commits-ai.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path)
        .map_err(|e| log::warn!("Could not read {}: {e}", path.display()))
        .ok()?;
    parse_file_config(&data)
        .map_err(|e| log::warn!("Ignoring {}: {e}", path.display()))
        .ok()
}

/// Parse the file leniently: a value of the wrong type is dropped on its own
/// and the remaining keys still apply. Only broken TOML rejects the file.
fn parse_file_config(data: &str) -> Result<FileConfig, toml::de::Error> {
    let table: Table = toml::from_str(data)?;

    Ok(FileConfig {
        model: file_value(&table, "model", |v| v.as_str().map(str::to_string)),
        base_url: file_value(&table, "base_url", |v| v.as_str().map(str::to_string)),
        timeout_secs: file_value(&table, "timeout_secs", |v| {
            v.as_integer().and_then(|n| u64::try_from(n).ok())
        }),
        log_depth: file_value(&table, "log_depth", |v| {
            v.as_integer().and_then(|n| usize::try_from(n).ok())
        }),
    })
}

fn file_value<T>(table: &Table, key: &str, extract: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let value = table.get(key)?;
    let out = extract(value);
    if out.is_none() {
        log::warn!("Ignoring config file value {key} = {value}: not usable");
    }
    out
}
