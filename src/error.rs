use std::fmt;
use std::process::ExitStatus;

use thiserror::Error;

/// Which repository query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorStage {
    Diff,
    Log,
    Branch,
}

impl InspectorStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectorStage::Diff => "git diff",
            InspectorStage::Log => "git log",
            InspectorStage::Branch => "git branch",
        }
    }
}

impl fmt::Display for InspectorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from running the git binary.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("could not run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Errors from the chat completion endpoint.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unreadable response envelope: {0}")]
    Envelope(#[source] reqwest::Error),

    #[error("no choices returned")]
    NoChoices,

    #[error("model refused: {0}")]
    Refused(String),

    #[error("first choice carried no content")]
    EmptyContent,
}

/// The completion payload could not be turned into a commit message.
#[derive(Error, Debug)]
#[error("{reason}; payload: {payload:?}")]
pub struct DecodeError {
    pub reason: String,
    pub payload: String,
}

/// Top-level failure of a run. Each variant maps to one pipeline stage.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("OPENAI_API_KEY is not set")]
    MissingCredential,

    #[error("{stage} failed: {source}")]
    Inspector {
        stage: InspectorStage,
        #[source]
        source: GitError,
    },

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
}

impl AppError {
    pub fn inspector(stage: InspectorStage) -> impl FnOnce(GitError) -> AppError {
        move |source| AppError::Inspector { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspector_errors_name_the_stage() {
        let err = AppError::inspector(InspectorStage::Log)(GitError::Spawn {
            binary: "git".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        });
        assert_eq!(err.to_string(), "git log failed: could not run git: not found");
    }

    #[test]
    fn decode_error_stays_on_one_line() {
        let err = AppError::from(DecodeError {
            reason: "missing field `commit_message`".into(),
            payload: "{\n}".into(),
        });
        let rendered = err.to_string();
        assert!(!rendered.contains('\n'));
        assert!(rendered.starts_with("decode failed: missing field"));
        assert!(rendered.contains(r#""{\n}""#));
    }
}
