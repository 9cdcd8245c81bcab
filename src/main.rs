mod cli_args;
mod config;
mod error;
mod git;
mod llm;
mod logging;
mod progress;
mod setup;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use crate::cli_args::Cli;
use crate::config::Config;
use crate::error::{AppError, InspectorStage};
use crate::git::{GitCli, RepoInspector};
use crate::llm::LlmClient;
use crate::llm::prompt_builder::commit_message_prompt;
use crate::llm::response::{CommitMessage, decode_commit_message};

/// Inspect the repository, ask the model, decode its answer.
fn generate(
    repo: &dyn RepoInspector,
    llm: &dyn LlmClient,
    log_depth: usize,
) -> Result<CommitMessage, AppError> {
    let diff = repo
        .working_diff()
        .map_err(AppError::inspector(InspectorStage::Diff))?;
    let log = repo
        .recent_log(log_depth)
        .map_err(AppError::inspector(InspectorStage::Log))?;
    let branch = repo
        .current_branch()
        .map_err(AppError::inspector(InspectorStage::Branch))?;

    if diff.trim().is_empty() {
        log::warn!("No changes against HEAD; asking the model anyway");
    }
    if branch.is_empty() {
        log::info!("HEAD is detached");
    }
    log::debug!(
        "Collected diff ({} bytes), log ({} lines), branch {:?}",
        diff.len(),
        log.lines().count(),
        branch
    );

    let messages = commit_message_prompt(&branch, &diff, &log);
    log::trace!("Prompt messages: {messages:#?}");

    let payload = match progress::spinner("Generating commit message...") {
        Ok(pb) => {
            let result = llm.complete(&messages);
            pb.finish_and_clear();
            result?
        }
        Err(e) => {
            log::debug!("Spinner unavailable: {e}");
            llm.complete(&messages)?
        }
    };

    Ok(decode_commit_message(&payload)?)
}

fn run() -> Result<CommitMessage, AppError> {
    let cfg = Config::from_sources()?;
    let llm = setup::build_llm_client(&cfg)?;
    generate(&GitCli::default(), llm.as_ref(), cfg.log_depth)
}

fn main() -> ExitCode {
    if let Err(e) = Cli::try_parse() {
        // --help and --version land here too and keep clap's exit status.
        if !e.use_stderr() {
            e.exit();
        }
        let _ = e.print();
        return ExitCode::FAILURE;
    }
    logging::init_logger(logging::verbosity_from_env());

    match run() {
        Ok(message) => {
            println!("{}", message.as_str());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompletionError, GitError};
    use crate::llm::prompt_builder::ChatMessage;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeRepo {
        diff: String,
        log: String,
        branch: String,
        fail: Option<InspectorStage>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FakeRepo {
        fn new(diff: &str, log: &str, branch: &str) -> Self {
            FakeRepo {
                diff: diff.into(),
                log: log.into(),
                branch: branch.into(),
                ..FakeRepo::default()
            }
        }

        fn answer(&self, stage: InspectorStage, value: &str) -> Result<String, GitError> {
            if self.fail == Some(stage) {
                return Err(GitError::Spawn {
                    binary: "git".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                });
            }
            Ok(value.to_string())
        }
    }

    impl RepoInspector for FakeRepo {
        fn working_diff(&self) -> Result<String, GitError> {
            self.calls.borrow_mut().push("diff");
            self.answer(InspectorStage::Diff, &self.diff)
        }

        fn recent_log(&self, n: usize) -> Result<String, GitError> {
            assert_eq!(n, 30);
            self.calls.borrow_mut().push("log");
            self.answer(InspectorStage::Log, &self.log)
        }

        fn current_branch(&self) -> Result<String, GitError> {
            self.calls.borrow_mut().push("branch");
            self.answer(InspectorStage::Branch, &self.branch)
        }
    }

    struct FakeLlm {
        reply: Result<String, fn() -> CompletionError>,
        seen: RefCell<Vec<Vec<ChatMessage>>>,
    }

    impl FakeLlm {
        fn replying(text: &str) -> Self {
            FakeLlm {
                reply: Ok(text.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing(err: fn() -> CompletionError) -> Self {
            FakeLlm {
                reply: Err(err),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl LlmClient for FakeLlm {
        fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
            self.seen.borrow_mut().push(messages.to_vec());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    #[test]
    fn end_to_end_with_fakes() {
        let repo = FakeRepo::new("D", "L", "B");
        let llm = FakeLlm::replying(r#"{"commit_message":"fix(auth): handle expired token"}"#);

        let message = generate(&repo, &llm, 30).unwrap();

        assert_eq!(message.as_str(), "fix(auth): handle expired token");
        let seen = llm.seen.borrow();
        assert_eq!(seen.len(), 1);
        let bodies: Vec<&str> = seen[0].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(&bodies[1..], ["Current branch: B", "Git diff:\nD", "Git log:\nL"]);
    }

    #[test]
    fn empty_diff_still_calls_the_model() {
        let repo = FakeRepo::new("", "feat: x", "main");
        let llm = FakeLlm::replying(r#"{"commit_message":"chore(chore): nothing"}"#);

        generate(&repo, &llm, 30).unwrap();
        assert_eq!(llm.seen.borrow().len(), 1);
    }

    #[test]
    fn inspector_failures_name_their_stage_and_skip_the_model() {
        for (stage, label) in [
            (InspectorStage::Diff, "git diff failed"),
            (InspectorStage::Log, "git log failed"),
            (InspectorStage::Branch, "git branch failed"),
        ] {
            let repo = FakeRepo {
                fail: Some(stage),
                ..FakeRepo::new("D", "L", "B")
            };
            let llm = FakeLlm::replying("unused");

            let err = generate(&repo, &llm, 30).unwrap_err();

            assert!(matches!(err, AppError::Inspector { stage: s, .. } if s == stage));
            assert!(err.to_string().starts_with(label), "{err}");
            assert!(llm.seen.borrow().is_empty());
        }
    }

    #[test]
    fn queries_stop_at_first_failure() {
        let repo = FakeRepo {
            fail: Some(InspectorStage::Diff),
            ..FakeRepo::new("D", "L", "B")
        };
        let _ = generate(&repo, &FakeLlm::replying("unused"), 30);
        assert_eq!(*repo.calls.borrow(), ["diff"]);
    }

    #[test]
    fn completion_failure_is_reported_as_such() {
        let repo = FakeRepo::new("D", "L", "B");
        let llm = FakeLlm::failing(|| CompletionError::NoChoices);

        let err = generate(&repo, &llm, 30).unwrap_err();
        assert!(matches!(err, AppError::Completion(CompletionError::NoChoices)));
        assert_eq!(err.to_string(), "completion failed: no choices returned");
    }

    #[test]
    fn undecodable_reply_is_a_decode_failure() {
        let repo = FakeRepo::new("D", "L", "B");
        let llm = FakeLlm::replying("not json");

        match generate(&repo, &llm, 30).unwrap_err() {
            AppError::Decode(e) => assert_eq!(e.payload, "not json"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
