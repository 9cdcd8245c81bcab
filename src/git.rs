use std::path::PathBuf;
use std::process::Command as GitCommand;

use crate::error::GitError;

/// Read-only queries against the repository the tool is run in.
pub trait RepoInspector {
    /// Unified diff between the working tree and HEAD. Empty when the tree is clean.
    fn working_diff(&self) -> Result<String, GitError>;

    /// Subject lines of the last `n` commits, newest first.
    fn recent_log(&self, n: usize) -> Result<String, GitError>;

    /// Checked-out branch name, or an empty string on a detached HEAD.
    fn current_branch(&self) -> Result<String, GitError>;
}

/// Inspector backed by the `git` binary on PATH.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    workdir: Option<PathBuf>,
}

impl Default for GitCli {
    fn default() -> Self {
        GitCli {
            binary: "git".to_string(),
            workdir: None,
        }
    }
}

impl GitCli {
    #[cfg(test)]
    fn in_dir(dir: impl Into<PathBuf>) -> Self {
        GitCli {
            workdir: Some(dir.into()),
            ..GitCli::default()
        }
    }

    #[cfg(test)]
    fn with_binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }

    /// Run a git command and capture stdout as String.
    fn git_output(&self, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = GitCommand::new(&self.binary);
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        log::debug!("Running {} {:?}", self.binary, args);

        let output = cmd.output().map_err(|source| GitError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::Failed {
                status: output.status,
                stderr: stderr.trim().lines().collect::<Vec<_>>().join(" "),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl RepoInspector for GitCli {
    fn working_diff(&self) -> Result<String, GitError> {
        self.git_output(&["diff", "HEAD"])
    }

    fn recent_log(&self, n: usize) -> Result<String, GitError> {
        let n = n.to_string();
        self.git_output(&["log", "--pretty=format:%s", "-n", &n])
    }

    fn current_branch(&self) -> Result<String, GitError> {
        let name = self.git_output(&["branch", "--show-current"])?;
        Ok(name.trim().to_string())
    }
}
