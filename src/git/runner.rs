use std::path::{Path, PathBuf};
use std::process::Output;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{BlogError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Committed and pushed with this message.
    Pushed { message: String },
    /// The staged files were already up to date.
    NothingToCommit,
}

pub struct GitRunner {
    working_dir: PathBuf,
}

impl GitRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(args = ?args, dir = %self.working_dir.display(), "Running git command");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(args = ?args, stderr = %stderr, "Git command failed");
        }

        Ok(output)
    }

    pub async fn run_checked(&self, operation: &str, args: &[&str]) -> Result<Output> {
        let output = self.run(args).await?;

        if !output.status.success() {
            return Err(BlogError::git(operation, failure_details(&output)));
        }

        Ok(output)
    }

    pub async fn add(&self, file: &str) -> Result<()> {
        self.run_checked("add", &["add", file]).await?;
        Ok(())
    }

    /// `git status --porcelain` output; empty when the tree is clean.
    pub async fn status_porcelain(&self) -> Result<String> {
        let output = self
            .run_checked("status", &["status", "--porcelain"])
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.run_checked("commit", &["commit", "-m", message])
            .await?;
        Ok(())
    }

    pub async fn push(&self, remote: &str) -> Result<()> {
        self.run_checked("push", &["push", remote]).await?;
        Ok(())
    }

    /// Stage `file`, commit with `prefix` prepended to `message` and push to
    /// `remote`. Skips commit and push when nothing changed.
    pub async fn commit_and_push(
        &self,
        file: &str,
        prefix: &str,
        message: &str,
        remote: &str,
    ) -> Result<CommitOutcome> {
        let message = prefixed_message(prefix, message);

        self.add(file).await?;

        let changes = self.status_porcelain().await?;
        if changes.is_empty() {
            info!(file, "No changes to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }
        debug!(changes = %changes, "Changes found");

        self.commit(&message).await?;
        self.push(remote).await?;

        info!(remote, message = %message, "Committed and pushed");
        Ok(CommitOutcome::Pushed { message })
    }
}

/// `message` with `prefix` in front, unless it already starts with it.
pub(crate) fn prefixed_message(prefix: &str, message: &str) -> String {
    if message.starts_with(prefix) {
        message.to_string()
    } else {
        format!("{prefix} {message}")
    }
}

fn failure_details(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let details = [stderr.trim(), stdout.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("no error details");
    format!("{} ({})", details, output.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_added_once() {
        assert_eq!(
            prefixed_message("[blog-bot]", "Add post"),
            "[blog-bot] Add post"
        );
        assert_eq!(
            prefixed_message("[blog-bot]", "[blog-bot] Add post"),
            "[blog-bot] Add post"
        );
    }

    #[tokio::test]
    async fn test_run_checked_reports_operation() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = GitRunner::new(dir.path());

        // Not a repository, or git is missing: either way the call fails
        let err = runner.status_porcelain().await.unwrap_err();
        match err {
            BlogError::Git { operation, .. } => assert_eq!(operation, "status"),
            BlogError::Io(_) => {}
            other => panic!("unexpected error: {other}"),
        }
    }
}
