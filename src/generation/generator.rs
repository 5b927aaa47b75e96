use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::WritingBrief;
use crate::config::{Credentials, GenerationConfig};
use crate::error::{BlogError, Result};
use crate::utils::truncate_with_marker;

const STDERR_EXCERPT_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutput {
    /// No command configured; the artifact is expected to already exist.
    Skipped,
    Completed { stdout: String },
}

/// Runs the external writing crew in the working directory.
pub struct Generator {
    command: Vec<String>,
    timeout: Duration,
    working_dir: PathBuf,
}

impl Generator {
    pub fn new(config: &GenerationConfig, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: config.command.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            working_dir: working_dir.into(),
        }
    }

    /// Runs the command with the brief and the API keys in its environment.
    pub async fn run(
        &self,
        brief: &WritingBrief,
        credentials: &Credentials,
    ) -> Result<GenerationOutput> {
        let Some((program, args)) = self.command.split_first() else {
            debug!("No generator command configured, skipping generation");
            return Ok(GenerationOutput::Skipped);
        };

        info!(
            program = %program,
            topic = %brief.topic,
            author = %brief.author,
            "Starting post generation"
        );

        let child = Command::new(program)
            .args(args)
            .current_dir(&self.working_dir)
            .envs(credentials.process_env())
            .envs(brief.env_vars())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BlogError::Generation(format!("failed to start '{program}': {e}")))?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Generator timed out");
                return Err(BlogError::Generation(format!(
                    "'{program}' did not finish within {}s",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BlogError::Generation(format!(
                "'{program}' exited with {}: {}",
                output.status,
                truncate_with_marker(stderr.trim(), STDERR_EXCERPT_CHARS)
            )));
        }

        info!("Post generation completed");
        Ok(GenerationOutput::Completed {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
