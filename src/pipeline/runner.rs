use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{error, info, warn};

use super::publisher::Publisher;
use super::report::{
    MSG_DEPLOY_FAILED, MSG_NO_ARTIFACT, MSG_PUBLISHED, MSG_REJECTED, RunReport,
};
use crate::artifact::ArtifactLocator;
use crate::config::{BlogConfig, Credentials};
use crate::error::{BlogError, Result};
use crate::gate::{GateDecision, PublicationGate};
use crate::generation::{GenerationOutput, Generator, WritingBrief, today};
use crate::notification::{EventType, Notifier, PublishEvent};

/// One publication run over a working directory.
pub struct Pipeline {
    working_dir: PathBuf,
    config: BlogConfig,
    credentials: Credentials,
    notifier: Notifier,
    progress: ProgressBar,
}

impl Pipeline {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        config: BlogConfig,
        credentials: Credentials,
        notifier: Notifier,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            config,
            credentials,
            notifier,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report stage changes on `progress` instead of a hidden bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Full run. Only missing credentials abort with an error; every later
    /// failure ends in an error report that has also been notified.
    pub async fn run(&self) -> Result<RunReport> {
        self.credentials.require()?;

        if let Err(e) = self.generate().await {
            return Ok(self.fail(EventType::RunFailed, &e).await);
        }

        self.progress.set_message("Locating artifact...");
        let locator = ArtifactLocator::new(
            &self.working_dir,
            &self.config.collection.file,
            &self.config.gate.debug_prefix,
        );
        let artifact = match locator.latest().await {
            Ok(path) => path,
            Err(e @ BlogError::NoArtifact(_)) => {
                warn!(error = %e, "Nothing to publish");
                self.notifier
                    .notify(&PublishEvent::new(EventType::RunFailed).with_errors(vec![
                        format!("{MSG_NO_ARTIFACT} (excluding {})", self.config.collection.file),
                    ]))
                    .await;
                return Ok(RunReport::error(MSG_NO_ARTIFACT));
            }
            Err(e) => return Ok(self.fail(EventType::RunFailed, &e).await),
        };

        Ok(self.publish_artifact(&artifact).await)
    }

    /// Draw a brief and run the generator with it.
    pub async fn generate(&self) -> Result<GenerationOutput> {
        let brief = WritingBrief::draw(&self.config, today(), &mut rand::thread_rng())?;
        info!(
            date = %brief.date,
            author = %brief.author,
            read_time = %brief.read_time,
            "Writing brief prepared"
        );

        self.progress.set_message("Generating post...");
        Generator::new(&self.config.generation, &self.working_dir)
            .run(&brief, &self.credentials)
            .await
    }

    /// Gate one artifact and publish it when accepted.
    pub async fn publish_artifact(&self, artifact: &Path) -> RunReport {
        self.progress.set_message("Validating artifact...");
        let gate = PublicationGate::from_config(&self.config);
        let outcome = match gate.evaluate(artifact).await {
            Ok(outcome) => outcome,
            Err(e) => {
                return self
                    .fail(EventType::RunFailed, &e)
                    .await
                    .with_file(artifact);
            }
        };

        let post = match outcome.decision {
            GateDecision::Accepted { post, repaired, .. } => {
                if repaired {
                    info!(slug = %post.slug, "Publishing repaired artifact");
                }
                post
            }
            GateDecision::Rejected {
                errors, debug_file, ..
            } => {
                let errors: Vec<String> = errors.iter().map(ToString::to_string).collect();
                self.notifier
                    .notify(&PublishEvent::rejected(errors.clone()))
                    .await;
                return RunReport::error(MSG_REJECTED)
                    .with_errors(errors)
                    .with_file(artifact)
                    .with_debug_file(debug_file);
            }
        };

        self.progress.set_message("Publishing...");
        let publisher = Publisher::new(&self.working_dir, &self.config, self.notifier.clone());
        match publisher.publish(artifact, &post).await {
            Ok(outcome) => {
                info!(slug = %post.slug, link = %outcome.link, "Post published");
                RunReport::success(MSG_PUBLISHED)
                    .with_file(artifact)
                    .with_slug(post.slug)
            }
            Err(e @ BlogError::Git { .. }) => {
                error!(error = %e, "Deployment failed");
                self.notifier
                    .notify(
                        &PublishEvent::new(EventType::DeployFailed)
                            .with_post(&post)
                            .with_errors(vec![e.to_string()]),
                    )
                    .await;
                RunReport::error(MSG_DEPLOY_FAILED)
                    .with_errors(vec![e.to_string()])
                    .with_file(artifact)
                    .with_slug(post.slug)
            }
            Err(e) => self
                .fail(EventType::RunFailed, &e)
                .await
                .with_file(artifact),
        }
    }

    async fn fail(&self, event_type: EventType, error: &BlogError) -> RunReport {
        error!(error = %error, external = error.is_external(), "Run failed");
        let report = RunReport::from_error(error);
        self.notifier
            .notify(&PublishEvent::new(event_type).with_errors(report.errors.clone()))
            .await;
        report
    }
}
