use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::artifact::preserve_debug_copy;
use crate::config::{BlogConfig, GateConfig};
use crate::error::Result;
use crate::post::BlogPost;
use crate::validation::{
    Repair, ValidationIssue, Validator, repair_json, sanitize_aggressive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Generated,
    Sanitized,
    ValidatedOk,
    ValidatedFail,
    Repairing,
    Rejected,
    Accepted,
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Accepted)
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generated => write!(f, "generated"),
            Self::Sanitized => write!(f, "sanitized"),
            Self::ValidatedOk => write!(f, "validated-ok"),
            Self::ValidatedFail => write!(f, "validated-fail"),
            Self::Repairing => write!(f, "repairing"),
            Self::Rejected => write!(f, "rejected"),
            Self::Accepted => write!(f, "accepted"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum GateDecision {
    Accepted {
        post: BlogPost,
        /// Passed only after the repair cycle.
        repaired: bool,
        /// Text written back over the artifact, when it differed from disk.
        cleaned_content: Option<String>,
    },
    Rejected {
        /// Issues of the first validation, reported to the operator.
        errors: Vec<ValidationIssue>,
        /// Issues still present after the repair cycle, if one ran.
        retry_errors: Vec<ValidationIssue>,
        debug_file: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub artifact: PathBuf,
    pub decision: GateDecision,
    pub trace: Vec<GateState>,
}

impl GateOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self.decision, GateDecision::Accepted { .. })
    }

    pub fn post(&self) -> Option<&BlogPost> {
        match &self.decision {
            GateDecision::Accepted { post, .. } => Some(post),
            GateDecision::Rejected { .. } => None,
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        match &self.decision {
            GateDecision::Accepted { .. } => Vec::new(),
            GateDecision::Rejected { errors, .. } => {
                errors.iter().map(ToString::to_string).collect()
            }
        }
    }

    pub fn repair_attempted(&self) -> bool {
        self.trace.contains(&GateState::Repairing)
    }
}

pub struct PublicationGate {
    validator: Validator,
    config: GateConfig,
}

impl PublicationGate {
    pub fn new(validator: Validator, config: GateConfig) -> Self {
        Self { validator, config }
    }

    pub fn from_config(config: &BlogConfig) -> Self {
        Self::new(
            Validator::new(config.post.cover_dir.clone()),
            config.gate.clone(),
        )
    }

    /// Decide the fate of one artifact.
    ///
    /// A rejected artifact stays on disk untouched and gains a debug copy.
    /// At most one repair cycle runs, and only after a control-character
    /// parse failure.
    pub async fn evaluate(&self, artifact: &Path) -> Result<GateOutcome> {
        let mut trace = vec![GateState::Generated];
        let raw = fs::read_to_string(artifact).await?;

        trace.push(GateState::Sanitized);
        let mut first = self.validator.validate(&raw);

        if let Some(post) = first.post.take() {
            trace.push(GateState::ValidatedOk);
            let cleaned_content = self.write_back(artifact, &raw, first.cleaned_content).await?;
            trace.push(GateState::Accepted);
            info!(artifact = %artifact.display(), slug = %post.slug, "Artifact accepted");
            return Ok(GateOutcome {
                artifact: artifact.to_path_buf(),
                decision: GateDecision::Accepted {
                    post,
                    repaired: false,
                    cleaned_content,
                },
                trace,
            });
        }

        trace.push(GateState::ValidatedFail);
        warn!(
            artifact = %artifact.display(),
            errors = first.errors.len(),
            "Validation failed"
        );
        for issue in &first.errors {
            warn!(kind = %issue.kind, "{}", issue);
        }

        let debug_file = preserve_debug_copy(artifact, &self.config.debug_prefix).await?;

        let mut retry_errors = Vec::new();
        if self.config.repair_enabled && first.is_control_character_failure() {
            trace.push(GateState::Repairing);
            info!(artifact = %artifact.display(), "Attempting repair of control-character failure");

            let candidate = self.repair_candidate(&raw);
            let mut retry = self.validator.validate(&candidate);

            if let Some(post) = retry.post.take() {
                let text = retry.cleaned_content.unwrap_or(candidate);
                let cleaned_content = self.write_back(artifact, &raw, Some(text)).await?;
                trace.push(GateState::Accepted);
                info!(artifact = %artifact.display(), slug = %post.slug, "Repair succeeded, artifact accepted");
                return Ok(GateOutcome {
                    artifact: artifact.to_path_buf(),
                    decision: GateDecision::Accepted {
                        post,
                        repaired: true,
                        cleaned_content,
                    },
                    trace,
                });
            }

            warn!(errors = ?retry.error_messages(), "Repair failed");
            retry_errors = retry.errors;
        } else {
            debug!("Failure is not repairable, skipping repair");
        }

        trace.push(GateState::Rejected);
        Ok(GateOutcome {
            artifact: artifact.to_path_buf(),
            decision: GateDecision::Rejected {
                errors: first.errors,
                retry_errors,
                debug_file,
            },
            trace,
        })
    }

    fn repair_candidate(&self, raw: &str) -> String {
        let stripped = sanitize_aggressive(raw);
        match repair_json(&stripped) {
            Repair::Repaired { text, strategy } => {
                debug!(%strategy, "Repair pass produced parseable JSON");
                text
            }
            Repair::NotNeeded => stripped.into_owned(),
            Repair::Failed { reason } => {
                debug!(reason = %reason, "Repair pass failed");
                stripped.into_owned()
            }
        }
    }

    /// Overwrite the artifact with `cleaned` when it differs from disk.
    async fn write_back(
        &self,
        artifact: &Path,
        on_disk: &str,
        cleaned: Option<String>,
    ) -> Result<Option<String>> {
        match cleaned {
            Some(text) if text != on_disk => {
                fs::write(artifact, &text).await?;
                info!(artifact = %artifact.display(), "Artifact cleaned and rewritten");
                Ok(Some(text))
            }
            _ => Ok(None),
        }
    }
}
