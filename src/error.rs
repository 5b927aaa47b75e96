use std::path::PathBuf;

use thiserror::Error;

/// Operational failures of a publication run.
///
/// Validation problems are not errors: they are accumulated in
/// [`ValidationResult`](crate::validation::ValidationResult) and only surface
/// as a report at the pipeline boundary.
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No generated JSON artifact found in {}", .0.display())]
    NoArtifact(PathBuf),

    #[error("Git {operation} failed: {message}")]
    Git { operation: String, message: String },

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BlogError {
    pub fn git(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Git {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// External calls (git, search, Slack, generator) that fail without
    /// touching the artifact.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::Git { .. }
                | Self::Search(_)
                | Self::Notification(_)
                | Self::Generation(_)
                | Self::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
