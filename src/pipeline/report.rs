use std::path::PathBuf;

use serde::Serialize;

use crate::error::BlogError;

pub const MSG_PUBLISHED: &str = "Blog post validated, merged and deployed";
pub const MSG_REJECTED: &str = "Blog post rejected with critical errors - artifact kept for debugging";
pub const MSG_DEPLOY_FAILED: &str = "Blog post validated but deployment failed";
pub const MSG_NO_ARTIFACT: &str = "No generated JSON artifact found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Error,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Final result of a run or of a single publish.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl RunReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Success,
            message: message.into(),
            errors: Vec::new(),
            file: None,
            debug_file: None,
            slug: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            ..Self::success(message)
        }
    }

    /// Report for an operational failure that ended the run.
    pub fn from_error(error: &BlogError) -> Self {
        Self::error(format!("Automation error: {error}")).with_errors(vec![error.to_string()])
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_debug_file(mut self, debug_file: impl Into<PathBuf>) -> Self {
        self.debug_file = Some(debug_file.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_report_serializes_without_empty_fields() {
        let report = RunReport::error(MSG_NO_ARTIFACT);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], MSG_NO_ARTIFACT);
        assert!(value.get("errors").is_none());
        assert!(value.get("debug_file").is_none());
    }

    #[test]
    fn test_from_error_carries_the_message() {
        let report = RunReport::from_error(&BlogError::git("push", "rejected"));
        assert!(!report.is_success());
        assert_eq!(report.errors, vec!["Git push failed: rejected"]);
    }
}
