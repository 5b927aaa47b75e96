use serde::{Deserialize, Serialize};

use super::CONTROL_CHARACTER_SIGNATURE;
use crate::post::BlogPost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Text is not a JSON object. Only repair can fix it.
    Parse,
    /// Required field missing or empty. Needs regeneration.
    Schema,
    /// coverImage, date, readTime or slug rule violated. Needs regeneration.
    BusinessRule,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse => write!(f, "parse"),
            Self::Schema => write!(f, "schema"),
            Self::BusinessRule => write!(f, "business rule"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Parse,
            field: None,
            message: message.into(),
        }
    }

    pub fn schema(field: &str, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Schema,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    pub fn rule(field: &str, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::BusinessRule,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of one strict validation pass.
///
/// `errors` is empty exactly when `valid` is true.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    /// Text that parsed after cleaning and differs from the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<BlogPost>,
}

impl ValidationResult {
    pub fn accepted(post: BlogPost, cleaned_content: Option<String>) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            cleaned_content,
            post: Some(post),
        }
    }

    pub fn rejected(errors: Vec<ValidationIssue>) -> Self {
        debug_assert!(!errors.is_empty(), "rejection without issues");
        Self {
            valid: false,
            errors,
            cleaned_content: None,
            post: None,
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Whether any issue text contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.message.contains(needle))
    }

    /// Failure signature that allows the single repair cycle.
    pub fn is_control_character_failure(&self) -> bool {
        !self.valid && self.mentions(CONTROL_CHARACTER_SIGNATURE)
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}
