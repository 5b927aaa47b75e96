use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::repair::error_offset;
use super::result::{ValidationIssue, ValidationResult};
use super::sanitize::sanitize;
use crate::post::{BlogPost, DEFAULT_COVER_DIR, REQUIRED_FIELDS};
use crate::utils::context_window;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("static regex"));

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("static regex"));

const READ_TIME_MARKER: &str = "MIN";
const PARSE_CONTEXT_CHARS: usize = 20;

/// Strict checks that must all pass before a post may be committed.
#[derive(Debug, Clone)]
pub struct Validator {
    cover_dir: String,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_COVER_DIR)
    }
}

impl Validator {
    pub fn new(cover_dir: impl Into<String>) -> Self {
        Self {
            cover_dir: cover_dir.into(),
        }
    }

    pub fn validate(&self, raw: &str) -> ValidationResult {
        let cleaned = sanitize(raw);
        debug!(
            original_len = raw.len(),
            cleaned_len = cleaned.len(),
            "Sanitized artifact"
        );

        let record = match parse_object(&cleaned) {
            Ok(record) => record,
            Err(issue) => return ValidationResult::rejected(vec![issue]),
        };

        let missing = check_required(&record);
        if !missing.is_empty() {
            return ValidationResult::rejected(missing);
        }

        let post: BlogPost = match serde_json::from_value(Value::Object(record)) {
            Ok(post) => post,
            Err(e) => {
                return ValidationResult::rejected(vec![ValidationIssue::parse(format!(
                    "invalid post record - {e}"
                ))]);
            }
        };

        let issues = self.check_rules(&post);
        if !issues.is_empty() {
            return ValidationResult::rejected(issues);
        }

        let cleaned_content = match cleaned {
            std::borrow::Cow::Owned(text) if text != raw => Some(text),
            _ => None,
        };
        ValidationResult::accepted(post, cleaned_content)
    }

    fn check_rules(&self, post: &BlogPost) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let expected_cover = BlogPost::expected_cover_in(&self.cover_dir, &post.slug);
        if post.cover_image != expected_cover {
            issues.push(ValidationIssue::rule(
                "coverImage",
                format!(
                    "coverImage '{}' does not match expected '{}'",
                    post.cover_image, expected_cover
                ),
            ));
        }

        if !DATE_PATTERN.is_match(&post.date) {
            issues.push(ValidationIssue::rule(
                "date",
                format!("date '{}' is not in DD/MM/YYYY format", post.date),
            ));
        }

        if !post.read_time.contains(READ_TIME_MARKER) {
            issues.push(ValidationIssue::rule(
                "readTime",
                format!(
                    "readTime '{}' must include '{}'",
                    post.read_time, READ_TIME_MARKER
                ),
            ));
        }

        if !SLUG_PATTERN.is_match(&post.slug) {
            issues.push(ValidationIssue::rule(
                "slug",
                format!(
                    "slug '{}' is not URL-friendly (only a-z, 0-9, -)",
                    post.slug
                ),
            ));
        }

        issues
    }
}

/// Validate with the default cover directory.
pub fn validate_post(raw: &str) -> ValidationResult {
    Validator::default().validate(raw)
}

fn parse_object(text: &str) -> Result<Map<String, Value>, ValidationIssue> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(ValidationIssue::parse(format!(
            "invalid JSON - expected an object at top level, found {}",
            json_type(&other)
        ))),
        Err(e) => {
            let offset = error_offset(text, e.line(), e.column());
            debug!(
                error = %e,
                offset,
                context = ?context_window(text, offset, PARSE_CONTEXT_CHARS),
                "Artifact is not valid JSON"
            );
            Err(ValidationIssue::parse(format!("invalid JSON - {e}")))
        }
    }
}

fn check_required(record: &Map<String, Value>) -> Vec<ValidationIssue> {
    REQUIRED_FIELDS
        .iter()
        .filter_map(|&field| match record.get(field) {
            Some(Value::String(s)) if !s.is_empty() => None,
            None | Some(Value::Null) | Some(Value::String(_)) => Some(ValidationIssue::schema(
                field,
                format!("required field missing or empty: {field}"),
            )),
            Some(other) => Some(ValidationIssue::schema(
                field,
                format!(
                    "required field must be a string: {field} (found {})",
                    json_type(other)
                ),
            )),
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
