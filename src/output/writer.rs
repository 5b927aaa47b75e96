use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::gate::{GateDecision, GateOutcome};
use crate::pipeline::RunReport;
use crate::search::{SearchResult, format_results};
use crate::validation::{ValidationIssue, ValidationResult};

/// Writes command results in the selected format.
///
/// Text mode prints plain lines; JSON mode prints exactly one JSON object
/// per call on stdout so the output can be piped.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn emit_report(&self, report: &RunReport) {
        match self.format {
            OutputFormat::Text => {
                println!("Status: {}", report.status);
                println!("Message: {}", report.message);
                for error in &report.errors {
                    println!("  - {}", error);
                }
            }
            OutputFormat::Json => self.write_json(report),
        }
    }

    pub fn emit_validation(&self, result: &ValidationResult) {
        match self.format {
            OutputFormat::Text => {
                println!("valid: {}", result.valid);
                for issue in &result.errors {
                    println!("  [{}] {}", issue.kind, issue);
                }
            }
            OutputFormat::Json => self.write_json(&ValidationOutput {
                valid: result.valid,
                errors: &result.errors,
                cleaned: result.cleaned_content.is_some(),
            }),
        }
    }

    pub fn emit_gate(&self, outcome: &GateOutcome) {
        let output = GateOutput::from(outcome);
        match self.format {
            OutputFormat::Text => {
                println!(
                    "{}: {}",
                    if output.accepted { "accepted" } else { "rejected" },
                    output.artifact.display()
                );
                for error in &output.errors {
                    println!("  - {}", error);
                }
            }
            OutputFormat::Json => self.write_json(&output),
        }
    }

    pub fn emit_search(&self, query: &str, results: &[SearchResult]) {
        match self.format {
            OutputFormat::Text => print!("{}", format_results(results)),
            OutputFormat::Json => self.write_json(&SearchOutput { query, results }),
        }
    }

    pub fn emit_message(&self, message: &str) {
        match self.format {
            OutputFormat::Text => {
                println!("{}", message);
            }
            OutputFormat::Json => {
                let msg = MessageOutput {
                    message: message.to_string(),
                };
                self.write_json(&msg);
            }
        }
    }

    pub fn emit_value<T: Serialize>(&self, value: &T) {
        self.write_json(value);
    }

    fn write_json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string(value) {
            let mut stdout = io::stdout().lock();
            let _ = writeln!(stdout, "{}", json);
            let _ = stdout.flush();
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GateOutput {
    pub artifact: PathBuf,
    pub accepted: bool,
    pub repaired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub retry_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_file: Option<PathBuf>,
    pub trace: Vec<String>,
}

impl From<&GateOutcome> for GateOutput {
    fn from(outcome: &GateOutcome) -> Self {
        let trace = outcome.trace.iter().map(ToString::to_string).collect();
        let messages = |issues: &[ValidationIssue]| -> Vec<String> {
            issues.iter().map(ToString::to_string).collect()
        };

        match &outcome.decision {
            GateDecision::Accepted { post, repaired, .. } => Self {
                artifact: outcome.artifact.clone(),
                accepted: true,
                repaired: *repaired,
                slug: Some(post.slug.clone()),
                errors: Vec::new(),
                retry_errors: Vec::new(),
                debug_file: None,
                trace,
            },
            GateDecision::Rejected {
                errors,
                retry_errors,
                debug_file,
            } => Self {
                artifact: outcome.artifact.clone(),
                accepted: false,
                repaired: false,
                slug: None,
                errors: messages(errors),
                retry_errors: messages(retry_errors),
                debug_file: Some(debug_file.clone()),
                trace,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    valid: bool,
    errors: &'a [ValidationIssue],
    cleaned: bool,
}

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    results: &'a [SearchResult],
}

#[derive(Debug, Clone, Serialize)]
struct MessageOutput {
    message: String,
}
