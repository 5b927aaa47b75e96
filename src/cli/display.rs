use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::gate::{GateDecision, GateOutcome};
use crate::pipeline::{RunReport, RunStatus};
use crate::search::SearchResult;
use crate::utils::truncate_chars;
use crate::validation::{IssueKind, ValidationResult};

const SEARCH_SNIPPET_CHARS: usize = 160;

pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().cyan());
        println!("{}", style("═".repeat(60)).dim());
        println!();
    }

    pub fn print_report(&self, report: &RunReport) {
        let status_style = self.status_style(report.status);
        println!();
        println!(
            "{} {}",
            status_style.apply_to(format!("[{}]", report.status)),
            style(&report.message).bold()
        );

        if let Some(slug) = &report.slug {
            println!("    Slug:       {}", slug);
        }
        if let Some(file) = &report.file {
            println!("    File:       {}", style(file.display()).dim());
        }
        if let Some(debug_file) = &report.debug_file {
            println!("    Debug copy: {}", style(debug_file.display()).yellow());
        }

        if !report.errors.is_empty() {
            println!();
            println!("{}", style(format!("Errors ({}):", report.errors.len())).bold());
            for (i, error) in report.errors.iter().enumerate() {
                println!("  {}. {}", i + 1, error);
            }
        }
    }

    pub fn print_validation(&self, result: &ValidationResult) {
        if result.valid {
            self.print_success("All validations passed");
            if let Some(post) = &result.post {
                println!("    Title: {}", post.title);
                println!("    Slug:  {}", post.slug);
            }
            if result.cleaned_content.is_some() {
                self.print_warning("Control characters were removed while validating");
            }
            return;
        }

        self.print_error(&format!(
            "Validation failed - {} critical error(s)",
            result.errors.len()
        ));
        for issue in &result.errors {
            println!(
                "  {} {}",
                self.kind_style(issue.kind)
                    .apply_to(format!("[{}]", issue.kind)),
                issue
            );
        }
        if result.is_control_character_failure() {
            self.print_info("Control-character failure: the gate would attempt a repair");
        }
    }

    pub fn print_gate_outcome(&self, outcome: &GateOutcome) {
        let trace: Vec<String> = outcome.trace.iter().map(ToString::to_string).collect();
        match &outcome.decision {
            GateDecision::Accepted {
                post,
                repaired,
                cleaned_content,
            } => {
                let how = if *repaired { " after repair" } else { "" };
                self.print_success(&format!("Accepted{}: {}", how, post.slug));
                if cleaned_content.is_some() {
                    self.print_info(&format!(
                        "Rewrote {}",
                        outcome.artifact.display()
                    ));
                }
            }
            GateDecision::Rejected {
                errors,
                retry_errors,
                debug_file,
            } => {
                self.print_error(&format!("Rejected: {}", outcome.artifact.display()));
                for (i, error) in errors.iter().enumerate() {
                    println!("  {}. {}", i + 1, error);
                }
                if !retry_errors.is_empty() {
                    println!("{}", style("After repair:").dim());
                    for error in retry_errors {
                        println!("  - {}", error);
                    }
                }
                self.print_info(&format!("Debug copy: {}", debug_file.display()));
            }
        }
        println!("{}", style(format!("Trace: {}", trace.join(" → "))).dim());
    }

    pub fn print_search_results(&self, results: &[SearchResult]) {
        if results.is_empty() {
            println!("{}", style("No results found.").dim());
            return;
        }

        for (i, result) in results.iter().enumerate() {
            println!("{} {}", style(format!("{}.", i + 1)).cyan(), style(&result.title).bold());
            println!("   {}", truncate_chars(&result.snippet, SEARCH_SNIPPET_CHARS));
            println!("   {}", style(&result.link).dim());
        }
    }

    pub fn print_success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), message);
    }

    pub fn print_warning(&self, message: &str) {
        println!("{} {}", style("!").yellow().bold(), message);
    }

    pub fn print_info(&self, message: &str) {
        println!("{} {}", style("→").cyan(), message);
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }

    fn status_style(&self, status: RunStatus) -> Style {
        match status {
            RunStatus::Success => Style::new().green().bold(),
            RunStatus::Error => Style::new().red().bold(),
        }
    }

    fn kind_style(&self, kind: IssueKind) -> Style {
        match kind {
            IssueKind::Parse => Style::new().magenta(),
            IssueKind::Schema => Style::new().yellow(),
            IssueKind::BusinessRule => Style::new().red(),
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
