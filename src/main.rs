use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use blog_pilot::cli::{Cli, Commands, ConfigAction, Display, OutputFormat};
use blog_pilot::config::{BlogConfig, CONFIG_FILE, Credentials};
use blog_pilot::error::{BlogError, Result};
use blog_pilot::gate::PublicationGate;
use blog_pilot::notification::Notifier;
use blog_pilot::output::OutputWriter;
use blog_pilot::pipeline::{Pipeline, RunReport};
use blog_pilot::search::SearchClient;
use blog_pilot::validation::{Repair, Validator, repair_file};

/// Context for command output handling.
struct OutputContext<'a> {
    display: &'a Display,
    writer: &'a OutputWriter,
}

impl OutputContext<'_> {
    fn is_text(&self) -> bool {
        self.writer.format() == OutputFormat::Text
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            Display::new().print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("blog_pilot=debug")
    } else {
        EnvFilter::new("blog_pilot=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// `Ok(false)` when the command completed but its subject failed
/// (rejected artifact, failed run).
async fn run(cli: Cli) -> Result<bool> {
    let display = Display::new();
    let writer = OutputWriter::new(cli.output);
    let out = OutputContext {
        display: &display,
        writer: &writer,
    };
    let working_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&out, &working_dir).await,
        Commands::Run => cmd_run(&out, &working_dir).await,
        Commands::Validate { file } => cmd_validate(&out, &working_dir, &file).await,
        Commands::Gate { file } => cmd_gate(&out, &working_dir, &file).await,
        Commands::Publish { file } => cmd_publish(&out, &working_dir, &file).await,
        Commands::Repair { file } => cmd_repair(&out, &file).await,
        Commands::Search { query } => cmd_search(&out, &working_dir, &query).await,
        Commands::Config { action } => cmd_config(&out, &working_dir, action).await,
    }
}

async fn load_config(working_dir: &Path) -> Result<BlogConfig> {
    BlogConfig::load(&BlogConfig::config_dir(working_dir)).await
}

fn build_notifier(working_dir: &Path, config: &BlogConfig, credentials: &Credentials) -> Notifier {
    Notifier::new(
        config.notification.clone(),
        credentials,
        Some(BlogConfig::config_dir(working_dir)),
    )
}

fn emit_report(out: &OutputContext<'_>, report: &RunReport) -> bool {
    if out.is_text() {
        out.display.print_report(report);
    } else {
        out.writer.emit_report(report);
    }
    report.is_success()
}

async fn cmd_init(out: &OutputContext<'_>, working_dir: &Path) -> Result<bool> {
    let config_dir = BlogConfig::config_dir(working_dir);
    let config_path = config_dir.join(CONFIG_FILE);

    if config_path.exists() {
        if out.is_text() {
            out.display
                .print_warning("blog-pilot is already initialized in this directory.");
        }
        return Ok(true);
    }

    BlogConfig::default().save(&config_dir).await?;

    if out.is_text() {
        out.display.print_success("Initialized blog-pilot.");
        out.display
            .print_info(&format!("Configuration: {}", config_path.display()));
    } else {
        out.writer.emit_message("Initialized blog-pilot");
    }

    Ok(true)
}

async fn cmd_run(out: &OutputContext<'_>, working_dir: &Path) -> Result<bool> {
    let config = load_config(working_dir).await?;
    let credentials = Credentials::from_env();
    let notifier = build_notifier(working_dir, &config, &credentials);

    let mut pipeline = Pipeline::new(working_dir, config, credentials, notifier);
    let spinner = if out.is_text() {
        out.display.print_header("Blog Pilot");
        Some(out.display.create_spinner("Starting run..."))
    } else {
        None
    };
    if let Some(s) = &spinner {
        pipeline = pipeline.with_progress(s.clone());
    }

    let result = pipeline.run().await;

    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    Ok(emit_report(out, &result?))
}

async fn cmd_validate(out: &OutputContext<'_>, working_dir: &Path, file: &Path) -> Result<bool> {
    let config = load_config(working_dir).await?;
    let raw = tokio::fs::read_to_string(file).await?;
    let result = Validator::new(config.post.cover_dir).validate(&raw);

    if out.is_text() {
        out.display.print_validation(&result);
    } else {
        out.writer.emit_validation(&result);
    }

    Ok(result.valid)
}

async fn cmd_gate(out: &OutputContext<'_>, working_dir: &Path, file: &Path) -> Result<bool> {
    let config = load_config(working_dir).await?;
    let outcome = PublicationGate::from_config(&config).evaluate(file).await?;

    if out.is_text() {
        out.display.print_gate_outcome(&outcome);
    } else {
        out.writer.emit_gate(&outcome);
    }

    Ok(outcome.is_accepted())
}

async fn cmd_publish(out: &OutputContext<'_>, working_dir: &Path, file: &Path) -> Result<bool> {
    if !file.exists() {
        return Err(BlogError::NoArtifact(file.to_path_buf()));
    }
    let config = load_config(working_dir).await?;
    let credentials = Credentials::from_env();
    let notifier = build_notifier(working_dir, &config, &credentials);

    let pipeline = Pipeline::new(working_dir, config, credentials, notifier);
    let report = pipeline.publish_artifact(file).await;

    Ok(emit_report(out, &report))
}

async fn cmd_repair(out: &OutputContext<'_>, file: &Path) -> Result<bool> {
    let repair = repair_file(file).await?;

    let (ok, message) = match &repair {
        Repair::NotNeeded => (true, format!("{} is already valid JSON", file.display())),
        Repair::Repaired { strategy, .. } => (
            true,
            format!("Repaired {} ({})", file.display(), strategy),
        ),
        Repair::Failed { reason } => (
            false,
            format!("Could not repair {}: {}", file.display(), reason),
        ),
    };

    if !out.is_text() {
        out.writer.emit_message(&message);
    } else if ok {
        out.display.print_success(&message);
    } else {
        out.display.print_error(&message);
    }

    Ok(ok)
}

async fn cmd_search(out: &OutputContext<'_>, working_dir: &Path, query: &str) -> Result<bool> {
    let config = load_config(working_dir).await?;
    let credentials = Credentials::from_env();
    let client = SearchClient::new(credentials.serper_key()?, config.search)?;

    let results = client.search(query).await?;

    if out.is_text() {
        out.display.print_header(&format!("Search: {}", query));
        out.display.print_search_results(&results);
    } else {
        out.writer.emit_search(query, &results);
    }

    Ok(true)
}

async fn cmd_config(
    out: &OutputContext<'_>,
    working_dir: &Path,
    action: ConfigAction,
) -> Result<bool> {
    let config_dir: PathBuf = BlogConfig::config_dir(working_dir);

    match action {
        ConfigAction::Show => {
            let config = BlogConfig::load(&config_dir).await?;
            match out.writer.format() {
                OutputFormat::Text => {
                    let text = toml::to_string_pretty(&config)
                        .map_err(|e| BlogError::Config(e.to_string()))?;
                    println!("{}", text);
                }
                OutputFormat::Json => out.writer.emit_value(&config),
            }
        }
        ConfigAction::Reset => {
            BlogConfig::default().save(&config_dir).await?;
            if out.is_text() {
                out.display
                    .print_success("Configuration reset to defaults.");
            } else {
                out.writer.emit_message("Configuration reset to defaults");
            }
        }
    }

    Ok(true)
}
