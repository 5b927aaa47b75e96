use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{BlogError, Result};
use crate::post::DEFAULT_COVER_DIR;

pub const CONFIG_DIR: &str = ".blog-pilot";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub post: PostConfig,
    pub collection: CollectionConfig,
    pub gate: GateConfig,
    pub git: GitConfig,
    pub notification: NotificationConfig,
    pub search: SearchConfig,
    pub generation: GenerationConfig,
}

impl BlogConfig {
    pub fn config_dir(working_dir: &Path) -> PathBuf {
        working_dir.join(CONFIG_DIR)
    }

    pub async fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);
        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, config_dir: &Path) -> Result<()> {
        self.validate()?;
        fs::create_dir_all(config_dir).await?;
        let content =
            toml::to_string_pretty(self).map_err(|e| BlogError::Config(e.to_string()))?;
        fs::write(config_dir.join(CONFIG_FILE), content).await?;
        Ok(())
    }

    /// Validate configuration values for consistency.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.post.label.trim().is_empty() {
            errors.push("post.label must not be empty");
        }
        if self.post.authors.is_empty() {
            errors.push("post.authors must list at least one author");
        }
        if self.post.read_times.is_empty() {
            errors.push("post.read_times must list at least one value");
        }
        // The validator would reject every generated post otherwise
        if self.post.read_times.iter().any(|r| !r.contains("MIN")) {
            errors.push("post.read_times entries must include 'MIN'");
        }
        if !self.post.cover_dir.starts_with('/') {
            errors.push("post.cover_dir must be an absolute site path");
        }

        let collection = Path::new(&self.collection.file);
        if self.collection.file.is_empty()
            || collection.extension().and_then(|e| e.to_str()) != Some("json")
        {
            errors.push("collection.file must name a .json file");
        }
        if collection.components().count() != 1 {
            errors.push("collection.file must be a plain file name in the working directory");
        }

        if self.gate.debug_prefix.is_empty() {
            errors.push("gate.debug_prefix must not be empty");
        }

        if self.git.enabled && self.git.remote.trim().is_empty() {
            errors.push("git.remote must not be empty when git is enabled");
        }
        if self.git.commit_prefix.trim().is_empty() {
            errors.push("git.commit_prefix must not be empty");
        }

        if self.notification.slack && self.notification.channel.trim().is_empty() {
            errors.push("notification.channel must not be empty when slack is enabled");
        }

        if self.search.max_results == 0 {
            errors.push("search.max_results must be greater than 0");
        }
        if self.search.timeout_secs == 0 {
            errors.push("search.timeout_secs must be greater than 0");
        }

        if self.generation.timeout_secs == 0 {
            errors.push("generation.timeout_secs must be greater than 0");
        }
        if self.generation.topics.is_empty() {
            errors.push("generation.topics must list at least one topic angle");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BlogError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Constant tag every post carries.
    pub label: String,
    /// Allowed bylines. The generator picks one at random.
    pub authors: Vec<String>,
    pub read_times: Vec<String>,
    /// Site directory cover images live in; `coverImage` is `<cover_dir>/<slug>.jpeg`.
    pub cover_dir: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            label: String::from("IA para tu PyME"),
            authors: vec![
                String::from("Jon Ortega"),
                String::from("Leire Legarreta"),
                String::from("Elbio Nielsen"),
            ],
            read_times: vec![
                String::from("4 MIN"),
                String::from("5 MIN"),
                String::from("6 MIN"),
            ],
            cover_dir: String::from(DEFAULT_COVER_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub file: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            file: String::from("blog_posts.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Prefix of the copy kept for every rejected artifact.
    pub debug_prefix: String,
    /// Allow the single repair cycle after a control-character failure.
    pub repair_enabled: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            debug_prefix: String::from("DEBUG_"),
            repair_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub enabled: bool,
    pub commit_prefix: String,
    pub remote: String,
    /// `{title}` and `{slug}` are substituted.
    pub commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            commit_prefix: String::from("[blog-bot]"),
            remote: String::from("blog-poster"),
            commit_message: String::from("Add blog post: {title} ({slug})"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub slack: bool,
    /// Channel name or ID. Overridden by `SLACK_CHANNEL`.
    pub channel: String,
    pub username: String,
    pub api_url: String,
    /// Base of the public post link, e.g. `wrappers.es`.
    pub site_url: String,
    pub event_log: bool,
    pub hook_command: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            slack: true,
            channel: String::from("blog-posts"),
            username: String::from("Blog Automation"),
            api_url: String::from("https://slack.com/api/chat.postMessage"),
            site_url: String::from("wrappers.es"),
            event_log: true,
            hook_command: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub max_results: usize,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://google.serper.dev/search"),
            max_results: 3,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Generator argv. Empty means posts are produced out of band.
    pub command: Vec<String>,
    pub timeout_secs: u64,
    /// Research angles rotated at random to avoid repeating topics.
    pub topics: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            command: vec![String::from("python3"), String::from("crew.py")],
            timeout_secs: 1800,
            topics: vec![
                String::from(
                    "Latest AI innovations that solve concrete problems small and medium businesses face.",
                ),
                String::from(
                    "Emerging technology such as AI agents, MCP (Model Context Protocol), advanced RAG or AI wrappers that let SMBs compete with large companies without large investments.",
                ),
                String::from(
                    "No-code and automation tools (Zapier, Make, n8n) that turn overworked founders into efficient managers.",
                ),
                String::from(
                    "AI marketing solutions with immediate ROI: email automation, AI lead generation, new Meta/Google Ads features, affordable smart CRMs.",
                ),
                String::from(
                    "How SMBs can use AI to be more profitable: free data analysis tools, automatic dashboards, accessible business intelligence.",
                ),
                String::from("Generative AI trends for marketing and digital advertising agencies."),
                String::from(
                    "Technology that tames operational chaos in small companies: AI project management, internal communication, remote teams, SMB ERPs.",
                ),
                String::from(
                    "Specific but applicable technical trends: API integration, AI database querying, workflow automation, productivity tools for small teams.",
                ),
            ],
        }
    }
}
