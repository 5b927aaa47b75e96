use std::path::PathBuf;

use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{PublishEvent, SlackClient};
use crate::config::{Credentials, NotificationConfig};

pub const EVENT_LOG_FILE: &str = "events.log";

#[derive(Clone)]
pub struct Notifier {
    config: NotificationConfig,
    slack: Option<SlackClient>,
    channel: String,
    logs_dir: Option<PathBuf>,
}

impl Notifier {
    pub fn new(
        config: NotificationConfig,
        credentials: &Credentials,
        logs_dir: Option<PathBuf>,
    ) -> Self {
        let slack = match (&credentials.slack_bot_token, config.slack) {
            (Some(token), true) => Some(SlackClient::new(
                token.clone(),
                config.api_url.clone(),
                config.username.clone(),
            )),
            (None, true) => {
                warn!("SLACK_BOT_TOKEN not configured, Slack notifications disabled");
                None
            }
            (_, false) => None,
        };
        let channel = credentials
            .slack_channel
            .clone()
            .unwrap_or_else(|| config.channel.clone());

        Self {
            config,
            slack,
            channel,
            logs_dir,
        }
    }

    /// Notifier that only writes to the event log, if any.
    pub fn offline(config: NotificationConfig, logs_dir: Option<PathBuf>) -> Self {
        Self::new(config, &Credentials::default(), logs_dir)
    }

    pub fn has_slack(&self) -> bool {
        self.slack.is_some()
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn notify(&self, event: &PublishEvent) {
        if !self.config.enabled {
            return;
        }

        if let Some(slack) = &self.slack {
            self.send_slack(slack, event).await;
        }

        if self.config.event_log {
            self.write_event_log(event).await;
        }

        if let Some(hook) = &self.config.hook_command {
            self.run_hook(hook, event).await;
        }
    }

    async fn send_slack(&self, slack: &SlackClient, event: &PublishEvent) {
        match slack.post_message(&self.channel, &event.text()).await {
            Ok(()) => info!(
                channel = %self.channel,
                event = event.event_type.as_str(),
                "Slack notification sent"
            ),
            Err(e) => warn!(
                channel = %self.channel,
                error = %e,
                "Failed to send Slack notification"
            ),
        }
    }

    async fn write_event_log(&self, event: &PublishEvent) {
        let Some(logs_dir) = &self.logs_dir else {
            return;
        };

        let log_path = logs_dir.join(EVENT_LOG_FILE);
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let detail = match (&event.slug, event.errors.is_empty()) {
            (_, false) => event.errors.join(" | "),
            (Some(slug), true) => slug.clone(),
            (None, true) => String::new(),
        };
        let log_line = format!(
            "[{}] {}: {}\n",
            timestamp,
            event.event_type.as_str(),
            detail
        );

        if let Err(e) = tokio::fs::create_dir_all(logs_dir).await {
            warn!(error = %e, "Failed to create logs directory");
            return;
        }

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .await;

        match result {
            Ok(mut file) => {
                if let Err(e) = file.write_all(log_line.as_bytes()).await {
                    warn!(error = %e, "Failed to write event log");
                }
            }
            Err(e) => {
                warn!(error = %e, path = %log_path.display(), "Failed to open event log");
            }
        }
    }

    async fn run_hook(&self, hook_cmd: &str, event: &PublishEvent) {
        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(_) => return,
        };

        let result = Command::new("sh")
            .args(["-c", hook_cmd])
            .env("BLOG_EVENT", event.event_type.as_str())
            .env("BLOG_SLUG", event.slug.as_deref().unwrap_or(""))
            .env("BLOG_EVENT_JSON", &json)
            .output()
            .await;

        match result {
            Ok(output) if !output.status.success() => {
                warn!(hook = %hook_cmd, status = %output.status, "Notification hook failed");
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, hook = %hook_cmd, "Failed to run hook"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::EventType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_event_log_appends_lines() {
        let dir = TempDir::new().unwrap();
        let notifier = Notifier::offline(
            NotificationConfig::default(),
            Some(dir.path().to_path_buf()),
        );
        assert!(!notifier.has_slack());

        notifier
            .notify(&PublishEvent::new(EventType::PostPublished).with_slug("rag-pymes"))
            .await;
        notifier
            .notify(&PublishEvent::rejected(vec!["bad date".into()]))
            .await;

        let log = tokio::fs::read_to_string(dir.path().join(EVENT_LOG_FILE))
            .await
            .unwrap();
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("post.published: rag-pymes"));
        assert!(lines[1].ends_with("post.rejected: bad date"));
    }

    #[tokio::test]
    async fn test_disabled_notifier_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = NotificationConfig {
            enabled: false,
            ..Default::default()
        };
        let notifier = Notifier::offline(config, Some(dir.path().to_path_buf()));

        notifier
            .notify(&PublishEvent::rejected(vec!["x".into()]))
            .await;
        assert!(!dir.path().join(EVENT_LOG_FILE).exists());
    }

    #[test]
    fn test_channel_env_overrides_config() {
        let credentials = Credentials {
            slack_bot_token: Some("xoxb-test".into()),
            slack_channel: Some("C0123".into()),
            ..Default::default()
        };
        let notifier = Notifier::new(NotificationConfig::default(), &credentials, None);
        assert!(notifier.has_slack());
        assert_eq!(notifier.channel(), "C0123");
    }
}
