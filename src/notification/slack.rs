use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BlogError, Result};

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    username: &'a str,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Minimal Slack Web API client for `chat.postMessage`.
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
    username: String,
}

impl SlackClient {
    pub fn new(
        token: impl Into<String>,
        api_url: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            api_url: api_url.into(),
            username: username.into(),
        }
    }

    pub async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let channel = normalize_channel(channel);
        debug!(channel = %channel, len = text.len(), "Posting Slack message");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&PostMessage {
                channel: &channel,
                text,
                username: &self.username,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlogError::Notification(format!(
                "Slack API returned status {status}"
            )));
        }

        check_response(response.json::<SlackResponse>().await?)
    }
}

fn check_response(response: SlackResponse) -> Result<()> {
    if response.ok {
        Ok(())
    } else {
        Err(BlogError::Notification(format!(
            "Slack API error: {}",
            response.error.as_deref().unwrap_or("unknown error")
        )))
    }
}

/// Channel names get a `#` prefix; IDs (`C…`) and `#name` pass through.
pub fn normalize_channel(channel: &str) -> String {
    let channel = channel.trim();
    if channel.starts_with('#') || channel.starts_with('C') {
        channel.to_string()
    } else {
        format!("#{channel}")
    }
}
