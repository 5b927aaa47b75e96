use tracing::{debug, warn};

use crate::error::{BlogError, Result};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";
pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
pub const SLACK_CHANNEL: &str = "SLACK_CHANNEL";

/// Variables a full run cannot start without.
pub const REQUIRED_CREDENTIALS: [&str; 2] = [OPENAI_API_KEY, SERPER_API_KEY];

/// API keys collected once at startup and handed to each component.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub slack_bot_token: Option<String>,
    pub slack_channel: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "set" } else { "unset" };
        f.debug_struct("Credentials")
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("serper_api_key", &mask(&self.serper_api_key))
            .field("slack_bot_token", &mask(&self.slack_bot_token))
            .field("slack_channel", &self.slack_channel)
            .finish()
    }
}

impl Credentials {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        match dotenv::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "Failed to load .env"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name → value lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            openai_api_key: get(OPENAI_API_KEY),
            serper_api_key: get(SERPER_API_KEY),
            slack_bot_token: get(SLACK_BOT_TOKEN),
            slack_channel: get(SLACK_CHANNEL),
        }
    }

    pub fn missing_required(&self) -> Vec<String> {
        let present = [&self.openai_api_key, &self.serper_api_key];
        REQUIRED_CREDENTIALS
            .iter()
            .zip(present)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Fails before any pipeline step when a required key is absent.
    pub fn require(&self) -> Result<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BlogError::MissingCredentials(missing))
        }
    }

    /// Required keys that are set, as environment for a child process.
    pub fn process_env(&self) -> Vec<(&'static str, String)> {
        [
            (OPENAI_API_KEY, &self.openai_api_key),
            (SERPER_API_KEY, &self.serper_api_key),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
        .collect()
    }

    pub fn serper_key(&self) -> Result<&str> {
        self.serper_api_key
            .as_deref()
            .ok_or_else(|| BlogError::MissingCredentials(vec![SERPER_API_KEY.to_string()]))
    }
}
