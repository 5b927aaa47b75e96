//! Configuration types and loading.
//!
//! - `BlogConfig`: top-level TOML configuration with validation
//! - `Credentials`: API keys read once from the environment
//! - Section configs: post, collection, gate, git, notification, search,
//!   generation

mod credentials;
mod settings;

pub use credentials::{
    Credentials, OPENAI_API_KEY, REQUIRED_CREDENTIALS, SERPER_API_KEY, SLACK_BOT_TOKEN,
    SLACK_CHANNEL,
};
pub use settings::{
    BlogConfig, CONFIG_DIR, CONFIG_FILE, CollectionConfig, GateConfig, GenerationConfig,
    GitConfig, NotificationConfig, PostConfig, SearchConfig,
};
