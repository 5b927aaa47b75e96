//! Publication event notifications.
//!
//! - `PublishEvent`: published / rejected / failed events and their text
//! - `SlackClient`: `chat.postMessage` delivery
//! - `Notifier`: fans an event out to Slack, the event log and a hook
//!   command; delivery failures are logged, never propagated

mod events;
mod notifier;
mod slack;

pub use events::{EventType, PublishEvent};
pub use notifier::{EVENT_LOG_FILE, Notifier};
pub use slack::{SlackClient, normalize_channel};
