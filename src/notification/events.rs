use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::post::BlogPost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PostPublished,
    PostRejected,
    DeployFailed,
    RunFailed,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostPublished => "post.published",
            Self::PostRejected => "post.rejected",
            Self::DeployFailed => "deploy.failed",
            Self::RunFailed => "run.failed",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::PostPublished => "🎉",
            Self::PostRejected => "🚨",
            Self::DeployFailed => "❌",
            Self::RunFailed => "❌",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Self::PostPublished)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishEvent {
    pub event_type: EventType,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl PublishEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            created_at: Utc::now(),
            slug: None,
            title: None,
            date: None,
            summary: None,
            link: None,
            errors: Vec::new(),
        }
    }

    pub fn published(post: &BlogPost, site_url: &str) -> Self {
        let mut event = Self::new(EventType::PostPublished).with_post(post);
        event.link = Some(post.link(site_url));
        event
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self::new(EventType::PostRejected).with_errors(errors)
    }

    pub fn with_post(mut self, post: &BlogPost) -> Self {
        self.slug = Some(post.slug.clone());
        self.title = Some(post.title.clone());
        self.date = Some(post.date.clone());
        self.summary = Some(post.summary.clone());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    /// Plain-text message as posted to the chat channel.
    pub fn text(&self) -> String {
        let emoji = self.event_type.emoji();
        if !self.event_type.is_error() {
            return format!(
                "{emoji} NEW BLOG POST PUBLISHED - {}\n📰 Title: {}\n🔗 Link: {}\n📝 Summary: {}",
                self.date.as_deref().unwrap_or("N/A"),
                self.title.as_deref().unwrap_or("Untitled"),
                self.link.as_deref().unwrap_or("no link"),
                self.summary.as_deref().unwrap_or("No summary"),
            );
        }

        let (heading, footer) = match self.event_type {
            EventType::PostRejected => (
                "BLOG POST REJECTED - CRITICAL ERRORS",
                "❌ *NO COMMIT WAS MADE* - fix the errors and run again",
            ),
            EventType::DeployFailed => (
                "BLOG POST VALIDATED BUT DEPLOYMENT FAILED",
                "The post is in the collection; check git and push manually",
            ),
            EventType::RunFailed | EventType::PostPublished => {
                ("BLOG AUTOMATION FAILED", "No post was published")
            }
        };
        self.error_text(&format!("{emoji} *{heading}*"), footer)
    }

    fn error_text(&self, header: &str, footer: &str) -> String {
        let mut text = format!("{header}\n\n");
        for (i, error) in self.errors.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, error));
        }
        text.push('\n');
        text.push_str(footer);
        text
    }
}
