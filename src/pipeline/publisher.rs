use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::collection::CollectionStore;
use crate::config::{BlogConfig, GitConfig};
use crate::error::Result;
use crate::git::{CommitOutcome, GitRunner};
use crate::notification::{Notifier, PublishEvent};
use crate::post::BlogPost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Collection size after the merge.
    pub collection_len: usize,
    /// `None` when git deployment is disabled.
    pub commit: Option<CommitOutcome>,
    pub link: String,
}

/// Merges one accepted post into the collection and deploys it.
pub struct Publisher {
    collection: CollectionStore,
    collection_file: String,
    git: GitRunner,
    git_config: GitConfig,
    notifier: Notifier,
    site_url: String,
}

impl Publisher {
    pub fn new(working_dir: impl Into<PathBuf>, config: &BlogConfig, notifier: Notifier) -> Self {
        let working_dir = working_dir.into();
        Self {
            collection: CollectionStore::new(working_dir.join(&config.collection.file))
                .with_backup_prefix(&config.gate.debug_prefix),
            collection_file: config.collection.file.clone(),
            git: GitRunner::new(working_dir),
            git_config: config.git.clone(),
            notifier,
            site_url: config.notification.site_url.clone(),
        }
    }

    pub fn collection(&self) -> &CollectionStore {
        &self.collection
    }

    /// Runs once per accepted artifact. A git failure is returned after the
    /// collection was already merged; the caller reports it as a failed
    /// deployment.
    pub async fn publish(&self, artifact: &Path, post: &BlogPost) -> Result<PublishOutcome> {
        let collection_len = self.collection.append(post).await?;
        info!(
            slug = %post.slug,
            collection = %self.collection.path().display(),
            count = collection_len,
            "Post merged into collection"
        );

        match fs::remove_file(artifact).await {
            Ok(()) => debug!(artifact = %artifact.display(), "Artifact removed"),
            Err(e) => warn!(
                artifact = %artifact.display(),
                error = %e,
                "Failed to remove merged artifact"
            ),
        }

        let commit = if self.git_config.enabled {
            let message = commit_message(&self.git_config.commit_message, post);
            Some(
                self.git
                    .commit_and_push(
                        &self.collection_file,
                        &self.git_config.commit_prefix,
                        &message,
                        &self.git_config.remote,
                    )
                    .await?,
            )
        } else {
            debug!("Git deployment disabled");
            None
        };

        let event = PublishEvent::published(post, &self.site_url);
        let link = event.link.clone().unwrap_or_default();
        self.notifier.notify(&event).await;

        Ok(PublishOutcome {
            collection_len,
            commit,
            link,
        })
    }
}

/// Fill `{title}` and `{slug}` in a commit message template.
pub(crate) fn commit_message(template: &str, post: &BlogPost) -> String {
    template
        .replace("{title}", &post.title)
        .replace("{slug}", &post.slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use tempfile::TempDir;

    fn post() -> BlogPost {
        BlogPost {
            label: "IA para tu PyME".into(),
            title: "Automatiza tu CRM".into(),
            date: "09/04/2025".into(),
            author: "Jon Ortega".into(),
            read_time: "4 MIN".into(),
            summary: "Resumen.".into(),
            cover_image: "/images/blog/automatiza-crm.jpeg".into(),
            slug: "automatiza-crm".into(),
            content: "Texto".into(),
        }
    }

    fn offline_config() -> BlogConfig {
        let mut config = BlogConfig::default();
        config.git.enabled = false;
        config.notification.slack = false;
        config
    }

    #[test]
    fn test_commit_message_template() {
        assert_eq!(
            commit_message(&GitConfig::default().commit_message, &post()),
            "Add blog post: Automatiza tu CRM (automatiza-crm)"
        );
    }

    #[tokio::test]
    async fn test_publish_without_git_merges_and_removes_artifact() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("automatiza-crm.json");
        fs::write(&artifact, "{}").await.unwrap();

        let config = offline_config();
        let notifier = Notifier::offline(NotificationConfig::default(), None);
        let publisher = Publisher::new(dir.path(), &config, notifier);

        let outcome = publisher.publish(&artifact, &post()).await.unwrap();
        assert_eq!(outcome.collection_len, 1);
        assert!(outcome.commit.is_none());
        assert_eq!(outcome.link, "wrappers.es/blog/automatiza-crm");
        assert!(!artifact.exists());

        let entries = publisher.collection().load().await.unwrap();
        assert_eq!(entries[0]["readTime"], "4 MIN");
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let config = offline_config();
        let notifier = Notifier::offline(NotificationConfig::default(), None);
        let publisher = Publisher::new(dir.path(), &config, notifier);

        let outcome = publisher
            .publish(&dir.path().join("gone.json"), &post())
            .await
            .unwrap();
        assert_eq!(outcome.collection_len, 1);
    }
}
