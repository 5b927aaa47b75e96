use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs;
use tracing::{debug, info};

use crate::error::{BlogError, Result};

/// Selects the artifact a run operates on.
///
/// Candidates are `*.json` files directly in the working directory, minus the
/// collection file, hidden files, package manifests and debug copies.
pub struct ArtifactLocator {
    working_dir: PathBuf,
    collection_file: String,
    debug_prefix: String,
}

impl ArtifactLocator {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        collection_file: impl Into<String>,
        debug_prefix: impl Into<String>,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            collection_file: collection_file.into(),
            debug_prefix: debug_prefix.into(),
        }
    }

    pub fn is_candidate(&self, file_name: &str) -> bool {
        file_name.ends_with(".json")
            && !file_name.starts_with('.')
            && !file_name.to_lowercase().contains("package")
            && file_name != self.collection_file
            && !file_name.starts_with(&self.debug_prefix)
    }

    pub async fn candidates(&self) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(&self.working_dir).await?;
        let mut found = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(name) = name.to_str()
                && self.is_candidate(name)
            {
                found.push(entry.path());
            }
        }

        found.sort();
        Ok(found)
    }

    /// Most recently created candidate.
    pub async fn latest(&self) -> Result<PathBuf> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;

        for path in self.candidates().await? {
            let stamp = creation_time(&path).await?;
            debug!(path = %path.display(), ?stamp, "Artifact candidate");
            if newest.as_ref().is_none_or(|(best, _)| stamp >= *best) {
                newest = Some((stamp, path));
            }
        }

        newest
            .map(|(_, path)| path)
            .ok_or_else(|| BlogError::NoArtifact(self.working_dir.clone()))
    }
}

/// Creation time where the filesystem records it, modification time otherwise.
async fn creation_time(path: &Path) -> Result<SystemTime> {
    let meta = fs::metadata(path).await?;
    Ok(meta.created().or_else(|_| meta.modified())?)
}

pub fn debug_copy_path(artifact: &Path, prefix: &str) -> PathBuf {
    let name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    artifact.with_file_name(format!("{prefix}{name}"))
}

/// Copy a rejected artifact next to itself under `prefix`. The copy is
/// never cleaned up by the pipeline.
pub async fn preserve_debug_copy(artifact: &Path, prefix: &str) -> Result<PathBuf> {
    let target = debug_copy_path(artifact, prefix);
    fs::copy(artifact, &target).await?;
    info!(path = %target.display(), "Artifact copied for debugging");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn locator(dir: &Path) -> ArtifactLocator {
        ArtifactLocator::new(dir, "blog_posts.json", "DEBUG_")
    }

    #[test]
    fn test_candidate_filter() {
        let loc = locator(Path::new("."));
        assert!(loc.is_candidate("agentes-ia.json"));
        assert!(!loc.is_candidate("blog_posts.json"));
        assert!(!loc.is_candidate(".eslintrc.json"));
        assert!(!loc.is_candidate("package-lock.json"));
        assert!(!loc.is_candidate("Package.json"));
        assert!(!loc.is_candidate("DEBUG_agentes-ia.json"));
        assert!(!loc.is_candidate("notes.md"));
    }

    #[tokio::test]
    async fn test_latest_picks_newest_candidate() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("old.json"), "{}").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        fs::write(dir.path().join("blog_posts.json"), "[]").await.unwrap();
        fs::write(dir.path().join("new.json"), "{}").await.unwrap();

        let latest = locator(dir.path()).latest().await.unwrap();
        assert_eq!(latest.file_name().unwrap(), "new.json");
    }

    #[tokio::test]
    async fn test_no_candidates_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blog_posts.json"), "[]").await.unwrap();

        let err = locator(dir.path()).latest().await.unwrap_err();
        assert!(matches!(err, BlogError::NoArtifact(_)));
    }

    #[tokio::test]
    async fn test_debug_copy_keeps_original() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("post.json");
        fs::write(&artifact, "{broken").await.unwrap();

        let copy = preserve_debug_copy(&artifact, "DEBUG_").await.unwrap();
        assert_eq!(copy.file_name().unwrap(), "DEBUG_post.json");
        assert_eq!(fs::read_to_string(&copy).await.unwrap(), "{broken");
        assert!(artifact.exists());
    }
}
