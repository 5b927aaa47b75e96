use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::artifact::preserve_debug_copy;
use crate::error::Result;

const DEFAULT_BACKUP_PREFIX: &str = "DEBUG_";

/// Entries read from disk. `damaged` is set when a file existed but did not
/// hold a JSON array.
struct Loaded {
    entries: Vec<Value>,
    damaged: bool,
}

pub struct CollectionStore {
    path: PathBuf,
    backup_prefix: String,
}

impl CollectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_prefix: DEFAULT_BACKUP_PREFIX.to_string(),
        }
    }

    /// Prefix of the copy kept before a damaged collection is rewritten.
    pub fn with_backup_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.backup_prefix = prefix.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries. A missing, unreadable or non-array file yields an
    /// empty collection.
    pub async fn load(&self) -> Result<Vec<Value>> {
        Ok(self.read().await?.entries)
    }

    async fn read(&self) -> Result<Loaded> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Loaded {
                entries: Vec::new(),
                damaged: false,
            });
        }

        let content = fs::read_to_string(&self.path).await?;
        let entries = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(entries)) => {
                return Ok(Loaded {
                    entries,
                    damaged: false,
                });
            }
            Ok(_) => {
                warn!(path = %self.path.display(), "Collection is not a JSON array, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Collection is not valid JSON, starting empty");
                Vec::new()
            }
        };
        Ok(Loaded {
            entries,
            damaged: true,
        })
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Append one entry and rewrite the whole array. Returns the new length.
    ///
    /// A damaged file is copied aside under the backup prefix first, so the
    /// old text survives the rewrite.
    pub async fn append<T: Serialize>(&self, entry: &T) -> Result<usize> {
        let Loaded {
            mut entries,
            damaged,
        } = self.read().await?;
        if damaged {
            let backup = preserve_debug_copy(&self.path, &self.backup_prefix).await?;
            warn!(backup = %backup.display(), "Damaged collection backed up before rewrite");
        }
        entries.push(serde_json::to_value(entry)?);

        let mut content = serde_json::to_string_pretty(&entries)?;
        content.push('\n');
        fs::write(&self.path, content).await?;

        debug!(path = %self.path.display(), count = entries.len(), "Collection updated");
        Ok(entries.len())
    }
}
