//! On-disk response cache.
//!
//! Files live at `<dir>/<username>-tokens.json` and
//! `<dir>/<username>-usage.json` and hold the raw toolbox responses.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use iigenmon_fetch::{CacheApi, CacheError, CacheKind, CachedFile};
use tracing::instrument;

use crate::persistence::{default_cache_dir, load_text, remove_file, save_text};

/// [`CacheApi`] backed by files in one directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Creates a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one cache entry.
    pub fn path(&self, username: &str, kind: CacheKind) -> PathBuf {
        self.dir.join(kind.file_name(username))
    }
}

impl Default for DiskCache {
    fn default() -> Self {
        Self::new(default_cache_dir())
    }
}

#[async_trait]
impl CacheApi for DiskCache {
    #[instrument(skip(self))]
    async fn read(&self, username: &str, kind: CacheKind) -> Result<Option<CachedFile>, CacheError> {
        Ok(load_text(&self.path(username, kind))
            .await?
            .map(|(contents, modified)| CachedFile { contents, modified }))
    }

    #[instrument(skip(self, contents))]
    async fn write(&self, username: &str, kind: CacheKind, contents: &str) -> Result<(), CacheError> {
        Ok(save_text(&self.path(username, kind), contents).await?)
    }

    #[instrument(skip(self))]
    async fn remove(&self, username: &str, kind: CacheKind) -> Result<(), CacheError> {
        Ok(remove_file(&self.path(username, kind)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let cache = DiskCache::new("/tmp/iigenmon");
        assert_eq!(
            cache.path("alice", CacheKind::Tokens),
            PathBuf::from("/tmp/iigenmon/alice-tokens.json")
        );
        assert_eq!(
            cache.path("alice", CacheKind::Usage),
            PathBuf::from("/tmp/iigenmon/alice-usage.json")
        );
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());

        assert!(cache.read("alice", CacheKind::Usage).await.unwrap().is_none());
        cache.remove("alice", CacheKind::Usage).await.unwrap();
    }
}
