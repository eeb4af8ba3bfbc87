//! Per-user response cache.
//!
//! Two files per username: the raw login response (tokens) and the raw last
//! good usage response. The files are exact copies of what the toolbox sent,
//! and are re-parsed on every read.
//!
//! There is no locking. Two runs for the same username can race on the same
//! file; this is a known limitation.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CacheError;

/// Which cached response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Raw login response.
    Tokens,
    /// Raw usage response.
    Usage,
}

impl CacheKind {
    /// File name for this kind of cache entry.
    pub fn file_name(self, username: &str) -> String {
        format!("{username}-{self}.json")
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tokens => "tokens",
            Self::Usage => "usage",
        })
    }
}

/// Contents of a cache entry and when it was last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFile {
    /// Raw response body.
    pub contents: String,
    /// Last-write time of the entry.
    pub modified: DateTime<Utc>,
}

/// Storage for cached toolbox responses.
#[async_trait]
pub trait CacheApi: Send + Sync {
    /// Reads an entry. `Ok(None)` if it does not exist.
    async fn read(&self, username: &str, kind: CacheKind) -> Result<Option<CachedFile>, CacheError>;

    /// Replaces an entry.
    async fn write(&self, username: &str, kind: CacheKind, contents: &str) -> Result<(), CacheError>;

    /// Removes an entry. Removing a missing entry is not an error.
    async fn remove(&self, username: &str, kind: CacheKind) -> Result<(), CacheError>;
}
