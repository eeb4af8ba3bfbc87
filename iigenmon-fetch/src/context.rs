//! Fetch context providing access to host APIs.
//!
//! The context is handed to the token manager, usage fetcher and retry
//! controller, and is the seam where tests swap in in-memory fakes.

use std::sync::Arc;

use crate::host::{CacheApi, KeychainApi, ToolboxApi};

/// Host APIs used by one run.
#[derive(Clone)]
pub struct FetchContext {
    /// Secret store for account passwords.
    pub keychain: Arc<dyn KeychainApi>,
    /// Cached toolbox responses.
    pub cache: Arc<dyn CacheApi>,
    /// Toolbox transport.
    pub toolbox: Arc<dyn ToolboxApi>,
}

impl FetchContext {
    /// Creates a context from its host APIs.
    pub fn new(
        keychain: Arc<dyn KeychainApi>,
        cache: Arc<dyn CacheApi>,
        toolbox: Arc<dyn ToolboxApi>,
    ) -> Self {
        Self {
            keychain,
            cache,
            toolbox,
        }
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext").finish_non_exhaustive()
    }
}
