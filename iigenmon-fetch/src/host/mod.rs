//! Host APIs for iigenmon.
//!
//! This module provides abstractions for interacting with external systems:
//!
//! - [`keychain`] - Secure credential storage (system keychain)
//! - [`http`] - Toolbox HTTP transport
//! - [`cache`] - Per-user cached responses

pub mod cache;
pub mod http;
pub mod keychain;

// Re-export key types
pub use cache::{CacheApi, CacheKind, CachedFile};
pub use http::{ToolboxApi, ToolboxClient};
pub use keychain::{KeychainApi, SystemKeychain};
