// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # iigenmon Fetch
//!
//! Token acquisition, usage retrieval and the retry policy for `iigenmon`.
//!
//! ## Host APIs
//!
//! The [`host`] module puts every external system behind a trait:
//!
//! - [`host::keychain`] - Password storage (system keychain)
//! - [`host::http`] - Toolbox HTTP transport
//! - [`host::cache`] - Cached raw responses
//!
//! ## Workflow
//!
//! - [`session::TokenManager`] - Cached or fresh login tokens
//! - [`usage::UsageFetcher`] - Live usage with cache fallback
//! - [`retry::RetryController`] - Refresh-and-retry state machine
//!
//! ## Example
//!
//! ```ignore
//! use iigenmon_fetch::{FetchContext, RetryController, RetryPolicy};
//!
//! let ctx = FetchContext::new(keychain, cache, toolbox);
//! let outcome = RetryController::new(&ctx, RetryPolicy::default())
//!     .run("alice", None)
//!     .await;
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod retry;
pub mod session;
pub mod usage;

#[cfg(test)]
mod testing;

// Errors
pub use error::{CacheError, FetchError, HttpError, KeychainError};

// Host APIs
pub use host::{
    cache::{CacheApi, CacheKind, CachedFile},
    http::{ToolboxApi, ToolboxClient},
    keychain::{KeychainApi, SystemKeychain},
};

// Workflow
pub use context::FetchContext;
pub use retry::{RetryController, RetryOutcome, RetryPolicy, RetryState};
pub use session::TokenManager;
pub use usage::{FetchedUsage, UsageFetcher};
