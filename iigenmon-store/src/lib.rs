// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # iigenmon Store
//!
//! Local state for `iigenmon`.
//!
//! This crate provides:
//!
//! - **DiskCache**: per-user cached toolbox responses on disk
//! - **Config**: optional JSON configuration
//! - **Persistence**: atomic, owner-only file I/O helpers
//!
//! ## Usage
//!
//! ```ignore
//! use iigenmon_store::{Config, DiskCache};
//!
//! let config = Config::load();
//! let cache = DiskCache::new(config.cache_dir());
//! ```

pub mod config;
pub mod disk_cache;
pub mod error;
pub mod persistence;

pub use config::{Config, RetryConfig};
pub use disk_cache::DiskCache;
pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_config_dir, default_config_path, ensure_dir, load_json, load_text,
    remove_file, save_text,
};
