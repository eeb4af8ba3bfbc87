// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # iigenmon Core
//!
//! Core types and parsing for `iigenmon`, an iiNet usage reporter for
//! desktop status-bar widgets.
//!
//! This crate has no I/O. It provides:
//!
//! - Domain models (credentials, tokens, usage snapshots, report state)
//! - Toolbox API response types and the parsing/selection rules for them
//! - Error types
//!
//! ## Key Types
//!
//! - [`TokenSet`] - Account and service tokens from one login
//! - [`UsageSnapshot`] - Parsed usage for the current quota period
//! - [`ReportState`] - What the renderer gets to display
//! - [`LoginResponse`] / [`UsageResponse`] - Raw toolbox responses

pub mod error;
pub mod models;
pub mod toolbox;

pub use error::CoreError;

pub use models::{
    BYTES_PER_GIB, Credentials, ErrorLog, ReportState, TokenSet, UsageSnapshot, bytes_to_gib,
    round_half_up,
};

pub use toolbox::{
    INVALID_CREDENTIALS_ERROR, LoginResponse, ServiceEntry, TOKEN_EXPIRED_ERROR, UsageResponse,
};
