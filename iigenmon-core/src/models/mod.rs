//! Domain models for iigenmon.
//!
//! ## Submodules
//!
//! - [`session`] - Credentials and the token set from a login
//! - [`usage`] - Usage snapshot and display unit helpers
//! - [`report`] - Report state and accumulated errors

mod report;
mod session;
mod usage;

pub use report::{ErrorLog, ReportState};
pub use session::{Credentials, TokenSet};
pub use usage::{BYTES_PER_GIB, UsageSnapshot, bytes_to_gib, round_half_up};
