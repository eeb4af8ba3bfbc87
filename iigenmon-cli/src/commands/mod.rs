//! CLI command implementations.

pub mod password;
pub mod usage;
