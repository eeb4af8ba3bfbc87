//! Core error types for `iigenmon`.

use thiserror::Error;

/// Core error type for parsing and selecting data out of toolbox responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No service on the account offers usage data (or none matched the filter).
    #[error("{}", service_not_found_message(.0.as_deref()))]
    ServiceNotFound(Option<String>),

    /// Response parsed but is missing required data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn service_not_found_message(filter: Option<&str>) -> String {
    match filter {
        Some(id) => format!("Service {id} not found or does not support usage"),
        None => "No service supporting usage found".to_string(),
    }
}
