//! Report state handed to the renderer.

use std::fmt;

use super::usage::UsageSnapshot;

/// Human-readable error messages accumulated over one run.
///
/// Transient failures are recorded here instead of aborting so that stale
/// cached data can still be shown next to the reason it is stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    messages: Vec<String>,
}

impl ErrorLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message. Blank and repeated messages are dropped.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !message.trim().is_empty() && !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Recorded messages in order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// All messages as one line with whitespace runs collapsed.
    pub fn to_line(&self) -> String {
        self.messages
            .iter()
            .flat_map(|m| m.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Final state of a run, derived for display and never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportState {
    /// Usage to display: freshly fetched or the last cached snapshot.
    pub snapshot: Option<UsageSnapshot>,
    /// True when `snapshot` came from the network during this run.
    pub fresh: bool,
    /// Accumulated error text.
    pub errors: ErrorLog,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_log_normalizes_whitespace() {
        let mut log = ErrorLog::new();
        log.push("Exception getting usage:\n  connection\trefused");
        log.push("No cached data.");
        assert_eq!(
            log.to_line(),
            "Exception getting usage: connection refused No cached data."
        );
    }

    #[test]
    fn test_error_log_skips_repeats() {
        let mut log = ErrorLog::new();
        log.push("Network error: HTTP 503");
        log.push("No cached data.");
        log.push("Network error: HTTP 503");
        log.push("No cached data.");
        assert_eq!(log.messages().len(), 2);
    }

    #[test]
    fn test_error_log_skips_blank() {
        let mut log = ErrorLog::new();
        log.push("   ");
        assert!(log.is_empty());
        assert_eq!(log.to_string(), "");
    }
}
