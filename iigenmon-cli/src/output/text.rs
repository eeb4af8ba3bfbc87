//! Status-bar report formatting.
//!
//! Output is a genmon-style block: a days-remaining tag, a
//! percent-remaining bar tag, then a tooltip with one metric per line.

use chrono::{DateTime, Local};
use iigenmon_core::{ReportState, UsageSnapshot, bytes_to_gib, round_half_up};

/// Date format for the quota reset line.
const RESET_FORMAT: &str = "%a %-d %b %Y";

/// Timestamp format for the retrieval line.
const RETRIEVED_FORMAT: &str = "%c";

/// Text formatter for the status-bar report.
pub struct TextFormatter {
    now: DateTime<Local>,
}

impl TextFormatter {
    /// Creates a formatter that computes dates relative to `now`.
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }

    /// Formats the full report.
    pub fn format_report(&self, report: &ReportState) -> String {
        let snapshot = report.snapshot.as_ref();

        let days = snapshot
            .map(|s| s.days_remaining.to_string())
            .unwrap_or_default();
        let bar = snapshot
            .and_then(UsageSnapshot::anytime_remaining_percent)
            .map(bar_value)
            .unwrap_or_default();

        let mut lines = vec![
            format!("<txt>{days}</txt>"),
            format!("<bar>{bar}</bar>"),
            "<tool>".to_string(),
        ];

        let metrics = snapshot.map(|s| self.format_usage(s)).unwrap_or_default();
        let has_metrics = !metrics.is_empty();
        lines.extend(metrics);

        if !report.errors.is_empty() {
            if has_metrics {
                lines.push(String::new());
            }
            lines.push(format!("Error: {}", report.errors.to_line()));
        }

        lines.push("</tool>".to_string());
        lines.join("\n")
    }

    /// Formats one line per metric. Absent and zero metrics are left out.
    #[allow(clippy::cast_precision_loss)]
    pub fn format_usage(&self, snapshot: &UsageSnapshot) -> Vec<String> {
        let mut lines = Vec::new();

        if snapshot.anytime_used > 0 {
            lines.push(format!(
                "Anytime Used: {}{}",
                gib(snapshot.anytime_used as f64),
                percent_suffix(snapshot.anytime_used_percent())
            ));
            if let Some(rate) = snapshot.used_per_day() {
                lines.push(format!("Anytime Used Per Day: {}", gib(rate)));
            }
        }

        let remaining = snapshot.anytime_remaining();
        if snapshot.anytime_allocation > 0 && remaining != 0 {
            lines.push(format!(
                "Anytime Remaining: {}{}",
                gib(remaining as f64),
                percent_suffix(snapshot.anytime_remaining_percent())
            ));
            if let Some(rate) = snapshot.remaining_per_day() {
                lines.push(format!("Anytime Remaining Per Day: {}", gib(rate)));
            }
        }

        lines.push(match (
            snapshot.anytime_is_shaped,
            snapshot.anytime_shaping_speed.as_deref(),
        ) {
            (true, Some(speed)) if !speed.is_empty() => format!("Anytime Shaped: Yes ({speed})"),
            (true, _) => "Anytime Shaped: Yes".to_string(),
            (false, _) => "Anytime Shaped: No".to_string(),
        });

        if snapshot.anytime_allocation > 0 {
            lines.push(format!(
                "Anytime Quota: {}",
                gib(snapshot.anytime_allocation as f64)
            ));
        }

        if let Some(uploads) = snapshot.uploads_used.filter(|u| *u > 0) {
            lines.push(format!("Uploads: {}", gib(uploads as f64)));
        }

        if let Some(freezone) = snapshot.freezone_used.filter(|f| *f > 0) {
            lines.push(format!("Freezone: {}", gib(freezone as f64)));
        }

        if snapshot.days_so_far > 0 {
            lines.push(format!("Days So Far: {}", snapshot.days_so_far));
        }
        if snapshot.days_remaining > 0 {
            lines.push(format!("Days Remaining: {}", snapshot.days_remaining));
        }

        if let Some(reset) = snapshot.reset_date(self.now.date_naive()) {
            lines.push(format!("Resets: {}", reset.format(RESET_FORMAT)));
        }
        lines.push(format!(
            "Retrieved: {}",
            snapshot
                .retrieved_at
                .with_timezone(&Local)
                .format(RETRIEVED_FORMAT)
        ));

        lines
    }
}

fn gib(bytes: f64) -> String {
    format!("~{:.2}GiB", bytes_to_gib(bytes))
}

fn percent_suffix(percent: Option<f64>) -> String {
    percent
        .map(|p| format!(" ~{:.2}%", round_half_up(p)))
        .unwrap_or_default()
}

/// Remaining percent as an integer the bar widget accepts.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_value(percent: f64) -> String {
    (percent.clamp(0.0, 100.0).round() as u8).to_string()
}
