//! Report output tests.
//!
//! These tests verify the tag layout and the per-metric lines of the
//! status-bar report.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::{Local, TimeZone, Utc};
    use iigenmon_core::{ErrorLog, ReportState, UsageSnapshot};

    fn formatter() -> TextFormatter {
        TextFormatter::new(Local.with_ymd_and_hms(2024, 1, 25, 12, 0, 0).unwrap())
    }

    fn snapshot() -> UsageSnapshot {
        UsageSnapshot {
            days_so_far: 10,
            days_remaining: 20,
            anytime_used: 500_000_000_000,
            anytime_allocation: 1_000_000_000_000,
            anytime_is_shaped: false,
            anytime_shaping_speed: None,
            uploads_used: None,
            freezone_used: None,
            retrieved_at: Utc.with_ymd_and_hms(2024, 1, 25, 1, 2, 3).unwrap(),
        }
    }

    fn report(snapshot: Option<UsageSnapshot>, errors: &[&str]) -> ReportState {
        let mut log = ErrorLog::new();
        for e in errors {
            log.push(*e);
        }
        ReportState {
            snapshot,
            fresh: true,
            errors: log,
        }
    }

    #[test]
    fn test_first_run_scenario() {
        let output = formatter().format_report(&report(Some(snapshot()), &[]));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "<txt>20</txt>");
        assert_eq!(lines[1], "<bar>50</bar>");
        assert_eq!(lines[2], "<tool>");
        assert!(lines.contains(&"Anytime Used: ~465.66GiB ~50.00%"));
        assert!(lines.contains(&"Anytime Used Per Day: ~46.57GiB"));
        assert!(lines.contains(&"Anytime Remaining: ~465.66GiB ~50.00%"));
        assert!(lines.contains(&"Anytime Remaining Per Day: ~23.28GiB"));
        assert!(lines.contains(&"Anytime Shaped: No"));
        assert!(lines.contains(&"Anytime Quota: ~931.32GiB"));
        assert!(lines.contains(&"Days So Far: 10"));
        assert!(lines.contains(&"Days Remaining: 20"));
        assert!(lines.contains(&"Resets: Wed 14 Feb 2024"));
        assert!(lines.iter().any(|l| l.starts_with("Retrieved: ")));
        assert_eq!(*lines.last().unwrap(), "</tool>");
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn test_metric_order() {
        let output = formatter().format_report(&report(Some(snapshot()), &[]));
        let used = output.find("Anytime Used:").unwrap();
        let remaining = output.find("Anytime Remaining:").unwrap();
        let quota = output.find("Anytime Quota:").unwrap();
        let resets = output.find("Resets:").unwrap();
        let retrieved = output.find("Retrieved:").unwrap();
        assert!(used < remaining && remaining < quota && quota < resets && resets < retrieved);
    }

    #[test]
    fn test_optional_classifications() {
        let mut snap = snapshot();
        snap.uploads_used = Some(1_073_741_824);
        snap.freezone_used = Some(0);

        let lines = formatter().format_usage(&snap);

        assert!(lines.contains(&"Uploads: ~1.00GiB".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Freezone")));
    }

    #[test]
    fn test_zero_usage_suppresses_line() {
        let mut snap = snapshot();
        snap.anytime_used = 0;
        snap.days_so_far = 0;

        let lines = formatter().format_usage(&snap);

        assert!(!lines.iter().any(|l| l.starts_with("Anytime Used")));
        assert!(!lines.iter().any(|l| l.starts_with("Days So Far")));
        assert!(lines.contains(&"Anytime Remaining: ~931.32GiB ~100.00%".to_string()));
    }

    #[test]
    fn test_shaped_with_speed() {
        let mut snap = snapshot();
        snap.anytime_used = snap.anytime_allocation;
        snap.anytime_is_shaped = true;
        snap.anytime_shaping_speed = Some("256kbps".into());

        let output = formatter().format_report(&report(Some(snap), &[]));

        assert!(output.contains("Anytime Shaped: Yes (256kbps)"));
        assert!(output.contains("<bar>0</bar>"));
        assert!(!output.contains("Anytime Remaining"));
    }

    #[test]
    fn test_midpoint_values_round_up() {
        let mut snap = snapshot();
        snap.uploads_used = Some(1_207_959_552);

        let lines = formatter().format_usage(&snap);

        assert!(lines.contains(&"Uploads: ~1.13GiB".to_string()));
    }

    #[test]
    fn test_unrepresentable_reset_date_is_skipped() {
        let mut snap = snapshot();
        snap.days_remaining = u32::MAX;

        let output = formatter().format_report(&report(Some(snap), &[]));

        assert!(output.starts_with(&format!("<txt>{}</txt>", u32::MAX)));
        assert!(!output.contains("Resets:"));
        assert!(output.contains("Retrieved: "));
        assert!(output.ends_with("</tool>"));
    }

    #[test]
    fn test_no_data_scenario() {
        let output = formatter().format_report(&report(
            None,
            &["Network error: HTTP 503", "No cached data."],
        ));

        assert_eq!(
            output,
            "<txt></txt>\n<bar></bar>\n<tool>\nError: Network error: HTTP 503 No cached data.\n</tool>"
        );
    }

    #[test]
    fn test_stale_data_with_error() {
        let mut state = report(Some(snapshot()), &["Network error:\n  HTTP 503"]);
        state.fresh = false;

        let output = formatter().format_report(&state);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines.contains(&"Anytime Used: ~465.66GiB ~50.00%"));
        let n = lines.len();
        assert_eq!(lines[n - 3], "");
        assert_eq!(lines[n - 2], "Error: Network error: HTTP 503");
    }
}
