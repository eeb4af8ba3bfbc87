//! Usage-related types.
//!
//! This module contains the parsed view of a usage response:
//! - [`UsageSnapshot`] - Quota period and per-classification traffic figures
//! - [`round_half_up`] / [`bytes_to_gib`] - Display unit helpers

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Bytes in one GiB.
pub const BYTES_PER_GIB: f64 = 1_073_741_824.0;

// ============================================================================
// Usage Snapshot
// ============================================================================

/// A snapshot of account usage for one quota period.
///
/// Optional fields are `None` when the response carried no entry for that
/// traffic classification. `None` and `Some(0)` are distinct here; it is the
/// renderer that decides a zero value is not worth a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Days elapsed in the current quota period.
    pub days_so_far: u32,
    /// Days until the quota resets.
    pub days_remaining: u32,
    /// Bytes counted against the anytime quota.
    pub anytime_used: u64,
    /// Anytime quota in bytes.
    pub anytime_allocation: u64,
    /// Whether the service is currently shaped.
    pub anytime_is_shaped: bool,
    /// Shaped speed as reported by the toolbox (e.g. "256kbps").
    pub anytime_shaping_speed: Option<String>,
    /// Uploaded bytes, if reported.
    pub uploads_used: Option<u64>,
    /// Unmetered bytes, if reported.
    pub freezone_used: Option<u64>,
    /// When the data was retrieved (fetch time, or cache file mtime).
    pub retrieved_at: DateTime<Utc>,
}

impl UsageSnapshot {
    /// Anytime bytes left in the quota. Negative when over quota.
    pub fn anytime_remaining(&self) -> i128 {
        i128::from(self.anytime_allocation) - i128::from(self.anytime_used)
    }

    /// Percentage of the anytime quota used, or `None` without an allocation.
    #[allow(clippy::cast_precision_loss)]
    pub fn anytime_used_percent(&self) -> Option<f64> {
        (self.anytime_allocation > 0)
            .then(|| 100.0 * self.anytime_used as f64 / self.anytime_allocation as f64)
    }

    /// Percentage of the anytime quota remaining, or `None` without an allocation.
    #[allow(clippy::cast_precision_loss)]
    pub fn anytime_remaining_percent(&self) -> Option<f64> {
        (self.anytime_allocation > 0)
            .then(|| 100.0 * self.anytime_remaining() as f64 / self.anytime_allocation as f64)
    }

    /// Average anytime bytes used per elapsed day.
    #[allow(clippy::cast_precision_loss)]
    pub fn used_per_day(&self) -> Option<f64> {
        (self.days_so_far > 0).then(|| self.anytime_used as f64 / f64::from(self.days_so_far))
    }

    /// Anytime bytes available per remaining day.
    #[allow(clippy::cast_precision_loss)]
    pub fn remaining_per_day(&self) -> Option<f64> {
        (self.days_remaining > 0)
            .then(|| self.anytime_remaining() as f64 / f64::from(self.days_remaining))
    }

    /// Date the quota resets, counted from `today`.
    ///
    /// `None` if the date falls outside the supported calendar range.
    pub fn reset_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_days(Days::new(u64::from(self.days_remaining)))
    }
}

// ============================================================================
// Units
// ============================================================================

/// Rounds to two decimals, halves going up.
///
/// Scales to hundredths before adding the half, so an exact midpoint such
/// as `1.125` becomes `1.13` and `465.6613` stays `465.66`.
pub fn round_half_up(value: f64) -> f64 {
    hundredths_half_up(value * 100.0)
}

/// Converts a byte count to GiB rounded for display.
///
/// The byte count is scaled to hundredths of a GiB in one step; dividing by
/// a power of two is exact, so byte counts on a midpoint round up.
pub fn bytes_to_gib(bytes: f64) -> f64 {
    hundredths_half_up(bytes * 100.0 / BYTES_PER_GIB)
}

fn hundredths_half_up(hundredths: f64) -> f64 {
    (hundredths + 0.5).floor() / 100.0
}
