//! # Stats Aggregator
//!
//! Window-scoped dashboard statistics over an in-memory sale set.
//!
//! The caller fetches sales with at most a single-field filter (by rep)
//! and NO date predicate, then this module filters by `sale_date` in
//! memory. That keeps the storage contract down to single-field
//! equality scans; the cost is a full scan of the actor's sales per
//! request, a scaling ceiling at millions of rows but not at the
//! thousands this system holds.
//!
//! Read-only projection: no side effects, tolerates an empty sale set.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Sale, SaleStatus};

// =============================================================================
// Window
// =============================================================================

/// Reporting window, anchored to "now" at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// Midnight today → now.
    Day,
    /// Most recent Sunday 00:00 → now.
    Week,
    /// First of the current month 00:00 → now.
    Month,
    /// January 1 00:00 → now.
    Year,
}

impl Default for Window {
    fn default() -> Self {
        Window::Month
    }
}

impl Window {
    /// Inclusive start of the window containing `now` (UTC).
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let date = now.date_naive();
        let start_date = match self {
            Window::Day => date,
            Window::Week => date - Duration::days(date.weekday().num_days_from_sunday() as i64),
            Window::Month => date.with_day(1).unwrap_or(date),
            Window::Year => date.with_ordinal(1).unwrap_or(date),
        };
        start_date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Start of the equal-length window immediately preceding this one:
    /// `[start - (now - start), start)`.
    pub fn previous_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let start = self.start(now);
        start - (now - start)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Window-scoped counts and sums (derived, never persisted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_sales: i64,
    pub total_cents: i64,
    pub total_points: i64,
    pub pending_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    /// Points summed over approved sales only.
    pub approved_points: i64,
    /// Sale-count delta vs the preceding equal-length window, percent.
    pub sales_change: f64,
    /// Points delta vs the preceding equal-length window, percent.
    pub points_change: f64,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Period-over-period percentage change, rounded to one decimal.
///
/// Conventions: previous 0 and current > 0 → 100.0; both 0 → 0.0.
pub fn percent_change(previous: i64, current: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    let raw = (current - previous) as f64 / previous as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Computes the stats snapshot for `window` anchored at `now`.
///
/// A sale dated exactly at the window start is included; one dated any
/// amount before it is excluded.
pub fn compute_stats(sales: &[Sale], window: Window, now: DateTime<Utc>) -> StatsSnapshot {
    let start = window.start(now);
    let previous_start = window.previous_start(now);

    let mut snapshot = StatsSnapshot {
        total_sales: 0,
        total_cents: 0,
        total_points: 0,
        pending_count: 0,
        approved_count: 0,
        rejected_count: 0,
        approved_points: 0,
        sales_change: 0.0,
        points_change: 0.0,
    };

    let mut previous_sales: i64 = 0;
    let mut previous_points: i64 = 0;

    for sale in sales {
        if sale.sale_date >= start {
            snapshot.total_sales += 1;
            snapshot.total_cents += sale.total_cents;
            snapshot.total_points += sale.total_points;

            match sale.status {
                SaleStatus::Pending => snapshot.pending_count += 1,
                SaleStatus::Approved => {
                    snapshot.approved_count += 1;
                    snapshot.approved_points += sale.total_points;
                }
                SaleStatus::Rejected => snapshot.rejected_count += 1,
                SaleStatus::Cancelled => {}
            }
        } else if sale.sale_date >= previous_start {
            previous_sales += 1;
            previous_points += sale.total_points;
        }
    }

    snapshot.sales_change = percent_change(previous_sales, snapshot.total_sales);
    snapshot.points_change = percent_change(previous_points, snapshot.total_points);

    snapshot
}

// =============================================================================
// Unit Tests
// =============================================================================
