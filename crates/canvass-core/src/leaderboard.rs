//! # Leaderboard Ranker
//!
//! Ranks representatives by approved sales over a time window.
//!
//! Only sales with `status = approved` and `sale_date` at or after the
//! window start contribute. A rep with zero approved sales in-window
//! does not appear (no zero-filling). Recomputed per request, never
//! persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Sale, SaleStatus};

// =============================================================================
// Metric
// =============================================================================

/// The ranking metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    TotalPoints,
    TotalSales,
}

impl Default for LeaderboardMetric {
    fn default() -> Self {
        LeaderboardMetric::TotalPoints
    }
}

// =============================================================================
// Entry
// =============================================================================

/// One ranked row (derived, never persisted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based, contiguous over the returned set.
    pub rank: u32,
    pub sales_rep_id: String,
    pub sales_rep_name: String,
    /// Count of approved sales in window.
    pub total_sales: i64,
    /// Sum of points of approved sales in window.
    pub total_points: i64,
}

// =============================================================================
// Ranking
// =============================================================================

/// Ranks reps over `sales`, counting approved sales dated at or after
/// `window_start`.
///
/// Sort order: chosen metric descending, then `sales_rep_name`
/// ascending, then `sales_rep_id` ascending. The secondary keys are the
/// explicit tie-break policy: output is deterministic for any input
/// permutation.
pub fn rank(
    sales: &[Sale],
    window_start: DateTime<Utc>,
    metric: LeaderboardMetric,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    // rep id -> (name, sale count, point sum)
    let mut totals: HashMap<&str, (&str, i64, i64)> = HashMap::new();

    for sale in sales {
        if sale.status != SaleStatus::Approved || sale.sale_date < window_start {
            continue;
        }

        let entry = totals
            .entry(sale.sales_rep_id.as_str())
            .or_insert((sale.sales_rep_name.as_str(), 0, 0));
        entry.1 += 1;
        entry.2 += sale.total_points;
    }

    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(rep_id, (rep_name, total_sales, total_points))| LeaderboardEntry {
            rank: 0,
            sales_rep_id: rep_id.to_string(),
            sales_rep_name: rep_name.to_string(),
            total_sales,
            total_points,
        })
        .collect();

    entries.sort_by(|a, b| {
        let key = |e: &LeaderboardEntry| match metric {
            LeaderboardMetric::TotalPoints => e.total_points,
            LeaderboardMetric::TotalSales => e.total_sales,
        };
        key(b)
            .cmp(&key(a))
            .then_with(|| a.sales_rep_name.cmp(&b.sales_rep_name))
            .then_with(|| a.sales_rep_id.cmp(&b.sales_rep_id))
    });

    entries.truncate(limit);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    entries
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleType;
    use chrono::{Duration, TimeZone};

    fn sale(
        rep_id: &str,
        rep_name: &str,
        status: SaleStatus,
        points: i64,
        date: DateTime<Utc>,
    ) -> Sale {
        Sale {
            id: uuid::Uuid::new_v4().to_string(),
            sales_rep_id: rep_id.to_string(),
            sales_rep_name: rep_name.to_string(),
            manager_id: None,
            customer_address: "12 Elm St".to_string(),
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            sale_type: SaleType::NewService,
            status,
            total_cents: points * 1000,
            total_points: points,
            notes: None,
            approved_by: None,
            approver_name: None,
            approved_at: None,
            rejection_reason: None,
            sale_date: date,
            created_at: date,
            updated_at: date,
        }
    }

    fn window_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn in_window() -> DateTime<Utc> {
        window_start() + Duration::days(5)
    }

    #[test]
    fn test_ranking_by_points() {
        let sales = vec![
            sale("rep-a", "Avery", SaleStatus::Approved, 8, in_window()),
            sale("rep-b", "Blake", SaleStatus::Approved, 4, in_window()),
            sale("rep-b", "Blake", SaleStatus::Approved, 9, in_window()),
            sale("rep-c", "Casey", SaleStatus::Approved, 6, in_window()),
        ];

        let entries = rank(&sales, window_start(), LeaderboardMetric::TotalPoints, 10);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].sales_rep_id, "rep-b");
        assert_eq!(entries[0].total_points, 13);
        assert_eq!(entries[0].total_sales, 2);
        assert_eq!(entries[1].sales_rep_id, "rep-a");
        assert_eq!(entries[2].sales_rep_id, "rep-c");

        // Monotonic metric, contiguous 1-based ranks.
        for pair in entries.windows(2) {
            assert!(pair[0].total_points >= pair[1].total_points);
        }
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.rank, i as u32 + 1);
        }
    }

    #[test]
    fn test_ranking_by_sale_count() {
        let sales = vec![
            sale("rep-a", "Avery", SaleStatus::Approved, 20, in_window()),
            sale("rep-b", "Blake", SaleStatus::Approved, 1, in_window()),
            sale("rep-b", "Blake", SaleStatus::Approved, 1, in_window()),
        ];

        let entries = rank(&sales, window_start(), LeaderboardMetric::TotalSales, 10);
        assert_eq!(entries[0].sales_rep_id, "rep-b");
        assert_eq!(entries[0].total_sales, 2);
        assert_eq!(entries[1].sales_rep_id, "rep-a");
    }

    #[test]
    fn test_non_approved_and_out_of_window_excluded() {
        let sales = vec![
            sale("rep-a", "Avery", SaleStatus::Pending, 8, in_window()),
            sale("rep-a", "Avery", SaleStatus::Rejected, 8, in_window()),
            sale("rep-a", "Avery", SaleStatus::Cancelled, 8, in_window()),
            sale(
                "rep-b",
                "Blake",
                SaleStatus::Approved,
                8,
                window_start() - Duration::milliseconds(1),
            ),
        ];

        let entries = rank(&sales, window_start(), LeaderboardMetric::TotalPoints, 10);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_window_start_boundary_included() {
        let sales = vec![sale(
            "rep-a",
            "Avery",
            SaleStatus::Approved,
            8,
            window_start(),
        )];

        let entries = rank(&sales, window_start(), LeaderboardMetric::TotalPoints, 10);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let mut sales = vec![
            sale("rep-z", "Avery", SaleStatus::Approved, 8, in_window()),
            sale("rep-a", "Blake", SaleStatus::Approved, 8, in_window()),
            sale("rep-m", "Avery", SaleStatus::Approved, 8, in_window()),
        ];

        let ranked = rank(&sales, window_start(), LeaderboardMetric::TotalPoints, 10);

        // Equal points: name ascending, then id ascending.
        assert_eq!(ranked[0].sales_rep_id, "rep-m");
        assert_eq!(ranked[1].sales_rep_id, "rep-z");
        assert_eq!(ranked[2].sales_rep_id, "rep-a");

        // Any input permutation yields the same output.
        sales.reverse();
        let reranked = rank(&sales, window_start(), LeaderboardMetric::TotalPoints, 10);
        assert_eq!(ranked, reranked);
    }

    #[test]
    fn test_limit_truncates() {
        let sales = vec![
            sale("rep-a", "Avery", SaleStatus::Approved, 9, in_window()),
            sale("rep-b", "Blake", SaleStatus::Approved, 8, in_window()),
            sale("rep-c", "Casey", SaleStatus::Approved, 7, in_window()),
        ];

        let entries = rank(&sales, window_start(), LeaderboardMetric::TotalPoints, 2);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].rank, 2);
    }
}
