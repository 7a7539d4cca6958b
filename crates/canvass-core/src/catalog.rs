//! # Plan Catalog
//!
//! The fixed, process-wide table of sellable plans.
//!
//! Every points computation path (submit, stats, leaderboard) must
//! dereference this table; client-supplied point values are never
//! trusted. The catalog is immutable after construction and safe for
//! unlimited concurrent reads.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Company
// =============================================================================

/// Closed set of provider identifiers the organization sells for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Company {
    Att,
    Frontier,
    Spectrum,
    Vivint,
}

impl Company {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Company::Att => "att",
            Company::Frontier => "frontier",
            Company::Spectrum => "spectrum",
            Company::Vivint => "vivint",
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Plan
// =============================================================================

/// A sellable plan (catalog entry, immutable).
///
/// Invariant: plan ids are unique; `points` and `price_cents` never
/// change at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Unique id, e.g. `att-1gig`.
    pub id: String,
    pub company: Company,
    /// Display name shown to reps.
    pub name: String,
    /// Speed tier or package label, e.g. `1 Gbps`.
    pub speed_label: String,
    /// Monthly charge in cents, non-negative.
    pub price_cents: i64,
    /// Integer reward value, fixed per plan.
    pub points: i64,
}

impl Plan {
    /// Returns the monthly price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Pure lookup over the fixed plan table. No side effects.
#[derive(Debug, Clone)]
pub struct Catalog {
    plans: Vec<Plan>,
}

impl Catalog {
    /// Builds a catalog from a plan list.
    ///
    /// Panics on a duplicate plan id or a negative price: the builtin
    /// table is a compile-in constant and a malformed one is a
    /// programming error, not a runtime condition.
    pub fn new(plans: Vec<Plan>) -> Self {
        let mut seen = std::collections::HashSet::new();
        for plan in &plans {
            assert!(
                seen.insert(plan.id.clone()),
                "duplicate plan id in catalog: {}",
                plan.id
            );
            assert!(
                plan.price_cents >= 0,
                "negative price for plan {}",
                plan.id
            );
        }
        Catalog { plans }
    }

    /// The production plan table.
    pub fn builtin() -> Self {
        fn plan(
            id: &str,
            company: Company,
            name: &str,
            speed_label: &str,
            price_cents: i64,
            points: i64,
        ) -> Plan {
            Plan {
                id: id.to_string(),
                company,
                name: name.to_string(),
                speed_label: speed_label.to_string(),
                price_cents,
                points,
            }
        }

        Catalog::new(vec![
            // AT&T Fiber
            plan("att-300", Company::Att, "AT&T Fiber 300", "300 Mbps", 5500, 4),
            plan("att-500", Company::Att, "AT&T Fiber 500", "500 Mbps", 6500, 6),
            plan("att-1gig", Company::Att, "AT&T Fiber 1 Gig", "1 Gbps", 8000, 8),
            plan("att-2gig", Company::Att, "AT&T Fiber 2 Gig", "2 Gbps", 11000, 10),
            plan("att-5gig", Company::Att, "AT&T Fiber 5 Gig", "5 Gbps", 18000, 14),
            // Frontier Fiber
            plan("frontier-500", Company::Frontier, "Frontier Fiber 500", "500 Mbps", 4499, 4),
            plan("frontier-1gig", Company::Frontier, "Frontier Fiber 1 Gig", "1 Gbps", 6999, 7),
            plan("frontier-2gig", Company::Frontier, "Frontier Fiber 2 Gig", "2 Gbps", 9999, 9),
            // Spectrum
            plan("spectrum-internet", Company::Spectrum, "Spectrum Internet", "300 Mbps", 4999, 3),
            plan("spectrum-internet-ultra", Company::Spectrum, "Spectrum Internet Ultra", "500 Mbps", 6999, 5),
            plan("spectrum-tv-select", Company::Spectrum, "Spectrum TV Select", "125+ channels", 5999, 5),
            // Vivint smart home security
            plan("vivint-core", Company::Vivint, "Vivint Smart Security", "Core monitoring", 3999, 6),
            plan("vivint-premium", Company::Vivint, "Vivint Premium Home", "Full automation", 6999, 10),
        ])
    }

    /// Looks up a plan by id. Unknown ids are a lookup miss, never a
    /// panic; the sale builder converts a miss into a validation failure.
    pub fn get(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Lists plans, optionally restricted to one provider.
    pub fn list(&self, company: Option<Company>) -> Vec<&Plan> {
        self.plans
            .iter()
            .filter(|p| company.map_or(true, |c| p.company == c))
            .collect()
    }

    /// Number of plans in the table.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_unique() {
        // Catalog::new asserts uniqueness; constructing is the test.
        let catalog = Catalog::builtin();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_get_known_plan() {
        let catalog = Catalog::builtin();

        let plan = catalog.get("att-1gig").unwrap();
        assert_eq!(plan.company, Company::Att);
        assert_eq!(plan.points, 8);

        let plan = catalog.get("frontier-500").unwrap();
        assert_eq!(plan.points, 4);
    }

    #[test]
    fn test_get_unknown_plan_is_none() {
        let catalog = Catalog::builtin();
        assert!(catalog.get("att-10gig").is_none());
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn test_list_by_company() {
        let catalog = Catalog::builtin();

        let att = catalog.list(Some(Company::Att));
        assert!(!att.is_empty());
        assert!(att.iter().all(|p| p.company == Company::Att));

        let all = catalog.list(None);
        assert_eq!(all.len(), catalog.len());
    }

    #[test]
    #[should_panic(expected = "duplicate plan id")]
    fn test_duplicate_id_panics() {
        let p = Plan {
            id: "dup".to_string(),
            company: Company::Att,
            name: "A".to_string(),
            speed_label: "x".to_string(),
            price_cents: 100,
            points: 1,
        };
        Catalog::new(vec![p.clone(), p]);
    }
}
