//! # Sale Record Builder
//!
//! Validates and assembles a sale submission into a persistable record.
//!
//! ## Flow
//! ```text
//! SaleSubmission ──► validate ──► catalog dereference ──► NewSale
//!                     │                  │
//!                     │                  └── unit price / points come
//!                     │                      from the Catalog, never
//!                     │                      from the caller
//!                     └── empty address / empty products reject here,
//!                         nothing persisted, nothing notified
//! ```
//!
//! This module is pure: the clock is passed in and persistence belongs
//! to the caller.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::settings::SalesSettings;
use crate::types::{Sale, SaleProduct, SaleStatus, SaleType};
use crate::validation::{validate_customer_address, validate_product_count, validate_quantity};

// =============================================================================
// Submission Input
// =============================================================================

/// One requested line item.
///
/// Deliberately carries no price or points field: those are always
/// derived from the catalog, which makes client-side forgery
/// inexpressible at this layer.
#[derive(Debug, Clone)]
pub struct ProductSelection {
    pub plan_id: String,
    pub quantity: i64,
}

impl ProductSelection {
    pub fn new(plan_id: impl Into<String>, quantity: i64) -> Self {
        ProductSelection {
            plan_id: plan_id.into(),
            quantity,
        }
    }
}

/// A validated-on-entry sale submission.
///
/// `sales_rep_id`/`sales_rep_name` must come from the caller's
/// authenticated session, not from an arbitrary request body.
#[derive(Debug, Clone)]
pub struct SaleSubmission {
    pub sales_rep_id: String,
    pub sales_rep_name: String,
    pub manager_id: Option<String>,
    pub customer_address: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    /// Defaults to `new_service` when omitted.
    pub sale_type: Option<SaleType>,
    pub notes: Option<String>,
    pub products: Vec<ProductSelection>,
}

/// A built sale ready for transactional persistence.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub sale: Sale,
    pub products: Vec<SaleProduct>,
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a sale from a submission.
///
/// ## Algorithm
/// 1. Validate address and product-list shape; reject before touching
///    anything else.
/// 2. Dereference every plan id in the catalog; a miss is
///    `CoreError::PlanNotFound`.
/// 3. Compute `line_total = unit_price × quantity` per line;
///    `points` is a literal copy of `Plan.points`.
/// 4. Sum totals server-side.
/// 5. Status is `pending`, or `approved` immediately when
///    `settings.auto_approve` is set.
pub fn build_sale(
    submission: SaleSubmission,
    catalog: &Catalog,
    settings: &SalesSettings,
    now: DateTime<Utc>,
) -> CoreResult<NewSale> {
    if submission.sales_rep_id.trim().is_empty() {
        return Err(crate::error::ValidationError::required("sales_rep_id").into());
    }

    let customer_address = validate_customer_address(&submission.customer_address)?;
    validate_product_count(submission.products.len())?;

    let sale_id = Uuid::new_v4().to_string();

    let products = build_sale_products(&sale_id, &submission.products, catalog, now)?;
    let (total_cents, total_points) = recompute_totals(&products);

    let status = if settings.auto_approve {
        SaleStatus::Approved
    } else {
        SaleStatus::Pending
    };

    let sale = Sale {
        id: sale_id,
        sales_rep_id: submission.sales_rep_id,
        sales_rep_name: submission.sales_rep_name,
        manager_id: submission.manager_id,
        customer_address,
        customer_name: submission.customer_name,
        customer_phone: submission.customer_phone,
        customer_email: submission.customer_email,
        sale_type: submission.sale_type.unwrap_or_default(),
        status,
        total_cents,
        total_points,
        notes: submission.notes,
        approved_by: None,
        approver_name: None,
        approved_at: None,
        rejection_reason: None,
        sale_date: now,
        created_at: now,
        updated_at: now,
    };

    Ok(NewSale { sale, products })
}

/// Builds snapshot line items for a sale from catalog dereferences.
///
/// Shared by submission and the admin product-replacement edit so that
/// every write path freezes the same plan fields and derives points the
/// same way.
pub fn build_sale_products(
    sale_id: &str,
    selections: &[ProductSelection],
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> CoreResult<Vec<SaleProduct>> {
    let mut products = Vec::with_capacity(selections.len());

    for selection in selections {
        validate_quantity(selection.quantity)?;

        let plan = catalog
            .get(&selection.plan_id)
            .ok_or_else(|| CoreError::PlanNotFound(selection.plan_id.clone()))?;

        products.push(SaleProduct {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            plan_id: plan.id.clone(),
            name_snapshot: plan.name.clone(),
            company_snapshot: plan.company.as_str().to_string(),
            unit_price_cents: plan.price_cents,
            quantity: selection.quantity,
            line_total_cents: plan.price().multiply_quantity(selection.quantity).cents(),
            points: plan.points,
            created_at: now,
        });
    }

    Ok(products)
}

/// Recomputes sale totals from a line-item slice.
///
/// Used by the admin full-record edit after replacing products, keeping
/// the `total == Σ lines` invariant on every write path.
pub fn recompute_totals(products: &[SaleProduct]) -> (i64, i64) {
    let total_cents = products.iter().map(|p| p.line_total_cents).sum();
    let total_points = products.iter().map(|p| p.points).sum();
    (total_cents, total_points)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use super::test_support::submission;

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    #[test]
    fn test_totals_derived_from_catalog() {
        let sub = submission(
            "rep-1",
            "Dana Cruz",
            "12 Elm St",
            vec![
                ProductSelection::new("att-1gig", 1),
                ProductSelection::new("frontier-500", 1),
            ],
        );

        let built = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap();

        // att-1gig = 8 points / $80.00, frontier-500 = 4 points / $44.99
        assert_eq!(built.sale.total_points, 12);
        assert_eq!(built.sale.total_cents, 8000 + 4499);
        assert_eq!(built.sale.status, SaleStatus::Pending);
        assert_eq!(built.products.len(), 2);
    }

    #[test]
    fn test_totals_always_equal_line_sums() {
        let sub = submission(
            "rep-1",
            "Dana Cruz",
            "12 Elm St",
            vec![
                ProductSelection::new("att-300", 2),
                ProductSelection::new("vivint-core", 1),
            ],
        );

        let built = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap();

        let line_cents: i64 = built.products.iter().map(|p| p.line_total_cents).sum();
        let line_points: i64 = built.products.iter().map(|p| p.points).sum();
        assert_eq!(built.sale.total_cents, line_cents);
        assert_eq!(built.sale.total_points, line_points);

        for p in &built.products {
            assert_eq!(p.line_total_cents, p.unit_price_cents * p.quantity);
        }
    }

    #[test]
    fn test_empty_address_rejected() {
        let sub = submission("rep-1", "Dana Cruz", "   ", vec![
            ProductSelection::new("att-1gig", 1),
        ]);

        let err = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_empty_products_rejected() {
        let sub = submission("rep-1", "Dana Cruz", "12 Elm St", vec![]);

        let err = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_unknown_plan_rejected() {
        let sub = submission("rep-1", "Dana Cruz", "12 Elm St", vec![
            ProductSelection::new("att-10gig", 1),
        ]);

        let err = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::PlanNotFound(id) if id == "att-10gig"));
    }

    #[test]
    fn test_sale_type_defaults_to_new_service() {
        let sub = submission("rep-1", "Dana Cruz", "12 Elm St", vec![
            ProductSelection::new("att-1gig", 1),
        ]);

        let built = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap();
        assert_eq!(built.sale.sale_type, SaleType::NewService);
    }

    #[test]
    fn test_auto_approve_threads_through() {
        let settings = SalesSettings { auto_approve: true };
        let sub = submission("rep-1", "Dana Cruz", "12 Elm St", vec![
            ProductSelection::new("att-1gig", 1),
        ]);

        let built = build_sale(sub, &catalog(), &settings, Utc::now()).unwrap();
        assert_eq!(built.sale.status, SaleStatus::Approved);
    }

    #[test]
    fn test_points_not_multiplied_by_quantity() {
        // Points are a per-line copy of Plan.points; price multiplies,
        // points do not.
        let sub = submission("rep-1", "Dana Cruz", "12 Elm St", vec![
            ProductSelection::new("att-1gig", 3),
        ]);

        let built = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap();
        assert_eq!(built.sale.total_points, 8);
        assert_eq!(built.sale.total_cents, 8000 * 3);
    }

    #[test]
    fn test_recompute_totals() {
        let sub = submission("rep-1", "Dana Cruz", "12 Elm St", vec![
            ProductSelection::new("att-1gig", 1),
            ProductSelection::new("frontier-500", 2),
        ]);

        let built = build_sale(sub, &catalog(), &SalesSettings::default(), Utc::now()).unwrap();
        let (cents, points) = recompute_totals(&built.products);
        assert_eq!(cents, built.sale.total_cents);
        assert_eq!(points, built.sale.total_points);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{ProductSelection, SaleSubmission};

    /// Shorthand submission constructor shared by the builder tests.
    pub fn submission(
        rep_id: &str,
        rep_name: &str,
        address: &str,
        products: Vec<ProductSelection>,
    ) -> SaleSubmission {
        SaleSubmission {
            sales_rep_id: rep_id.to_string(),
            sales_rep_name: rep_name.to_string(),
            manager_id: None,
            customer_address: address.to_string(),
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            sale_type: None,
            notes: None,
            products,
        }
    }
}
