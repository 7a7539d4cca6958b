//! # Sale Handlers
//!
//! The HTTP surface of the sale workflow: list, submit, stats, approve,
//! and the admin full edit. Handlers authenticate, authorize, map DTOs
//! onto core types, and delegate to `SaleService`.
//!
//! The rep identity on a submission always comes from the authenticated
//! session; any rep/points/price fields a client smuggles into the body
//! are ignored by construction (the request DTOs simply have no such
//! fields, and unknown JSON fields are dropped on deserialization).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::permissions::{require, role_can, Permission};
use crate::services::sales::{AdminSaleEdit, SaleListFilter, SaleService, SaleWithProducts};
use crate::state::AppState;
use canvass_core::{
    Approver, Decision, ProductSelection, Sale, SaleStatus, SaleSubmission, SaleType,
    StatsSnapshot, Window,
};

/// Default and ceiling for list page sizes.
const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitProductRequest {
    pub plan_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SubmitSaleRequest {
    pub customer_address: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub manager_id: Option<String>,
    pub sale_type: Option<SaleType>,
    pub notes: Option<String>,
    #[serde(default)]
    pub products: Vec<SubmitProductRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveSaleRequest {
    pub sale_id: String,
    /// `approved` or `rejected`; the only transitions decide() makes.
    pub status: Decision,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSaleRequest {
    pub manager_id: Option<String>,
    pub customer_address: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub sale_type: Option<SaleType>,
    pub status: Option<SaleStatus>,
    pub notes: Option<String>,
    pub products: Option<Vec<SubmitProductRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    pub status: Option<SaleStatus>,
    pub sales_rep_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub sales_rep_id: Option<String>,
    #[serde(default)]
    pub period: Window,
}

fn selections(products: &[SubmitProductRequest]) -> Vec<ProductSelection> {
    products
        .iter()
        .map(|p| ProductSelection::new(p.plan_id.clone(), p.quantity))
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/sales - list sales, scoped to the caller unless they may
/// view everything.
pub async fn list_sales(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Query(query): Query<ListSalesQuery>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    require(actor.role, Permission::ViewSales)?;

    let sales_rep_id = if role_can(actor.role, Permission::ViewAllSales) {
        query.sales_rep_id
    } else {
        Some(actor.id)
    };

    let filter = SaleListFilter {
        status: query.status,
        sales_rep_id,
        limit: query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT),
    };

    let sales = SaleService::from_state(&state).list(filter).await?;
    Ok(Json(sales))
}

/// POST /api/sales - submit a sale for the authenticated rep.
pub async fn submit_sale(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Json(request): Json<SubmitSaleRequest>,
) -> Result<(StatusCode, Json<SaleWithProducts>), ApiError> {
    require(actor.role, Permission::SubmitSales)?;

    let submission = SaleSubmission {
        sales_rep_id: actor.id,
        sales_rep_name: actor.name,
        manager_id: request.manager_id,
        customer_address: request.customer_address,
        customer_name: request.customer_name,
        customer_phone: request.customer_phone,
        customer_email: request.customer_email,
        sale_type: request.sale_type,
        notes: request.notes,
        products: selections(&request.products),
    };

    let sale = SaleService::from_state(&state).submit(submission).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// GET /api/sales/stats - window-scoped dashboard stats.
pub async fn sales_stats(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsSnapshot>, ApiError> {
    require(actor.role, Permission::ViewSales)?;

    let sales_rep_id = if role_can(actor.role, Permission::ViewAllSales) {
        query.sales_rep_id
    } else {
        Some(actor.id)
    };

    let snapshot = SaleService::from_state(&state)
        .stats(sales_rep_id.as_deref(), query.period)
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/sales/approve - approve or reject a pending sale.
pub async fn approve_sale(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Json(request): Json<ApproveSaleRequest>,
) -> Result<Json<SaleWithProducts>, ApiError> {
    require(actor.role, Permission::ApproveSales)?;

    let approver = Approver {
        id: actor.id,
        name: actor.name,
    };

    let sale = SaleService::from_state(&state)
        .decide(
            &request.sale_id,
            request.status,
            approver,
            request.rejection_reason.as_deref(),
        )
        .await?;
    Ok(Json(sale))
}

/// PUT /api/sales/:id - admin full-record edit.
pub async fn update_sale(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Path(sale_id): Path<String>,
    Json(request): Json<UpdateSaleRequest>,
) -> Result<Json<SaleWithProducts>, ApiError> {
    require(actor.role, Permission::AdminEditSales)?;

    let edit = AdminSaleEdit {
        manager_id: request.manager_id,
        customer_address: request.customer_address,
        customer_name: request.customer_name,
        customer_phone: request.customer_phone,
        customer_email: request.customer_email,
        sale_type: request.sale_type,
        status: request.status,
        notes: request.notes,
        products: request.products.as_deref().map(selections),
    };

    let sale = SaleService::from_state(&state)
        .admin_edit(&sale_id, edit)
        .await?;
    Ok(Json(sale))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use canvass_core::submit::build_sale;
    use canvass_core::{Catalog, SalesSettings};
    use chrono::Utc;

    #[test]
    fn test_forged_points_in_body_are_ignored() {
        // Clients may smuggle points/price fields into the payload;
        // deserialization drops them and totals come from the catalog.
        let json = r#"{
            "customer_address": "12 Elm St",
            "total_points": 999,
            "products": [
                {"plan_id": "att-1gig", "quantity": 1, "points": 999, "unit_price_cents": 1},
                {"plan_id": "frontier-500", "quantity": 1, "points": 999}
            ]
        }"#;

        let request: SubmitSaleRequest = serde_json::from_str(json).unwrap();

        let submission = SaleSubmission {
            sales_rep_id: "rep-1".to_string(),
            sales_rep_name: "Dana Cruz".to_string(),
            manager_id: None,
            customer_address: request.customer_address.clone(),
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            sale_type: request.sale_type,
            notes: None,
            products: selections(&request.products),
        };

        let built = build_sale(
            submission,
            &Catalog::builtin(),
            &SalesSettings::default(),
            Utc::now(),
        )
        .unwrap();

        // True catalog sum, not the forged 999s.
        assert_eq!(built.sale.total_points, 12);
        assert_eq!(built.sale.total_cents, 8000 + 4499);
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let json = r#"{
            "customer_address": "12 Elm St",
            "products": [{"plan_id": "att-1gig"}]
        }"#;

        let request: SubmitSaleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.products[0].quantity, 1);
    }

    #[test]
    fn test_approve_request_decodes_decision() {
        let json = r#"{"sale_id": "s-1", "status": "rejected", "rejection_reason": "dup"}"#;
        let request: ApproveSaleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, Decision::Rejected);

        // Only the two decision values parse; terminal states do not.
        let json = r#"{"sale_id": "s-1", "status": "cancelled"}"#;
        assert!(serde_json::from_str::<ApproveSaleRequest>(json).is_err());
    }
}
