//! Sale orchestration service.
//!
//! Glue between the pure core and the repositories:
//!
//! ```text
//! submit:  validate/build (core) → persist (db, transactional)
//!          → notify (fire-and-forget)
//! decide:  validate reason (core) → CAS update (db) → notify rep
//! stats:   fetch broad (db, single-field filter) → project (core)
//! ranking: fetch broad (db) → rank (core)
//! ```
//!
//! Nothing here reads the clock except at the operation boundary; the
//! core functions take the timestamp as an argument.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::services::notify::Notifier;
use crate::state::AppState;
use canvass_core::submit::{build_sale, build_sale_products, recompute_totals};
use canvass_core::validation::validate_customer_address;
use canvass_core::{
    Approver, Catalog, Decision, LeaderboardEntry, LeaderboardMetric, NotificationKind,
    ProductSelection, Sale, SaleProduct, SaleStatus, SaleSubmission, SaleType, SalesSettings,
    StatsSnapshot, Window,
};
use canvass_db::Database;

// =============================================================================
// Service Types
// =============================================================================

/// A sale together with its line items (detail responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithProducts {
    #[serde(flatten)]
    pub sale: Sale,
    pub products: Vec<SaleProduct>,
}

/// List filter; at most one field is pushed to the store, the rest
/// narrows in memory.
#[derive(Debug, Clone, Default)]
pub struct SaleListFilter {
    pub status: Option<SaleStatus>,
    pub sales_rep_id: Option<String>,
    pub limit: i64,
}

/// Admin full-record edit; `None` fields are left untouched, `products`
/// replacement triggers a totals recompute.
#[derive(Debug, Clone, Default)]
pub struct AdminSaleEdit {
    pub manager_id: Option<String>,
    pub customer_address: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub sale_type: Option<SaleType>,
    pub status: Option<SaleStatus>,
    pub notes: Option<String>,
    pub products: Option<Vec<ProductSelection>>,
}

// =============================================================================
// Sale Service
// =============================================================================

/// Orchestrates the sale workflow over core + db.
#[derive(Clone)]
pub struct SaleService {
    db: Database,
    catalog: Arc<Catalog>,
    settings: SalesSettings,
    notifier: Notifier,
}

impl SaleService {
    pub fn new(db: Database, catalog: Arc<Catalog>, settings: SalesSettings) -> Self {
        let notifier = Notifier::new(db.clone());
        SaleService {
            db,
            catalog,
            settings,
            notifier,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        SaleService::new(state.db.clone(), state.catalog.clone(), state.settings)
    }

    /// Submits a sale: build, persist, then notify.
    ///
    /// Notifications fire only after the transaction commits; a
    /// persistence failure surfaces with no partial state.
    pub async fn submit(&self, submission: SaleSubmission) -> Result<SaleWithProducts, ApiError> {
        // A routing target must be a real user; distinct from a bad
        // input shape, so it surfaces as not-found rather than 400.
        if let Some(manager_id) = &submission.manager_id {
            self.db.users().require(manager_id).await?;
        }

        let built = build_sale(submission, &self.catalog, &self.settings, Utc::now())?;

        self.db
            .sales()
            .insert_sale(&built.sale, &built.products)
            .await?;

        info!(
            sale_id = %built.sale.id,
            rep = %built.sale.sales_rep_id,
            points = built.sale.total_points,
            total = %built.sale.total(),
            "Sale submitted"
        );

        let metadata = serde_json::json!({ "sale_id": built.sale.id });

        self.notifier
            .emit(
                &built.sale.sales_rep_id,
                NotificationKind::SaleSubmitted,
                "Sale submitted",
                &format!(
                    "Your sale at {} was submitted ({} points)",
                    built.sale.customer_address, built.sale.total_points
                ),
                Some("/sales".to_string()),
                Some(metadata.clone()),
            )
            .await;

        if built.sale.status == SaleStatus::Pending {
            if let Some(manager_id) = &built.sale.manager_id {
                self.notifier
                    .emit(
                        manager_id,
                        NotificationKind::SalePendingApproval,
                        "Sale pending approval",
                        &format!(
                            "{} submitted a sale awaiting your approval",
                            built.sale.sales_rep_name
                        ),
                        Some("/sales/approvals".to_string()),
                        Some(metadata),
                    )
                    .await;
            }
        }

        Ok(SaleWithProducts {
            sale: built.sale,
            products: built.products,
        })
    }

    /// Applies an approval decision.
    ///
    /// The rejection-reason requirement is checked before touching the
    /// store; the store-side compare-and-set resolves races (first
    /// decision wins, the loser gets a conflict).
    pub async fn decide(
        &self,
        sale_id: &str,
        decision: Decision,
        approver: Approver,
        rejection_reason: Option<&str>,
    ) -> Result<SaleWithProducts, ApiError> {
        let reason = match decision {
            Decision::Rejected => Some(
                canvass_core::validation::validate_rejection_reason(rejection_reason)
                    .map_err(canvass_core::CoreError::from)?,
            ),
            Decision::Approved => None,
        };

        let now = Utc::now();
        self.db
            .sales()
            .decide(
                sale_id,
                decision.status(),
                &approver.id,
                &approver.name,
                reason.as_deref(),
                now,
            )
            .await?;

        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Sale", sale_id))?;
        let products = self.db.sales().get_products(sale_id).await?;

        info!(
            sale_id = %sale_id,
            status = %sale.status,
            approver = %approver.id,
            "Sale decision applied"
        );

        let (kind, title, message) = match decision {
            Decision::Approved => (
                NotificationKind::SaleApproved,
                "Sale approved",
                format!(
                    "Your sale at {} was approved by {}",
                    sale.customer_address, approver.name
                ),
            ),
            Decision::Rejected => (
                NotificationKind::SaleRejected,
                "Sale rejected",
                format!(
                    "Your sale at {} was rejected: {}",
                    sale.customer_address,
                    reason.as_deref().unwrap_or("no reason recorded")
                ),
            ),
        };
        self.notifier
            .emit(
                &sale.sales_rep_id,
                kind,
                title,
                &message,
                Some("/sales".to_string()),
                Some(serde_json::json!({ "sale_id": sale.id })),
            )
            .await;

        Ok(SaleWithProducts { sale, products })
    }

    /// Lists sales: one field pushed to the store, the rest in memory.
    pub async fn list(&self, filter: SaleListFilter) -> Result<Vec<Sale>, ApiError> {
        let limit = filter.limit.max(1);

        let mut sales = match (&filter.sales_rep_id, filter.status) {
            (Some(rep), _) => self.db.sales().list_by_rep(rep, limit).await?,
            (None, Some(status)) => self.db.sales().list_by_status(status, limit).await?,
            (None, None) => self.db.sales().list_recent(limit).await?,
        };

        if filter.sales_rep_id.is_some() {
            if let Some(status) = filter.status {
                sales.retain(|s| s.status == status);
            }
        }

        Ok(sales)
    }

    /// Stats snapshot for a window, optionally scoped to one rep.
    pub async fn stats(
        &self,
        sales_rep_id: Option<&str>,
        window: Window,
    ) -> Result<StatsSnapshot, ApiError> {
        let sales = match sales_rep_id {
            Some(rep) => self.db.sales().all_for_rep(rep).await?,
            None => self.db.sales().all().await?,
        };

        Ok(canvass_core::stats::compute_stats(&sales, window, Utc::now()))
    }

    /// Ranked rep totals over approved sales in the window.
    pub async fn leaderboard(
        &self,
        window: Window,
        metric: LeaderboardMetric,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let sales = self.db.sales().all().await?;
        let window_start = window.start(Utc::now());

        Ok(canvass_core::leaderboard::rank(
            &sales,
            window_start,
            metric,
            limit,
        ))
    }

    /// Admin full-record edit (bypasses the pending guard).
    pub async fn admin_edit(
        &self,
        sale_id: &str,
        edit: AdminSaleEdit,
    ) -> Result<SaleWithProducts, ApiError> {
        let mut sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Sale", sale_id))?;

        let now = Utc::now();

        if let Some(address) = &edit.customer_address {
            sale.customer_address =
                validate_customer_address(address).map_err(canvass_core::CoreError::from)?;
        }
        if let Some(manager_id) = edit.manager_id {
            sale.manager_id = Some(manager_id);
        }
        if let Some(name) = edit.customer_name {
            sale.customer_name = Some(name);
        }
        if let Some(phone) = edit.customer_phone {
            sale.customer_phone = Some(phone);
        }
        if let Some(email) = edit.customer_email {
            sale.customer_email = Some(email);
        }
        if let Some(sale_type) = edit.sale_type {
            sale.sale_type = sale_type;
        }
        if let Some(status) = edit.status {
            sale.status = status;
        }
        if let Some(notes) = edit.notes {
            sale.notes = Some(notes);
        }
        sale.updated_at = now;

        let replacement = match &edit.products {
            Some(selections) => {
                let lines = build_sale_products(&sale.id, selections, &self.catalog, now)?;
                let (total_cents, total_points) = recompute_totals(&lines);
                sale.total_cents = total_cents;
                sale.total_points = total_points;
                Some(lines)
            }
            None => None,
        };

        self.db
            .sales()
            .admin_update(&sale, replacement.as_deref())
            .await?;

        info!(sale_id = %sale.id, status = %sale.status, "Admin sale edit applied");

        let products = self.db.sales().get_products(&sale.id).await?;
        Ok(SaleWithProducts { sale, products })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use canvass_db::DbConfig;

    async fn service_with(settings: SalesSettings) -> SaleService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // The manager every test submission routes approvals to.
        let now = Utc::now();
        db.users()
            .insert(&canvass_core::User {
                id: "mgr-1".to_string(),
                name: "Morgan Hale".to_string(),
                email: "mgr-1@canvass.example".to_string(),
                role: canvass_core::Role::SalesManager,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        SaleService::new(db, Arc::new(Catalog::builtin()), settings)
    }

    async fn service() -> SaleService {
        service_with(SalesSettings::default()).await
    }

    fn submission(rep_id: &str, rep_name: &str, address: &str) -> SaleSubmission {
        SaleSubmission {
            sales_rep_id: rep_id.to_string(),
            sales_rep_name: rep_name.to_string(),
            manager_id: Some("mgr-1".to_string()),
            customer_address: address.to_string(),
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            sale_type: None,
            notes: None,
            products: vec![
                ProductSelection::new("att-1gig", 1),
                ProductSelection::new("frontier-500", 1),
            ],
        }
    }

    fn approver() -> Approver {
        Approver {
            id: "U1".to_string(),
            name: "Morgan Hale".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_approve_leaderboard_end_to_end() {
        let service = service().await;

        // Submit: two products, att-1gig (8) + frontier-500 (4).
        let submitted = service
            .submit(submission("rep-1", "Dana Cruz", "12 Elm St"))
            .await
            .unwrap();
        assert_eq!(submitted.sale.total_points, 12);
        assert_eq!(submitted.sale.status, SaleStatus::Pending);

        // Approve as U1.
        let decided = service
            .decide(&submitted.sale.id, Decision::Approved, approver(), None)
            .await
            .unwrap();
        assert_eq!(decided.sale.status, SaleStatus::Approved);
        assert_eq!(decided.sale.approved_by.as_deref(), Some("U1"));

        // Monthly leaderboard carries the rep with at least those points.
        let entries = service
            .leaderboard(Window::Month, LeaderboardMetric::TotalPoints, 10)
            .await
            .unwrap();
        let entry = entries
            .iter()
            .find(|e| e.sales_rep_id == "rep-1")
            .expect("rep should rank");
        assert!(entry.total_points >= 12);
        assert!(entry.total_sales >= 1);
        assert_eq!(entry.rank, 1);
    }

    #[tokio::test]
    async fn test_submit_empty_address_persists_nothing() {
        let service = service().await;

        let err = service
            .submit(submission("rep-1", "Dana Cruz", ""))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);

        // No sale record, no notification.
        assert!(service.db.sales().all().await.unwrap().is_empty());
        assert_eq!(
            service.db.notifications().unread_count("rep-1").await.unwrap(),
            0
        );
        assert_eq!(
            service.db.notifications().unread_count("mgr-1").await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_submit_notifies_rep_and_manager() {
        let service = service().await;

        service
            .submit(submission("rep-1", "Dana Cruz", "12 Elm St"))
            .await
            .unwrap();

        let rep_feed = service
            .db
            .notifications()
            .list_for_user("rep-1", 10)
            .await
            .unwrap();
        assert_eq!(rep_feed.len(), 1);
        assert_eq!(rep_feed[0].kind, NotificationKind::SaleSubmitted);

        let mgr_feed = service
            .db
            .notifications()
            .list_for_user("mgr-1", 10)
            .await
            .unwrap();
        assert_eq!(mgr_feed.len(), 1);
        assert_eq!(mgr_feed[0].kind, NotificationKind::SalePendingApproval);
    }

    #[tokio::test]
    async fn test_auto_approve_skips_manager_notification() {
        let service = service_with(SalesSettings { auto_approve: true }).await;

        let submitted = service
            .submit(submission("rep-1", "Dana Cruz", "12 Elm St"))
            .await
            .unwrap();
        assert_eq!(submitted.sale.status, SaleStatus::Approved);

        // Nothing pends, so the manager gets no approval request.
        assert_eq!(
            service.db.notifications().unread_count("mgr-1").await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_decide_without_reason_is_validation_error() {
        let service = service().await;
        let submitted = service
            .submit(submission("rep-1", "Dana Cruz", "12 Elm St"))
            .await
            .unwrap();

        let err = service
            .decide(&submitted.sale.id, Decision::Rejected, approver(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);

        // Sale untouched.
        let sale = service
            .db
            .sales()
            .get_by_id(&submitted.sale.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sale.status, SaleStatus::Pending);
    }

    #[tokio::test]
    async fn test_decide_with_reason_stores_it_and_notifies() {
        let service = service().await;
        let submitted = service
            .submit(submission("rep-1", "Dana Cruz", "12 Elm St"))
            .await
            .unwrap();

        let decided = service
            .decide(
                &submitted.sale.id,
                Decision::Rejected,
                approver(),
                Some("customer cancelled"),
            )
            .await
            .unwrap();
        assert_eq!(decided.sale.status, SaleStatus::Rejected);
        assert_eq!(
            decided.sale.rejection_reason.as_deref(),
            Some("customer cancelled")
        );

        let feed = service
            .db
            .notifications()
            .list_for_user("rep-1", 10)
            .await
            .unwrap();
        assert!(feed
            .iter()
            .any(|n| n.kind == NotificationKind::SaleRejected));
    }

    #[tokio::test]
    async fn test_decide_twice_is_conflict() {
        let service = service().await;
        let submitted = service
            .submit(submission("rep-1", "Dana Cruz", "12 Elm St"))
            .await
            .unwrap();

        service
            .decide(&submitted.sale.id, Decision::Approved, approver(), None)
            .await
            .unwrap();

        let err = service
            .decide(&submitted.sale.id, Decision::Approved, approver(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_submit_unknown_manager_is_not_found() {
        let service = service().await;

        let mut sub = submission("rep-1", "Dana Cruz", "12 Elm St");
        sub.manager_id = Some("ghost".to_string());

        let err = service.submit(sub).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(service.db.sales().all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decide_unknown_sale_is_not_found() {
        let service = service().await;

        let err = service
            .decide("missing", Decision::Approved, approver(), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_list_scopes_and_filters() {
        let service = service().await;

        let a = service
            .submit(submission("rep-a", "Avery", "1 First St"))
            .await
            .unwrap();
        service
            .submit(submission("rep-b", "Blake", "2 Second St"))
            .await
            .unwrap();
        service
            .decide(&a.sale.id, Decision::Approved, approver(), None)
            .await
            .unwrap();

        let mine = service
            .list(SaleListFilter {
                sales_rep_id: Some("rep-a".to_string()),
                status: None,
                limit: 50,
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);

        let mine_pending = service
            .list(SaleListFilter {
                sales_rep_id: Some("rep-a".to_string()),
                status: Some(SaleStatus::Pending),
                limit: 50,
            })
            .await
            .unwrap();
        assert!(mine_pending.is_empty());

        let pending = service
            .list(SaleListFilter {
                sales_rep_id: None,
                status: Some(SaleStatus::Pending),
                limit: 50,
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].sales_rep_id, "rep-b");
    }

    #[tokio::test]
    async fn test_stats_scoped_by_rep() {
        let service = service().await;

        let a = service
            .submit(submission("rep-a", "Avery", "1 First St"))
            .await
            .unwrap();
        service
            .submit(submission("rep-b", "Blake", "2 Second St"))
            .await
            .unwrap();
        service
            .decide(&a.sale.id, Decision::Approved, approver(), None)
            .await
            .unwrap();

        let mine = service.stats(Some("rep-a"), Window::Month).await.unwrap();
        assert_eq!(mine.total_sales, 1);
        assert_eq!(mine.approved_count, 1);
        assert_eq!(mine.approved_points, 12);

        let org = service.stats(None, Window::Month).await.unwrap();
        assert_eq!(org.total_sales, 2);
        assert_eq!(org.pending_count, 1);
    }

    #[tokio::test]
    async fn test_admin_edit_recomputes_totals() {
        let service = service().await;
        let submitted = service
            .submit(submission("rep-1", "Dana Cruz", "12 Elm St"))
            .await
            .unwrap();

        let edited = service
            .admin_edit(
                &submitted.sale.id,
                AdminSaleEdit {
                    status: Some(SaleStatus::Cancelled),
                    products: Some(vec![ProductSelection::new("vivint-core", 1)]),
                    ..AdminSaleEdit::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.sale.status, SaleStatus::Cancelled);
        assert_eq!(edited.sale.total_points, 6);
        assert_eq!(edited.products.len(), 1);
        assert_eq!(edited.products[0].plan_id, "vivint-core");
    }

    #[tokio::test]
    async fn test_admin_edit_unknown_sale_is_not_found() {
        let service = service().await;

        let err = service
            .admin_edit("missing", AdminSaleEdit::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
