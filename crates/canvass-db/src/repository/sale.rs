//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Sale Lifecycle
//! ```text
//! 1. INSERT (transactional)
//!    └── insert_sale() → sale row + sale_products rows, one transaction
//!
//! 2. DECIDE (guarded)
//!    └── decide() → UPDATE ... WHERE status = 'pending'
//!        zero rows affected resolves to NotFound or Conflict, so a
//!        racing second decision can never overwrite the first
//!
//! 3. (ADMIN ONLY) FULL EDIT
//!    └── admin_update() → overwrite fields, optionally replace lines
//! ```
//!
//! Filtered reads are single-field only; stats and leaderboard callers
//! fetch broad and narrow by date in application code.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use canvass_core::{Sale, SaleProduct, SaleStatus};

/// Column list shared by every sale SELECT; matches `Sale`'s FromRow.
const SALE_COLUMNS: &str = "id, sales_rep_id, sales_rep_name, manager_id, \
     customer_address, customer_name, customer_phone, customer_email, \
     sale_type, status, total_cents, total_points, notes, \
     approved_by, approver_name, approved_at, rejection_reason, \
     sale_date, created_at, updated_at";

const PRODUCT_COLUMNS: &str = "id, sale_id, plan_id, name_snapshot, company_snapshot, \
     unit_price_cents, quantity, line_total_cents, points, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale and its line items in one transaction.
    ///
    /// On failure nothing is persisted: the caller must not emit
    /// notifications unless this returns Ok.
    pub async fn insert_sale(&self, sale: &Sale, products: &[SaleProduct]) -> DbResult<()> {
        debug!(id = %sale.id, rep = %sale.sales_rep_id, lines = products.len(), "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO sales (
                id, sales_rep_id, sales_rep_name, manager_id,
                customer_address, customer_name, customer_phone, customer_email,
                sale_type, status, total_cents, total_points, notes,
                approved_by, approver_name, approved_at, rejection_reason,
                sale_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sale.id)
        .bind(&sale.sales_rep_id)
        .bind(&sale.sales_rep_name)
        .bind(&sale.manager_id)
        .bind(&sale.customer_address)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.customer_email)
        .bind(sale.sale_type)
        .bind(sale.status)
        .bind(sale.total_cents)
        .bind(sale.total_points)
        .bind(&sale.notes)
        .bind(&sale.approved_by)
        .bind(&sale.approver_name)
        .bind(sale.approved_at)
        .bind(&sale.rejection_reason)
        .bind(sale.sale_date)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        for product in products {
            sqlx::query(
                "INSERT INTO sale_products (
                    id, sale_id, plan_id, name_snapshot, company_snapshot,
                    unit_price_cents, quantity, line_total_cents, points, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&product.id)
            .bind(&product.sale_id)
            .bind(&product.plan_id)
            .bind(&product.name_snapshot)
            .bind(&product.company_snapshot)
            .bind(product.unit_price_cents)
            .bind(product.quantity)
            .bind(product.line_total_cents)
            .bind(product.points)
            .bind(product.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale, in insertion order.
    pub async fn get_products(&self, sale_id: &str) -> DbResult<Vec<SaleProduct>> {
        let products = sqlx::query_as::<_, SaleProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM sale_products WHERE sale_id = ? ORDER BY created_at, id"
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the most recent sales for one rep, newest first.
    pub async fn list_by_rep(&self, sales_rep_id: &str, limit: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE sales_rep_id = ? \
             ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(sales_rep_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the most recent sales with one status, newest first.
    pub async fn list_by_status(&self, status: SaleStatus, limit: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE status = ? \
             ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Fetches every sale for one rep, no date filter.
    ///
    /// Stats callers narrow by `sale_date` in memory; the store is only
    /// ever asked for single-field equality scans.
    pub async fn all_for_rep(&self, sales_rep_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE sales_rep_id = ?"
        ))
        .bind(sales_rep_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Fetches every sale. Leaderboard/org-wide stats input.
    pub async fn all(&self) -> DbResult<Vec<Sale>> {
        let sales =
            sqlx::query_as::<_, Sale>(&format!("SELECT {SALE_COLUMNS} FROM sales"))
                .fetch_all(&self.pool)
                .await?;

        Ok(sales)
    }

    /// Applies an approval decision as a compare-and-set.
    ///
    /// The UPDATE only matches while the sale is still `pending`. When
    /// zero rows are affected the sale either does not exist (NotFound)
    /// or has already left pending (Conflict) - never a silent
    /// last-writer-wins.
    pub async fn decide(
        &self,
        sale_id: &str,
        status: SaleStatus,
        approver_id: &str,
        approver_name: &str,
        rejection_reason: Option<&str>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> DbResult<()> {
        debug!(id = %sale_id, status = %status, approver = %approver_id, "Applying decision");

        let result = sqlx::query(
            "UPDATE sales SET
                status = ?,
                approved_by = ?,
                approver_name = ?,
                approved_at = ?,
                rejection_reason = ?,
                updated_at = ?
             WHERE id = ? AND status = 'pending'",
        )
        .bind(status)
        .bind(approver_id)
        .bind(approver_name)
        .bind(now)
        .bind(rejection_reason)
        .bind(now)
        .bind(sale_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(sale_id).await? {
                Some(existing) => Err(DbError::conflict(sale_id, existing.status.as_str())),
                None => Err(DbError::not_found("Sale", sale_id)),
            };
        }

        Ok(())
    }

    /// Admin full-record overwrite, bypassing the pending guard.
    ///
    /// When `products` is Some the line items are replaced wholesale in
    /// the same transaction; the caller must have already recomputed the
    /// totals on `sale` from the new lines.
    pub async fn admin_update(
        &self,
        sale: &Sale,
        products: Option<&[SaleProduct]>,
    ) -> DbResult<()> {
        debug!(id = %sale.id, status = %sale.status, "Admin sale update");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE sales SET
                manager_id = ?,
                customer_address = ?,
                customer_name = ?,
                customer_phone = ?,
                customer_email = ?,
                sale_type = ?,
                status = ?,
                total_cents = ?,
                total_points = ?,
                notes = ?,
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&sale.manager_id)
        .bind(&sale.customer_address)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(&sale.customer_email)
        .bind(sale.sale_type)
        .bind(sale.status)
        .bind(sale.total_cents)
        .bind(sale.total_points)
        .bind(&sale.notes)
        .bind(sale.updated_at)
        .bind(&sale.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", &sale.id));
        }

        if let Some(products) = products {
            sqlx::query("DELETE FROM sale_products WHERE sale_id = ?")
                .bind(&sale.id)
                .execute(&mut *tx)
                .await?;

            for product in products {
                sqlx::query(
                    "INSERT INTO sale_products (
                        id, sale_id, plan_id, name_snapshot, company_snapshot,
                        unit_price_cents, quantity, line_total_cents, points, created_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(&product.id)
                .bind(&product.sale_id)
                .bind(&product.plan_id)
                .bind(&product.name_snapshot)
                .bind(&product.company_snapshot)
                .bind(product.unit_price_cents)
                .bind(product.quantity)
                .bind(product.line_total_cents)
                .bind(product.points)
                .bind(product.created_at)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
