//! # Domain Types
//!
//! Core domain types used throughout the Canvass portal.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐     │
//! │  │      Sale      │   │  SaleProduct   │   │  Notification  │     │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │     │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │     │
//! │  │  status        │   │  sale_id (FK)  │   │  user_id       │     │
//! │  │  total_cents   │   │  plan snapshot │   │  kind          │     │
//! │  │  total_points  │   │  points        │   │  is_read       │     │
//! │  └────────────────┘   └────────────────┘   └────────────────┘     │
//! │                                                                     │
//! │  SaleStatus: Pending │ Approved │ Rejected │ Cancelled             │
//! │  SaleType:   NewService │ Upgrade │ AddOn │ Renewal               │
//! │  Role:       Admin │ Operations │ SalesManager │ SalesRep         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `SaleProduct` freezes the plan's name, company, price, and points at
//! submission time so later catalog edits never retroactively alter
//! historical sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Sale Status
// =============================================================================

/// Lifecycle state of a sale.
///
/// `Pending` is the initial state. The approval workflow transitions a
/// sale to `Approved` or `Rejected`; `Cancelled` is reachable only
/// through the admin full-record edit, never through approve/reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Awaiting a manager/operations decision.
    Pending,
    /// Counted for points, stats, and the leaderboard.
    Approved,
    /// Declined with a recorded reason.
    Rejected,
    /// Withdrawn via administrative edit.
    Cancelled,
}

impl SaleStatus {
    /// Terminal states cannot be transitioned by the approval workflow.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, SaleStatus::Pending)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Approved => "approved",
            SaleStatus::Rejected => "rejected",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Type
// =============================================================================

/// Business classification of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    NewService,
    Upgrade,
    AddOn,
    Renewal,
}

impl Default for SaleType {
    fn default() -> Self {
        SaleType::NewService
    }
}

// =============================================================================
// Role
// =============================================================================

/// Actor role supplied by the identity provider.
///
/// The role → permission mapping is a static table consumed by the
/// portal's authorization layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Operations,
    SalesManager,
    SalesRep,
}

impl Default for Role {
    fn default() -> Self {
        Role::SalesRep
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A submitted sale.
///
/// Stored flat in the `sales` table; line items live in `sale_products`.
/// `total_cents` and `total_points` are always recomputed server-side
/// from the line items, never accepted verbatim from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,

    /// Creator; immutable after creation.
    pub sales_rep_id: String,

    /// Rep display name at submission time (denormalized for ranking).
    pub sales_rep_name: String,

    /// Approval routing target, when the rep reports to a manager.
    pub manager_id: Option<String>,

    /// Required, non-empty.
    pub customer_address: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,

    pub sale_type: SaleType,
    pub status: SaleStatus,

    /// Sum of line totals, in cents.
    pub total_cents: i64,

    /// Sum of line points.
    pub total_points: i64,

    pub notes: Option<String>,

    /// Populated only on transition out of `pending`.
    pub approved_by: Option<String>,
    pub approver_name: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Populated only for rejected sales.
    pub rejection_reason: Option<String>,

    /// Business date of the sale (window filtering keys off this).
    pub sale_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total value as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Product
// =============================================================================

/// A plan instance attached to one sale (snapshot pattern).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleProduct {
    pub id: String,
    pub sale_id: String,

    /// Catalog plan this line was sold from.
    pub plan_id: String,

    /// Plan name at time of sale (frozen).
    pub name_snapshot: String,

    /// Provider at time of sale (frozen).
    pub company_snapshot: String,

    /// Monthly charge in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    pub quantity: i64,

    /// unit_price_cents × quantity.
    pub line_total_cents: i64,

    /// Copied from Plan.points at submission; never client-supplied.
    pub points: i64,

    pub created_at: DateTime<Utc>,
}

impl SaleProduct {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Notification
// =============================================================================

/// Event kind carried by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SaleSubmitted,
    SalePendingApproval,
    SaleApproved,
    SaleRejected,
}

/// A persisted, initially-unread notification.
///
/// Delivery/retry mechanics are out of scope; the workflow only inserts
/// rows and must never fail its primary operation over a sink error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    /// Free-form JSON payload (e.g. the sale id).
    pub metadata: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// Identity projection of the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
