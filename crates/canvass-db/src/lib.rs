//! # canvass-db: Database Layer for the Canvass Portal
//!
//! SQLite persistence via sqlx: connection pooling, embedded migrations,
//! and the repositories for sales, notifications, and users.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  portal handlers / services                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  canvass-db (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │  ┌────────────┐   ┌──────────────────┐   ┌──────────────┐  │   │
//! │  │  │  Database  │   │   Repositories   │   │  Migrations  │  │   │
//! │  │  │ (pool.rs)  │◄──│ sale / notif /   │   │  (embedded)  │  │   │
//! │  │  │ SqlitePool │   │ user             │   │ 001_init.sql │  │   │
//! │  │  └────────────┘   └──────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite file (WAL mode)                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canvass_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("portal.db")).await?;
//! let pending = db.sales().list_by_status(SaleStatus::Pending, 50).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::notification::NotificationRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
