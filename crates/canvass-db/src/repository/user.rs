//! # User Repository
//!
//! Read-side projection of the identity provider: enough to resolve
//! display names and roles for authorization and approval metadata.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use canvass_core::User;

const USER_COLUMNS: &str = "id, name, email, role, is_active, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user (seeding / identity sync).
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, role = ?user.role, "Inserting user");

        sqlx::query(
            "INSERT INTO users (id, name, email, role, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID, erroring when absent.
    pub async fn require(&self, id: &str) -> DbResult<User> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Lists active users.
    pub async fn list_active(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_active = 1 ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
