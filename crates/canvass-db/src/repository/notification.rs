//! # Notification Repository
//!
//! Persistence for the notification sink.
//!
//! Rows are inserted unread. The workflow treats every call here as
//! fire-and-forget: failures are logged and swallowed by the caller and
//! must never fail the sale operation that triggered them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use canvass_core::Notification;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, message, link, metadata, is_read, created_at";

/// Repository for notification database operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NotificationRepository { pool }
    }

    /// Inserts a notification (unread).
    pub async fn insert(&self, notification: &Notification) -> DbResult<()> {
        debug!(
            user_id = %notification.user_id,
            kind = ?notification.kind,
            "Inserting notification"
        );

        sqlx::query(
            "INSERT INTO notifications (
                id, user_id, kind, title, message, link, metadata, is_read, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(notification.kind)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.link)
        .bind(&notification.metadata)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists a user's notifications, newest first.
    pub async fn list_for_user(&self, user_id: &str, limit: i64) -> DbResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE user_id = ? ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Counts a user's unread notifications.
    pub async fn unread_count(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Marks one notification read.
    pub async fn mark_read(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Notification", id));
        }

        Ok(())
    }

    /// Marks all of a user's notifications read as one grouped write.
    ///
    /// Whole-batch semantics: the single UPDATE either applies to every
    /// matching row or errors as a unit - no silent partial batch.
    pub async fn mark_all_read(&self, user_id: &str) -> DbResult<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use canvass_core::NotificationKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn notification(user_id: &str, kind: NotificationKind) -> Notification {
        Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            title: "Sale submitted".to_string(),
            message: "Your sale was submitted for approval".to_string(),
            link: Some("/sales".to_string()),
            metadata: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.notifications();

        repo.insert(&notification("rep-1", NotificationKind::SaleSubmitted))
            .await
            .unwrap();
        repo.insert(&notification("rep-1", NotificationKind::SaleApproved))
            .await
            .unwrap();
        repo.insert(&notification("rep-2", NotificationKind::SaleSubmitted))
            .await
            .unwrap();

        let listed = repo.list_for_user("rep-1", 50).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|n| !n.is_read));

        assert_eq!(repo.unread_count("rep-1").await.unwrap(), 2);
        assert_eq!(repo.unread_count("rep-2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.notifications();

        let n = notification("rep-1", NotificationKind::SaleRejected);
        repo.insert(&n).await.unwrap();

        repo.mark_read(&n.id).await.unwrap();
        assert_eq!(repo.unread_count("rep-1").await.unwrap(), 0);

        let err = repo.mark_read("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mark_all_read_is_grouped() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.notifications();

        for _ in 0..3 {
            repo.insert(&notification("rep-1", NotificationKind::SalePendingApproval))
                .await
                .unwrap();
        }
        repo.insert(&notification("rep-2", NotificationKind::SaleSubmitted))
            .await
            .unwrap();

        let affected = repo.mark_all_read("rep-1").await.unwrap();
        assert_eq!(affected, 3);
        assert_eq!(repo.unread_count("rep-1").await.unwrap(), 0);
        // Other users untouched.
        assert_eq!(repo.unread_count("rep-2").await.unwrap(), 1);

        // Idempotent: nothing left to mark.
        assert_eq!(repo.mark_all_read("rep-1").await.unwrap(), 0);
    }
}
