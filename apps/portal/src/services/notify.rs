//! Notification emission.
//!
//! The workflow's fire-and-forget side channel. A sink failure is logged
//! and swallowed here: it must never fail the submit/decide operation
//! that triggered it, and no notification is ever emitted before the
//! primary record is persisted.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use canvass_core::{Notification, NotificationKind};
use canvass_db::Database;

/// Best-effort notification emitter.
#[derive(Clone)]
pub struct Notifier {
    db: Database,
}

impl Notifier {
    pub fn new(db: Database) -> Self {
        Notifier { db }
    }

    /// Persists one unread notification; never fails.
    pub async fn emit(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
        link: Option<String>,
        metadata: Option<serde_json::Value>,
    ) {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            link,
            metadata: metadata.map(|m| m.to_string()),
            is_read: false,
            created_at: Utc::now(),
        };

        if let Err(e) = self.db.notifications().insert(&notification).await {
            warn!(user_id = %user_id, kind = ?kind, error = %e, "Notification emission failed");
        }
    }
}
