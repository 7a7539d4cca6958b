//! Notification feed endpoints.
//!
//! Callers only ever see their own feed; the user id comes from the
//! session, never from a query parameter.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use canvass_core::Notification;

const DEFAULT_FEED_LIMIT: i64 = 50;
const MAX_FEED_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}

/// GET /api/notifications - the caller's feed, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_FEED_LIMIT)
        .clamp(1, MAX_FEED_LIMIT);

    let repo = state.db.notifications();
    let notifications = repo.list_for_user(&actor.id, limit).await?;
    let unread_count = repo.unread_count(&actor.id).await?;

    Ok(Json(FeedResponse {
        notifications,
        unread_count,
    }))
}

/// POST /api/notifications/read-all - one grouped write for the whole
/// feed; reports the count it touched.
pub async fn read_all_notifications(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
) -> Result<Json<ReadAllResponse>, ApiError> {
    let updated = state.db.notifications().mark_all_read(&actor.id).await?;
    Ok(Json(ReadAllResponse { updated }))
}
