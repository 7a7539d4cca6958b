//! Leaderboard endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::permissions::{require, Permission};
use crate::services::sales::SaleService;
use crate::state::AppState;
use canvass_core::{LeaderboardEntry, LeaderboardMetric, Window, DEFAULT_LEADERBOARD_LIMIT};

const MAX_LEADERBOARD_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub period: Window,
    #[serde(default)]
    pub metric: LeaderboardMetric,
    pub limit: Option<usize>,
}

/// GET /api/leaderboard - ranked rep totals over approved sales.
pub async fn leaderboard(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    require(actor.role, Permission::ViewSales)?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let entries = SaleService::from_state(&state)
        .leaderboard(query.period, query.metric, limit)
        .await?;
    Ok(Json(entries))
}
