//! Catalog endpoints.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;
use canvass_core::{Company, Plan};

#[derive(Debug, Deserialize)]
pub struct PlansQuery {
    pub company: Option<Company>,
}

/// GET /api/plans - lists the sellable plans, optionally by provider.
pub async fn list_plans(
    State(state): State<AppState>,
    _actor: AuthenticatedUser,
    Query(query): Query<PlansQuery>,
) -> Result<Json<Vec<Plan>>, ApiError> {
    let plans = state
        .catalog
        .list(query.company)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(plans))
}
