//! Route configuration for the portal API.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the application router.
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        // ========================================
        // CATALOG
        // ========================================
        .route("/api/plans", get(handlers::plans::list_plans))
        // ========================================
        // SALES WORKFLOW
        // ========================================
        .route(
            "/api/sales",
            get(handlers::sales::list_sales).post(handlers::sales::submit_sale),
        )
        .route("/api/sales/stats", get(handlers::sales::sales_stats))
        .route("/api/sales/approve", post(handlers::sales::approve_sale))
        .route("/api/sales/:id", put(handlers::sales::update_sale))
        // ========================================
        // LEADERBOARD
        // ========================================
        .route("/api/leaderboard", get(handlers::leaderboard::leaderboard))
        // ========================================
        // NOTIFICATIONS
        // ========================================
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::read_all_notifications),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
