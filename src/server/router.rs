use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::handlers::{
    analytics_handler, analytics_repo_handler, analyze_issue_handler, health_handler,
    home_handler, not_found_handler, quick_stats_handler, webhook_handler,
};
use crate::server::AppState;

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .route("/analytics", get(analytics_handler))
        .route("/analytics/{*repo}", get(analytics_repo_handler))
        .route("/analyze-issue", post(analyze_issue_handler))
        .route("/stats", get(quick_stats_handler))
        .fallback(not_found_handler)
        .with_state(state)
}
