use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::auth;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::state::AppState;
use super::tasks;
use super::teams;
use super::types::ApiError;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", create_api_router())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::create_auth_router())
        .nest("/teams", teams::create_teams_router())
        .nest("/tasks", tasks::create_tasks_router())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
