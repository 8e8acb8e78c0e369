//! Authentication API endpoints
//!
//! Registration, login and the current user's profile. Tokens are stateless
//! JWTs; there is no logout endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{User, UserId};
use crate::infrastructure::user::RegisterRequest as RegisterCommand;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus the user it was issued to
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
        }
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterCommand {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    let token = state.token_issuer.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password get the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let token = state.token_issuer.issue(&user)?;
    info!(user_id = %user.id(), "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// GET /api/auth/profile
pub async fn profile(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
