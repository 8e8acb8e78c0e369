//! User authentication extractor using JWT bearer tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

/// Extractor that requires a valid JWT token
///
/// Extracts the JWT token from:
/// - Authorization header: `Bearer <jwt_token>`
///
/// The token must resolve to a user that still exists.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let user_id = state.identity_resolver.resolve(&token).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized("Not authorized, token failed")
        })?;

        let user = state
            .user_service
            .get(&user_id)
            .await?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "Token for unknown user");
                ApiError::unauthorized("Not authorized, user not found")
            })?;

        Ok(RequireUser(user))
    }
}

/// Extract JWT token from Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();

            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    Err(ApiError::unauthorized("Not authorized, no token"))
}
