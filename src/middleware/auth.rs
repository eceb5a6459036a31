use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mongodb::bson::oid::ObjectId;

use crate::api::AppState;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::models::UserRole;

/// The acting identity, resolved from the `Authorization: Bearer` header.
///
/// Add this as an extractor parameter to any handler that requires
/// authentication; extraction fails with `Unauthenticated` when the token
/// is missing, malformed, or expired.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("missing Authorization header".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthenticated("expected 'Bearer <token>' Authorization".to_string())
        })?;

        let claims = validate_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthenticated("invalid or expired token".to_string()))?;

        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthenticated("malformed subject claim".to_string()))?;

        Ok(AuthUser {
            user_id,
            role: claims.role,
        })
    }
}
