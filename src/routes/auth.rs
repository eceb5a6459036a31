use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::api::AppState;
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{Credentials, Register, User, UserRole};

/// The caller's own account, including fields hidden from public profiles
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub average_rating: f64,
    pub total_reviews: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            average_rating: user.average_rating,
            total_reviews: user.total_reviews,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountResponse,
}

/// Create a new account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<Register>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;

    let password_hash = hash_password(&input.password)?;
    let mut user = User::new(input.username, input.email, password_hash);
    let id = state.users.insert(&user).await?;
    user.id = Some(id);

    let token = generate_token(
        id,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiry_mins,
    )
    .map_err(|e| AppError::Internal(format!("token generation failed: {}", e)))?;

    tracing::info!(user_id = %id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: AccountResponse::from(&user),
        }),
    ))
}

/// Exchange credentials for an access token
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    // One error for both unknown email and bad password, so the endpoint
    // does not leak which emails are registered.
    let invalid = || AppError::Unauthenticated("invalid email or password".to_string());

    let user = state
        .users
        .find_by_email(&input.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(invalid());
    }

    let id = user
        .id
        .ok_or_else(|| AppError::Internal("stored user has no id".to_string()))?;
    let token = generate_token(
        id,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiry_mins,
    )
    .map_err(|e| AppError::Internal(format!("token generation failed: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: AccountResponse::from(&user),
    }))
}

/// The authenticated caller's account
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<AccountResponse>> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("account no longer exists".to_string()))?;

    Ok(Json(AccountResponse::from(&user)))
}
