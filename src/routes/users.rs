use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::models::User;

use super::{parse_object_id, PageQuery, Paginated};
use crate::routes::reviews::ReviewResponse;

/// Public view of an account: no email, no role
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub average_rating: f64,
    pub total_reviews: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username.clone(),
            average_rating: user.average_rating,
            total_reviews: user.total_reviews,
            created_at: user.created_at,
        }
    }
}

/// Public profile with cached review aggregates
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PublicUser>> {
    let id = parse_object_id(&id)?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;

    Ok(Json(PublicUser::from(&user)))
}

/// Reviews authored by a user, newest first
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let id = parse_object_id(&id)?;
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;

    let page = query.to_page();
    let (reviews, total) = state.reviews.list_for_user(id, page).await?;
    let data = reviews.iter().map(ReviewResponse::from).collect();
    Ok(Json(Paginated::new(data, page, total)))
}
