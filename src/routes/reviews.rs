use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::{CreateReview, ReactionKind, Review, UpdateReview};

use super::{parse_object_id, PageQuery, Paginated};

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub movie_id: String,
    pub rating: u8,
    pub body: String,
    pub spoiler: bool,
    pub total_likes: usize,
    /// Derived from the dislikes set, not the likes set.
    pub total_dislikes: usize,
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: review.user_id.to_hex(),
            movie_id: review.movie_id.to_hex(),
            rating: review.rating,
            body: review.body.clone(),
            spoiler: review.spoiler,
            total_likes: review.likes.len(),
            total_dislikes: review.dislikes.len(),
            likes: review.likes.iter().map(|id| id.to_hex()).collect(),
            dislikes: review.dislikes.iter().map(|id| id.to_hex()).collect(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub kind: ReactionKind,
}

/// Reviews for a movie, newest first
pub async fn list_for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<ReviewResponse>>> {
    let movie_id = parse_object_id(&movie_id)?;
    let page = query.to_page();

    let (reviews, total) = state.reviews.list_for_movie(movie_id, page).await?;
    let data = reviews.iter().map(ReviewResponse::from).collect();
    Ok(Json(Paginated::new(data, page, total)))
}

/// Post a review for a movie
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Json(input): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    input.validate()?;
    let movie_id = parse_object_id(&movie_id)?;

    let review = state.reviews.create(auth.user_id, movie_id, input).await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

/// Edit your own review
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Json(input): Json<UpdateReview>,
) -> AppResult<Json<ReviewResponse>> {
    input.validate()?;
    let review_id = parse_object_id(&review_id)?;

    let review = state.reviews.update(auth.user_id, review_id, input).await?;
    Ok(Json(ReviewResponse::from(&review)))
}

/// Delete your own review (admins may delete any)
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<StatusCode> {
    let review_id = parse_object_id(&review_id)?;

    state
        .reviews
        .delete(auth.user_id, auth.is_admin(), review_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle a like or dislike on someone else's review
pub async fn react(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Json(input): Json<ReactionRequest>,
) -> AppResult<Json<ReviewResponse>> {
    let review_id = parse_object_id(&review_id)?;

    let review = state
        .reviews
        .toggle_reaction(auth.user_id, review_id, input.kind)
        .await?;
    Ok(Json(ReviewResponse::from(&review)))
}
