use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::{AddWatchlistEntry, Priority, UpdateWatchlistEntry, WatchlistEntry};

use super::{parse_object_id, PageQuery, Paginated};

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub id: String,
    pub movie_id: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&WatchlistEntry> for WatchlistResponse {
    fn from(entry: &WatchlistEntry) -> Self {
        Self {
            id: entry.id.map(|id| id.to_hex()).unwrap_or_default(),
            movie_id: entry.movie_id.to_hex(),
            priority: entry.priority,
            notes: entry.notes.clone(),
            created_at: entry.created_at,
        }
    }
}

/// The caller's watchlist, newest first
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Paginated<WatchlistResponse>>> {
    let page = query.to_page();
    let (entries, total) = state.watchlist.list(auth.user_id, page).await?;
    let data = entries.iter().map(WatchlistResponse::from).collect();
    Ok(Json(Paginated::new(data, page, total)))
}

/// Add a movie to the caller's watchlist
pub async fn add(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddWatchlistEntry>,
) -> AppResult<(StatusCode, Json<WatchlistResponse>)> {
    input.validate()?;
    let movie_id = parse_object_id(&input.movie_id)?;

    let entry = state.watchlist.add(auth.user_id, movie_id, input).await?;
    Ok((StatusCode::CREATED, Json(WatchlistResponse::from(&entry))))
}

/// Edit priority or notes on one of the caller's entries
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateWatchlistEntry>,
) -> AppResult<Json<WatchlistResponse>> {
    input.validate()?;
    let id = parse_object_id(&id)?;

    let entry = state.watchlist.update(auth.user_id, id, input).await?;
    Ok(Json(WatchlistResponse::from(&entry)))
}

/// Remove one of the caller's entries
pub async fn remove(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_object_id(&id)?;
    state.watchlist.remove(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
