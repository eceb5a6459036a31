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
use crate::models::{CreateMovie, Movie, UpdateMovie};
use crate::store::{MovieFilter, MovieSort, Page};

use super::{parse_object_id, require_admin, Paginated};

#[derive(Debug, Default, Deserialize)]
pub struct MovieQuery {
    pub page: Option<u64>,
    pub limit: Option<i64>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub sort: Option<MovieSort>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
    pub release_year: i32,
    pub director: String,
    pub synopsis: String,
    pub poster_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_office: Option<String>,
    pub average_rating: f64,
    pub total_ratings: u64,
    pub total_reviews: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            release_year: movie.release_year,
            director: movie.director.clone(),
            synopsis: movie.synopsis.clone(),
            poster_url: movie.poster_url.clone(),
            cast: movie.cast.clone(),
            runtime_minutes: movie.runtime_minutes,
            external_rating: movie.external_rating,
            box_office: movie.box_office.clone(),
            average_rating: movie.average_rating,
            total_ratings: movie.total_ratings,
            total_reviews: movie.total_reviews,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
        }
    }
}

/// List the catalog with optional genre/year filters
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MovieQuery>,
) -> AppResult<Json<Paginated<MovieResponse>>> {
    let page = Page::new(query.page, query.limit);
    let filter = MovieFilter {
        genre: query.genre,
        year: query.year,
    };
    let sort = query.sort.unwrap_or_default();

    let (movies, total) = state.catalog.list(filter, sort, page).await?;
    let data = movies.iter().map(MovieResponse::from).collect();
    Ok(Json(Paginated::new(data, page, total)))
}

/// Fetch a single movie
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieResponse>> {
    let id = parse_object_id(&id)?;
    let movie = state.catalog.get(id).await?;
    Ok(Json(MovieResponse::from(&movie)))
}

/// Add a movie to the catalog (admin only)
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMovie>,
) -> AppResult<(StatusCode, Json<MovieResponse>)> {
    require_admin(&auth)?;
    input.validate()?;

    let movie = state.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(MovieResponse::from(&movie))))
}

/// Edit catalog fields (admin only); aggregates are never writable here
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateMovie>,
) -> AppResult<Json<MovieResponse>> {
    require_admin(&auth)?;
    input.validate()?;

    let id = parse_object_id(&id)?;
    let movie = state.catalog.update(id, input).await?;
    Ok(Json(MovieResponse::from(&movie)))
}

/// Remove a movie and everything referencing it (admin only)
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    require_admin(&auth)?;

    let id = parse_object_id(&id)?;
    state.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
