pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{Movie, Review, User, WatchlistEntry};

pub use mongo::{MongoMovieStore, MongoReviewStore, MongoUserStore, MongoWatchlistStore};

/// Pagination window, 1-based
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(page: Option<u64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Number of documents to skip before this window
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit as u64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Catalog listing filter
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub genre: Option<String>,
    pub year: Option<i32>,
}

/// Catalog sort order
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovieSort {
    /// Highest average rating first
    #[default]
    Rating,
    /// Newest release year first
    Year,
    /// Alphabetical by title
    Title,
}

/// Typed handle to the movie collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Movie>>;
    async fn list(&self, filter: MovieFilter, sort: MovieSort, page: Page)
        -> AppResult<Vec<Movie>>;
    async fn count(&self, filter: MovieFilter) -> AppResult<u64>;
    async fn insert(&self, movie: &Movie) -> AppResult<ObjectId>;
    /// Applies the given partial update; returns false when no movie matched.
    async fn update(&self, id: ObjectId, changes: &crate::models::UpdateMovie)
        -> AppResult<bool>;
    /// Persists recomputed rating aggregates (`total_ratings` mirrors
    /// `total_reviews`).
    async fn set_aggregates(
        &self,
        id: ObjectId,
        average_rating: f64,
        total_reviews: u64,
    ) -> AppResult<()>;
    async fn delete(&self, id: ObjectId) -> AppResult<bool>;
}

/// Typed handle to the review collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Review>>;
    async fn find_by_user_and_movie(
        &self,
        user_id: ObjectId,
        movie_id: ObjectId,
    ) -> AppResult<Option<Review>>;
    async fn list_for_movie(&self, movie_id: ObjectId, page: Page) -> AppResult<Vec<Review>>;
    async fn list_for_user(&self, user_id: ObjectId, page: Page) -> AppResult<Vec<Review>>;
    /// The full, authoritative review set for a movie. Aggregate
    /// recomputation reads through this, never through cached counters.
    async fn all_for_movie(&self, movie_id: ObjectId) -> AppResult<Vec<Review>>;
    /// The full, authoritative review set authored by a user.
    async fn all_for_user(&self, user_id: ObjectId) -> AppResult<Vec<Review>>;
    async fn count_for_movie(&self, movie_id: ObjectId) -> AppResult<u64>;
    async fn count_for_user(&self, user_id: ObjectId) -> AppResult<u64>;
    async fn insert(&self, review: &Review) -> AppResult<ObjectId>;
    async fn replace(&self, review: &Review) -> AppResult<()>;
    async fn delete(&self, id: ObjectId) -> AppResult<bool>;
    /// Removes every review for a movie; returns how many were deleted.
    async fn delete_for_movie(&self, movie_id: ObjectId) -> AppResult<u64>;
}

/// Typed handle to the user collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn insert(&self, user: &User) -> AppResult<ObjectId>;
    /// Persists recomputed rating aggregates for the user scope.
    async fn set_aggregates(
        &self,
        id: ObjectId,
        average_rating: f64,
        total_reviews: u64,
    ) -> AppResult<()>;
}

/// Typed handle to the watchlist collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<WatchlistEntry>>;
    async fn find_by_user_and_movie(
        &self,
        user_id: ObjectId,
        movie_id: ObjectId,
    ) -> AppResult<Option<WatchlistEntry>>;
    async fn list_for_user(&self, user_id: ObjectId, page: Page)
        -> AppResult<Vec<WatchlistEntry>>;
    async fn count_for_user(&self, user_id: ObjectId) -> AppResult<u64>;
    async fn insert(&self, entry: &WatchlistEntry) -> AppResult<ObjectId>;
    async fn replace(&self, entry: &WatchlistEntry) -> AppResult<()>;
    async fn delete(&self, id: ObjectId) -> AppResult<bool>;
    async fn delete_for_movie(&self, movie_id: ObjectId) -> AppResult<u64>;
}
