//! Shared test fixtures: in-memory store implementations and helpers for
//! driving the full router without a running MongoDB.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum_test::TestServer;
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use cinelog_api::api::{create_router, AppState};
use cinelog_api::config::Config;
use cinelog_api::error::{AppError, AppResult};
use cinelog_api::models::{
    Movie, Review, UpdateMovie, User, UserRole, WatchlistEntry,
};
use cinelog_api::store::{
    MovieFilter, MovieSort, MovieStore, Page, ReviewStore, UserStore, WatchlistStore,
};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough";

pub fn test_config() -> Config {
    Config {
        mongodb_url: "mongodb://unused".to_string(),
        mongodb_db: "unused".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_mins: 60,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// In-memory movie collection
#[derive(Default)]
pub struct MemoryMovieStore {
    docs: Mutex<HashMap<ObjectId, Movie>>,
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Movie>> {
        Ok(self.docs.lock().unwrap().get(&id).cloned())
    }

    async fn list(
        &self,
        filter: MovieFilter,
        sort: MovieSort,
        page: Page,
    ) -> AppResult<Vec<Movie>> {
        let docs = self.docs.lock().unwrap();
        let mut movies: Vec<Movie> = docs
            .values()
            .filter(|m| matches_filter(m, &filter))
            .cloned()
            .collect();

        match sort {
            MovieSort::Rating => movies.sort_by(|a, b| {
                b.average_rating
                    .partial_cmp(&a.average_rating)
                    .unwrap_or(Ordering::Equal)
                    .then(b.total_reviews.cmp(&a.total_reviews))
            }),
            MovieSort::Year => movies.sort_by(|a, b| b.release_year.cmp(&a.release_year)),
            MovieSort::Title => movies.sort_by(|a, b| a.title.cmp(&b.title)),
        }

        Ok(movies
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: MovieFilter) -> AppResult<u64> {
        let docs = self.docs.lock().unwrap();
        Ok(docs.values().filter(|m| matches_filter(m, &filter)).count() as u64)
    }

    async fn insert(&self, movie: &Movie) -> AppResult<ObjectId> {
        let id = ObjectId::new();
        let mut stored = movie.clone();
        stored.id = Some(id);
        self.docs.lock().unwrap().insert(id, stored);
        Ok(id)
    }

    async fn update(&self, id: ObjectId, changes: &UpdateMovie) -> AppResult<bool> {
        let mut docs = self.docs.lock().unwrap();
        let Some(movie) = docs.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(title) = &changes.title {
            movie.title = title.clone();
        }
        if let Some(genres) = &changes.genres {
            movie.genres = genres.clone();
        }
        if let Some(year) = changes.release_year {
            movie.release_year = year;
        }
        if let Some(director) = &changes.director {
            movie.director = director.clone();
        }
        if let Some(synopsis) = &changes.synopsis {
            movie.synopsis = synopsis.clone();
        }
        if let Some(poster_url) = &changes.poster_url {
            movie.poster_url = poster_url.clone();
        }
        if changes.cast.is_some() {
            movie.cast = changes.cast.clone();
        }
        if changes.runtime_minutes.is_some() {
            movie.runtime_minutes = changes.runtime_minutes;
        }
        if changes.external_rating.is_some() {
            movie.external_rating = changes.external_rating;
        }
        if changes.box_office.is_some() {
            movie.box_office = changes.box_office.clone();
        }
        Ok(true)
    }

    async fn set_aggregates(
        &self,
        id: ObjectId,
        average_rating: f64,
        total_reviews: u64,
    ) -> AppResult<()> {
        let mut docs = self.docs.lock().unwrap();
        if let Some(movie) = docs.get_mut(&id) {
            movie.average_rating = average_rating;
            movie.total_ratings = total_reviews;
            movie.total_reviews = total_reviews;
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        Ok(self.docs.lock().unwrap().remove(&id).is_some())
    }
}

fn matches_filter(movie: &Movie, filter: &MovieFilter) -> bool {
    if let Some(genre) = &filter.genre {
        if !movie.genres.contains(genre) {
            return false;
        }
    }
    if let Some(year) = filter.year {
        if movie.release_year != year {
            return false;
        }
    }
    true
}

/// In-memory review collection; enforces the unique (user, movie) index
#[derive(Default)]
pub struct MemoryReviewStore {
    docs: Mutex<HashMap<ObjectId, Review>>,
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Review>> {
        Ok(self.docs.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_user_and_movie(
        &self,
        user_id: ObjectId,
        movie_id: ObjectId,
    ) -> AppResult<Option<Review>> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            .cloned())
    }

    async fn list_for_movie(&self, movie_id: ObjectId, page: Page) -> AppResult<Vec<Review>> {
        let docs = self.docs.lock().unwrap();
        let mut reviews: Vec<Review> = docs
            .values()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn list_for_user(&self, user_id: ObjectId, page: Page) -> AppResult<Vec<Review>> {
        let docs = self.docs.lock().unwrap();
        let mut reviews: Vec<Review> = docs
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn all_for_movie(&self, movie_id: ObjectId) -> AppResult<Vec<Review>> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect())
    }

    async fn all_for_user(&self, user_id: ObjectId) -> AppResult<Vec<Review>> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_for_movie(&self, movie_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.movie_id == movie_id)
            .count() as u64)
    }

    async fn count_for_user(&self, user_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .count() as u64)
    }

    async fn insert(&self, review: &Review) -> AppResult<ObjectId> {
        let mut docs = self.docs.lock().unwrap();
        let duplicate = docs
            .values()
            .any(|r| r.user_id == review.user_id && r.movie_id == review.movie_id);
        if duplicate {
            return Err(AppError::DuplicateReview);
        }
        let id = ObjectId::new();
        let mut stored = review.clone();
        stored.id = Some(id);
        docs.insert(id, stored);
        Ok(id)
    }

    async fn replace(&self, review: &Review) -> AppResult<()> {
        let id = review
            .id
            .ok_or_else(|| AppError::Internal("cannot replace an unsaved review".to_string()))?;
        self.docs.lock().unwrap().insert(id, review.clone());
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        Ok(self.docs.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_for_movie(&self, movie_id: ObjectId) -> AppResult<u64> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|_, r| r.movie_id != movie_id);
        Ok((before - docs.len()) as u64)
    }
}

/// In-memory user collection; enforces unique username/email
#[derive(Default)]
pub struct MemoryUserStore {
    docs: Mutex<HashMap<ObjectId, User>>,
}

impl MemoryUserStore {
    /// Test-only escape hatch for role setup
    pub fn promote_to_admin(&self, id: ObjectId) {
        if let Some(user) = self.docs.lock().unwrap().get_mut(&id) {
            user.role = UserRole::Admin;
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self.docs.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<ObjectId> {
        let mut docs = self.docs.lock().unwrap();
        let duplicate = docs
            .values()
            .any(|u| u.email == user.email || u.username == user.username);
        if duplicate {
            return Err(AppError::Conflict(
                "username or email already in use".to_string(),
            ));
        }
        let id = ObjectId::new();
        let mut stored = user.clone();
        stored.id = Some(id);
        docs.insert(id, stored);
        Ok(id)
    }

    async fn set_aggregates(
        &self,
        id: ObjectId,
        average_rating: f64,
        total_reviews: u64,
    ) -> AppResult<()> {
        let mut docs = self.docs.lock().unwrap();
        if let Some(user) = docs.get_mut(&id) {
            user.average_rating = average_rating;
            user.total_reviews = total_reviews;
        }
        Ok(())
    }
}

/// In-memory watchlist collection; enforces the unique (user, movie) index
#[derive(Default)]
pub struct MemoryWatchlistStore {
    docs: Mutex<HashMap<ObjectId, WatchlistEntry>>,
}

#[async_trait]
impl WatchlistStore for MemoryWatchlistStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<WatchlistEntry>> {
        Ok(self.docs.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_user_and_movie(
        &self,
        user_id: ObjectId,
        movie_id: ObjectId,
    ) -> AppResult<Option<WatchlistEntry>> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .find(|e| e.user_id == user_id && e.movie_id == movie_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: ObjectId,
        page: Page,
    ) -> AppResult<Vec<WatchlistEntry>> {
        let docs = self.docs.lock().unwrap();
        let mut entries: Vec<WatchlistEntry> = docs
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count_for_user(&self, user_id: ObjectId) -> AppResult<u64> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.user_id == user_id)
            .count() as u64)
    }

    async fn insert(&self, entry: &WatchlistEntry) -> AppResult<ObjectId> {
        let mut docs = self.docs.lock().unwrap();
        let duplicate = docs
            .values()
            .any(|e| e.user_id == entry.user_id && e.movie_id == entry.movie_id);
        if duplicate {
            return Err(AppError::Conflict(
                "movie is already on the watchlist".to_string(),
            ));
        }
        let id = ObjectId::new();
        let mut stored = entry.clone();
        stored.id = Some(id);
        docs.insert(id, stored);
        Ok(id)
    }

    async fn replace(&self, entry: &WatchlistEntry) -> AppResult<()> {
        let id = entry.id.ok_or_else(|| {
            AppError::Internal("cannot replace an unsaved watchlist entry".to_string())
        })?;
        self.docs.lock().unwrap().insert(id, entry.clone());
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> AppResult<bool> {
        Ok(self.docs.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_for_movie(&self, movie_id: ObjectId) -> AppResult<u64> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|_, e| e.movie_id != movie_id);
        Ok((before - docs.len()) as u64)
    }
}

/// A router wired over in-memory stores, plus direct handles for seeding
pub struct TestApp {
    pub server: TestServer,
    pub movies: Arc<MemoryMovieStore>,
    pub reviews: Arc<MemoryReviewStore>,
    pub users: Arc<MemoryUserStore>,
    pub watchlist: Arc<MemoryWatchlistStore>,
}

pub fn spawn_app() -> TestApp {
    let movies = Arc::new(MemoryMovieStore::default());
    let reviews = Arc::new(MemoryReviewStore::default());
    let users = Arc::new(MemoryUserStore::default());
    let watchlist = Arc::new(MemoryWatchlistStore::default());

    let state = AppState::new(
        test_config(),
        movies.clone(),
        reviews.clone(),
        users.clone(),
        watchlist.clone(),
    );
    let server = TestServer::new(create_router(state)).unwrap();

    TestApp {
        server,
        movies,
        reviews,
        users,
        watchlist,
    }
}

pub fn bearer(token: &str) -> (axum::http::HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

/// Registers a user through the API; returns (token, user id hex)
pub async fn register_user(app: &TestApp, username: &str) -> (String, String) {
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "long-enough-password"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Registers a user, promotes them to admin, and logs in again so the
/// token carries the admin role
pub async fn register_admin(app: &TestApp, username: &str) -> (String, String) {
    let (_, user_id) = register_user(app, username).await;
    app.users
        .promote_to_admin(ObjectId::parse_str(&user_id).unwrap());

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({
            "email": format!("{}@example.com", username),
            "password": "long-enough-password"
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    (body["token"].as_str().unwrap().to_string(), user_id)
}

/// Creates a movie through the API as the given admin; returns its id hex
pub async fn create_movie(app: &TestApp, admin_token: &str, title: &str) -> String {
    let (name, value) = bearer(admin_token);
    let response = app
        .server
        .post("/movies")
        .add_header(name, value)
        .json(&json!({
            "title": title,
            "genres": ["drama"],
            "release_year": 1994,
            "director": "Test Director",
            "synopsis": "A test synopsis that is long enough to read.",
            "poster_url": "https://posters.example/test.jpg"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().to_string()
}
