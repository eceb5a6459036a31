use std::collections::HashSet;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, AppResult};
use crate::models::{CreateMovie, Movie, UpdateMovie};
use crate::services::aggregates::AggregateService;
use crate::store::{MovieFilter, MovieSort, MovieStore, Page, ReviewStore, WatchlistStore};

/// Catalog CRUD plus the cleanup a movie deletion drags along
pub struct MovieService {
    movies: Arc<dyn MovieStore>,
    reviews: Arc<dyn ReviewStore>,
    watchlist: Arc<dyn WatchlistStore>,
    aggregates: Arc<AggregateService>,
}

impl MovieService {
    pub fn new(
        movies: Arc<dyn MovieStore>,
        reviews: Arc<dyn ReviewStore>,
        watchlist: Arc<dyn WatchlistStore>,
        aggregates: Arc<AggregateService>,
    ) -> Self {
        Self {
            movies,
            reviews,
            watchlist,
            aggregates,
        }
    }

    pub async fn list(
        &self,
        filter: MovieFilter,
        sort: MovieSort,
        page: Page,
    ) -> AppResult<(Vec<Movie>, u64)> {
        let movies = self.movies.list(filter.clone(), sort, page).await?;
        let total = self.movies.count(filter).await?;
        Ok((movies, total))
    }

    pub async fn get(&self, id: ObjectId) -> AppResult<Movie> {
        self.movies
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {} not found", id)))
    }

    pub async fn create(&self, input: CreateMovie) -> AppResult<Movie> {
        let mut movie = Movie::new(input);
        let id = self.movies.insert(&movie).await?;
        movie.id = Some(id);

        tracing::info!(movie_id = %id, title = %movie.title, "Movie created");
        Ok(movie)
    }

    pub async fn update(&self, id: ObjectId, changes: UpdateMovie) -> AppResult<Movie> {
        if !self.movies.update(id, &changes).await? {
            return Err(AppError::NotFound(format!("movie {} not found", id)));
        }
        self.get(id).await
    }

    /// Deletes a movie together with its reviews and watchlist entries.
    ///
    /// Each review author loses a review, so their cached aggregates are
    /// recomputed from what remains.
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        self.get(id).await?;

        let reviews = self.reviews.all_for_movie(id).await?;
        let authors: HashSet<ObjectId> = reviews.iter().map(|r| r.user_id).collect();

        let removed_reviews = self.reviews.delete_for_movie(id).await?;
        let removed_watchlist = self.watchlist.delete_for_movie(id).await?;
        self.movies.delete(id).await?;

        for author in authors {
            self.aggregates.recompute_user(author).await?;
        }

        tracing::info!(
            movie_id = %id,
            removed_reviews,
            removed_watchlist,
            "Movie deleted"
        );

        Ok(())
    }
}
