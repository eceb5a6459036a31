use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::error::AppResult;
use crate::store::{MovieStore, ReviewStore, UserStore};

/// Denormalized rating aggregate for one scope (a movie or a user)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    /// Mean rating rounded half-up to one decimal place; 0.0 for an
    /// empty review set.
    pub average_rating: f64,
    pub total_reviews: u64,
}

impl RatingSummary {
    /// Derives the aggregate from a full set of ratings
    pub fn from_ratings(ratings: &[u8]) -> Self {
        if ratings.is_empty() {
            return Self {
                average_rating: 0.0,
                total_reviews: 0,
            };
        }
        let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
        let mean = f64::from(sum) / ratings.len() as f64;
        Self {
            average_rating: round_to_tenth(mean),
            total_reviews: ratings.len() as u64,
        }
    }
}

/// Rounds half-up to one decimal place (all inputs here are non-negative)
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Keeps the cached rating aggregates on movies and users consistent
/// with the underlying review set.
///
/// Every recomputation re-reads the full review set for the scope and
/// derives the aggregate from scratch. That is deliberately not
/// incremental: a missed delta can never cause permanent drift, and a
/// later recomputation always heals an earlier failed one. Concurrent
/// writers on the same scope are last-writer-wins; the caller accepts
/// that in exchange for not holding any cross-document transaction.
pub struct AggregateService {
    movies: Arc<dyn MovieStore>,
    users: Arc<dyn UserStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl AggregateService {
    pub fn new(
        movies: Arc<dyn MovieStore>,
        users: Arc<dyn UserStore>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            movies,
            users,
            reviews,
        }
    }

    /// Recomputes and persists a movie's aggregates from its full review set
    pub async fn recompute_movie(&self, movie_id: ObjectId) -> AppResult<RatingSummary> {
        let reviews = self.reviews.all_for_movie(movie_id).await?;
        let ratings: Vec<u8> = reviews.iter().map(|r| r.rating).collect();
        let summary = RatingSummary::from_ratings(&ratings);

        self.movies
            .set_aggregates(movie_id, summary.average_rating, summary.total_reviews)
            .await?;

        tracing::debug!(
            movie_id = %movie_id,
            average_rating = summary.average_rating,
            total_reviews = summary.total_reviews,
            "Movie aggregates recomputed"
        );

        Ok(summary)
    }

    /// Recomputes and persists a user's aggregates from the reviews they authored
    pub async fn recompute_user(&self, user_id: ObjectId) -> AppResult<RatingSummary> {
        let reviews = self.reviews.all_for_user(user_id).await?;
        let ratings: Vec<u8> = reviews.iter().map(|r| r.rating).collect();
        let summary = RatingSummary::from_ratings(&ratings);

        self.users
            .set_aggregates(user_id, summary.average_rating, summary.total_reviews)
            .await?;

        tracing::debug!(
            user_id = %user_id,
            average_rating = summary.average_rating,
            total_reviews = summary.total_reviews,
            "User aggregates recomputed"
        );

        Ok(summary)
    }
}
