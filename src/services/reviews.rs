use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, AppResult};
use crate::models::{CreateReview, ReactionKind, Review, UpdateReview};
use crate::services::aggregates::AggregateService;
use crate::store::{MovieStore, Page, ReviewStore};

/// Review use cases: the operations that mutate the review set and
/// therefore drive aggregate recomputation.
///
/// Every mutation follows the same shape: validate preconditions, persist
/// the review change, then recompute the affected scopes from the full
/// review set. Precondition failures never touch aggregates.
pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    movies: Arc<dyn MovieStore>,
    aggregates: Arc<AggregateService>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        movies: Arc<dyn MovieStore>,
        aggregates: Arc<AggregateService>,
    ) -> Self {
        Self {
            reviews,
            movies,
            aggregates,
        }
    }

    /// Creates a review and recomputes both the movie's and the author's
    /// aggregates.
    pub async fn create(
        &self,
        actor: ObjectId,
        movie_id: ObjectId,
        input: CreateReview,
    ) -> AppResult<Review> {
        self.movies
            .find_by_id(movie_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {} not found", movie_id)))?;

        if self
            .reviews
            .find_by_user_and_movie(actor, movie_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateReview);
        }

        let mut review = Review::new(actor, movie_id, input);
        // The unique index turns a concurrent duplicate into DuplicateReview here.
        let id = self.reviews.insert(&review).await?;
        review.id = Some(id);

        self.aggregates.recompute_movie(movie_id).await?;
        self.aggregates.recompute_user(actor).await?;

        tracing::info!(
            review_id = %id,
            movie_id = %movie_id,
            user_id = %actor,
            rating = review.rating,
            "Review created"
        );

        Ok(review)
    }

    /// Edits a review's rating, body, or spoiler flag.
    ///
    /// Only the owner may edit. The movie aggregate is recomputed on every
    /// edit; the author aggregate only when the rating actually changed,
    /// since body edits cannot move it.
    pub async fn update(
        &self,
        actor: ObjectId,
        review_id: ObjectId,
        input: UpdateReview,
    ) -> AppResult<Review> {
        let mut review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("review {} not found", review_id)))?;

        if review.user_id != actor {
            return Err(AppError::NotAuthorized(
                "only the review owner can edit it".to_string(),
            ));
        }

        let rating_changed = matches!(input.rating, Some(r) if r != review.rating);
        if let Some(rating) = input.rating {
            review.rating = rating;
        }
        if let Some(body) = input.body {
            review.body = body;
        }
        if let Some(spoiler) = input.spoiler {
            review.spoiler = spoiler;
        }
        review.updated_at = Utc::now();

        self.reviews.replace(&review).await?;

        self.aggregates.recompute_movie(review.movie_id).await?;
        if rating_changed {
            self.aggregates.recompute_user(review.user_id).await?;
        }

        tracing::info!(
            review_id = %review_id,
            user_id = %actor,
            rating_changed,
            "Review updated"
        );

        Ok(review)
    }

    /// Deletes a review and recomputes both affected scopes from the
    /// remaining set; an emptied scope resets to zeroed aggregates.
    pub async fn delete(
        &self,
        actor: ObjectId,
        actor_is_admin: bool,
        review_id: ObjectId,
    ) -> AppResult<()> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("review {} not found", review_id)))?;

        if review.user_id != actor && !actor_is_admin {
            return Err(AppError::NotAuthorized(
                "only the review owner can delete it".to_string(),
            ));
        }

        self.reviews.delete(review_id).await?;

        self.aggregates.recompute_movie(review.movie_id).await?;
        self.aggregates.recompute_user(review.user_id).await?;

        tracing::info!(
            review_id = %review_id,
            movie_id = %review.movie_id,
            user_id = %review.user_id,
            "Review deleted"
        );

        Ok(())
    }

    /// Toggles a like/dislike on a review.
    ///
    /// Reactions never touch rating aggregates; only the two reaction sets
    /// change, and they stay mutually exclusive per user.
    pub async fn toggle_reaction(
        &self,
        actor: ObjectId,
        review_id: ObjectId,
        kind: ReactionKind,
    ) -> AppResult<Review> {
        let mut review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("review {} not found", review_id)))?;

        if review.user_id == actor {
            return Err(AppError::SelfReaction);
        }

        review.apply_reaction(actor, kind);
        review.updated_at = Utc::now();
        self.reviews.replace(&review).await?;

        tracing::debug!(
            review_id = %review_id,
            user_id = %actor,
            kind = ?kind,
            likes = review.likes.len(),
            dislikes = review.dislikes.len(),
            "Reaction toggled"
        );

        Ok(review)
    }

    /// Paginated reviews for a movie, newest first
    pub async fn list_for_movie(
        &self,
        movie_id: ObjectId,
        page: Page,
    ) -> AppResult<(Vec<Review>, u64)> {
        self.movies
            .find_by_id(movie_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {} not found", movie_id)))?;

        let reviews = self.reviews.list_for_movie(movie_id, page).await?;
        let total = self.reviews.count_for_movie(movie_id).await?;
        Ok((reviews, total))
    }

    /// Paginated reviews authored by a user, newest first
    pub async fn list_for_user(
        &self,
        user_id: ObjectId,
        page: Page,
    ) -> AppResult<(Vec<Review>, u64)> {
        let reviews = self.reviews.list_for_user(user_id, page).await?;
        let total = self.reviews.count_for_user(user_id).await?;
        Ok((reviews, total))
    }
}
