use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user's review of a movie.
///
/// At most one review exists per (user, movie) pair. The `likes` and
/// `dislikes` sets hold reacting user ids and never share a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub movie_id: ObjectId,
    /// Integer star rating, 1-5.
    pub rating: u8,
    pub body: String,
    pub spoiler: bool,
    pub likes: Vec<ObjectId>,
    pub dislikes: Vec<ObjectId>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Which way a user reacted to a review
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl Review {
    /// Creates a new review with empty reaction sets
    pub fn new(user_id: ObjectId, movie_id: ObjectId, input: CreateReview) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            user_id,
            movie_id,
            rating: input.rating,
            body: input.body,
            spoiler: input.spoiler.unwrap_or(false),
            likes: Vec::new(),
            dislikes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a reaction toggle for `user`.
    ///
    /// A repeated reaction of the same kind removes the vote. A reaction of
    /// the opposite kind moves the user across, so the two sets stay
    /// mutually exclusive.
    pub fn apply_reaction(&mut self, user: ObjectId, kind: ReactionKind) {
        let (target, other) = match kind {
            ReactionKind::Like => (&mut self.likes, &mut self.dislikes),
            ReactionKind::Dislike => (&mut self.dislikes, &mut self.likes),
        };

        if let Some(pos) = target.iter().position(|u| *u == user) {
            target.remove(pos);
            return;
        }
        if let Some(pos) = other.iter().position(|u| *u == user) {
            other.remove(pos);
        }
        target.push(user);
    }
}

/// Payload for creating a review
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(min = 10, max = 2000))]
    pub body: String,
    pub spoiler: Option<bool>,
}

/// Payload for editing a review; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    #[validate(length(min = 10, max = 2000))]
    pub body: Option<String>,
    pub spoiler: Option<bool>,
}
