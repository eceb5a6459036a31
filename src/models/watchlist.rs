use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How eagerly the user wants to watch an entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A (user, movie) watchlist entry, unique per pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub movie_id: ObjectId,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn new(user_id: ObjectId, movie_id: ObjectId, input: AddWatchlistEntry) -> Self {
        Self {
            id: None,
            user_id,
            movie_id,
            priority: input.priority.unwrap_or(Priority::Medium),
            notes: input.notes,
            created_at: Utc::now(),
        }
    }
}

/// Payload for adding a movie to the watchlist
#[derive(Debug, Deserialize, Validate)]
pub struct AddWatchlistEntry {
    pub movie_id: String,
    pub priority: Option<Priority>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Payload for editing a watchlist entry
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateWatchlistEntry {
    pub priority: Option<Priority>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}
