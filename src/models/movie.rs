use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A movie in the catalog.
///
/// `average_rating`, `total_ratings` and `total_reviews` are cached
/// aggregates over the review set; they are recomputed by the
/// aggregate service on every review mutation and must never be
/// written from anywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
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
    /// Mean of all review ratings for this movie, 0-5, one decimal place.
    pub average_rating: f64,
    /// Mirrors `total_reviews` (one rating per review).
    pub total_ratings: u64,
    /// Number of reviews referencing this movie.
    pub total_reviews: u64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Creates a new movie with zeroed aggregates
    pub fn new(input: CreateMovie) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: input.title,
            genres: input.genres,
            release_year: input.release_year,
            director: input.director,
            synopsis: input.synopsis,
            poster_url: input.poster_url,
            cast: input.cast,
            runtime_minutes: input.runtime_minutes,
            external_rating: input.external_rating,
            box_office: input.box_office,
            average_rating: 0.0,
            total_ratings: 0,
            total_reviews: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating a movie
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, message = "at least one genre is required"))]
    pub genres: Vec<String>,
    #[validate(range(min = 1888, max = 2100))]
    pub release_year: i32,
    #[validate(length(min = 1, max = 200))]
    pub director: String,
    #[validate(length(min = 1, max = 5000))]
    pub synopsis: String,
    #[validate(length(min = 1, max = 2000))]
    pub poster_url: String,
    pub cast: Option<Vec<String>>,
    #[validate(range(min = 1, max = 1000))]
    pub runtime_minutes: Option<u32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub external_rating: Option<f64>,
    pub box_office: Option<String>,
}

/// Payload for updating a movie; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMovie {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "at least one genre is required"))]
    pub genres: Option<Vec<String>>,
    #[validate(range(min = 1888, max = 2100))]
    pub release_year: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub director: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub synopsis: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub poster_url: Option<String>,
    pub cast: Option<Vec<String>>,
    #[validate(range(min = 1, max = 1000))]
    pub runtime_minutes: Option<u32>,
    #[validate(range(min = 0.0, max = 10.0))]
    pub external_rating: Option<f64>,
    pub box_office: Option<String>,
}
