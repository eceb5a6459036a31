pub mod auth;
pub mod movies;
pub mod reviews;
pub mod users;
pub mod watchlist;

use axum::http::StatusCode;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::store::Page;

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Parses a 24-hex-character path or body id
pub fn parse_object_id(value: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(value)
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid id", value)))
}

/// Rejects non-admin actors
pub fn require_admin(auth: &AuthUser) -> AppResult<()> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(AppError::NotAuthorized("admin role required".to_string()))
    }
}

/// Common pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn to_page(&self) -> Page {
        Page::new(self.page, self.limit)
    }
}

/// Paginated response envelope
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub limit: i64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: Page, total: u64) -> Self {
        let limit = page.limit as u64;
        Self {
            data,
            page: page.page,
            limit: page.limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}
