use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, AppResult};
use crate::models::{AddWatchlistEntry, UpdateWatchlistEntry, WatchlistEntry};
use crate::store::{MovieStore, Page, WatchlistStore};

/// Per-user watchlist management; not part of the aggregation protocol
pub struct WatchlistService {
    watchlist: Arc<dyn WatchlistStore>,
    movies: Arc<dyn MovieStore>,
}

impl WatchlistService {
    pub fn new(watchlist: Arc<dyn WatchlistStore>, movies: Arc<dyn MovieStore>) -> Self {
        Self { watchlist, movies }
    }

    pub async fn list(&self, user_id: ObjectId, page: Page) -> AppResult<(Vec<WatchlistEntry>, u64)> {
        let entries = self.watchlist.list_for_user(user_id, page).await?;
        let total = self.watchlist.count_for_user(user_id).await?;
        Ok((entries, total))
    }

    pub async fn add(
        &self,
        user_id: ObjectId,
        movie_id: ObjectId,
        input: AddWatchlistEntry,
    ) -> AppResult<WatchlistEntry> {
        self.movies
            .find_by_id(movie_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {} not found", movie_id)))?;

        if self
            .watchlist
            .find_by_user_and_movie(user_id, movie_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "movie is already on the watchlist".to_string(),
            ));
        }

        let mut entry = WatchlistEntry::new(user_id, movie_id, input);
        let id = self.watchlist.insert(&entry).await?;
        entry.id = Some(id);

        tracing::debug!(user_id = %user_id, movie_id = %movie_id, "Watchlist entry added");
        Ok(entry)
    }

    pub async fn update(
        &self,
        user_id: ObjectId,
        entry_id: ObjectId,
        input: UpdateWatchlistEntry,
    ) -> AppResult<WatchlistEntry> {
        let mut entry = self
            .watchlist
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("watchlist entry {} not found", entry_id)))?;

        if entry.user_id != user_id {
            return Err(AppError::NotAuthorized(
                "watchlist entries can only be edited by their owner".to_string(),
            ));
        }

        if let Some(priority) = input.priority {
            entry.priority = priority;
        }
        if input.notes.is_some() {
            entry.notes = input.notes;
        }
        self.watchlist.replace(&entry).await?;

        Ok(entry)
    }

    pub async fn remove(&self, user_id: ObjectId, entry_id: ObjectId) -> AppResult<()> {
        let entry = self
            .watchlist
            .find_by_id(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("watchlist entry {} not found", entry_id)))?;

        if entry.user_id != user_id {
            return Err(AppError::NotAuthorized(
                "watchlist entries can only be removed by their owner".to_string(),
            ));
        }

        self.watchlist.delete(entry_id).await?;
        tracing::debug!(user_id = %user_id, entry_id = %entry_id, "Watchlist entry removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::store::{MockMovieStore, MockWatchlistStore};

    fn sample_entry(id: ObjectId, user_id: ObjectId) -> WatchlistEntry {
        let mut entry = WatchlistEntry::new(
            user_id,
            ObjectId::new(),
            AddWatchlistEntry {
                movie_id: ObjectId::new().to_hex(),
                priority: Some(Priority::High),
                notes: None,
            },
        );
        entry.id = Some(id);
        entry
    }

    #[tokio::test]
    async fn test_add_requires_existing_movie() {
        let mut movies = MockMovieStore::new();
        movies.expect_find_by_id().returning(|_| Ok(None));

        let service = WatchlistService::new(Arc::new(MockWatchlistStore::new()), Arc::new(movies));
        let result = service
            .add(
                ObjectId::new(),
                ObjectId::new(),
                AddWatchlistEntry {
                    movie_id: ObjectId::new().to_hex(),
                    priority: None,
                    notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_rejected() {
        let owner = ObjectId::new();
        let intruder = ObjectId::new();

        let mut watchlist = MockWatchlistStore::new();
        watchlist
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_entry(id, owner))));
        watchlist.expect_replace().never();

        let service = WatchlistService::new(Arc::new(watchlist), Arc::new(MockMovieStore::new()));
        let result = service
            .update(
                intruder,
                ObjectId::new(),
                UpdateWatchlistEntry {
                    priority: Some(Priority::Low),
                    notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotAuthorized(_))));
    }
}
