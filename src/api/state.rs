use std::sync::Arc;

use crate::config::Config;
use crate::services::{AggregateService, MovieService, ReviewService, WatchlistService};
use crate::store::{MovieStore, ReviewStore, UserStore, WatchlistStore};

/// Shared application state.
///
/// Services receive their typed store handles here, at construction; no
/// part of the request path resolves a collection dynamically. Anything
/// implementing the store traits will do, which is how the integration
/// tests run the full router against in-memory stores.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<MovieService>,
    pub reviews: Arc<ReviewService>,
    pub watchlist: Arc<WatchlistService>,
}

impl AppState {
    /// Wires the service graph over the given stores
    pub fn new(
        config: Config,
        movies: Arc<dyn MovieStore>,
        reviews: Arc<dyn ReviewStore>,
        users: Arc<dyn UserStore>,
        watchlist: Arc<dyn WatchlistStore>,
    ) -> Self {
        let aggregates = Arc::new(AggregateService::new(
            movies.clone(),
            users.clone(),
            reviews.clone(),
        ));
        let catalog = Arc::new(MovieService::new(
            movies.clone(),
            reviews.clone(),
            watchlist.clone(),
            aggregates.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(
            reviews.clone(),
            movies.clone(),
            aggregates,
        ));
        let watchlist_service = Arc::new(WatchlistService::new(watchlist, movies));

        Self {
            config: Arc::new(config),
            users,
            catalog,
            reviews: review_service,
            watchlist: watchlist_service,
        }
    }
}
