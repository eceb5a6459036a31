pub mod aggregates;
pub mod catalog;
pub mod reviews;
pub mod watchlist;

pub use aggregates::{AggregateService, RatingSummary};
pub use catalog::MovieService;
pub use reviews::ReviewService;
pub use watchlist::WatchlistService;
