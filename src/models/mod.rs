pub mod movie;
pub mod review;
pub mod user;
pub mod watchlist;

pub use movie::{CreateMovie, Movie, UpdateMovie};
pub use review::{CreateReview, ReactionKind, Review, UpdateReview};
pub use user::{Credentials, Register, User, UserRole};
pub use watchlist::{AddWatchlistEntry, Priority, UpdateWatchlistEntry, WatchlistEntry};
