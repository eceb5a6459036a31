use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};

use crate::models::{Review, User, WatchlistEntry};
use crate::store::mongo::{REVIEWS, USERS, WATCHLIST};

/// Connects to MongoDB and prepares the database.
///
/// Index creation is idempotent, so this is safe to run on every startup.
pub async fn connect(url: &str, db_name: &str) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(url).await?;
    let db = client.database(db_name);
    ensure_indexes(&db).await?;
    tracing::info!(db = db_name, "Connected to MongoDB");
    Ok(db)
}

/// Creates the unique indexes the domain relies on: one review and one
/// watchlist entry per (user, movie), unique usernames and emails.
async fn ensure_indexes(db: &Database) -> mongodb::error::Result<()> {
    let unique = || IndexOptions::builder().unique(true).build();

    db.collection::<Review>(REVIEWS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "movie_id": 1 })
                .options(unique())
                .build(),
            None,
        )
        .await?;
    db.collection::<Review>(REVIEWS)
        .create_index(
            IndexModel::builder().keys(doc! { "movie_id": 1 }).build(),
            None,
        )
        .await?;

    db.collection::<User>(USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
            None,
        )
        .await?;
    db.collection::<User>(USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(unique())
                .build(),
            None,
        )
        .await?;

    db.collection::<WatchlistEntry>(WATCHLIST)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "movie_id": 1 })
                .options(unique())
                .build(),
            None,
        )
        .await?;

    Ok(())
}
