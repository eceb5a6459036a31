use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinelog_api::api::{create_router, AppState};
use cinelog_api::config::Config;
use cinelog_api::db;
use cinelog_api::store::{
    MongoMovieStore, MongoReviewStore, MongoUserStore, MongoWatchlistStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let database = db::connect(&config.mongodb_url, &config.mongodb_db).await?;

    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState::new(
        config,
        Arc::new(MongoMovieStore::new(&database)),
        Arc::new(MongoReviewStore::new(&database)),
        Arc::new(MongoUserStore::new(&database)),
        Arc::new(MongoWatchlistStore::new(&database)),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
