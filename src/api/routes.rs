use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::routes;

use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        // Catalog
        .route(
            "/movies",
            get(routes::movies::list).post(routes::movies::create),
        )
        .route(
            "/movies/:id",
            get(routes::movies::get)
                .put(routes::movies::update)
                .delete(routes::movies::delete),
        )
        // Reviews
        .route(
            "/movies/:id/reviews",
            get(routes::reviews::list_for_movie).post(routes::reviews::create),
        )
        .route(
            "/reviews/:id",
            axum::routing::put(routes::reviews::update).delete(routes::reviews::delete),
        )
        .route("/reviews/:id/reactions", post(routes::reviews::react))
        // Users
        .route("/users/:id", get(routes::users::get))
        .route("/users/:id/reviews", get(routes::users::reviews))
        // Watchlist
        .route(
            "/watchlist",
            get(routes::watchlist::list).post(routes::watchlist::add),
        )
        .route(
            "/watchlist/:id",
            axum::routing::put(routes::watchlist::update).delete(routes::watchlist::remove),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
