use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id_middleware, trace_span_for_request};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let movies = Router::new()
        .route("/search", get(handlers::search_movies))
        .route("/trending", get(handlers::trending))
        .route("/top-rated", get(handlers::top_rated))
        .route("/now-playing", get(handlers::now_playing))
        .route("/genres", get(handlers::movie_genres))
        .route("/bulk", post(handlers::movies_bulk))
        .route("/:id", get(handlers::movie_by_id));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/movies", movies)
        .layer(TraceLayer::new_for_http().make_span_with(trace_span_for_request))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
