use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::catalog::{CatalogItem, Genre, ListKind, SearchQuery, SearchResponse};
use crate::error::{AppError, AppResult};

use super::AppState;

/// Minimum trimmed length of a search query
const MIN_QUERY_LEN: usize = 2;

/// Safety ceiling on ids accepted by the bulk endpoint
const BULK_ID_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    #[serde(default)]
    pub ids: Vec<Value>,
}

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// GET /api/movies/search?q=&year=&genre=&page=
pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    if query.q.trim().len() < MIN_QUERY_LEN {
        return Err(AppError::InvalidInput(format!(
            "query parameter 'q' must be at least {} characters",
            MIN_QUERY_LEN
        )));
    }

    let response = state.catalog.search(query).await?;
    Ok(Json(response))
}

/// GET /api/movies/trending
pub async fn trending(State(state): State<AppState>) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.catalog.list(ListKind::Trending).await?))
}

/// GET /api/movies/top-rated
pub async fn top_rated(State(state): State<AppState>) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.catalog.list(ListKind::TopRated).await?))
}

/// GET /api/movies/now-playing
pub async fn now_playing(State(state): State<AppState>) -> AppResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.catalog.list(ListKind::NowPlaying).await?))
}

/// GET /api/movies/genres
pub async fn movie_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.catalog.genres().await?))
}

/// GET /api/movies/{id}
///
/// An upstream 404 means the title does not exist and is reported as a
/// client-facing not-found rather than a gateway failure.
pub async fn movie_by_id(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    match state.catalog.get_by_id(id).await {
        Ok(payload) => Ok(Json(payload)),
        Err(AppError::Upstream(404)) => {
            Err(AppError::NotFound(format!("movie {} not found", id)))
        }
        Err(e) => Err(e),
    }
}

/// POST /api/movies/bulk
///
/// Body: `{ "ids": [...] }` with stringifiable id values. The list is
/// truncated to a safety ceiling before hitting upstream; an empty list
/// short-circuits without any upstream traffic.
pub async fn movies_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkRequest>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    if request.ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let ids: Vec<String> = request
        .ids
        .into_iter()
        .take(BULK_ID_LIMIT)
        .map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();

    Ok(Json(state.catalog.get_bulk(ids).await?))
}
