/// Catalog aggregation service
///
/// Orchestrates the upstream client, normalizer and response cache for the
/// operations the route layer exposes: search with local post-filtering,
/// the fixed list endpoints, single-title detail, bulk fetch and genres.
///
/// Cache lookups and writes are synchronous and sandwich the suspending
/// upstream call; only the upstream fetch is subject to cache reuse, the
/// cheap local filtering is redone on every call.
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::cache::{keyify, ResponseCache};
use crate::catalog::client::{CatalogUpstream, Params};
use crate::catalog::normalize::{genre_ids, normalize_item, CatalogItem, Genre, POSTER_WIDTH};
use crate::error::{AppError, AppResult};

/// Expansions requested alongside a single-title detail fetch, to avoid
/// one round-trip per section on the details view
const DETAIL_EXPANSIONS: &str = "credits,videos,recommendations,similar";

/// Fixed upstream list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Trending,
    TopRated,
    NowPlaying,
}

impl ListKind {
    pub fn path(&self) -> &'static str {
        match self {
            ListKind::Trending => "/trending/movie/week",
            ListKind::TopRated => "/movie/top_rated",
            ListKind::NowPlaying => "/movie/now_playing",
        }
    }
}

/// Logical search request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub page: Option<u32>,
}

/// Search result envelope with upstream pagination metadata passed through
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<CatalogItem>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

#[derive(Clone)]
pub struct CatalogService {
    upstream: Arc<dyn CatalogUpstream>,
    cache: Arc<ResponseCache>,
    poster_base: String,
}

impl CatalogService {
    pub fn new(
        upstream: Arc<dyn CatalogUpstream>,
        cache: ResponseCache,
        image_url: &str,
    ) -> Self {
        Self {
            upstream,
            cache: Arc::new(cache),
            poster_base: format!("{}/{}", image_url.trim_end_matches('/'), POSTER_WIDTH),
        }
    }

    /// Fetches the raw payload for `path`, reusing a fresh cached copy when
    /// one exists under the canonical key.
    async fn fetch_cached(&self, path: &str, params: &Params) -> AppResult<Value> {
        let key = keyify(path, params);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Catalog cache hit");
            return Ok(hit);
        }

        let raw = self.upstream.get(path, params).await?;
        self.cache.set(key, raw.clone());
        Ok(raw)
    }

    /// Full-text search with pagination and local year/genre post-filters.
    ///
    /// The upstream search endpoint does not support genre filtering for
    /// full-text queries, so the genre constraint is never sent upstream;
    /// both filters are applied locally against the fetched page. Filtering
    /// is order-preserving.
    pub async fn search(&self, query: SearchQuery) -> AppResult<SearchResponse> {
        let requested_page = query.page.unwrap_or(1);

        let genre_filter = match query.genre.as_deref().filter(|g| !g.is_empty()) {
            Some(g) => Some(g.parse::<i64>().map_err(|_| {
                AppError::InvalidInput(format!("genre must be an integer id, got '{}'", g))
            })?),
            None => None,
        };
        let year_filter = query.year.as_deref().filter(|y| !y.is_empty());

        let params: Params = vec![
            ("query", Some(query.q.clone())),
            ("page", Some(requested_page.to_string())),
            ("year", query.year.clone()),
        ];
        let raw = self.fetch_cached("/search/movie", &params).await?;

        let empty = Vec::new();
        let raw_results = raw.get("results").and_then(Value::as_array).unwrap_or(&empty);

        let mut results = Vec::new();
        for raw_item in raw_results {
            let Some(item) = normalize_item(raw_item, &self.poster_base) else {
                continue;
            };
            if let Some(year) = year_filter {
                if item.release_year.as_deref() != Some(year) {
                    continue;
                }
            }
            if let Some(genre) = genre_filter {
                if !genre_ids(raw_item).contains(&genre) {
                    continue;
                }
            }
            results.push(item);
        }

        let total = raw
            .get("total_results")
            .and_then(Value::as_u64)
            .unwrap_or(results.len() as u64);
        let page = raw
            .get("page")
            .and_then(Value::as_u64)
            .map(|p| p as u32)
            .unwrap_or(requested_page);
        let total_pages = raw.get("total_pages").and_then(Value::as_u64).unwrap_or(1);

        tracing::info!(
            query = %query.q,
            results = results.len(),
            page = page,
            "Catalog search completed"
        );

        Ok(SearchResponse {
            query: query.q,
            results,
            total,
            page,
            total_pages,
        })
    }

    /// Fetches one of the fixed list endpoints as normalized items.
    pub async fn list(&self, kind: ListKind) -> AppResult<Vec<CatalogItem>> {
        let raw = self.fetch_cached(kind.path(), &Vec::new()).await?;

        let items = raw
            .get("results")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| normalize_item(item, &self.poster_base))
                    .collect()
            })
            .unwrap_or_default();

        Ok(items)
    }

    /// Fetches the full expanded detail payload for one title.
    ///
    /// Returns the raw upstream shape rather than a `CatalogItem`; the
    /// details view needs credits, videos and related titles. Detail pages
    /// are viewed once per navigation, so the response is not cached.
    pub async fn get_by_id(&self, id: u64) -> AppResult<Value> {
        let params: Params = vec![("append_to_response", Some(DETAIL_EXPANSIONS.to_string()))];
        self.upstream.get(&format!("/movie/{}", id), &params).await
    }

    /// Fetches many titles concurrently, tolerating per-id failures.
    ///
    /// Each id is an independent fetch; ids that fail upstream are dropped
    /// from the result and the failure of one id never blocks the others.
    /// Successes are returned in input order.
    pub async fn get_bulk(&self, ids: Vec<String>) -> AppResult<Vec<CatalogItem>> {
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            let upstream = Arc::clone(&self.upstream);
            tasks.push(tokio::spawn(async move {
                let payload = upstream.get(&format!("/movie/{}", id), &Vec::new()).await;
                (id, payload)
            }));
        }

        let mut items = Vec::new();
        let mut dropped = 0usize;
        for task in tasks {
            match task.await {
                Ok((_, Ok(payload))) => {
                    if let Some(item) = normalize_item(&payload, &self.poster_base) {
                        items.push(item);
                    }
                }
                Ok((id, Err(e))) => {
                    dropped += 1;
                    tracing::warn!(id = %id, error = %e, "Bulk fetch failed for title");
                }
                Err(e) => {
                    dropped += 1;
                    tracing::error!(error = %e, "Bulk fetch task join error");
                }
            }
        }

        if dropped > 0 {
            tracing::warn!(
                success_count = items.len(),
                dropped_count = dropped,
                "Partial bulk fetch failure"
            );
        }

        Ok(items)
    }

    /// Fetches the genre catalog, cached with the same TTL discipline as
    /// the list endpoints.
    pub async fn genres(&self) -> AppResult<Vec<Genre>> {
        let raw = self.fetch_cached("/genre/movie/list", &Vec::new()).await?;

        let genres = raw
            .get("genres")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|g| {
                        Some(Genre {
                            id: g.get("id").and_then(Value::as_u64)?,
                            name: g.get("name").and_then(Value::as_str)?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(genres)
    }
}
