/// Upstream catalog API client
///
/// Issues authenticated GET requests against the TMDB-style catalog API.
/// The API credential travels as a query parameter on every request, and
/// parameters without a value are omitted rather than sent empty.
///
/// Retry policy deliberately lives with callers: a non-2xx status is
/// reported as `AppError::Upstream` carrying the status code, nothing more.
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Query parameters for one upstream request. A `None` or empty value
/// means the parameter is dropped from the request entirely.
pub type Params = Vec<(&'static str, Option<String>)>;

/// Read access to the upstream catalog API.
///
/// The aggregation service depends on this trait rather than on the
/// concrete client, so tests can substitute a programmable stub.
#[async_trait]
pub trait CatalogUpstream: Send + Sync {
    /// Performs a single GET against `path`, returning the parsed JSON body.
    async fn get(&self, path: &str, params: &Params) -> AppResult<Value>;
}

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }
}

#[async_trait]
impl CatalogUpstream for TmdbClient {
    async fn get(&self, path: &str, params: &Params) -> AppResult<Value> {
        let url = format!("{}{}", self.api_url, path);

        let mut query: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        for (name, value) in params {
            match value {
                Some(v) if !v.is_empty() => query.push((name, v.as_str())),
                _ => {}
            }
        }

        let response = self.http_client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(path = %path, status = status, "Upstream catalog request failed");
            return Err(AppError::Upstream(status));
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}
