//! Catalog aggregation layer
//!
//! Wraps the upstream movie catalog API behind a stable internal schema:
//! an authenticated HTTP client, a shared normalizer for the heterogeneous
//! upstream item shapes, a TTL + LRU response cache, and the aggregation
//! service that composes the three for search, lists, detail, bulk fetch
//! and genres.

pub mod cache;
pub mod client;
pub mod normalize;
pub mod service;

pub use cache::ResponseCache;
pub use client::{CatalogUpstream, Params, TmdbClient};
pub use normalize::{CatalogItem, Genre};
pub use service::{CatalogService, ListKind, SearchQuery, SearchResponse};
