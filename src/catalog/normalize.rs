use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Poster width class appended to the image CDN base URL
pub const POSTER_WIDTH: &str = "w300";

/// Canonical catalog record exchanged between layers and returned to callers.
///
/// Every field except `id` and `title` may be absent; `id` is the identity
/// key across all list operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_year: Option<String>,
    pub vote_average: Option<f64>,
}

/// A genre from the upstream genre catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Maps one upstream item record into a `CatalogItem`.
///
/// Applied uniformly to every item of every response shape (search results,
/// list results, bulk-fetch payloads) so callers see a single schema
/// regardless of source. Items without an id or a usable title are skipped.
///
/// `poster_base` is the image CDN base URL including the width segment,
/// e.g. `https://image.tmdb.org/t/p/w300`.
pub fn normalize_item(raw: &Value, poster_base: &str) -> Option<CatalogItem> {
    let id = raw.get("id").and_then(Value::as_u64)?;

    // Movies carry `title`, other media kinds carry `name`
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .or_else(|| raw.get("name").and_then(Value::as_str))?
        .to_string();

    let poster_url = raw
        .get("poster_path")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", poster_base, path));

    let release_year = raw
        .get("release_date")
        .and_then(Value::as_str)
        .filter(|date| !date.is_empty())
        .map(|date| date.chars().take(4).collect());

    let vote_average = raw.get("vote_average").and_then(Value::as_f64);

    Some(CatalogItem {
        id,
        title,
        poster_url,
        release_year,
        vote_average,
    })
}

/// Extracts the raw genre-id list of an upstream item.
///
/// Not part of the public `CatalogItem` contract; used by search for local
/// genre post-filtering only.
pub(crate) fn genre_ids(raw: &Value) -> Vec<i64> {
    raw.get("genre_ids")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://image.tmdb.org/t/p/w300";

    #[test]
    fn test_normalize_full_item() {
        let raw = json!({
            "id": 27205,
            "title": "Inception",
            "poster_path": "/abc.jpg",
            "release_date": "2010-07-15",
            "vote_average": 8.8,
            "genre_ids": [28, 878]
        });

        let item = normalize_item(&raw, BASE).unwrap();
        assert_eq!(item.id, 27205);
        assert_eq!(item.title, "Inception");
        assert_eq!(
            item.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w300/abc.jpg")
        );
        assert_eq!(item.release_year.as_deref(), Some("2010"));
        assert_eq!(item.vote_average, Some(8.8));
    }

    #[test]
    fn test_normalize_missing_optional_fields() {
        let raw = json!({ "id": 7, "title": "Untitled" });

        let item = normalize_item(&raw, BASE).unwrap();
        assert_eq!(item.poster_url, None);
        assert_eq!(item.release_year, None);
        assert_eq!(item.vote_average, None);
    }

    #[test]
    fn test_normalize_null_optional_fields() {
        let raw = json!({
            "id": 7,
            "title": "Untitled",
            "poster_path": null,
            "release_date": null,
            "vote_average": null
        });

        let item = normalize_item(&raw, BASE).unwrap();
        assert_eq!(item.poster_url, None);
        assert_eq!(item.release_year, None);
        assert_eq!(item.vote_average, None);
    }

    #[test]
    fn test_normalize_title_falls_back_to_name() {
        let raw = json!({ "id": 9, "name": "Some Show" });
        let item = normalize_item(&raw, BASE).unwrap();
        assert_eq!(item.title, "Some Show");
    }

    #[test]
    fn test_normalize_prefers_title_over_name() {
        let raw = json!({ "id": 9, "title": "Film", "name": "Alt" });
        let item = normalize_item(&raw, BASE).unwrap();
        assert_eq!(item.title, "Film");
    }

    #[test]
    fn test_normalize_skips_item_without_id() {
        let raw = json!({ "title": "Orphan" });
        assert!(normalize_item(&raw, BASE).is_none());
    }

    #[test]
    fn test_normalize_skips_item_without_title_or_name() {
        let raw = json!({ "id": 3 });
        assert!(normalize_item(&raw, BASE).is_none());
    }

    #[test]
    fn test_normalize_empty_release_date_is_absent() {
        let raw = json!({ "id": 5, "title": "T", "release_date": "" });
        let item = normalize_item(&raw, BASE).unwrap();
        assert_eq!(item.release_year, None);
    }

    #[test]
    fn test_genre_ids_extraction() {
        let raw = json!({ "id": 1, "title": "T", "genre_ids": [28, 12] });
        assert_eq!(genre_ids(&raw), vec![28, 12]);
    }

    #[test]
    fn test_genre_ids_missing_defaults_empty() {
        let raw = json!({ "id": 1, "title": "T" });
        assert!(genre_ids(&raw).is_empty());
    }

    #[test]
    fn test_catalog_item_serializes_camel_case() {
        let item = CatalogItem {
            id: 1,
            title: "T".to_string(),
            poster_url: None,
            release_year: Some("2010".to_string()),
            vote_average: Some(7.0),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["posterUrl"], json!(null));
        assert_eq!(value["releaseYear"], json!("2010"));
        assert_eq!(value["voteAverage"], json!(7.0));
    }
}
