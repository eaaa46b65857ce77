use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;

use crate::catalog::client::Params;

/// Builds the canonical cache key for a logical upstream request.
///
/// Parameters without a value are dropped and the remaining names are
/// sorted lexicographically, so logically identical requests collide to
/// the same key regardless of parameter order.
pub fn keyify(path: &str, params: &Params) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(name, value)| match value {
            Some(v) if !v.is_empty() => Some((*name, v.as_str())),
            _ => None,
        })
        .collect();
    pairs.sort_by_key(|(name, _)| *name);

    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", path, joined)
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// In-process response cache with per-entry expiry and an LRU capacity bound.
///
/// Staleness and capacity are separate concerns: expiry is lazy (an expired
/// entry is a miss, no background sweep) while the LRU bound keeps the map
/// from growing without limit over the process lifetime.
///
/// `get` and `set` are synchronous and never yield, so a lookup and the
/// write-back sandwich the suspending upstream call. Two tasks missing on
/// the same key concurrently may both fetch; the second write wins. That
/// duplicate fetch is accepted behavior.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Returns the cached payload for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key`, overwriting any existing entry and
    /// evicting the least recently used entry when at capacity.
    pub fn set(&self, key: String, value: Value) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(key, entry);
    }
}
