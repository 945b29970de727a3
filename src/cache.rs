//! In-process key/value cache with per-entry expiry.
//!
//! Values are stored as decoded JSON so any serializable payload can live
//! under a string key. Recomputation of a missing or expired key is
//! single-flighted: concurrent callers for the same key wait for the first
//! computation instead of running their own.

use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<T> {
    pub value: T,
    /// True when the value was produced by this call rather than read from the cache.
    pub computed: bool,
}

#[derive(Default)]
pub struct TtlCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TtlCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, or runs `compute` and keeps its
    /// result for `ttl` from the moment it was produced.
    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Lookup<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(value) = self.fresh_value(key).await {
            record_lookup(key, "hit");
            return Lookup {
                value,
                computed: false,
            };
        }

        let flight = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = flight.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(value) = self.fresh_value(key).await {
            record_lookup(key, "hit");
            return Lookup {
                value,
                computed: false,
            };
        }

        record_lookup(key, "miss");
        debug!(key, "Cache miss, computing value");

        let value = compute().await;

        match serde_json::to_value(&value) {
            Ok(json) => {
                let entry = CacheEntry {
                    value: json,
                    expires_at: Instant::now() + ttl,
                };
                self.entries.write().await.insert(key.to_string(), entry);
            }
            Err(e) => warn!(key, "Value could not be cached: {}", e),
        }

        self.in_flight.lock().await.remove(key);

        Lookup {
            value,
            computed: true,
        }
    }

    async fn fresh_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        if !entry.is_fresh(Instant::now()) {
            return None;
        }

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, "Cached value has an unexpected shape: {}", e);
                None
            }
        }
    }

    /// Number of entries that have not expired yet.
    pub async fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_fresh(now))
            .count()
    }
}

fn record_lookup(key: &str, result: &'static str) {
    metrics::counter!("cache_lookups_total", "key" => key.to_string(), "result" => result)
        .increment(1);
}
