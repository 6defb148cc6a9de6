use async_trait::async_trait;
use axum::body::Bytes;
use moka::{future::Cache, Expiry};
use std::time::{Duration, Instant};

/// Replayable subset of a proxied response.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Key-value store for proxied responses. Expiry is the store's own
/// business; callers hand over a TTL at write time and never delete.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedResponse>;
    async fn put(&self, key: String, response: CachedResponse, ttl: Duration);
}

#[derive(Clone)]
struct StoredEntry {
    response: CachedResponse,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, StoredEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache store. TTL counts from insertion, last write wins.
pub struct MokaResponseCache {
    inner: Cache<String, StoredEntry>,
}

impl MokaResponseCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

#[async_trait]
impl ResponseCache for MokaResponseCache {
    async fn get(&self, key: &str) -> Option<CachedResponse> {
        self.inner.get(key).await.map(|entry| entry.response)
    }

    async fn put(&self, key: String, response: CachedResponse, ttl: Duration) {
        self.inner.insert(key, StoredEntry { response, ttl }).await;
    }
}

/// Cache key for a forecast query. Percent-encoding the raw value keeps
/// distinct queries from ever collapsing onto the same key.
pub fn weather_cache_key(q: &str) -> String {
    format!("weather:{}", urlencoding::encode(q))
}
