//! Query cache keyed by [`QueryKey`], with targeted invalidation.
//!
//! Mounted queries watch the generation of their key. `invalidate` marks
//! every entry under a key prefix stale and bumps its generation, which makes
//! the owning queries refetch.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::api::{ApiClient, ApiError};
use crate::shared::config::QueryConfig;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self(segments.into_iter().map(|s| s.to_string()).collect())
    }

    /// Extend with one more segment.
    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<&str> for QueryKey {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    value: serde_json::Value,
    fetched_at: DateTime<Utc>,
    stale: bool,
}

#[derive(Clone, Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    generations: HashMap<QueryKey, u64>,
}

impl QueryCache {
    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }

    /// Make `key` visible to invalidation before its first response lands.
    pub fn register(&mut self, key: &QueryKey) {
        self.generations.entry(key.clone()).or_insert(0);
    }

    pub fn fresh(&self, key: &QueryKey, now: DateTime<Utc>, stale_time: Duration) -> Option<&serde_json::Value> {
        let entry = self.entries.get(key)?;
        if entry.stale || now - entry.fetched_at >= stale_time {
            return None;
        }
        Some(&entry.value)
    }

    pub fn put(&mut self, key: QueryKey, value: serde_json::Value, now: DateTime<Utc>) {
        self.generations.entry(key.clone()).or_insert(0);
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
                stale: false,
            },
        );
    }

    /// Returns how many keys were invalidated.
    pub fn invalidate(&mut self, prefix: &QueryKey) -> usize {
        for (key, entry) in self.entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
            }
        }
        let mut count = 0;
        for (key, generation) in self.generations.iter_mut() {
            if key.starts_with(prefix) {
                *generation += 1;
                count += 1;
            }
        }
        count
    }
}

/// Retry `fetch` up to `retries` extra times while the failure is
/// retryable. Other failures end the cycle at once.
pub async fn with_retry<T, F, Fut>(retries: u32, fetch: F) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < retries => {
                attempt += 1;
                log::debug!("retrying after: {} (attempt {})", e, attempt);
            }
            Err(e) => return Err(e),
        }
    }
}

#[derive(Clone, Copy)]
pub struct QueryClient {
    cache: RwSignal<QueryCache>,
    config: QueryConfig,
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            cache: RwSignal::new(QueryCache::default()),
            config,
        }
    }

    pub fn config(&self) -> QueryConfig {
        self.config
    }

    /// Tracked read: reactive contexts rerun when `key` is invalidated.
    pub fn generation(&self, key: &QueryKey) -> u64 {
        self.cache.with(|c| c.generation(key))
    }

    pub fn register(&self, key: &QueryKey) {
        self.cache.update_untracked(|c| c.register(key));
    }

    pub fn invalidate(&self, prefix: &QueryKey) {
        let mut count = 0;
        self.cache.update(|c| count = c.invalidate(prefix));
        log::debug!("invalidated {} queries under {}", count, prefix);
    }

    pub fn cached<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self
            .cache
            .with_untracked(|c| c.fresh(key, Utc::now(), self.config.stale_time).cloned())?;
        serde_json::from_value(value).ok()
    }

    /// Writing does not notify watchers; only invalidation does.
    pub fn store<T: Serialize>(&self, key: &QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.cache.update_untracked(|c| c.put(key.clone(), json, Utc::now())),
            Err(e) => log::warn!("not caching {}: {}", key, e),
        }
    }

    /// Fresh cache hit, or fetch with the configured retry and cache the
    /// result.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.cached(key) {
            log::debug!("cache hit {}", key);
            return Ok(hit);
        }
        let value = with_retry(self.config.retry, fetch).await?;
        self.store(key, &value);
        Ok(value)
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}

pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>().expect("QueryClient not found. Wrap your app with AppProviders.")
}

pub fn use_api_client() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient not found. Wrap your app with AppProviders.")
}
