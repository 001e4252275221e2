//! Time-boxed response cache layered over a [`KeyValueStore`].
//!
//! Entries are stored as `{"data": ..., "timestamp": <epoch millis>}`. An
//! entry whose age reaches [`CACHE_TTL_MINUTES`], or whose timestamp lies in
//! the future, is never returned and is removed the next time it is looked up.

pub mod keys;

pub use keys::{product_detail, CacheNamespace};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

pub const CACHE_TTL_MINUTES: i64 = 30;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    data: Value,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    namespace: CacheNamespace,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            namespace: CacheNamespace::default(),
            ttl: Duration::minutes(CACHE_TTL_MINUTES),
        }
    }

    pub fn with_namespace(mut self, namespace: CacheNamespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn namespace(&self) -> &CacheNamespace {
        &self.namespace
    }

    /// Return the payload stored under `key` if it is younger than the TTL.
    ///
    /// Expired and unreadable entries are purged and reported as a miss.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "malformed cache entry, purging");
                self.purge(key);
                return None;
            }
        };

        let age = self.clock.now().signed_duration_since(entry.timestamp);
        if age < Duration::zero() || age >= self.ttl {
            debug!(key, age_secs = age.num_seconds(), "cache entry expired, purging");
            self.purge(key);
            return None;
        }

        debug!(key, "cache hit");
        Some(entry.data)
    }

    /// Typed [`lookup`](Self::lookup). A payload that does not fit `T` is a miss.
    pub fn lookup_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key)
            .and_then(|data| serde_json::from_value(data).ok())
    }

    /// Store `payload` under `key` stamped with the current time.
    pub fn store(&self, key: &str, payload: &Value) -> Result<()> {
        let entry = CacheEntry {
            data: payload.clone(),
            timestamp: self.clock.now(),
        };
        self.store.set(key, &serde_json::to_string(&entry)?)
    }

    /// Drop one entry, or with `None` every entry in this cache's namespace.
    pub fn invalidate(&self, key: Option<&str>) -> Result<()> {
        match key {
            Some(key) => self.store.remove(key),
            None => {
                for key in &self.namespace.fixed {
                    self.store.remove(key)?;
                }
                if !self.namespace.prefixes.is_empty() {
                    for key in self.store.keys()? {
                        if self.namespace.prefixes.iter().any(|p| key.starts_with(p)) {
                            self.store.remove(&key)?;
                        }
                    }
                }
                debug!("cache namespace invalidated");
                Ok(())
            }
        }
    }

    /// Serve `key` from the cache, or run `fetch`, store its result and return it.
    ///
    /// A failed store is logged and does not fail the read.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(hit) = self.lookup(key) {
            return Ok(hit);
        }

        let fresh = fetch().await?;
        if let Err(e) = self.store(key, &fresh) {
            warn!(key, error = %e, "failed to store cache entry");
        }
        Ok(fresh)
    }

    fn purge(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "failed to purge cache entry");
        }
    }
}
