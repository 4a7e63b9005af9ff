//! Generation-keyed response cache for backend list queries.
//!
//! Cached entries are keyed by (resource, session scope, generation). The
//! generation is a per-resource counter: invalidating a resource bumps its
//! counter, so every later lookup misses and refetches while stale entries
//! age out under the TTL. Entries are scoped to the session token that
//! fetched them, so one user's cached view is never served to another.
//!
//! Concurrent lookups for the same key are coalesced into a single backend
//! fetch. A failed fetch is never cached.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use moka::future::Cache;

use crate::config::CacheConfig;
use crate::errors::{Error, Result};
use crate::types::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource: Resource,
    scope: String,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct QueryCache {
    entries: Cache<CacheKey, Arc<serde_json::Value>>,
    generations: Arc<DashMap<Resource, AtomicU64>>,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(config.ttl)
                .build(),
            generations: Arc::new(DashMap::new()),
        }
    }

    fn current_generation(&self, resource: Resource) -> u64 {
        self.generations
            .entry(resource)
            .or_insert_with(|| AtomicU64::new(0))
            .load(Ordering::Acquire)
    }

    /// Look up a cached response for `resource` under the given session
    /// scope, fetching it if absent. Concurrent callers with the same key
    /// share a single fetch.
    pub async fn get_or_fetch<F>(&self, resource: Resource, scope: &str, fetch: F) -> Result<Arc<serde_json::Value>>
    where
        F: Future<Output = Result<serde_json::Value>>,
    {
        let key = CacheKey {
            resource,
            scope: scope.to_string(),
            generation: self.current_generation(resource),
        };

        self.entries
            .try_get_with(key, async move {
                let value = fetch.await?;
                Ok(Arc::new(value))
            })
            .await
            .map_err(unshare)
    }

    /// Mark every cached entry for `resource` stale. Later lookups, across
    /// all session scopes, will refetch.
    pub fn invalidate(&self, resource: Resource) {
        self.generations
            .entry(resource)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Release);
        tracing::debug!("Invalidated cached {resource} queries");
    }
}

/// Coalesced fetches share their error behind an Arc; peel it back into an
/// owned error for the caller.
fn unshare(err: Arc<Error>) -> Error {
    Arc::try_unwrap(err).unwrap_or_else(|shared| match &*shared {
        Error::Upstream {
            message,
            status,
            body,
            passthrough,
        } => Error::Upstream {
            message: message.clone(),
            status: *status,
            body: body.clone(),
            passthrough: *passthrough,
        },
        other => Error::Internal {
            operation: format!("complete shared fetch: {other}"),
        },
    })
}
