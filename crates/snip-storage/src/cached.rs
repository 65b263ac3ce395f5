use async_trait::async_trait;
use moka::future::Cache;
use snip_core::error::Result;
use snip_core::{InsertOutcome, Mapping, MappingStore, ShortCode};
use tracing::trace;

/// A read-through cache in front of another [`MappingStore`].
///
/// Mappings never change once written, so a cached entry can only be evicted,
/// never go stale. Misses are not cached: a code that is absent now may be
/// created a moment later and must then be found.
#[derive(Debug, Clone)]
pub struct CachedStore<S> {
    inner: S,
    cache: Cache<ShortCode, Mapping>,
}

impl<S: MappingStore> CachedStore<S> {
    /// Wraps `inner` with a cache holding at most `max_capacity` mappings.
    pub fn new(inner: S, max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { inner, cache }
    }

    /// Returns a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &Cache<ShortCode, Mapping> {
        &self.cache
    }
}

#[async_trait]
impl<S: MappingStore> MappingStore for CachedStore<S> {
    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<InsertOutcome> {
        let outcome = self.inner.insert_if_absent(mapping).await?;
        if outcome.is_inserted() {
            // fresh codes are usually resolved soon after creation
            self.cache.insert(mapping.code.clone(), mapping.clone()).await;
        }
        Ok(outcome)
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        if let Some(mapping) = self.cache.get(code).await {
            trace!(code = %code, "cache hit");
            return Ok(Some(mapping));
        }

        trace!(code = %code, "cache miss, fetching from inner store");
        let found = self.inner.lookup(code).await?;
        if let Some(ref mapping) = found {
            self.cache.insert(code.clone(), mapping.clone()).await;
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn test_store() -> CachedStore<Arc<InMemoryStore>> {
        CachedStore::new(Arc::new(InMemoryStore::new()), 100)
    }

    #[tokio::test]
    async fn insert_populates_cache() {
        let store = test_store();
        let m = Mapping::new(code("abc123"), "https://example.com");

        assert_eq!(store.insert_if_absent(&m).await.unwrap(), InsertOutcome::Inserted);

        assert_eq!(store.cache().get(&code("abc123")).await, Some(m));
    }

    #[tokio::test]
    async fn occupied_insert_does_not_touch_cache() {
        let store = test_store();
        let first = Mapping::new(code("abc123"), "https://first.example");
        assert_eq!(store.inner().insert_if_absent(&first).await.unwrap(), InsertOutcome::Inserted);

        let outcome = store
            .insert_if_absent(&Mapping::new(code("abc123"), "https://second.example"))
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::Occupied);
        assert!(store.cache().get(&code("abc123")).await.is_none());
        let found = store.lookup(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(found.url, "https://first.example");
    }

    #[tokio::test]
    async fn lookup_backfills_cache_from_inner() {
        let store = test_store();
        let m = Mapping::new(code("abc123"), "https://example.com");
        assert_eq!(store.inner().insert_if_absent(&m).await.unwrap(), InsertOutcome::Inserted);

        assert!(store.cache().get(&code("abc123")).await.is_none());
        assert_eq!(store.lookup(&code("abc123")).await.unwrap(), Some(m.clone()));
        assert_eq!(store.cache().get(&code("abc123")).await, Some(m));
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let store = test_store();

        assert!(store.lookup(&code("later1")).await.unwrap().is_none());

        let m = Mapping::new(code("later1"), "https://example.com");
        assert_eq!(store.inner().insert_if_absent(&m).await.unwrap(), InsertOutcome::Inserted);

        assert_eq!(store.lookup(&code("later1")).await.unwrap(), Some(m));
    }
}
