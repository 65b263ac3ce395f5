use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use snip_core::error::Result;
use snip_core::{InsertOutcome, Mapping, MappingStore, ShortCode};

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct StoredUrl {
    url: String,
    created_at: Timestamp,
}

/// In-memory implementation of [`MappingStore`] using DashMap.
///
/// `insert_if_absent` goes through DashMap's entry API, which holds the
/// shard's write lock between the presence check and the write. Two callers
/// racing on one code are serialized on that shard and only the first finds
/// the slot vacant.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    storage: DashMap<ShortCode, StoredUrl>,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl MappingStore for InMemoryStore {
    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<InsertOutcome> {
        match self.storage.entry(mapping.code.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::Occupied),
            Entry::Vacant(slot) => {
                slot.insert(StoredUrl {
                    url: mapping.url.clone(),
                    created_at: mapping.created_at,
                });
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        Ok(self.storage.get(code).map(|stored| Mapping {
            code: code.clone(),
            url: stored.url.clone(),
            created_at: stored.created_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn mapping(c: &str, url: &str) -> Mapping {
        Mapping::new(code(c), url)
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let store = InMemoryStore::new();
        let m = mapping("abc123", "https://example.com");

        let outcome = store.insert_if_absent(&m).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        let found = store.lookup(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(found, m);
    }

    #[tokio::test]
    async fn lookup_nonexistent() {
        let store = InMemoryStore::new();

        let result = store.lookup(&code("nope00")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn occupied_code_keeps_first_mapping() {
        let store = InMemoryStore::new();

        let first = mapping("abc123", "https://first.example");
        assert_eq!(store.insert_if_absent(&first).await.unwrap(), InsertOutcome::Inserted);

        let outcome = store
            .insert_if_absent(&mapping("abc123", "https://second.example"))
            .await
            .unwrap();
        assert_eq!(outcome, InsertOutcome::Occupied);

        let found = store.lookup(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(found.url, "https://first.example");
        assert_eq!(found.created_at, first.created_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn racing_inserts_on_one_code_have_a_single_winner() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];

        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let m = mapping("shared", &format!("https://example{i}.com"));
                store.insert_if_absent(&m).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_inserted() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_access() {
        let store = Arc::new(InMemoryStore::with_capacity(16));
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let m = mapping(&format!("code{:02}", i), &format!("https://example{}.com", i));
                assert_eq!(store.insert_if_absent(&m).await.unwrap(), InsertOutcome::Inserted);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let found = store
                .lookup(&code(&format!("code{:02}", i)))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(found.url, format!("https://example{}.com", i));
        }
    }
}
