use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;
use std::sync::Arc;

/// A persisted association between a short code and the URL it stands for.
///
/// Every field is fixed at insertion; mappings are never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub code: ShortCode,
    pub url: String,
    pub created_at: Timestamp,
}

impl Mapping {
    /// Creates a mapping stamped with the current time.
    pub fn new(code: ShortCode, url: impl Into<String>) -> Self {
        Self {
            code,
            url: url.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// Result of [`MappingStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum InsertOutcome {
    /// The code was free and now belongs to the new mapping.
    Inserted,
    /// The code was already taken; nothing was written.
    Occupied,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

/// Durable storage for mappings.
///
/// `insert_if_absent` is the synchronization point of the whole system:
/// among any number of concurrent callers inserting the same code, at most
/// one may observe [`InsertOutcome::Inserted`]. Backends get this from a
/// unique key constraint, a conditional put, or a lock keyed by code.
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Persists `mapping` unless its code is already present.
    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<InsertOutcome>;

    /// Retrieves the mapping for a given short code.
    /// Returns `None` if the code does not exist.
    async fn lookup(&self, code: &ShortCode) -> Result<Option<Mapping>>;
}

#[async_trait]
impl<S: MappingStore> MappingStore for Arc<S> {
    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<InsertOutcome> {
        (**self).insert_if_absent(mapping).await
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        (**self).lookup(code).await
    }
}
