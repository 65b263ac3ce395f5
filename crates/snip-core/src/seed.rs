use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Owned state that hands out one seed per insertion attempt.
///
/// A counter-backed source must never return the same seed twice, including
/// for attempts that ended in a collision; that is what guarantees a retry
/// loop makes forward progress. Sources that persist their state (next to
/// the mappings) report failures as [`StoreError`](crate::StoreError).
#[async_trait]
pub trait SeedSource: Send + Sync + 'static {
    async fn next_seed(&self) -> Result<u64>;
}

#[async_trait]
impl<Q: SeedSource> SeedSource for Arc<Q> {
    async fn next_seed(&self) -> Result<u64> {
        (**self).next_seed().await
    }
}
