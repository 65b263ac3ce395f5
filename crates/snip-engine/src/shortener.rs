use crate::error::{CreateError, ResolveError};
use async_trait::async_trait;
use snip_core::{Mapping, ShortCode};

/// The operations the transport layer calls into.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Allocates a fresh short code for `url` and persists the mapping.
    ///
    /// Not idempotent: shortening the same URL twice yields two codes.
    async fn create(&self, url: &str) -> Result<ShortCode, CreateError>;

    /// Returns the URL stored under `code`.
    async fn resolve(&self, code: &str) -> Result<String, ResolveError> {
        self.lookup(code).await.map(|mapping| mapping.url)
    }

    /// Returns the full mapping stored under `code`.
    async fn lookup(&self, code: &str) -> Result<Mapping, ResolveError>;
}
