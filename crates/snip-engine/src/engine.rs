use crate::error::{CreateError, ResolveError};
use crate::shortener::Shortener;
use crate::validate::validate_url;
use async_trait::async_trait;
use snip_core::error::Result as StoreResult;
use snip_core::{InsertOutcome, Mapping, MappingStore, SeedSource, ShortCode, StoreError};
use snip_generator::Generator;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Tuning knobs for [`ResolutionEngine`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct EngineSettings {
    /// Insert attempts per `create` before giving up with `ExhaustedRetries`.
    #[builder(default = 10)]
    pub max_attempts: u32,
    /// Upper bound for each individual store or seed call.
    #[builder(default = Duration::from_secs(2))]
    pub store_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Allocates short codes and resolves them back to URLs.
///
/// A `create` runs a bounded loop: draw a seed, turn it into a candidate,
/// try to insert. An occupied candidate costs one attempt and the loop
/// continues with a fresh seed; a store failure ends it. The store's
/// `insert_if_absent` is the only synchronization point, so the engine
/// itself holds no locks and can be shared freely across tasks.
#[derive(Debug)]
pub struct ResolutionEngine<S, Q, G> {
    store: Arc<S>,
    seeds: Arc<Q>,
    generator: Arc<G>,
    settings: EngineSettings,
}

impl<S: MappingStore, Q: SeedSource, G: Generator> ResolutionEngine<S, Q, G> {
    pub fn new(store: S, seeds: Q, generator: G, settings: EngineSettings) -> Self {
        Self {
            store: Arc::new(store),
            seeds: Arc::new(seeds),
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn seeds(&self) -> &Q {
        &self.seeds
    }

    /// Runs a store or seed call under the configured timeout.
    async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        let limit = self.settings.store_timeout;
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| Err(StoreError::Timeout(format!("no response within {limit:?}"))))
    }
}

impl<S, Q, G> Clone for ResolutionEngine<S, Q, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            seeds: Arc::clone(&self.seeds),
            generator: Arc::clone(&self.generator),
            settings: self.settings,
        }
    }
}

#[async_trait]
impl<S: MappingStore, Q: SeedSource, G: Generator> Shortener for ResolutionEngine<S, Q, G> {
    async fn create(&self, url: &str) -> Result<ShortCode, CreateError> {
        validate_url(url)?;

        for attempt in 1..=self.settings.max_attempts {
            let seed = self.bounded(self.seeds.next_seed()).await?;
            let mapping = Mapping::new(self.generator.candidate(seed), url);

            match self.bounded(self.store.insert_if_absent(&mapping)).await? {
                InsertOutcome::Inserted => {
                    debug!(code = %mapping.code, attempt, "allocated short code");
                    return Ok(mapping.code);
                }
                InsertOutcome::Occupied => {
                    trace!(code = %mapping.code, attempt, "candidate already taken");
                }
            }
        }

        Err(CreateError::ExhaustedRetries {
            attempts: self.settings.max_attempts,
        })
    }

    async fn lookup(&self, code: &str) -> Result<Mapping, ResolveError> {
        let code = ShortCode::parse(code, self.generator.code_length())?;

        match self.bounded(self.store.lookup(&code)).await? {
            Some(mapping) => Ok(mapping),
            None => {
                trace!(code = %code, "short code not found");
                Err(ResolveError::NotFound)
            }
        }
    }
}
