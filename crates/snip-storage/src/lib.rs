//! Mapping store backends.
//!
//! - [`InMemoryStore`]: a sharded concurrent map, for tests and single-node
//!   deployments that can afford to lose their data on restart.
//! - [`MySqlStore`]: durable storage; the primary key on `short_code` makes
//!   inserts atomic. [`MySqlSequence`] keeps the counter seed in the same
//!   database.
//! - [`CachedStore`]: a read-through cache in front of any other store.

pub mod cached;
pub mod memory;
pub mod mysql;

pub use cached::CachedStore;
pub use memory::InMemoryStore;
pub use mysql::{MySqlSequence, MySqlStore};
pub use snip_core::{InsertOutcome, Mapping, MappingStore, SeedSource, StoreError};
