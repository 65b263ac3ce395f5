//! Short code allocation and resolution.
//!
//! [`ResolutionEngine`] ties a [`SeedSource`](snip_core::SeedSource), a
//! [`Generator`](snip_generator::Generator) and a
//! [`MappingStore`](snip_core::MappingStore) together behind the two
//! operations the transport layer needs, described by [`Shortener`].

pub mod engine;
pub mod error;
pub mod shortener;
mod validate;

pub use engine::{EngineSettings, ResolutionEngine};
pub use error::{CreateError, ResolveError};
pub use shortener::Shortener;
