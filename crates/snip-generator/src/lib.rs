//! Short code generation.
//!
//! A [`Generator`] turns a seed into a candidate code; a
//! [`SeedSource`](snip_core::SeedSource) decides where seeds come from.
//! Keeping the two apart lets the same permutation serve both the
//! counter-based and the random strategy.

pub mod error;
pub mod permuted;
pub mod seed;

pub use error::GeneratorError;
pub use permuted::{PermutationKey, PermutedGenerator};
pub use seed::{CounterSeed, RandomSeed};

use snip_core::{CodeLength, ShortCode};

/// Trait for generating candidate short codes.
///
/// Implementations are pure: the same seed always yields the same code and
/// nothing is read from or written to storage. Whether the candidate is free
/// is for the store to decide.
pub trait Generator: Send + Sync + 'static {
    /// Produces the candidate code for `seed`.
    fn candidate(&self, seed: u64) -> ShortCode;

    /// The fixed length of every code this generator produces.
    fn code_length(&self) -> CodeLength;
}
