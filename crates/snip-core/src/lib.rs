//! Core types and traits for the snip URL shortener.
//!
//! This crate holds what every other crate agrees on: the validated
//! [`ShortCode`], the persisted [`Mapping`], and the two storage seams,
//! [`MappingStore`] and [`SeedSource`].

pub mod error;
pub mod mapping;
pub mod seed;
pub mod shortcode;

pub use error::{CodeError, StoreError};
pub use mapping::{InsertOutcome, Mapping, MappingStore};
pub use seed::SeedSource;
pub use shortcode::{CodeLength, ShortCode, BASE62_ALPHABET};
