use crate::error::GeneratorError;
use crate::Generator;
use snip_core::{CodeLength, ShortCode};
use typed_builder::TypedBuilder;

const DEFAULT_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;
const DEFAULT_OFFSET: u64 = 0x5_DEEC_E66D;

/// Parameters of the affine permutation `seed * multiplier + offset (mod 62^n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct PermutationKey {
    /// Must be odd and not a multiple of 31.
    #[builder(default = DEFAULT_MULTIPLIER)]
    multiplier: u64,
    #[builder(default = DEFAULT_OFFSET)]
    offset: u64,
}

impl Default for PermutationKey {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Maps seeds onto fixed-length base62 codes through a bijection of the
/// code space.
///
/// Since the multiplier is coprime to `62^n`, seeds that differ modulo the
/// space size never share a code, and consecutive counter values land far
/// apart instead of reading as `0000001`, `0000002`, ...
#[derive(Debug, Clone)]
pub struct PermutedGenerator {
    length: CodeLength,
    multiplier: u128,
    offset: u128,
    space: u128,
}

impl PermutedGenerator {
    pub fn new(length: CodeLength, key: PermutationKey) -> Result<Self, GeneratorError> {
        if key.multiplier % 2 == 0 || key.multiplier % 31 == 0 {
            return Err(GeneratorError::MultiplierNotCoprime(key.multiplier));
        }

        Ok(Self::from_key(length, key))
    }

    /// A generator with the default key.
    pub fn with_length(length: CodeLength) -> Self {
        Self::from_key(length, PermutationKey::default())
    }

    fn from_key(length: CodeLength, key: PermutationKey) -> Self {
        let space = u128::from(length.space());
        Self {
            length,
            multiplier: u128::from(key.multiplier) % space,
            offset: u128::from(key.offset) % space,
            space,
        }
    }

    fn permute(&self, seed: u64) -> u64 {
        let seed = u128::from(seed) % self.space;
        // both factors are below 62^8 < 2^48, so the product fits in u128
        let value = (seed * self.multiplier + self.offset) % self.space;
        value as u64
    }
}

impl Default for PermutedGenerator {
    fn default() -> Self {
        Self::with_length(CodeLength::default())
    }
}

impl Generator for PermutedGenerator {
    fn candidate(&self, seed: u64) -> ShortCode {
        ShortCode::encode(self.permute(seed), self.length)
    }

    fn code_length(&self) -> CodeLength {
        self.length
    }
}
