use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("multiplier {0} shares a factor with 62 and would not permute the code space")]
    MultiplierNotCoprime(u64),
}
