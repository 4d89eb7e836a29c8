//! Error kinds of the rate pipeline.
//!
//! Only `InvalidCurrency` and `InvalidAmount` reach callers of a conversion;
//! the others are absorbed by the fallback chain and logged.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    /// Connection failure, timeout or non-success HTTP status.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The provider answered but reported an error in its payload.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// A document could not be read as a rate mapping.
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// Reading or writing the rate snapshot failed.
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
}

pub type RateResult<T> = Result<T, RateError>;
