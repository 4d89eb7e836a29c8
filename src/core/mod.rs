//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod defaults;
pub mod error;
pub mod log;
pub mod parser;

// Re-export main types for cleaner imports
pub use cache::{CachedRates, RateCache, RateOrigin};
pub use currency::{CurrencyRateProvider, RateMapping, RateSource, SUPPORTED_CODES, is_supported};
pub use error::{RateError, RateResult};
