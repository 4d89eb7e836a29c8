//! The rate pipeline: fetching, fallback resolution and conversion.

pub mod converter;
pub mod fetcher;
pub mod manager;

pub use converter::{Converter, convert_with};
pub use fetcher::RateFetcher;
pub use manager::{RateManager, Resolution};
