//! Currency codes, rate mappings and the rate provider abstractions

use crate::core::error::RateResult;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Every currency code the application recognizes, in alphabetical order.
pub const SUPPORTED_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD",
    "CDF", "CHF", "CLP", "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK", "DOP", "DZD",
    "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "FOK", "GBP", "GEL", "GGP", "GHS", "GIP", "GMD",
    "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR", "ILS", "IMP", "INR", "IQD",
    "IRR", "ISK", "JEP", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KID", "KMF", "KRW", "KWD",
    "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD", "MMK",
    "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK",
    "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR", "RON", "RSD",
    "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SOS", "SRD", "SSP",
    "STN", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY", "TTD", "TVD", "TWD", "TZS",
    "UAH", "UGX", "USD", "UYU", "UZS", "VES", "VND", "VUV", "WST", "XAF", "XCD", "XDR", "XOF",
    "XPF", "YER", "ZAR", "ZMW", "ZWL",
];

/// Returns true when `code` is one of [`SUPPORTED_CODES`]. Matching is exact.
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_CODES.contains(&code)
}

/// Exchange rates keyed by currency code, all relative to one base currency.
///
/// Only supported codes with positive, finite rates can be stored. Entries are
/// kept ordered by code so that anything rendered from a mapping is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateMapping {
    rates: BTreeMap<String, f64>,
}

impl RateMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rate, returning false if the code or the rate was rejected.
    pub fn insert(&mut self, code: &str, rate: f64) -> bool {
        if !is_supported(code) || !rate.is_finite() || rate <= 0.0 {
            return false;
        }
        self.rates.insert(code.to_string(), rate);
        true
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for RateMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut mapping = RateMapping::new();
        for (code, rate) in iter {
            mapping.insert(code, rate);
        }
        mapping
    }
}

/// A source of complete rate mappings for a base currency, e.g. a remote API.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> RateResult<RateMapping>;
}

/// Pairwise rate lookup.
#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
