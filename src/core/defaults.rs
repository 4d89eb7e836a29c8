//! Built-in rates used when neither the provider nor a snapshot is available.

use crate::core::currency::{RateMapping, SUPPORTED_CODES};

/// Rate given to every supported code without an explicit entry below.
pub const PLACEHOLDER_RATE: f64 = 1.0;

/// Approximate USD-based rates for the major currencies.
const MAJOR_RATES: [(&str, f64); 15] = [
    ("USD", 1.0),
    ("IDR", 15925.78),
    ("EUR", 0.95),
    ("GBP", 0.79),
    ("JPY", 149.72),
    ("CNY", 7.28),
    ("AUD", 1.54),
    ("CAD", 1.40),
    ("CHF", 0.89),
    ("MXN", 20.42),
    ("NGN", 1674.42),
    ("INR", 84.75),
    ("BRL", 6.02),
    ("RUB", 106.29),
    ("ZAR", 18.15),
];

/// Returns the default table: explicit rates for major currencies and
/// [`PLACEHOLDER_RATE`] for the rest of the supported codes.
pub fn default_rates() -> RateMapping {
    let mut rates: RateMapping = SUPPORTED_CODES
        .iter()
        .map(|code| (*code, PLACEHOLDER_RATE))
        .collect();
    for (code, rate) in MAJOR_RATES {
        rates.insert(code, rate);
    }
    rates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_supported_code() {
        let rates = default_rates();
        assert_eq!(rates.len(), SUPPORTED_CODES.len());
        assert!(SUPPORTED_CODES.iter().all(|code| rates.contains(code)));
    }

    #[test]
    fn test_defaults_major_and_placeholder_rates() {
        let rates = default_rates();
        assert_eq!(rates.get("USD"), Some(1.0));
        assert_eq!(rates.get("IDR"), Some(15925.78));
        assert_eq!(rates.get("JPY"), Some(149.72));
        assert_eq!(rates.get("ZAR"), Some(18.15));
        assert_eq!(rates.get("AED"), Some(PLACEHOLDER_RATE));
        assert_eq!(rates.get("ZWL"), Some(PLACEHOLDER_RATE));
    }

    #[test]
    fn test_defaults_are_deterministic() {
        assert_eq!(default_rates(), default_rates());
    }
}
