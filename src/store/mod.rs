//! Persistence of the most recently resolved rate mapping.

pub mod disk;
pub mod memory;

use crate::core::currency::RateMapping;
use crate::core::error::RateResult;
use async_trait::async_trait;
use tracing::warn;

pub use disk::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

/// Storage for a single rate snapshot.
///
/// `try_load`/`try_save` report failures; `load`/`save` absorb them so the
/// fallback chain can carry on without a snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn try_load(&self) -> RateResult<RateMapping>;

    async fn try_save(&self, rates: &RateMapping) -> RateResult<()>;

    async fn load(&self) -> RateMapping {
        match self.try_load().await {
            Ok(rates) => rates,
            Err(e) => {
                warn!(error = %e, "Could not load rate snapshot");
                RateMapping::new()
            }
        }
    }

    async fn save(&self, rates: &RateMapping) {
        if let Err(e) = self.try_save(rates).await {
            warn!(error = %e, "Could not save rate snapshot");
        }
    }
}

/// Renders `rates` as a JSON object with one `"CODE": rate` line per entry.
///
/// Rates are written with `precision` decimals. Rates below one get as many
/// extra decimals as it takes to keep `precision` significant digits, so a
/// positive rate never renders as zero.
pub fn render_snapshot(rates: &RateMapping, precision: usize) -> String {
    if rates.is_empty() {
        return "{}\n".to_string();
    }
    let entries: Vec<String> = rates
        .iter()
        .map(|(code, rate)| {
            let decimals = rate_decimals(rate, precision);
            format!("  \"{code}\": {rate:.decimals$}")
        })
        .collect();
    format!("{{\n{}\n}}\n", entries.join(",\n"))
}

fn rate_decimals(rate: f64, precision: usize) -> usize {
    if rate >= 1.0 {
        return precision;
    }
    // Zeros between the decimal point and the first significant digit.
    let leading_zeros = (-rate.log10().floor() - 1.0).max(0.0) as usize;
    precision.max(leading_zeros + precision.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_rates;
    use crate::core::SUPPORTED_CODES;

    #[test]
    fn test_render_snapshot_format() {
        let rates: RateMapping = [("USD", 1.0), ("IDR", 15925.7791), ("EUR", 0.95)]
            .into_iter()
            .collect();
        assert_eq!(
            render_snapshot(&rates, 2),
            "{\n  \"EUR\": 0.95,\n  \"IDR\": 15925.78,\n  \"USD\": 1.00\n}\n"
        );
    }

    #[test]
    fn test_small_rates_keep_significant_digits() {
        let rates: RateMapping = [
            ("IDR", 1.0),
            ("USD", 0.0000628),
            ("EUR", 0.0000579),
            ("JPY", 0.0095),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            render_snapshot(&rates, 2),
            "{\n  \"EUR\": 0.000058,\n  \"IDR\": 1.00,\n  \"JPY\": 0.0095,\n  \"USD\": 0.000063\n}\n"
        );

        let loaded = parse_rates(&render_snapshot(&rates, 2), SUPPORTED_CODES);
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.get("JPY"), Some(0.0095));
    }

    #[test]
    fn test_rate_decimals() {
        assert_eq!(rate_decimals(15925.78, 2), 2);
        assert_eq!(rate_decimals(0.95, 2), 2);
        assert_eq!(rate_decimals(0.0095, 2), 4);
        assert_eq!(rate_decimals(0.5, 0), 1);
        assert_eq!(rate_decimals(0.0095, 6), 8);
    }

    #[test]
    fn test_render_empty_snapshot() {
        assert_eq!(render_snapshot(&RateMapping::new(), 2), "{}\n");
    }

    #[test]
    fn test_rendered_snapshot_is_strict_json() {
        let rates: RateMapping = [("USD", 1.0), ("JPY", 149.72)].into_iter().collect();
        let rendered = render_snapshot(&rates, 2);
        assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_ok());
        assert_eq!(parse_rates(&rendered, SUPPORTED_CODES), rates);
    }
}
