use super::manager::RateManager;
use crate::core::currency::{CurrencyRateProvider, RateMapping};
use crate::core::error::{RateError, RateResult};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Converts amounts between currencies using the rates resolved by a
/// [`RateManager`].
pub struct Converter {
    manager: RateManager,
}

impl Converter {
    pub fn new(manager: RateManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &RateManager {
        &self.manager
    }

    /// Converts `amount` of `from` into `to`.
    ///
    /// Rates are re-resolved with `from` as the base on every call. If that
    /// fails, whatever mapping is already cached is used instead.
    #[instrument(name = "Convert", skip(self))]
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> RateResult<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(RateError::InvalidAmount(amount));
        }

        let rates = match self.manager.resolve(from).await {
            Ok(resolution) => resolution.rates,
            Err(e) => {
                let cached = self.manager.cache().rates().await;
                if cached.is_empty() {
                    return Err(e);
                }
                debug!(error = %e, "Resolution failed, converting with cached rates");
                cached
            }
        };

        let converted = convert_with(&rates, amount, from, to)?;
        debug!("Converted {amount} {from} to {converted} {to}");
        Ok(converted)
    }
}

/// `amount * rate[to] / rate[from]` under a single mapping.
pub fn convert_with(rates: &RateMapping, amount: f64, from: &str, to: &str) -> RateResult<f64> {
    let from_rate = rates
        .get(from)
        .ok_or_else(|| RateError::InvalidCurrency(from.to_string()))?;
    let to_rate = rates
        .get(to)
        .ok_or_else(|| RateError::InvalidCurrency(to.to_string()))?;
    Ok(amount * (to_rate / from_rate))
}

#[async_trait]
impl CurrencyRateProvider for Converter {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        Ok(self.convert(1.0, from, to).await?)
    }
}
