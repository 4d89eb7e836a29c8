use super::fetcher::RateFetcher;
use crate::core::cache::{CachedRates, RateCache, RateOrigin};
use crate::core::currency::{RateMapping, is_supported};
use crate::core::defaults::default_rates;
use crate::core::error::{RateError, RateResult};
use crate::store::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A resolved rate mapping and the tier it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub rates: RateMapping,
    pub origin: RateOrigin,
}

/// Resolves the rates in effect: live rates if the provider answers, else the
/// stored snapshot, else the built-in defaults.
pub struct RateManager {
    fetcher: RateFetcher,
    store: Arc<dyn SnapshotStore>,
    cache: RateCache,
    ttl: Option<Duration>,
}

impl RateManager {
    pub fn new(fetcher: RateFetcher, store: Arc<dyn SnapshotStore>, cache: RateCache) -> Self {
        Self {
            fetcher,
            store,
            cache,
            ttl: None,
        }
    }

    /// Reuse live rates younger than `ttl` instead of fetching again.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Warms the cache with a resolution for `reference` and returns the manager.
    pub async fn start(self, reference: &str) -> Self {
        if let Err(e) = self.resolve(reference).await {
            warn!(error = %e, reference, "Could not warm the rate cache");
        }
        self
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Runs the fallback chain for `base` and installs the result in the cache.
    ///
    /// Fails only when `base` is not a supported currency.
    pub async fn resolve(&self, base: &str) -> RateResult<Resolution> {
        if !is_supported(base) {
            return Err(RateError::InvalidCurrency(base.to_string()));
        }

        if let Some(ttl) = self.ttl
            && let Some(cached) = self.cache.fresh_live(ttl).await
        {
            debug!(base, cached_base = %cached.base, "Reusing fresh live rates");
            return Ok(Resolution {
                rates: cached.rates,
                origin: cached.origin,
            });
        }

        let resolution = self.run_fallback_chain(base).await;
        info!(
            base,
            origin = %resolution.origin,
            count = resolution.rates.len(),
            "Resolved exchange rates"
        );
        self.cache
            .replace(CachedRates::new(
                base,
                resolution.rates.clone(),
                resolution.origin,
            ))
            .await;
        Ok(resolution)
    }

    async fn run_fallback_chain(&self, base: &str) -> Resolution {
        match self.fetcher.fetch(base).await {
            Ok(rates) if !rates.is_empty() => {
                return Resolution {
                    rates,
                    origin: RateOrigin::Live,
                };
            }
            Ok(_) => warn!(base, "Provider returned no rates, falling back to snapshot"),
            Err(e) => warn!(error = %e, base, "Live fetch failed, falling back to snapshot"),
        }

        let stored = self.store.load().await;
        if !stored.is_empty() {
            return Resolution {
                rates: stored,
                origin: RateOrigin::Snapshot,
            };
        }

        warn!("No rate snapshot available, using built-in default rates");
        let defaults = default_rates();
        self.store.save(&defaults).await;
        Resolution {
            rates: defaults,
            origin: RateOrigin::Defaults,
        }
    }

    /// Live rates for `base`, or an empty mapping if the provider fails.
    pub async fn fetch_exchange_rates(&self, base: &str) -> RateMapping {
        self.fetcher.fetch_exchange_rates(base).await
    }

    /// The stored snapshot, or an empty mapping.
    pub async fn load_rates_from_file(&self) -> RateMapping {
        self.store.load().await
    }

    /// The stored snapshot if there is one, otherwise the default table, which
    /// is then persisted.
    pub async fn get_default_rates(&self) -> RateMapping {
        let stored = self.store.load().await;
        if !stored.is_empty() {
            return stored;
        }
        let defaults = default_rates();
        self.store.save(&defaults).await;
        defaults
    }
}
