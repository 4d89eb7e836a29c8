use crate::core::currency::{RateMapping, RateSource};
use crate::core::error::RateResult;
use crate::store::SnapshotStore;
use std::sync::Arc;
use tracing::warn;

/// Fetches live rates and writes every successful result through to the
/// snapshot store.
pub struct RateFetcher {
    source: Arc<dyn RateSource>,
    store: Arc<dyn SnapshotStore>,
}

impl RateFetcher {
    pub fn new(source: Arc<dyn RateSource>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { source, store }
    }

    pub async fn fetch(&self, base: &str) -> RateResult<RateMapping> {
        let rates = self.source.fetch_rates(base).await?;
        if !rates.is_empty() {
            self.store.save(&rates).await;
        }
        Ok(rates)
    }

    /// Like [`RateFetcher::fetch`], but any failure yields an empty mapping.
    pub async fn fetch_exchange_rates(&self, base: &str) -> RateMapping {
        self.fetch(base).await.unwrap_or_else(|e| {
            warn!(error = %e, base, "Exchange rate fetch failed");
            RateMapping::new()
        })
    }
}
