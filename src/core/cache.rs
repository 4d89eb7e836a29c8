use crate::core::currency::RateMapping;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// The fallback tier a rate mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    Live,
    Snapshot,
    Defaults,
}

impl Display for RateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateOrigin::Live => "live",
                RateOrigin::Snapshot => "snapshot",
                RateOrigin::Defaults => "defaults",
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct CachedRates {
    pub base: String,
    pub rates: RateMapping,
    pub origin: RateOrigin,
    pub stored_at: DateTime<Utc>,
}

impl CachedRates {
    pub fn new(base: &str, rates: RateMapping, origin: RateOrigin) -> Self {
        Self {
            base: base.to_string(),
            rates,
            origin,
            stored_at: Utc::now(),
        }
    }
}

/// The rate mapping currently in effect.
///
/// Clones share the same entry. The entry is only ever replaced as a whole;
/// with concurrent writers the last replacement wins.
#[derive(Clone, Default)]
pub struct RateCache {
    inner: Arc<Mutex<Option<CachedRates>>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<CachedRates> {
        let cache = self.inner.lock().await;
        if cache.is_some() {
            debug!("Cache HIT");
        } else {
            debug!("Cache MISS");
        }
        cache.clone()
    }

    /// Returns the cached mapping, or an empty one.
    pub async fn rates(&self) -> RateMapping {
        self.current()
            .await
            .map(|entry| entry.rates)
            .unwrap_or_default()
    }

    pub async fn is_empty(&self) -> bool {
        let cache = self.inner.lock().await;
        cache.as_ref().is_none_or(|entry| entry.rates.is_empty())
    }

    pub async fn replace(&self, entry: CachedRates) {
        let mut cache = self.inner.lock().await;
        debug!(origin = %entry.origin, base = %entry.base, "Cache REPLACE");
        *cache = Some(entry);
    }

    /// Returns the cached entry if it came from the provider less than `ttl` ago.
    pub async fn fresh_live(&self, ttl: Duration) -> Option<CachedRates> {
        let cache = self.inner.lock().await;
        cache
            .as_ref()
            .filter(|entry| entry.origin == RateOrigin::Live && !entry.rates.is_empty())
            .filter(|entry| {
                (Utc::now() - entry.stored_at)
                    .to_std()
                    .is_ok_and(|age| age < ttl)
            })
            .cloned()
    }
}
