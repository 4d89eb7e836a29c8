use super::{SnapshotStore, render_snapshot};
use crate::core::currency::{RateMapping, SUPPORTED_CODES};
use crate::core::error::RateResult;
use crate::core::parser::try_parse_rates;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-process snapshot store for running without persistence.
///
/// The snapshot is kept in its rendered text form, so rounding behaves exactly
/// like the file store.
#[derive(Clone)]
pub struct MemorySnapshotStore {
    inner: Arc<Mutex<Option<String>>>,
    precision: usize,
}

impl MemorySnapshotStore {
    pub fn new(precision: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            precision,
        }
    }

    /// Creates a store already holding `content`, e.g. a hand-written snapshot.
    pub fn with_content(content: &str, precision: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(content.to_string()))),
            precision,
        }
    }

    pub async fn content(&self) -> Option<String> {
        self.inner.lock().await.clone()
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new(2)
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn try_load(&self) -> RateResult<RateMapping> {
        let snapshot = self.inner.lock().await;
        let Some(content) = snapshot.as_deref() else {
            debug!("Snapshot MISS");
            return Ok(RateMapping::new());
        };
        debug!("Snapshot HIT");
        try_parse_rates(content, SUPPORTED_CODES)
    }

    async fn try_save(&self, rates: &RateMapping) -> RateResult<()> {
        let mut snapshot = self.inner.lock().await;
        debug!("Snapshot PUT");
        *snapshot = Some(render_snapshot(rates, self.precision));
        Ok(())
    }
}
