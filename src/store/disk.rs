use super::{SnapshotStore, render_snapshot};
use crate::core::currency::{RateMapping, SUPPORTED_CODES};
use crate::core::error::{RateError, RateResult};
use crate::core::parser::try_parse_rates;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps the snapshot in a plain text file.
///
/// Writes go to a sibling temporary file that is renamed over the snapshot, so
/// readers never observe a partially written file.
pub struct FileSnapshotStore {
    path: PathBuf,
    precision: usize,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>, precision: usize) -> Self {
        Self {
            path: path.into(),
            precision,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn storage_error(&self, action: &str, e: std::io::Error) -> RateError {
        RateError::StorageFailure(format!(
            "Failed to {action} {}: {e}",
            self.path.display()
        ))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn try_load(&self) -> RateResult<RateMapping> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No rate snapshot at {}", self.path.display());
                return Ok(RateMapping::new());
            }
            Err(e) => return Err(self.storage_error("read", e)),
        };

        let rates = try_parse_rates(&content, SUPPORTED_CODES)?;
        debug!(
            "Loaded {} rates from snapshot {}",
            rates.len(),
            self.path.display()
        );
        Ok(rates)
    }

    async fn try_save(&self, rates: &RateMapping) -> RateResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_error("create directory for", e))?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, render_snapshot(rates, self.precision))
            .await
            .map_err(|e| self.storage_error("write", e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.storage_error("replace", e))?;

        debug!(
            "Saved {} rates to snapshot {}",
            rates.len(),
            self.path.display()
        );
        Ok(())
    }
}
