pub mod cli;
pub mod core;
pub mod providers;
pub mod service;
pub mod store;

use crate::core::cache::RateCache;
use crate::core::config::AppConfig;
use crate::providers::ExchangeRateApiProvider;
use crate::service::{Converter, RateFetcher, RateManager};
use crate::store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    Rates {
        base: Option<String>,
    },
    Codes,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        reference = %config.reference_currency,
        base_url = %config.provider.base_url,
        persist = config.persist,
        "Loaded config"
    );
    Ok(config)
}

/// Wires the provider, snapshot store and cache together. The cache starts
/// empty.
pub fn build_manager(config: &AppConfig) -> Result<RateManager> {
    let provider = ExchangeRateApiProvider::from_config(config)?;
    let store: Arc<dyn SnapshotStore> = if config.persist {
        Arc::new(FileSnapshotStore::new(
            config.snapshot_path()?,
            config.snapshot_precision,
        ))
    } else {
        debug!("Snapshot persistence disabled, keeping rates in memory");
        Arc::new(MemorySnapshotStore::new(config.snapshot_precision))
    };
    let fetcher = RateFetcher::new(Arc::new(provider), Arc::clone(&store));

    Ok(RateManager::new(fetcher, store, RateCache::new()).with_ttl(config.cache_ttl()))
}

/// Builds a manager and warms its cache for the configured reference currency.
pub async fn build_converter(config: &AppConfig) -> Result<Converter> {
    let manager = build_manager(config)?
        .start(&config.reference_currency)
        .await;
    Ok(Converter::new(manager))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    match command {
        AppCommand::Convert { amount, from, to } => {
            let config = load_config(config_path)?;
            cli::convert::run(&config, amount, &from, &to).await
        }
        AppCommand::Rates { base } => {
            let config = load_config(config_path)?;
            let base = base.unwrap_or_else(|| config.reference_currency.clone());
            cli::rates::run(&config, &base).await
        }
        AppCommand::Codes => {
            cli::rates::print_codes();
            Ok(())
        }
    }
}
