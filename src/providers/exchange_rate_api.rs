use super::util::with_retry;
use crate::core::config::AppConfig;
use crate::core::currency::{RateMapping, RateSource, SUPPORTED_CODES};
use crate::core::error::{RateError, RateResult};
use crate::core::parser::try_parse_rates;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

const RETRY_DELAY_MS: u64 = 500;

/// Client for the exchangerate-api.com `v6` "latest" endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    retries: usize,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration, retries: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("xrate/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            retries,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.provider.base_url,
            &config.api_key()?,
            config.provider.timeout(),
            config.provider.retries,
        )
    }

    fn latest_url(&self, base: &str) -> String {
        format!("{}/v6/{}/latest/{}", self.base_url, self.api_key, base)
    }

    /// The request URL with the API key masked, for logging.
    fn redacted_url(&self, base: &str) -> String {
        format!("{}/v6/***/latest/{}", self.base_url, base)
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> RateResult<RateMapping> {
        let url = self.latest_url(base);
        debug!("Requesting exchange rates from {}", self.redacted_url(base));

        let client = &self.client;
        let url = &url;
        let response = with_retry(
            || async move {
                client
                    .get(url)
                    .send()
                    .await
                    .map_err(reqwest::Error::without_url)
            },
            self.retries,
            RETRY_DELAY_MS,
        )
        .await
        .map_err(|e| {
            RateError::NetworkFailure(format!("Request error: {e} for base currency: {base}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::NetworkFailure(format!(
                "HTTP error: {status} for base currency: {base}"
            )));
        }

        let text = response.text().await.map_err(|e| {
            RateError::NetworkFailure(format!(
                "Failed to read response body for {base}: {}",
                e.without_url()
            ))
        })?;
        if text.trim().is_empty() {
            return Err(RateError::ParseFailure(format!(
                "Empty response body for base currency: {base}"
            )));
        }

        let rates = try_parse_rates(&text, SUPPORTED_CODES).map_err(|e| match e {
            RateError::ProviderError(error_type) => {
                RateError::ProviderError(format!("{error_type} for base currency: {base}"))
            }
            other => RateError::ParseFailure(format!("Failed to parse response for {base}: {other}")),
        })?;
        if rates.is_empty() {
            return Err(RateError::ParseFailure(format!(
                "No recognizable rates for base currency: {base}"
            )));
        }
        debug!("Received {} rates for {}", rates.len(), base);
        Ok(rates)
    }
}
