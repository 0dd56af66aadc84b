//! Market data provider interface and bounded-retry helpers

use crate::error::MarketDataError;
use crate::models::indicators::Candle;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{error, warn};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the most recent `limit` candles for a symbol, oldest first
    async fn get_candles(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Get the latest traded price for a symbol
    async fn get_latest_price(&self, symbol: &str) -> Result<f64, MarketDataError>;

    /// Bid/ask volume imbalance in percent, positive when bids dominate
    async fn get_order_book_imbalance(&self, _symbol: &str) -> Result<Option<f64>, MarketDataError> {
        Ok(None)
    }
}

/// Bounded retry with exponential backoff for transient failures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    pub min_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// Fetch candles, retrying transient failures. Returns an empty vector once
/// retries are exhausted or on a permanent error; the caller skips the symbol.
pub async fn fetch_candles_with_retry(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    timeframe: &str,
    limit: usize,
    policy: &RetryPolicy,
) -> Vec<Candle> {
    let result = (|| async { provider.get_candles(symbol, timeframe, limit).await })
        .retry(policy.backoff())
        .when(MarketDataError::is_transient)
        .notify(|err: &MarketDataError, delay: Duration| {
            warn!(
                symbol = %symbol,
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "Candle fetch failed for {}, retrying",
                symbol
            );
        })
        .await;

    match result {
        Ok(candles) => candles,
        Err(e) => {
            let e = exhausted(e, policy);
            error!(symbol = %symbol, error = %e, "Giving up on candles for {}", symbol);
            Vec::new()
        }
    }
}

/// Latest price with the same retry behaviour; `None` when unavailable
pub async fn fetch_price_with_retry(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    policy: &RetryPolicy,
) -> Option<f64> {
    let result = (|| async { provider.get_latest_price(symbol).await })
        .retry(policy.backoff())
        .when(MarketDataError::is_transient)
        .notify(|err: &MarketDataError, delay: Duration| {
            warn!(
                symbol = %symbol,
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "Price fetch failed for {}, retrying",
                symbol
            );
        })
        .await;

    match result {
        Ok(price) => Some(price),
        Err(e) => {
            let e = exhausted(e, policy);
            error!(symbol = %symbol, error = %e, "Giving up on price for {}", symbol);
            None
        }
    }
}

fn exhausted(err: MarketDataError, policy: &RetryPolicy) -> MarketDataError {
    if err.is_transient() {
        MarketDataError::RetriesExhausted {
            attempts: policy.max_attempts,
            last_error: err.to_string(),
        }
    } else {
        err
    }
}
