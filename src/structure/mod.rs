//! Market structure analyzers.
//!
//! Each analyzer is a pure function of the candle window and the current price.
//! Analyzers return empty results when the window is shorter than they need and
//! [`AnalyzerError::Unavailable`] when the data cannot be analyzed at all;
//! [`analyze_structure`] logs the latter and substitutes an empty result.

pub mod divergence;
pub mod fibonacci;
pub mod gaps;
pub mod liquidity;
pub mod order_blocks;

pub use divergence::{detect_divergences, DivergenceConfig};
pub use fibonacci::{analyze_fibonacci, FibonacciConfig};
pub use gaps::{detect_gaps, GapConfig};
pub use liquidity::{analyze_liquidity, LiquidityConfig};
pub use order_blocks::{detect_order_blocks, OrderBlockConfig};

use crate::error::AnalyzerError;
use crate::models::indicators::Candle;
use crate::models::structure::StructureReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tunables for all five analyzers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub liquidity: LiquidityConfig,
    pub order_blocks: OrderBlockConfig,
    pub gaps: GapConfig,
    pub fibonacci: FibonacciConfig,
    pub divergence: DivergenceConfig,
}

/// Run every analyzer, substituting an empty result for any that fails
pub fn analyze_structure(
    candles: &[Candle],
    current_price: f64,
    config: &StructureConfig,
) -> StructureReport {
    StructureReport {
        liquidity: or_empty(analyze_liquidity(candles, current_price, &config.liquidity)),
        order_blocks: or_empty(detect_order_blocks(
            candles,
            current_price,
            &config.order_blocks,
        )),
        gaps: or_empty(detect_gaps(candles, current_price, &config.gaps)),
        fibonacci: or_empty(analyze_fibonacci(candles, current_price, &config.fibonacci)),
        divergences: or_empty(detect_divergences(candles, &config.divergence)),
    }
}

fn or_empty<T: Default>(result: Result<T, AnalyzerError>) -> T {
    result.unwrap_or_else(|err| {
        warn!(error = %err, "Structure analyzer failed, using empty result");
        T::default()
    })
}

/// Reject windows with non-finite prices or a non-positive current price
pub(crate) fn ensure_analyzable(
    analyzer: &'static str,
    candles: &[Candle],
    current_price: f64,
) -> Result<(), AnalyzerError> {
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(AnalyzerError::unavailable(
            analyzer,
            format!("invalid current price {}", current_price),
        ));
    }
    if let Some(index) = candles.iter().position(|c| !c.is_finite()) {
        return Err(AnalyzerError::unavailable(
            analyzer,
            format!("non-finite candle at index {}", index),
        ));
    }
    Ok(())
}

/// Days elapsed between `earlier` and `reference`; never negative
pub(crate) fn days_between(earlier: DateTime<Utc>, reference: DateTime<Utc>) -> f64 {
    let seconds = (reference - earlier).num_seconds().max(0) as f64;
    seconds / 86_400.0
}

pub(crate) fn average_volume(candles: &[Candle]) -> f64 {
    if candles.is_empty() {
        return 0.0;
    }
    candles.iter().map(|c| c.volume).sum::<f64>() / candles.len() as f64
}
