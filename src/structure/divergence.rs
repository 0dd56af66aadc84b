//! Regular RSI divergences over the trailing candles

use crate::error::AnalyzerError;
use crate::indicators::momentum::calculate_rsi;
use crate::models::indicators::Candle;
use crate::models::structure::{Divergence, DivergenceDirection};
use crate::structure::ensure_analyzable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivergenceConfig {
    pub min_candles: usize,
    /// Pivots are searched this many candles back from the latest
    pub pivot_window: usize,
    pub rsi_period: u32,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            min_candles: 30,
            pivot_window: 20,
            rsi_period: 14,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pivot {
    index: usize,
    price: f64,
    rsi: f64,
}

/// Compare the two most recent price pivots against RSI at the same candles
///
/// Bullish: lower low in price with a higher RSI low. Bearish: higher high in
/// price with a lower RSI high.
pub fn detect_divergences(
    candles: &[Candle],
    config: &DivergenceConfig,
) -> Result<Vec<Divergence>, AnalyzerError> {
    let mut divergences = Vec::new();
    if candles.len() < config.min_candles.max(3) {
        return Ok(divergences);
    }
    if let Some(last) = candles.last() {
        ensure_analyzable("divergence", candles, last.close)?;
    }

    let Some(rsi) = calculate_rsi(candles, config.rsi_period) else {
        return Ok(divergences);
    };

    let last = candles.len() - 1;
    let mut lows = Vec::new();
    let mut highs = Vec::new();

    // Offsets from the latest candle, most recent first
    for offset in 2..config.pivot_window.min(last) {
        let i = last - offset;
        let Some(rsi_value) = rsi.at(i) else {
            continue;
        };
        let (prev, current, next) = (&candles[i - 1], &candles[i], &candles[i + 1]);

        if current.low < prev.low && current.low < next.low {
            lows.push(Pivot {
                index: i,
                price: current.low,
                rsi: rsi_value,
            });
        }
        if current.high > prev.high && current.high > next.high {
            highs.push(Pivot {
                index: i,
                price: current.high,
                rsi: rsi_value,
            });
        }
    }

    if let [recent, earlier, ..] = lows[..] {
        if recent.price < earlier.price && recent.rsi > earlier.rsi {
            divergences.push(Divergence {
                direction: DivergenceDirection::Bullish,
                strength: (recent.rsi - earlier.rsi).abs(),
                pivot_indices: [earlier.index, recent.index],
            });
        }
    }

    if let [recent, earlier, ..] = highs[..] {
        if recent.price > earlier.price && recent.rsi < earlier.rsi {
            divergences.push(Divergence {
                direction: DivergenceDirection::Bearish,
                strength: (earlier.rsi - recent.rsi).abs(),
                pivot_indices: [earlier.index, recent.index],
            });
        }
    }

    Ok(divergences)
}
