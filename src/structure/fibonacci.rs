//! Fibonacci retracements of the latest swing

use crate::error::AnalyzerError;
use crate::models::indicators::Candle;
use crate::models::structure::{FibProximity, FibTrend, FibonacciAnalysis, FibonacciLevels};
use crate::structure::ensure_analyzable;
use serde::{Deserialize, Serialize};

pub const FIB_RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];
const KEY_RATIOS: [f64; 3] = [0.382, 0.5, 0.618];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FibonacciConfig {
    pub lookback: usize,
    /// Percent distance for SPOT_ON
    pub spot_on_pct: f64,
    /// Percent distance for NEAR
    pub near_pct: f64,
}

impl Default for FibonacciConfig {
    fn default() -> Self {
        Self {
            lookback: 60,
            spot_on_pct: 0.2,
            near_pct: 0.5,
        }
    }
}

/// Retracement levels from the extreme high/low of the last `lookback` candles
///
/// The trend is up when the low came first; levels then measure pullbacks
/// from the high.
pub fn calculate_levels(candles: &[Candle], lookback: usize) -> Option<FibonacciLevels> {
    if lookback == 0 || candles.len() < lookback {
        return None;
    }

    let recent = &candles[candles.len() - lookback..];
    let (mut high, mut high_index) = (f64::NEG_INFINITY, 0);
    let (mut low, mut low_index) = (f64::INFINITY, 0);
    for (i, candle) in recent.iter().enumerate() {
        if candle.high > high {
            high = candle.high;
            high_index = i;
        }
        if candle.low < low {
            low = candle.low;
            low_index = i;
        }
    }

    let range = high - low;
    if range <= 0.0 {
        return None;
    }

    let trend = if low_index < high_index {
        FibTrend::Up
    } else {
        FibTrend::Down
    };
    let level = |ratio: f64| match trend {
        FibTrend::Up => high - range * ratio,
        FibTrend::Down => low + range * ratio,
    };

    Some(FibonacciLevels {
        trend,
        swing_high: high,
        swing_low: low,
        level_236: level(FIB_RATIOS[0]),
        level_382: level(FIB_RATIOS[1]),
        level_500: level(FIB_RATIOS[2]),
        level_618: level(FIB_RATIOS[3]),
        level_786: level(FIB_RATIOS[4]),
    })
}

/// Nearest key retracement to `current_price` and how close it is
pub fn analyze_fibonacci(
    candles: &[Candle],
    current_price: f64,
    config: &FibonacciConfig,
) -> Result<Option<FibonacciAnalysis>, AnalyzerError> {
    ensure_analyzable("fibonacci", candles, current_price)?;
    let Some(levels) = calculate_levels(candles, config.lookback) else {
        return Ok(None);
    };

    let key_levels = [
        (KEY_RATIOS[0], levels.level_382),
        (KEY_RATIOS[1], levels.level_500),
        (KEY_RATIOS[2], levels.level_618),
    ];
    let (nearest_ratio, nearest_price) = key_levels
        .into_iter()
        .min_by(|a, b| {
            (a.1 - current_price)
                .abs()
                .total_cmp(&(b.1 - current_price).abs())
        })
        .unwrap_or(key_levels[1]);

    let distance_pct = (nearest_price - current_price).abs() / current_price * 100.0;
    let proximity = if distance_pct < config.spot_on_pct {
        FibProximity::SpotOn
    } else if distance_pct < config.near_pct {
        FibProximity::Near
    } else {
        FibProximity::Far
    };

    Ok(Some(FibonacciAnalysis {
        levels,
        nearest_ratio,
        nearest_price,
        distance_pct,
        proximity,
    }))
}
