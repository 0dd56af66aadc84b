//! Stochastic RSI

use crate::common::math;
use crate::indicators::momentum::rsi::rsi_values;
use crate::indicators::{closes, AlignedSeries};
use crate::models::indicators::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct StochRsiSeries {
    pub k: AlignedSeries,
    pub d: AlignedSeries,
}

/// Stochastic oscillator applied to RSI, smoothed into %K and %D
pub fn calculate_stoch_rsi(
    candles: &[Candle],
    rsi_period: u32,
    stoch_period: u32,
    k_period: u32,
    d_period: u32,
) -> Option<StochRsiSeries> {
    let stoch_period = stoch_period as usize;
    let rsi = rsi_values(&closes(candles), rsi_period as usize);
    if stoch_period == 0 || rsi.len() < stoch_period {
        return None;
    }

    let stoch: Vec<f64> = rsi
        .windows(stoch_period)
        .map(|window| {
            let current = window[window.len() - 1];
            let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
            let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if highest > lowest {
                (current - lowest) / (highest - lowest) * 100.0
            } else {
                50.0
            }
        })
        .collect();

    let k = math::sma_series(&stoch, k_period as usize);
    let d = math::sma_series(&k, d_period as usize);
    if d.is_empty() {
        return None;
    }

    Some(StochRsiSeries {
        k: AlignedSeries::trailing(k, candles.len()),
        d: AlignedSeries::trailing(d, candles.len()),
    })
}

/// Stochastic RSI with default parameters (14, 14, 3, 3)
pub fn calculate_stoch_rsi_default(candles: &[Candle]) -> Option<StochRsiSeries> {
    calculate_stoch_rsi(candles, 14, 14, 3, 3)
}
