//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::indicators::{closes, AlignedSeries};
use crate::models::indicators::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: AlignedSeries,
    pub signal: AlignedSeries,
    pub histogram: AlignedSeries,
}

/// Calculate MACD: EMA(fast) - EMA(slow), signal = EMA(signal) of the MACD line
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdSeries> {
    let (fast, slow, signal) = (
        fast_period as usize,
        slow_period as usize,
        signal_period as usize,
    );
    if fast == 0 || fast >= slow || candles.len() < slow + signal - 1 {
        return None;
    }

    let closes = closes(candles);
    let fast_ema = math::ema_series(&closes, fast);
    let slow_ema = math::ema_series(&closes, slow);

    // Both series end on the last candle; drop the fast EMA's extra head
    let offset = fast_ema.len() - slow_ema.len();
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(i, slow_value)| fast_ema[i + offset] - slow_value)
        .collect();

    let signal_line = math::ema_series(&macd_line, signal);
    let head = macd_line.len() - signal_line.len();
    let histogram: Vec<f64> = signal_line
        .iter()
        .enumerate()
        .map(|(i, s)| macd_line[i + head] - s)
        .collect();

    let len = candles.len();
    Some(MacdSeries {
        macd: AlignedSeries::trailing(macd_line, len),
        signal: AlignedSeries::trailing(signal_line, len),
        histogram: AlignedSeries::trailing(histogram, len),
    })
}

/// Calculate MACD with default parameters (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Option<MacdSeries> {
    calculate_macd(candles, 12, 26, 9)
}
