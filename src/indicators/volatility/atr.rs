//! ATR (Average True Range) indicator

use crate::common::math;
use crate::indicators::AlignedSeries;
use crate::models::indicators::Candle;

/// Calculate ATR with Wilder smoothing of the true range
pub fn calculate_atr(candles: &[Candle], period: u32) -> Option<AlignedSeries> {
    if period == 0 || candles.len() < period as usize + 1 {
        return None;
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| math::true_range(pair[1].high, pair[1].low, pair[0].close))
        .collect();

    let atr = math::wilder_series(&true_ranges, period as usize);
    Some(AlignedSeries::trailing(atr, candles.len()))
}

/// Calculate ATR with default period (14)
pub fn calculate_atr_default(candles: &[Candle]) -> Option<AlignedSeries> {
    calculate_atr(candles, 14)
}
