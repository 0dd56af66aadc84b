//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::{closes, AlignedSeries};
use crate::models::indicators::Candle;

/// Calculate the EMA series of closes for a specific period
pub fn calculate_ema(candles: &[Candle], period: u32) -> Option<AlignedSeries> {
    if period == 0 || candles.len() < period as usize {
        return None;
    }

    let values = math::ema_series(&closes(candles), period as usize);
    Some(AlignedSeries::trailing(values, candles.len()))
}

/// Calculate multiple EMAs at once, skipping periods longer than the window
pub fn calculate_emas(candles: &[Candle], periods: &[u32]) -> Vec<(u32, AlignedSeries)> {
    periods
        .iter()
        .filter_map(|&period| calculate_ema(candles, period).map(|s| (period, s)))
        .collect()
}
