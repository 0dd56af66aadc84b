//! Volume moving average and ratio

use crate::common::math;
use crate::indicators::AlignedSeries;
use crate::models::indicators::Candle;

pub fn calculate_volume_sma(candles: &[Candle], period: u32) -> Option<AlignedSeries> {
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    let values = math::sma_series(&volumes, period as usize);
    if values.is_empty() {
        return None;
    }
    Some(AlignedSeries::trailing(values, candles.len()))
}

/// Last candle's volume relative to the average; 1.0 when the average is zero
pub fn volume_ratio(last_volume: f64, average: f64) -> f64 {
    if average > 0.0 {
        last_volume / average
    } else {
        1.0
    }
}
