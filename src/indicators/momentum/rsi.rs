//! RSI (Relative Strength Index) indicator
//!
//! RSI = 100 - (100 / (1 + RS)), RS = Wilder average gain / Wilder average loss

use crate::indicators::{closes, AlignedSeries};
use crate::models::indicators::Candle;

/// RSI series over raw values
pub fn rsi_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period + 1 {
        return Vec::new();
    }

    let n = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= n;
    avg_loss /= n;

    let mut out = Vec::with_capacity(values.len() - period);
    out.push(rsi_from_averages(avg_gain, avg_loss));

    for i in (period + 1)..values.len() {
        let change = values[i] - values[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        out.push(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // Flat window reads neutral, gains without losses saturate
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate the RSI series of closes
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Option<AlignedSeries> {
    let values = rsi_values(&closes(candles), period as usize);
    if values.is_empty() {
        return None;
    }
    Some(AlignedSeries::trailing(values, candles.len()))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<AlignedSeries> {
    calculate_rsi(candles, 14)
}
