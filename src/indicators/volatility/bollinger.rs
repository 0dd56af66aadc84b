//! Bollinger Bands indicator
//!
//! Middle Band = SMA(period)
//! Upper Band = Middle + (std_dev * standard deviation)
//! Lower Band = Middle - (std_dev * standard deviation)

use crate::common::math;
use crate::indicators::{closes, AlignedSeries};
use crate::models::indicators::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: AlignedSeries,
    pub middle: AlignedSeries,
    pub lower: AlignedSeries,
}

impl BollingerSeries {
    /// Latest band width relative to the middle band
    pub fn latest_width(&self) -> Option<f64> {
        let middle = self.middle.latest()?;
        if middle == 0.0 {
            return None;
        }
        Some((self.upper.latest()? - self.lower.latest()?) / middle)
    }
}

pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Option<BollingerSeries> {
    let period = period as usize;
    if period == 0 || candles.len() < period {
        return None;
    }

    let closes = closes(candles);
    let mut upper = Vec::with_capacity(closes.len() - period + 1);
    let mut middle = Vec::with_capacity(closes.len() - period + 1);
    let mut lower = Vec::with_capacity(closes.len() - period + 1);

    for end in period..=closes.len() {
        let window = &closes[..end];
        let mid = math::sma(window, period)?;
        let std = math::standard_deviation(window, period)?;
        upper.push(mid + std_dev * std);
        middle.push(mid);
        lower.push(mid - std_dev * std);
    }

    let len = candles.len();
    Some(BollingerSeries {
        upper: AlignedSeries::trailing(upper, len),
        middle: AlignedSeries::trailing(middle, len),
        lower: AlignedSeries::trailing(lower, len),
    })
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Option<BollingerSeries> {
    calculate_bollinger_bands(candles, 20, 2.0)
}
