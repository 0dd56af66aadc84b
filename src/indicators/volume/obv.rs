//! OBV (On-Balance Volume)

use crate::indicators::AlignedSeries;
use crate::models::indicators::Candle;

/// Cumulative volume signed by close-to-close direction, starting at zero
pub fn calculate_obv(candles: &[Candle]) -> Option<AlignedSeries> {
    if candles.is_empty() {
        return None;
    }

    let mut obv = Vec::with_capacity(candles.len());
    let mut running = 0.0;
    obv.push(running);
    for pair in candles.windows(2) {
        if pair[1].close > pair[0].close {
            running += pair[1].volume;
        } else if pair[1].close < pair[0].close {
            running -= pair[1].volume;
        }
        obv.push(running);
    }

    Some(AlignedSeries::trailing(obv, candles.len()))
}
