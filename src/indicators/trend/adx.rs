//! ADX (Average Directional Index) indicator
//!
//! Wilder's definition: smoothed +DM/-DM over smoothed true range give +DI/-DI,
//! DX is their normalized spread and ADX is the Wilder average of DX.

use crate::common::math;
use crate::indicators::AlignedSeries;
use crate::models::indicators::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub adx: AlignedSeries,
    pub plus_di: AlignedSeries,
    pub minus_di: AlignedSeries,
}

/// Calculate ADX with +DI and -DI
///
/// Needs at least `2 * period` candles for the first ADX value.
pub fn calculate_adx(candles: &[Candle], period: u32) -> Option<AdxSeries> {
    let period = period as usize;
    if period == 0 || candles.len() < period * 2 {
        return None;
    }

    let mut tr_values = Vec::with_capacity(candles.len() - 1);
    let mut plus_dm_values = Vec::with_capacity(candles.len() - 1);
    let mut minus_dm_values = Vec::with_capacity(candles.len() - 1);

    for pair in candles.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        tr_values.push(math::true_range(current.high, current.low, prev.close));

        let up_move = current.high - prev.high;
        let down_move = prev.low - current.low;

        plus_dm_values.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm_values.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let smoothed_tr = math::wilder_series(&tr_values, period);
    let smoothed_plus = math::wilder_series(&plus_dm_values, period);
    let smoothed_minus = math::wilder_series(&minus_dm_values, period);

    let mut plus_di = Vec::with_capacity(smoothed_tr.len());
    let mut minus_di = Vec::with_capacity(smoothed_tr.len());
    let mut dx = Vec::with_capacity(smoothed_tr.len());

    for ((tr, plus), minus) in smoothed_tr.iter().zip(&smoothed_plus).zip(&smoothed_minus) {
        let (pdi, mdi) = if *tr > 0.0 {
            (100.0 * plus / tr, 100.0 * minus / tr)
        } else {
            (0.0, 0.0)
        };
        let di_sum = pdi + mdi;
        dx.push(if di_sum > 0.0 {
            100.0 * (pdi - mdi).abs() / di_sum
        } else {
            0.0
        });
        plus_di.push(pdi);
        minus_di.push(mdi);
    }

    let adx = math::wilder_series(&dx, period);

    Some(AdxSeries {
        adx: AlignedSeries::trailing(adx, candles.len()),
        plus_di: AlignedSeries::trailing(plus_di, candles.len()),
        minus_di: AlignedSeries::trailing(minus_di, candles.len()),
    })
}

/// Calculate ADX with default period (14)
pub fn calculate_adx_default(candles: &[Candle]) -> Option<AdxSeries> {
    calculate_adx(candles, 14)
}
