//! Indicator snapshot engine
//!
//! Computes every indicator the strategies and the decision vector need from a
//! single candle window and reduces them to latest/previous readings.

use crate::error::SignalError;
use crate::indicators::momentum::{calculate_macd, calculate_rsi, calculate_stoch_rsi};
use crate::indicators::trend::{calculate_adx, calculate_ema};
use crate::indicators::volatility::{calculate_atr, calculate_bollinger_bands};
use crate::indicators::volume::{calculate_obv, calculate_volume_sma, volume_ratio};
use crate::indicators::AlignedSeries;
use crate::models::indicators::{Candle, IndicatorSnapshot};

/// Candles required before a snapshot is produced
pub const MIN_CANDLES: usize = 200;

pub const DEFAULT_ADX: f64 = 20.0;
pub const DEFAULT_DI: f64 = 20.0;
pub const DEFAULT_BB_WIDTH: f64 = 0.04;
pub const DEFAULT_STOCH_RSI: f64 = 50.0;
pub const DEFAULT_RSI: f64 = 50.0;

fn latest_or(series: Option<&AlignedSeries>, fallback: f64) -> f64 {
    series.and_then(|s| s.latest()).unwrap_or(fallback)
}

/// Previous value, else the latest value, else `fallback`
fn previous_or(series: Option<&AlignedSeries>, fallback: f64) -> f64 {
    series
        .and_then(|s| s.previous().or_else(|| s.latest()))
        .unwrap_or(fallback)
}

/// Calculate the indicator snapshot for the latest candle of `candles`
///
/// Fails with [`SignalError::InsufficientData`] below [`MIN_CANDLES`]; the
/// caller skips the cycle. Indicators whose warm-up is not met fall back to
/// neutral constants instead of failing.
pub fn calculate_snapshot(candles: &[Candle]) -> Result<IndicatorSnapshot, SignalError> {
    if candles.len() < MIN_CANDLES {
        return Err(SignalError::InsufficientData {
            required: MIN_CANDLES,
            actual: candles.len(),
        });
    }

    let last = &candles[candles.len() - 1];
    let close = last.close;

    let ema = |period| calculate_ema(candles, period);
    let (ema9, ema21, ema50, ema200) = (ema(9), ema(21), ema(50), ema(200));

    let rsi = calculate_rsi(candles, 14);
    let macd = calculate_macd(candles, 12, 26, 9);
    let bollinger = calculate_bollinger_bands(candles, 20, 2.0);
    let atr = calculate_atr(candles, 14);
    let adx = calculate_adx(candles, 14);
    let stoch = calculate_stoch_rsi(candles, 14, 14, 3, 3);
    let obv = calculate_obv(candles);
    let volume_avg = calculate_volume_sma(candles, 20);

    let bb_middle = latest_or(bollinger.as_ref().map(|b| &b.middle), close);
    let bb_width = bollinger
        .as_ref()
        .and_then(|b| b.latest_width())
        .unwrap_or(DEFAULT_BB_WIDTH);
    let volume_avg_value = latest_or(volume_avg.as_ref(), last.volume);

    let rsi_value = latest_or(rsi.as_ref(), DEFAULT_RSI);
    let macd_histogram = latest_or(macd.as_ref().map(|m| &m.histogram), 0.0);
    let stoch_k = latest_or(stoch.as_ref().map(|s| &s.k), DEFAULT_STOCH_RSI);
    let obv_value = latest_or(obv.as_ref(), 0.0);

    Ok(IndicatorSnapshot {
        timestamp: last.timestamp,
        close,
        ema9: latest_or(ema9.as_ref(), close),
        ema21: latest_or(ema21.as_ref(), close),
        ema50: latest_or(ema50.as_ref(), close),
        ema200: latest_or(ema200.as_ref(), close),
        rsi: rsi_value,
        rsi_prev: previous_or(rsi.as_ref(), rsi_value),
        macd: latest_or(macd.as_ref().map(|m| &m.macd), 0.0),
        macd_signal: latest_or(macd.as_ref().map(|m| &m.signal), 0.0),
        macd_histogram,
        macd_histogram_prev: previous_or(macd.as_ref().map(|m| &m.histogram), macd_histogram),
        bb_upper: latest_or(bollinger.as_ref().map(|b| &b.upper), close * 1.02),
        bb_middle,
        bb_lower: latest_or(bollinger.as_ref().map(|b| &b.lower), close * 0.98),
        bb_width,
        atr: latest_or(atr.as_ref(), 0.0),
        adx: latest_or(adx.as_ref().map(|a| &a.adx), DEFAULT_ADX),
        plus_di: latest_or(adx.as_ref().map(|a| &a.plus_di), DEFAULT_DI),
        minus_di: latest_or(adx.as_ref().map(|a| &a.minus_di), DEFAULT_DI),
        stoch_rsi_k: stoch_k,
        stoch_rsi_d: latest_or(stoch.as_ref().map(|s| &s.d), DEFAULT_STOCH_RSI),
        stoch_rsi_k_prev: previous_or(stoch.as_ref().map(|s| &s.k), stoch_k),
        obv: obv_value,
        obv_prev: previous_or(obv.as_ref(), obv_value),
        volume_avg: volume_avg_value,
        volume_ratio: volume_ratio(last.volume, volume_avg_value),
    })
}
