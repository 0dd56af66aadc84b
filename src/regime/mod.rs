//! Market regime classification
//!
//! A pure function of the indicator snapshot. Branches are checked in a fixed
//! order and the first match wins, so every snapshot maps to exactly one regime.

use crate::models::indicators::IndicatorSnapshot;
use crate::models::regime::{Regime, TrendDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeThresholds {
    /// ADX above this marks a trend
    pub trend_adx: f64,
    /// ADX below this marks a range
    pub range_adx: f64,
    /// ATR / close, in percent
    pub max_trend_volatility_pct: f64,
    pub high_volatility_pct: f64,
    pub high_volatility_bb_width: f64,
    pub breakout_bb_width: f64,
    pub breakout_volume_ratio: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            trend_adx: 25.0,
            range_adx: 20.0,
            max_trend_volatility_pct: 3.0,
            high_volatility_pct: 3.0,
            high_volatility_bb_width: 0.06,
            breakout_bb_width: 0.05,
            breakout_volume_ratio: 1.5,
        }
    }
}

/// Classify with default thresholds
pub fn classify_regime(snapshot: &IndicatorSnapshot) -> Regime {
    classify_regime_with(snapshot, &RegimeThresholds::default())
}

pub fn classify_regime_with(snapshot: &IndicatorSnapshot, thresholds: &RegimeThresholds) -> Regime {
    let volatility = snapshot.volatility_pct();

    if snapshot.adx > thresholds.trend_adx && volatility < thresholds.max_trend_volatility_pct {
        if let Some(direction) = trend_alignment(snapshot) {
            return Regime::Trending(direction);
        }
    }

    if volatility > thresholds.high_volatility_pct
        || snapshot.bb_width > thresholds.high_volatility_bb_width
    {
        return Regime::HighVolatility;
    }

    if snapshot.adx < thresholds.range_adx {
        return Regime::Ranging;
    }

    if snapshot.bb_width > thresholds.breakout_bb_width
        && snapshot.volume_ratio > thresholds.breakout_volume_ratio
    {
        if snapshot.close > snapshot.bb_upper {
            return Regime::Breakout(TrendDirection::Up);
        }
        if snapshot.close < snapshot.bb_lower {
            return Regime::Breakout(TrendDirection::Down);
        }
    }

    Regime::Neutral
}

/// Price and EMA50 on the same side of EMA200
fn trend_alignment(snapshot: &IndicatorSnapshot) -> Option<TrendDirection> {
    if snapshot.close > snapshot.ema200 && snapshot.ema50 > snapshot.ema200 {
        Some(TrendDirection::Up)
    } else if snapshot.close < snapshot.ema200 && snapshot.ema50 < snapshot.ema200 {
        Some(TrendDirection::Down)
    } else {
        None
    }
}
