use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Latest indicator values for one evaluation window.
///
/// `*_prev` fields hold the value one candle earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub close: f64,

    pub ema9: f64,
    pub ema21: f64,
    pub ema50: f64,
    pub ema200: f64,

    pub rsi: f64,
    pub rsi_prev: f64,

    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub macd_histogram_prev: f64,

    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    /// (upper - lower) / middle
    pub bb_width: f64,

    pub atr: f64,

    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,

    pub stoch_rsi_k: f64,
    pub stoch_rsi_d: f64,
    pub stoch_rsi_k_prev: f64,

    pub obv: f64,
    pub obv_prev: f64,

    pub volume_avg: f64,
    pub volume_ratio: f64,
}

impl IndicatorSnapshot {
    /// ATR as a percentage of the close
    pub fn volatility_pct(&self) -> f64 {
        if self.close == 0.0 {
            return 0.0;
        }
        self.atr / self.close * 100.0
    }
}
