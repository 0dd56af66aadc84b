//! Momentum strategy for trending markets

use crate::models::indicators::IndicatorSnapshot;
use crate::models::strategy::{StrategyKind, StrategySignal};
use crate::strategies::{MomentumWeights, Strategy};

const LONG_RSI_BAND: (f64, f64) = (40.0, 70.0);
const SHORT_RSI_BAND: (f64, f64) = (30.0, 60.0);
const VOLUME_RATIO_MIN: f64 = 1.2;
const ADX_TREND_MIN: f64 = 25.0;

#[derive(Debug, Clone, Default)]
pub struct MomentumStrategy {
    pub weights: MomentumWeights,
}

impl MomentumStrategy {
    pub fn new(weights: MomentumWeights) -> Self {
        Self { weights }
    }
}

impl Strategy for MomentumStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Momentum
    }

    fn compute(&self, ind: &IndicatorSnapshot) -> StrategySignal {
        let w = &self.weights;
        let mut signal = StrategySignal::default();

        // Long side
        if ind.close > ind.ema200 && ind.ema50 > ind.ema200 && ind.ema21 > ind.ema50 {
            signal.add_long(w.ema_alignment, "Bullish EMA alignment");
        }
        if ind.macd > ind.macd_signal && ind.macd > 0.0 {
            signal.add_long(w.macd_cross, "MACD bullish crossover");
        }
        if ind.rsi > LONG_RSI_BAND.0 && ind.rsi < LONG_RSI_BAND.1 {
            signal.add_long(w.rsi_band, format!("RSI optimal ({:.1})", ind.rsi));
        }
        if ind.volume_ratio > VOLUME_RATIO_MIN {
            signal.add_long(w.volume, format!("Volume {:.1}x avg", ind.volume_ratio));
        }
        if ind.adx > ADX_TREND_MIN {
            signal.add_long(w.adx, format!("Strong trend (ADX {:.1})", ind.adx));
        }
        if ind.plus_di > ind.minus_di {
            signal.add_long(w.dmi, "Buying pressure (DMI)");
        }
        if ind.obv > ind.obv_prev {
            signal.add_long(w.obv, "OBV rising");
        }

        // Short side
        if ind.close < ind.ema200 && ind.ema50 < ind.ema200 && ind.ema21 < ind.ema50 {
            signal.add_short(w.ema_alignment, "Bearish EMA alignment");
        }
        if ind.macd < ind.macd_signal && ind.macd < 0.0 {
            signal.add_short(w.macd_cross, "MACD bearish crossover");
        }
        if ind.rsi > SHORT_RSI_BAND.0 && ind.rsi < SHORT_RSI_BAND.1 {
            signal.add_short(w.rsi_band, format!("RSI optimal ({:.1})", ind.rsi));
        }
        if ind.volume_ratio > VOLUME_RATIO_MIN {
            signal.add_short(w.volume, format!("Volume {:.1}x avg", ind.volume_ratio));
        }
        if ind.adx > ADX_TREND_MIN {
            signal.add_short(w.adx, format!("Strong trend (ADX {:.1})", ind.adx));
        }
        if ind.minus_di > ind.plus_di {
            signal.add_short(w.dmi, "Selling pressure (DMI)");
        }
        if ind.obv < ind.obv_prev {
            signal.add_short(w.obv, "OBV falling");
        }

        signal
    }
}
