//! Breakout strategy for band expansions on volume

use crate::models::indicators::IndicatorSnapshot;
use crate::models::strategy::{StrategyKind, StrategySignal};
use crate::strategies::{BreakoutWeights, Strategy};

const VOLUME_RATIO_MIN: f64 = 1.5;

#[derive(Debug, Clone, Default)]
pub struct BreakoutStrategy {
    pub weights: BreakoutWeights,
}

impl BreakoutStrategy {
    pub fn new(weights: BreakoutWeights) -> Self {
        Self { weights }
    }
}

impl Strategy for BreakoutStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Breakout
    }

    fn compute(&self, ind: &IndicatorSnapshot) -> StrategySignal {
        let w = &self.weights;
        let mut signal = StrategySignal::default();

        if ind.close > ind.bb_upper && ind.volume_ratio > VOLUME_RATIO_MIN {
            signal.add_long(w.band_break_with_volume, "Bullish breakout with volume");
        }
        if ind.rsi > 50.0 && ind.rsi < 80.0 {
            signal.add_long(w.rsi_momentum, format!("Positive momentum (RSI {:.1})", ind.rsi));
        }

        if ind.close < ind.bb_lower && ind.volume_ratio > VOLUME_RATIO_MIN {
            signal.add_short(w.band_break_with_volume, "Bearish breakout with volume");
        }
        if ind.rsi < 50.0 && ind.rsi > 20.0 {
            signal.add_short(w.rsi_momentum, format!("Negative momentum (RSI {:.1})", ind.rsi));
        }

        signal
    }
}
