//! Mean-reversion strategy for ranging markets

use crate::models::indicators::IndicatorSnapshot;
use crate::models::strategy::{StrategyKind, StrategySignal};
use crate::strategies::{MeanReversionWeights, Strategy};

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;

#[derive(Debug, Clone, Default)]
pub struct MeanReversionStrategy {
    pub weights: MeanReversionWeights,
}

impl MeanReversionStrategy {
    pub fn new(weights: MeanReversionWeights) -> Self {
        Self { weights }
    }
}

impl Strategy for MeanReversionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MeanReversion
    }

    fn compute(&self, ind: &IndicatorSnapshot) -> StrategySignal {
        let w = &self.weights;
        let mut signal = StrategySignal::default();

        // Oversold bounce
        if ind.close <= ind.bb_lower {
            signal.add_long(w.band_touch, "Price at lower BB");
        }
        if ind.rsi < RSI_OVERSOLD {
            signal.add_long(w.rsi_extreme, format!("RSI oversold ({:.1})", ind.rsi));
        }
        if ind.stoch_rsi_k < STOCH_OVERSOLD && ind.stoch_rsi_k > ind.stoch_rsi_k_prev {
            signal.add_long(w.stoch_rsi_cross, "Stoch RSI bullish cross");
        }

        // Overbought rejection
        if ind.close >= ind.bb_upper {
            signal.add_short(w.band_touch, "Price at upper BB");
        }
        if ind.rsi > RSI_OVERBOUGHT {
            signal.add_short(w.rsi_extreme, format!("RSI overbought ({:.1})", ind.rsi));
        }
        if ind.stoch_rsi_k > STOCH_OVERBOUGHT && ind.stoch_rsi_k < ind.stoch_rsi_k_prev {
            signal.add_short(w.stoch_rsi_cross, "Stoch RSI bearish cross");
        }

        signal
    }
}
