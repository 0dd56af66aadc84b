//! Fixed 20-value feature vector fed to the decision agent.
//!
//! The order is part of the model format: a saved network only makes sense
//! against vectors built in exactly this layout.

use crate::models::indicators::IndicatorSnapshot;
use crate::models::regime::Regime;
use crate::models::signal::{CandidateSignal, Direction};
use crate::models::structure::StructureReport;
use serde::{Deserialize, Serialize};

pub const STATE_SIZE: usize = 20;

const MAX_VOLUME_RATIO: f64 = 5.0;
const MAX_GAP_COUNT: f64 = 5.0;
const MAX_RISK_REWARD: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionState {
    pub features: [f64; STATE_SIZE],
    /// Rule-based direction of the candidate this state describes
    pub candidate_direction: Direction,
}

impl DecisionState {
    /// Build the vector for one candidate
    pub fn from_candidate(
        snapshot: &IndicatorSnapshot,
        regime: &Regime,
        structure: &StructureReport,
        candidate: &CandidateSignal,
    ) -> Self {
        let close = snapshot.close;
        let above_ema = |ema: f64| if close > ema { 1.0 } else { 0.0 };
        let strength = |value: Option<f64>| value.map(|s| s / 100.0).unwrap_or(0.0);

        let raw = [
            snapshot.rsi / 100.0,
            snapshot.rsi_prev / 100.0,
            snapshot.macd_histogram / 100.0,
            snapshot.macd_histogram_prev / 100.0,
            snapshot.adx / 50.0,
            snapshot.plus_di / 50.0,
            snapshot.minus_di / 50.0,
            above_ema(snapshot.ema50),
            above_ema(snapshot.ema200),
            snapshot.bb_width,
            if close > 0.0 { snapshot.atr / close } else { 0.0 },
            snapshot.volume_ratio.min(MAX_VOLUME_RATIO),
            regime.feature_value(),
            strength(structure.liquidity.above.first().map(|z| z.strength)),
            strength(structure.liquidity.below.first().map(|z| z.strength)),
            strength(structure.order_blocks.bullish.first().map(|b| b.strength)),
            strength(structure.order_blocks.bearish.first().map(|b| b.strength)),
            (structure.gaps.count() as f64 / MAX_GAP_COUNT).min(1.0),
            candidate.score / 100.0,
            (candidate.risk_reward / MAX_RISK_REWARD).min(1.0),
        ];

        Self {
            features: raw.map(|v| if v.is_finite() { v } else { 0.0 }),
            candidate_direction: candidate.direction,
        }
    }

    pub fn from_features(features: [f64; STATE_SIZE], candidate_direction: Direction) -> Self {
        Self {
            features,
            candidate_direction,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.features
    }
}
