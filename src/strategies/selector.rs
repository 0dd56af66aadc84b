//! Regime-driven strategy selection

use crate::models::indicators::IndicatorSnapshot;
use crate::models::regime::Regime;
use crate::models::signal::Direction;
use crate::models::strategy::{StrategyKind, StrategySignal};
use crate::strategies::{
    BreakoutStrategy, MeanReversionStrategy, MomentumStrategy, Strategy, StrategyWeights,
};

/// Result of running the generator(s) a regime calls for
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySelection {
    /// Generator whose reasons are carried forward
    pub strategy: StrategyKind,
    pub signal: StrategySignal,
}

impl StrategySelection {
    /// Long when the long score leads and is positive, short symmetrically
    pub fn direction(&self) -> Option<Direction> {
        let (long, short) = (self.signal.long_score, self.signal.short_score);
        if long > short && long > 0.0 {
            Some(Direction::Long)
        } else if short > long && short > 0.0 {
            Some(Direction::Short)
        } else {
            None
        }
    }

    pub fn score_for(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Long => self.signal.long_score,
            Direction::Short => self.signal.short_score,
        }
    }
}

/// The three generators behind the common [`Strategy`] interface
#[derive(Debug, Clone, Default)]
pub struct StrategySet {
    momentum: MomentumStrategy,
    mean_reversion: MeanReversionStrategy,
    breakout: BreakoutStrategy,
}

impl StrategySet {
    pub fn new(weights: StrategyWeights) -> Self {
        Self {
            momentum: MomentumStrategy::new(weights.momentum),
            mean_reversion: MeanReversionStrategy::new(weights.mean_reversion),
            breakout: BreakoutStrategy::new(weights.breakout),
        }
    }

    pub fn get(&self, kind: StrategyKind) -> &dyn Strategy {
        match kind {
            StrategyKind::Momentum => &self.momentum,
            StrategyKind::MeanReversion => &self.mean_reversion,
            StrategyKind::Breakout => &self.breakout,
        }
    }

    /// Generator dedicated to a regime, if any
    pub fn for_regime(regime: &Regime) -> Option<StrategyKind> {
        match regime {
            Regime::Trending(_) => Some(StrategyKind::Momentum),
            Regime::Ranging => Some(StrategyKind::MeanReversion),
            Regime::Breakout(_) => Some(StrategyKind::Breakout),
            Regime::HighVolatility | Regime::Neutral => None,
        }
    }

    /// Run the generator for `regime`, or all three and keep the best per side
    pub fn select(&self, regime: &Regime, indicators: &IndicatorSnapshot) -> StrategySelection {
        if let Some(kind) = Self::for_regime(regime) {
            return StrategySelection {
                strategy: kind,
                signal: self.get(kind).compute(indicators),
            };
        }

        let results: Vec<(StrategyKind, StrategySignal)> = StrategyKind::ALL
            .iter()
            .map(|&kind| (kind, self.get(kind).compute(indicators)))
            .collect();

        // Ties go to the later generator in `StrategyKind::ALL`
        let best_by = |score: fn(&StrategySignal) -> f64| {
            results
                .iter()
                .fold(None::<&(StrategyKind, StrategySignal)>, |best, candidate| match best {
                    Some(b) if score(&b.1) > score(&candidate.1) => Some(b),
                    _ => Some(candidate),
                })
        };

        let (Some(best_long), Some(best_short)) =
            (best_by(|s| s.long_score), best_by(|s| s.short_score))
        else {
            return StrategySelection {
                strategy: StrategyKind::Momentum,
                signal: StrategySignal::default(),
            };
        };

        let long_score = best_long.1.long_score;
        let short_score = best_short.1.short_score;
        let winner = if short_score > long_score {
            best_short
        } else {
            best_long
        };

        StrategySelection {
            strategy: winner.0,
            signal: StrategySignal {
                long_score,
                short_score,
                reasons: winner.1.reasons.clone(),
            },
        }
    }
}
