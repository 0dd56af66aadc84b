//! Candidate scoring and the score / risk:reward filter

use crate::models::regime::{Regime, TrendDirection};
use crate::models::signal::Direction;
use crate::models::structure::{DivergenceDirection, FibProximity, FibTrend, StructureReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold presets per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentProfile {
    Standard,
    Conservative,
}

impl DeploymentProfile {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "conservative" => Some(Self::Conservative),
            _ => None,
        }
    }

    /// (minimum score, minimum risk:reward)
    pub fn thresholds(&self) -> (f64, f64) {
        match self {
            Self::Standard => (60.0, 1.3),
            Self::Conservative => (75.0, 1.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub min_score: f64,
    pub min_risk_reward: f64,
    pub regime_bonus: f64,
    pub orderbook_bonus: f64,
    /// Imbalance percent required for the order-book bonus
    pub orderbook_threshold: f64,
    pub order_block_bonus: f64,
    pub liquidity_bonus: f64,
    pub gap_bonus: f64,
    pub fibonacci_bonus: f64,
    pub divergence_bonus: f64,
    /// Structure strength needed before a level earns a bonus
    pub strong_structure: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::for_profile(DeploymentProfile::Standard)
    }
}

impl ScoringConfig {
    pub fn for_profile(profile: DeploymentProfile) -> Self {
        let (min_score, min_risk_reward) = profile.thresholds();
        Self {
            min_score,
            min_risk_reward,
            regime_bonus: 10.0,
            orderbook_bonus: 10.0,
            orderbook_threshold: 10.0,
            order_block_bonus: 15.0,
            liquidity_bonus: 10.0,
            gap_bonus: 10.0,
            fibonacci_bonus: 10.0,
            divergence_bonus: 10.0,
            strong_structure: 50.0,
        }
    }
}

/// Why a candidate did not become a signal. Not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rejection {
    NoDirection,
    ScoreBelowMinimum { score: f64, min: f64 },
    RiskRewardBelowMinimum { risk_reward: f64, min: f64 },
}

impl Rejection {
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::NoDirection => "no_direction",
            Rejection::ScoreBelowMinimum { .. } => "score",
            Rejection::RiskRewardBelowMinimum { .. } => "risk_reward",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoDirection => write!(f, "no directional bias"),
            Rejection::ScoreBelowMinimum { score, min } => {
                write!(f, "score too low: {:.0} < {:.0}", score, min)
            }
            Rejection::RiskRewardBelowMinimum { risk_reward, min } => {
                write!(f, "risk:reward too low: 1:{:.2} < 1:{:.2}", risk_reward, min)
            }
        }
    }
}

/// Base strategy score plus every bonus that applied
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub bonuses: Vec<(String, f64)>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.base + self.bonuses.iter().map(|(_, points)| points).sum::<f64>()
    }

    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.bonuses.iter().map(|(reason, _)| reason.as_str())
    }

    fn add(&mut self, points: f64, reason: String) {
        if points > 0.0 {
            self.bonuses.push((reason, points));
        }
    }
}

/// Add regime, order-book and structure bonuses to the strategy score
pub fn score_candidate(
    direction: Direction,
    base: f64,
    regime: &Regime,
    structure: &StructureReport,
    orderbook_imbalance: Option<f64>,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown {
        base,
        bonuses: Vec::new(),
    };

    if let Some(imbalance) = orderbook_imbalance {
        let favourable = match direction {
            Direction::Long => imbalance > config.orderbook_threshold,
            Direction::Short => imbalance < -config.orderbook_threshold,
        };
        if favourable {
            let side = if imbalance > 0.0 { "buyers" } else { "sellers" };
            breakdown.add(
                config.orderbook_bonus,
                format!("Orderbook {} ({:+.1}%)", side, imbalance),
            );
        }
    }

    let aligned_regime = matches!(
        (regime, direction),
        (Regime::Trending(TrendDirection::Up), Direction::Long)
            | (Regime::Trending(TrendDirection::Down), Direction::Short)
    );
    if aligned_regime {
        breakdown.add(config.regime_bonus, format!("Favorable regime ({})", regime));
    }

    if let Some(block) = &structure.order_blocks.nearest {
        if block.strength > config.strong_structure {
            breakdown.add(
                config.order_block_bonus,
                format!("Strong order block ({:.0})", block.strength),
            );
        }
    }

    if let Some(zone) = &structure.liquidity.nearest {
        if zone.strength > config.strong_structure {
            breakdown.add(config.liquidity_bonus, "Liquidity zone detected".to_string());
        }
    }

    if let Some(gap) = &structure.gaps.nearest {
        if gap.strength > config.strong_structure {
            breakdown.add(
                config.gap_bonus,
                format!("Fair value gap ({:.1}%)", gap.size_percent),
            );
        }
    }

    if let Some(fib) = &structure.fibonacci {
        let trend_agrees = matches!(
            (fib.levels.trend, direction),
            (FibTrend::Up, Direction::Long) | (FibTrend::Down, Direction::Short)
        );
        if trend_agrees && fib.proximity != FibProximity::Far {
            breakdown.add(
                config.fibonacci_bonus,
                format!("Fibonacci {:.3} confluence", fib.nearest_ratio),
            );
        }
    }

    let wanted = match direction {
        Direction::Long => DivergenceDirection::Bullish,
        Direction::Short => DivergenceDirection::Bearish,
    };
    if let Some(divergence) = structure.divergences.iter().find(|d| d.direction == wanted) {
        breakdown.add(
            config.divergence_bonus,
            format!("RSI divergence ({:.1})", divergence.strength),
        );
    }

    breakdown
}

/// Apply the minimum score, then the minimum risk:reward
pub fn check_thresholds(score: f64, risk_reward: f64, config: &ScoringConfig) -> Result<(), Rejection> {
    if score < config.min_score {
        return Err(Rejection::ScoreBelowMinimum {
            score,
            min: config.min_score,
        });
    }
    if risk_reward < config.min_risk_reward {
        return Err(Rejection::RiskRewardBelowMinimum {
            risk_reward,
            min: config.min_risk_reward,
        });
    }
    Ok(())
}
