use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Momentum,
    MeanReversion,
    Breakout,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Momentum,
        StrategyKind::MeanReversion,
        StrategyKind::Breakout,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Momentum => "Momentum",
            StrategyKind::MeanReversion => "Mean Reversion",
            StrategyKind::Breakout => "Breakout",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Long/short bias produced by one strategy generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategySignal {
    pub long_score: f64,
    pub short_score: f64,
    pub reasons: Vec<String>,
}

impl StrategySignal {
    pub fn add_long(&mut self, points: f64, reason: impl Into<String>) {
        self.long_score += points.max(0.0);
        self.reasons.push(reason.into());
    }

    pub fn add_short(&mut self, points: f64, reason: impl Into<String>) {
        self.short_score += points.max(0.0);
        self.reasons.push(reason.into());
    }
}
