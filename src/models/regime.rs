use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
}

/// Market condition for one evaluation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "regime", content = "direction", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    Trending(TrendDirection),
    Ranging,
    Breakout(TrendDirection),
    HighVolatility,
    Neutral,
}

impl Regime {
    pub fn name(&self) -> &'static str {
        match self {
            Regime::Trending(_) => "TRENDING",
            Regime::Ranging => "RANGING",
            Regime::Breakout(_) => "BREAKOUT",
            Regime::HighVolatility => "HIGH_VOLATILITY",
            Regime::Neutral => "NEUTRAL",
        }
    }

    pub fn direction(&self) -> Option<TrendDirection> {
        match self {
            Regime::Trending(d) | Regime::Breakout(d) => Some(*d),
            _ => None,
        }
    }

    /// Encoding used in the decision vector
    pub fn feature_value(&self) -> f64 {
        match self {
            Regime::Trending(_) => 1.0,
            Regime::Breakout(_) => 0.8,
            Regime::Ranging => 0.5,
            Regime::HighVolatility | Regime::Neutral => 0.0,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction() {
            Some(TrendDirection::Up) => write!(f, "{}_UP", self.name()),
            Some(TrendDirection::Down) => write!(f, "{}_DOWN", self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}
