use crate::models::regime::Regime;
use crate::models::strategy::StrategyKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "LONG" => Some(Direction::Long),
            "SHORT" => Some(Direction::Short),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stop and target placement for one direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPlan {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub stop_pct: f64,
    pub target_pct: f64,
    pub risk_reward: f64,
    pub target_source: TargetSource,
    pub stop_source: StopSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSource {
    Liquidity,
    OrderBlock,
    Gap,
    AtrFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopSource {
    Liquidity,
    OrderBlock,
    AtrFallback,
}

/// A signal that passed the score and risk:reward filters but not yet the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub strategy: StrategyKind,
    pub regime: Regime,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward: f64,
    pub score: f64,
    pub atr: f64,
    pub reasons: Vec<String>,
    pub targets: TargetPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStatus {
    Open,
    TpHit,
    SlHit,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Open => "OPEN",
            SignalStatus::TpHit => "TP_HIT",
            SignalStatus::SlHit => "SL_HIT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OPEN" => Some(SignalStatus::Open),
            "TP_HIT" => Some(SignalStatus::TpHit),
            "SL_HIT" => Some(SignalStatus::SlHit),
            _ => None,
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted signal. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub direction: Direction,
    pub regime: String,
    pub strategy: String,
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
    pub size: f64,
    pub status: SignalStatus,
    pub exit_price: Option<f64>,
    pub exit_time: Option<DateTime<Utc>>,
    pub pnl_percent: Option<f64>,
    pub pnl_usdt: Option<f64>,
    pub score: f64,
    pub atr: f64,
    pub reasons: Vec<String>,
    pub timeframe: String,
}

impl SignalRecord {
    pub fn open(candidate: &CandidateSignal, size: f64, timeframe: &str) -> Self {
        Self {
            id: None,
            timestamp: candidate.timestamp,
            symbol: candidate.symbol.clone(),
            direction: candidate.direction,
            regime: candidate.regime.to_string(),
            strategy: candidate.strategy.name().to_string(),
            entry: candidate.entry_price,
            stop: candidate.stop_loss,
            target: candidate.take_profit,
            size,
            status: SignalStatus::Open,
            exit_price: None,
            exit_time: None,
            pnl_percent: None,
            pnl_usdt: None,
            score: candidate.score,
            atr: candidate.atr,
            reasons: candidate.reasons.clone(),
            timeframe: timeframe.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == SignalStatus::Open
    }

    pub fn apply_exit(&mut self, exit: &SignalExit) {
        self.status = exit.status;
        self.exit_price = Some(exit.exit_price);
        self.exit_time = Some(exit.exit_time);
        self.pnl_percent = Some(exit.pnl_percent);
        self.pnl_usdt = Some(exit.pnl_usdt);
    }

    /// Signed PnL percent for a hypothetical exit at `price`
    pub fn pnl_percent_at(&self, price: f64) -> f64 {
        if self.entry == 0.0 {
            return 0.0;
        }
        match self.direction {
            Direction::Long => (price - self.entry) / self.entry * 100.0,
            Direction::Short => (self.entry - price) / self.entry * 100.0,
        }
    }
}

/// Exit fields written back when a signal closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalExit {
    pub status: SignalStatus,
    pub exit_price: f64,
    pub exit_time: DateTime<Utc>,
    pub pnl_percent: f64,
    pub pnl_usdt: f64,
}
