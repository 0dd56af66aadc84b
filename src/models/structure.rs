//! Market structure levels produced by the analyzers in `crate::structure`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSide {
    Above,
    Below,
    At,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityZone {
    pub price: f64,
    pub side: ZoneSide,
    pub touch_count: usize,
    pub is_round_number: bool,
    pub tested: bool,
    pub strength: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidityMap {
    /// Closest first, at most five
    pub above: Vec<LiquidityZone>,
    /// Closest first, at most five
    pub below: Vec<LiquidityZone>,
    pub nearest: Option<LiquidityZone>,
    pub strongest: Option<LiquidityZone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    pub kind: BlockKind,
    pub index: usize,
    pub top: f64,
    pub bottom: f64,
    pub high: f64,
    pub low: f64,
    /// Move away from the block, in percent
    pub move_size: f64,
    pub test_count: usize,
    pub tested: bool,
    pub strength: f64,
    pub valid: bool,
}

impl OrderBlock {
    pub fn midpoint(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBlockMap {
    /// Valid blocks below price, closest first
    pub bullish: Vec<OrderBlock>,
    /// Valid blocks above price, closest first
    pub bearish: Vec<OrderBlock>,
    pub nearest: Option<OrderBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapKind {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapPattern {
    /// Three-candle imbalance
    FairValueGap,
    /// Two adjacent candles whose ranges do not overlap
    Classic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub kind: GapKind,
    pub pattern: GapPattern,
    pub index: usize,
    pub top: f64,
    pub bottom: f64,
    pub size: f64,
    pub size_percent: f64,
    /// Maximum fill seen over later candles, 0..=1
    pub filled: f64,
    pub strength: f64,
    pub valid: bool,
}

impl Gap {
    pub fn midpoint(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapMap {
    pub bullish: Vec<Gap>,
    pub bearish: Vec<Gap>,
    pub nearest: Option<Gap>,
}

impl GapMap {
    pub fn count(&self) -> usize {
        self.bullish.len() + self.bearish.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FibTrend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub trend: FibTrend,
    pub swing_high: f64,
    pub swing_low: f64,
    pub level_236: f64,
    pub level_382: f64,
    pub level_500: f64,
    pub level_618: f64,
    pub level_786: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FibProximity {
    SpotOn,
    Near,
    Far,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciAnalysis {
    pub levels: FibonacciLevels,
    pub nearest_ratio: f64,
    pub nearest_price: f64,
    pub distance_pct: f64,
    pub proximity: FibProximity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivergenceDirection {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Divergence {
    pub direction: DivergenceDirection,
    /// Absolute oscillator difference between the two pivots
    pub strength: f64,
    /// Candle indices of the earlier and the later pivot
    pub pivot_indices: [usize; 2],
}

/// Output of all structure analyzers for one window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    pub liquidity: LiquidityMap,
    pub order_blocks: OrderBlockMap,
    pub gaps: GapMap,
    pub fibonacci: Option<FibonacciAnalysis>,
    pub divergences: Vec<Divergence>,
}
