//! Strategy generators that turn an indicator snapshot into long/short bias.
//!
//! Each generator awards points from a named weight table; the regime decides
//! which generator runs (see [`selector`]).

pub mod breakout;
pub mod mean_reversion;
pub mod momentum;
pub mod selector;
pub mod weights;

pub use breakout::BreakoutStrategy;
pub use mean_reversion::MeanReversionStrategy;
pub use momentum::MomentumStrategy;
pub use selector::{StrategySelection, StrategySet};
pub use weights::{BreakoutWeights, MeanReversionWeights, MomentumWeights, StrategyWeights};

use crate::models::indicators::IndicatorSnapshot;
use crate::models::strategy::{StrategyKind, StrategySignal};

/// A pure scoring function over the indicator snapshot
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn compute(&self, indicators: &IndicatorSnapshot) -> StrategySignal;
}
