//! Technical indicators computed over a candle window.
//!
//! Every calculator returns [`AlignedSeries`] values so callers can look up the
//! latest and previous readings without caring about warm-up lengths.

pub mod engine;
pub mod series;

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use engine::{calculate_snapshot, MIN_CANDLES};
pub use series::AlignedSeries;

use crate::models::indicators::Candle;

pub(crate) fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
