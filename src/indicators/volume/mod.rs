//! Volume indicators: OBV, volume SMA

pub mod obv;
pub mod volume_sma;

pub use obv::*;
pub use volume_sma::*;
