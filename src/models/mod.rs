pub mod indicators;
pub mod regime;
pub mod signal;
pub mod strategy;
pub mod structure;
