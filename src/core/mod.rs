//! Evaluation runtime, outcome tracking, statistics and scheduling

pub mod bootstrap;
pub mod runtime;
pub mod scheduler;
pub mod stats;
pub mod tracker;

pub use runtime::{CycleReport, RuntimeConfig, SignalRuntime};
pub use scheduler::EvaluationScheduler;
pub use stats::PerformanceStats;
