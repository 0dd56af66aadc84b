//! Candidate generation, scoring and notification formatting.

pub mod engine;
pub mod message;
pub mod scoring;
pub mod targets;

pub use engine::{EngineConfig, Evaluation, EvaluationOutcome, SignalEngine};
pub use scoring::{DeploymentProfile, Rejection, ScoringConfig};
pub use targets::TargetConfig;
