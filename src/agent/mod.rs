//! Learned gate between the rule-based candidate and an emitted signal.
//!
//! The pipeline only sees [`DecisionPolicy`]; the DQN is one implementation and
//! [`PassThroughPolicy`] keeps runs deterministic.

pub mod context;
pub mod dqn;
pub mod network;
pub mod replay;
pub mod reward;
pub mod state;

pub use context::{DecisionContexts, PendingDecision};
pub use dqn::{DqnAgent, DqnConfig};
pub use reward::RewardConfig;
pub use state::{DecisionState, STATE_SIZE};

use crate::error::AgentError;
use crate::models::signal::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentAction {
    Hold,
    ConfirmLong,
    ConfirmShort,
}

impl AgentAction {
    pub const COUNT: usize = 3;
    pub const ALL: [AgentAction; 3] = [
        AgentAction::Hold,
        AgentAction::ConfirmLong,
        AgentAction::ConfirmShort,
    ];

    pub fn index(&self) -> usize {
        match self {
            AgentAction::Hold => 0,
            AgentAction::ConfirmLong => 1,
            AgentAction::ConfirmShort => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn confirm(direction: Direction) -> Self {
        match direction {
            Direction::Long => AgentAction::ConfirmLong,
            Direction::Short => AgentAction::ConfirmShort,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            AgentAction::Hold => None,
            AgentAction::ConfirmLong => Some(Direction::Long),
            AgentAction::ConfirmShort => Some(Direction::Short),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentAction::Hold => "HOLD",
            AgentAction::ConfirmLong => "CONFIRM_LONG",
            AgentAction::ConfirmShort => "CONFIRM_SHORT",
        }
    }
}

impl fmt::Display for AgentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transition kept in the replay buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub state: DecisionState,
    pub action: AgentAction,
    pub reward: f64,
    pub next_state: DecisionState,
    pub terminal: bool,
}

/// Pluggable decision layer
pub trait DecisionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Choose an action for a candidate described by `state`
    fn act(&mut self, state: &DecisionState) -> AgentAction;

    /// Record an outcome and run one learning step
    fn learn(&mut self, experience: Experience);

    /// Persist learned parameters, if the policy has any
    fn save(&self, _path: &Path) -> Result<(), AgentError> {
        Ok(())
    }
}

/// Confirms every candidate in its rule-based direction and never learns
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughPolicy;

impl DecisionPolicy for PassThroughPolicy {
    fn name(&self) -> &'static str {
        "pass-through"
    }

    fn act(&mut self, state: &DecisionState) -> AgentAction {
        AgentAction::confirm(state.candidate_direction)
    }

    fn learn(&mut self, _experience: Experience) {}
}

/// DQN when enabled (restored from `model_path` if present), pass-through otherwise
pub fn build_policy(
    enabled: bool,
    config: DqnConfig,
    model_path: Option<&Path>,
) -> Result<Box<dyn DecisionPolicy>, AgentError> {
    if !enabled {
        return Ok(Box::new(PassThroughPolicy));
    }
    let agent = match model_path {
        Some(path) => DqnAgent::load_or_new(path, config)?,
        None => DqnAgent::new(config),
    };
    Ok(Box::new(agent))
}
