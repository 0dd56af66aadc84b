//! Deep Q-network decision policy with epsilon-greedy exploration.

use super::network::{QNetwork, TrainingSample};
use super::replay::ReplayBuffer;
use super::{AgentAction, DecisionPolicy, DecisionState, Experience, STATE_SIZE};
use crate::error::AgentError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    pub hidden_layers: Vec<usize>,
    pub learning_rate: f64,
    pub gamma: f64,
    pub epsilon_start: f64,
    pub epsilon_min: f64,
    pub epsilon_decay: f64,
    pub memory_capacity: usize,
    pub batch_size: usize,
    /// Fixed seed for reproducible exploration and initialisation
    pub seed: Option<u64>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![128, 128, 64],
            learning_rate: 0.001,
            gamma: 0.95,
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            memory_capacity: 2000,
            batch_size: 32,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Checkpoint {
    network: QNetwork,
    epsilon: f64,
    train_steps: u64,
}

pub struct DqnAgent {
    config: DqnConfig,
    network: QNetwork,
    memory: ReplayBuffer,
    epsilon: f64,
    train_steps: u64,
    rng: StdRng,
}

impl DqnAgent {
    pub fn new(config: DqnConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut sizes = Vec::with_capacity(config.hidden_layers.len() + 2);
        sizes.push(STATE_SIZE);
        sizes.extend(config.hidden_layers.iter().copied());
        sizes.push(AgentAction::COUNT);

        let network = QNetwork::new(&sizes, config.learning_rate, &mut rng);

        Self {
            memory: ReplayBuffer::new(config.memory_capacity),
            epsilon: config.epsilon_start,
            train_steps: 0,
            network,
            rng,
            config,
        }
    }

    /// Restore weights and epsilon from `path`, or start fresh when the file does not exist
    pub fn load_or_new(path: &Path, config: DqnConfig) -> Result<Self, AgentError> {
        if !path.exists() {
            info!(path = %path.display(), "No saved model, starting a fresh agent");
            return Ok(Self::new(config));
        }

        let raw = std::fs::read_to_string(path).map_err(|source| AgentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let checkpoint: Checkpoint = serde_json::from_str(&raw)?;

        if checkpoint.network.input_size() != STATE_SIZE
            || checkpoint.network.output_size() != AgentAction::COUNT
        {
            return Err(AgentError::Shape {
                expected: STATE_SIZE,
                found: format!(
                    "{} inputs and {} outputs",
                    checkpoint.network.input_size(),
                    checkpoint.network.output_size()
                ),
            });
        }

        checkpoint
            .network
            .validate()
            .map_err(|found| AgentError::Shape {
                expected: STATE_SIZE,
                found,
            })?;
        if !(0.0..=1.0).contains(&checkpoint.epsilon) {
            return Err(AgentError::Shape {
                expected: STATE_SIZE,
                found: format!("epsilon {}", checkpoint.epsilon),
            });
        }

        let mut agent = Self::new(config);
        agent.network = checkpoint.network;
        agent.epsilon = checkpoint.epsilon;
        agent.train_steps = checkpoint.train_steps;
        info!(
            path = %path.display(),
            epsilon = agent.epsilon,
            train_steps = agent.train_steps,
            "Loaded decision model"
        );
        Ok(agent)
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn train_steps(&self) -> u64 {
        self.train_steps
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn q_values(&self, state: &DecisionState) -> Vec<f64> {
        self.network.predict(state.as_slice())
    }

    /// Probability of each action under the current epsilon-greedy policy,
    /// indexed by [`AgentAction::index`]
    pub fn action_probabilities(&self, state: &DecisionState) -> [f64; 3] {
        let explore = self.epsilon / AgentAction::COUNT as f64;
        let mut probabilities = [explore; 3];
        probabilities[self.greedy_action(state).index()] += 1.0 - self.epsilon;
        probabilities
    }

    fn greedy_action(&self, state: &DecisionState) -> AgentAction {
        let q = self.q_values(state);
        let best = q
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, v)| if *v > best.1 { (i, *v) } else { best })
            .0;
        AgentAction::from_index(best).unwrap_or(AgentAction::Hold)
    }

    pub fn remember(&mut self, experience: Experience) {
        self.memory.push(experience);
    }

    /// One training step on a uniform batch; `None` until the buffer holds a full batch
    pub fn replay(&mut self) -> Option<f64> {
        let batch = self.memory.sample(&mut self.rng, self.config.batch_size);
        if batch.is_empty() {
            return None;
        }

        let targets: Vec<f64> = batch
            .iter()
            .map(|exp| {
                if exp.terminal {
                    exp.reward
                } else {
                    let next = self.network.predict(exp.next_state.as_slice());
                    let best = next.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    exp.reward + self.config.gamma * if best.is_finite() { best } else { 0.0 }
                }
            })
            .collect();

        let samples: Vec<TrainingSample<'_>> = batch
            .iter()
            .zip(&targets)
            .map(|(exp, target)| TrainingSample {
                input: exp.state.as_slice(),
                output: exp.action.index(),
                target: *target,
            })
            .collect();

        let loss = self.network.train(&samples);
        self.train_steps += 1;
        if self.epsilon > self.config.epsilon_min {
            self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);
        }

        debug!(loss, epsilon = self.epsilon, step = self.train_steps, "Replay step");
        Some(loss)
    }
}

impl DecisionPolicy for DqnAgent {
    fn name(&self) -> &'static str {
        "dqn"
    }

    fn act(&mut self, state: &DecisionState) -> AgentAction {
        if self.rng.random::<f64>() < self.epsilon {
            let index = self.rng.random_range(0..AgentAction::COUNT);
            return AgentAction::from_index(index).unwrap_or(AgentAction::Hold);
        }
        self.greedy_action(state)
    }

    fn learn(&mut self, experience: Experience) {
        self.remember(experience);
        self.replay();
    }

    fn save(&self, path: &Path) -> Result<(), AgentError> {
        let checkpoint = Checkpoint {
            network: self.network.clone(),
            epsilon: self.epsilon,
            train_steps: self.train_steps,
        };
        let json = serde_json::to_string(&checkpoint)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| AgentError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(path, json).map_err(|source| AgentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), train_steps = self.train_steps, "Saved decision model");
        Ok(())
    }
}
