//! Unit tests for the replay buffer

use confluence::agent::replay::ReplayBuffer;
use confluence::agent::{AgentAction, DecisionState, Experience};
use confluence::models::signal::Direction;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn experience(reward: f64) -> Experience {
    let state = DecisionState::from_features([0.1; 20], Direction::Long);
    Experience {
        next_state: state.clone(),
        state,
        action: AgentAction::ConfirmLong,
        reward,
        terminal: true,
    }
}

#[test]
fn test_evicts_oldest_when_full() {
    let mut buffer = ReplayBuffer::new(3);
    for reward in [1.0, 2.0, 3.0, 4.0] {
        buffer.push(experience(reward));
    }

    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.capacity(), 3);
    let rewards: Vec<f64> = buffer.iter().map(|e| e.reward).collect();
    assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_sample_waits_for_full_batch() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut buffer = ReplayBuffer::new(10);
    buffer.push(experience(1.0));

    assert!(buffer.sample(&mut rng, 2).is_empty());
    assert!(buffer.sample(&mut rng, 0).is_empty());
}

#[test]
fn test_sample_without_replacement() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut buffer = ReplayBuffer::new(10);
    for i in 0..10 {
        buffer.push(experience(i as f64));
    }

    let batch = buffer.sample(&mut rng, 5);
    assert_eq!(batch.len(), 5);
    let distinct: HashSet<u64> = batch.iter().map(|e| e.reward.to_bits()).collect();
    assert_eq!(distinct.len(), 5);
}

#[test]
fn test_zero_capacity_holds_one() {
    let mut buffer = ReplayBuffer::new(0);
    buffer.push(experience(1.0));
    buffer.push(experience(2.0));
    assert_eq!(buffer.len(), 1);
    assert!(!buffer.is_empty());
}
