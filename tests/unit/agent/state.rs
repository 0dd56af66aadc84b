//! Unit tests for the decision feature vector

use confluence::agent::{DecisionState, STATE_SIZE};
use confluence::models::regime::Regime;
use confluence::models::signal::Direction;
use confluence::models::structure::StructureReport;

use crate::test_utils::*;

#[test]
fn test_feature_layout() {
    let candidate = sample_candidate("BTCUSDT");
    let state = DecisionState::from_candidate(
        &neutral_snapshot(),
        &Regime::Ranging,
        &StructureReport::default(),
        &candidate,
    );

    let f = state.as_slice();
    assert_eq!(f.len(), STATE_SIZE);
    assert_eq!(f[0], 0.5);
    assert_eq!(f[4], 22.0 / 50.0);
    // Close equal to the EMA is not above it
    assert_eq!(f[7], 0.0);
    assert_eq!(f[10], 0.01);
    assert_eq!(f[11], 1.0);
    assert_eq!(f[12], 0.5);
    assert_eq!(f[13..18], [0.0; 5]);
    assert_eq!(f[18], 0.8);
    assert_eq!(f[19], 0.2);
    assert_eq!(state.candidate_direction, Direction::Long);
}

#[test]
fn test_caps_and_non_finite_values() {
    let mut snapshot = bullish_trend_snapshot();
    snapshot.rsi = f64::NAN;
    snapshot.volume_ratio = 9.0;
    let mut candidate = sample_candidate("ETHUSDT");
    candidate.risk_reward = 25.0;

    let state = DecisionState::from_candidate(
        &snapshot,
        &Regime::Neutral,
        &StructureReport::default(),
        &candidate,
    );

    assert_eq!(state.features[0], 0.0);
    assert_eq!(state.features[7], 1.0);
    assert_eq!(state.features[11], 5.0);
    assert_eq!(state.features[19], 1.0);
    assert!(state.features.iter().all(|v| v.is_finite()));
}
