//! Unit tests for pending decision bookkeeping

use confluence::agent::{AgentAction, DecisionContexts, DecisionState, PendingDecision};
use confluence::models::signal::Direction;

use crate::test_utils::*;

fn pending(action: AgentAction, signal_id: i64) -> PendingDecision {
    PendingDecision {
        state: DecisionState::from_features([0.0; 20], Direction::Long),
        action,
        signal_id: Some(signal_id),
        opened_at: base_time(),
    }
}

#[test]
fn test_record_replaces_per_symbol() {
    let mut contexts = DecisionContexts::new();
    contexts.record("BTCUSDT", pending(AgentAction::ConfirmLong, 1));
    contexts.record("BTCUSDT", pending(AgentAction::ConfirmShort, 2));
    contexts.record("ETHUSDT", pending(AgentAction::ConfirmLong, 3));

    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts.get("BTCUSDT").unwrap().signal_id, Some(2));
}

#[test]
fn test_take_removes() {
    let mut contexts = DecisionContexts::new();
    contexts.record("BTCUSDT", pending(AgentAction::ConfirmLong, 1));

    let taken = contexts.take("BTCUSDT").unwrap();
    assert_eq!(taken.action, AgentAction::ConfirmLong);
    assert!(contexts.take("BTCUSDT").is_none());
    assert!(contexts.is_empty());
}
