//! Per-symbol record of the decision behind each open position

use super::{AgentAction, DecisionState};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PendingDecision {
    pub state: DecisionState,
    pub action: AgentAction,
    pub signal_id: Option<i64>,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DecisionContexts {
    pending: HashMap<String, PendingDecision>,
}

impl DecisionContexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any earlier decision for the same symbol
    pub fn record(&mut self, symbol: &str, decision: PendingDecision) {
        self.pending.insert(symbol.to_string(), decision);
    }

    pub fn get(&self, symbol: &str) -> Option<&PendingDecision> {
        self.pending.get(symbol)
    }

    pub fn take(&mut self, symbol: &str) -> Option<PendingDecision> {
        self.pending.remove(symbol)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }
}
