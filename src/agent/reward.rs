//! Rewards for closed and still-open positions

use crate::models::signal::SignalStatus;
use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub pnl_scale: f64,
    pub target_bonus: f64,
    pub stop_penalty: f64,
    /// Extra penalty when the stop is hit before `min_hold_minutes`
    pub quick_stop_penalty: f64,
    pub min_hold_minutes: i64,
    pub shaping_scale: f64,
    pub shaping_cap: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            pnl_scale: 1.0,
            target_bonus: 1.0,
            stop_penalty: 1.0,
            quick_stop_penalty: 0.5,
            min_hold_minutes: 30,
            shaping_scale: 0.05,
            shaping_cap: 0.1,
        }
    }
}

impl RewardConfig {
    /// Reward for a position that just closed with `status`
    pub fn terminal_reward(&self, status: SignalStatus, pnl_percent: f64, held: Duration) -> f64 {
        let mut reward = pnl_percent * self.pnl_scale;
        match status {
            SignalStatus::TpHit => reward += self.target_bonus,
            SignalStatus::SlHit => {
                reward -= self.stop_penalty;
                if held < Duration::minutes(self.min_hold_minutes) {
                    reward -= self.quick_stop_penalty;
                }
            }
            SignalStatus::Open => {}
        }
        reward
    }

    /// Small signal for a position that is still open
    pub fn shaping_reward(&self, floating_pnl_percent: f64) -> f64 {
        (floating_pnl_percent * self.shaping_scale).clamp(-self.shaping_cap, self.shaping_cap)
    }
}
