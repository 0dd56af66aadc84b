//! Stop / target checks for open signals

use crate::models::signal::{Direction, SignalExit, SignalRecord, SignalStatus};
use chrono::{DateTime, Utc};

/// Exit for `record` if `price` has touched its target or stop.
/// The exit is booked at the touched level, not at `price`.
pub fn check_exit(record: &SignalRecord, price: f64, now: DateTime<Utc>) -> Option<SignalExit> {
    if !record.is_open() || !price.is_finite() {
        return None;
    }

    let (status, exit_price) = match record.direction {
        Direction::Long if price >= record.target => (SignalStatus::TpHit, record.target),
        Direction::Long if price <= record.stop => (SignalStatus::SlHit, record.stop),
        Direction::Short if price <= record.target => (SignalStatus::TpHit, record.target),
        Direction::Short if price >= record.stop => (SignalStatus::SlHit, record.stop),
        _ => return None,
    };

    let pnl_percent = record.pnl_percent_at(exit_price);
    Some(SignalExit {
        status,
        exit_price,
        exit_time: now,
        pnl_percent,
        pnl_usdt: record.size * pnl_percent / 100.0,
    })
}
