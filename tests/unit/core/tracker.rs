//! Unit tests for stop / target checks

use chrono::Duration;
use confluence::core::tracker::check_exit;
use confluence::models::signal::{Direction, SignalRecord, SignalStatus};

use crate::test_utils::*;

fn open_record(direction: Direction) -> SignalRecord {
    let mut candidate = sample_candidate("BTCUSDT");
    if direction == Direction::Short {
        candidate.direction = Direction::Short;
        candidate.stop_loss = 101.5;
        candidate.take_profit = 97.0;
    }
    let mut record = SignalRecord::open(&candidate, 1000.0, "15m");
    record.id = Some(1);
    record
}

#[test]
fn test_long_target_hit_books_target_price() {
    let record = open_record(Direction::Long);
    let now = base_time() + Duration::hours(1);
    let exit = check_exit(&record, 104.0, now).unwrap();

    assert_eq!(exit.status, SignalStatus::TpHit);
    assert_eq!(exit.exit_price, 103.0);
    assert_eq!(exit.exit_time, now);
    assert!((exit.pnl_percent - 3.0).abs() < 1e-9);
    assert!((exit.pnl_usdt - 30.0).abs() < 1e-9);
}

#[test]
fn test_long_stop_hit() {
    let exit = check_exit(&open_record(Direction::Long), 98.5, base_time()).unwrap();
    assert_eq!(exit.status, SignalStatus::SlHit);
    assert!((exit.pnl_percent + 1.5).abs() < 1e-9);
    assert!((exit.pnl_usdt + 15.0).abs() < 1e-9);
}

#[test]
fn test_short_exits() {
    let record = open_record(Direction::Short);
    assert_eq!(
        check_exit(&record, 96.0, base_time()).map(|e| e.status),
        Some(SignalStatus::TpHit)
    );
    assert_eq!(
        check_exit(&record, 102.0, base_time()).map(|e| e.status),
        Some(SignalStatus::SlHit)
    );
}

#[test]
fn test_price_inside_bracket_stays_open() {
    let record = open_record(Direction::Long);
    assert!(check_exit(&record, 100.5, base_time()).is_none());
    assert!(check_exit(&record, f64::NAN, base_time()).is_none());
}

#[test]
fn test_closed_record_is_ignored() {
    let mut record = open_record(Direction::Long);
    let exit = check_exit(&record, 104.0, base_time()).unwrap();
    record.apply_exit(&exit);

    assert!(!record.is_open());
    assert!(check_exit(&record, 90.0, base_time()).is_none());
}
