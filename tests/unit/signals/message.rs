//! Unit tests for notification formatting

use chrono::Duration;
use confluence::agent::AgentAction;
use confluence::models::signal::{Direction, SignalRecord, SignalStatus};
use confluence::signals::message::{closure_message, format_price, signal_message};

use crate::test_utils::*;

fn record() -> SignalRecord {
    SignalRecord {
        id: Some(7),
        timestamp: base_time(),
        symbol: "BTCUSDT".to_string(),
        direction: Direction::Long,
        regime: "TRENDING_UP".to_string(),
        strategy: "MOMENTUM".to_string(),
        entry: 100.0,
        stop: 98.5,
        target: 103.0,
        size: 1000.0,
        status: SignalStatus::Open,
        exit_price: None,
        exit_time: None,
        pnl_percent: None,
        pnl_usdt: None,
        score: 82.0,
        atr: 1.0,
        reasons: vec!["EMA alignment bullish".to_string()],
        timeframe: "15m".to_string(),
    }
}

#[test]
fn test_format_price() {
    assert_eq!(format_price(43250.5), "43250.50");
    assert_eq!(format_price(0.123456789), "0.123457");
}

#[test]
fn test_signal_message() {
    let message = signal_message(&record(), AgentAction::ConfirmLong);

    assert!(message.starts_with("🟢"));
    assert!(message.contains("BTCUSDT @ $100.00"));
    assert!(message.contains("Score: 82/100"));
    assert!(message.contains("Agent: CONFIRM\\_LONG"));
    assert!(message.contains("SL: $98.50 (-1.5%)"));
    assert!(message.contains("TP: $103.00 (+3.0%)"));
    assert!(message.contains("- EMA alignment bullish"));
    assert!(message.ends_with("2024-01-01 00:00 UTC"));
}

#[test]
fn test_closure_message() {
    let mut record = record();
    record.status = SignalStatus::SlHit;
    record.exit_price = Some(98.5);
    record.exit_time = Some(base_time() + Duration::minutes(95));
    record.pnl_percent = Some(-1.5);
    record.pnl_usdt = Some(-15.0);

    let message = closure_message(&record);

    assert!(message.starts_with("❌ **SL HIT - BTCUSDT**"));
    assert!(message.contains("Exit: $98.50"));
    assert!(message.contains("PnL: -1.50% (-15.00 USDT)"));
    assert!(message.contains("Duration: 1h 35m"));
}

fn unescaped_underscores(text: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in text.chars() {
        if c == '_' && !escaped {
            count += 1;
        }
        escaped = c == '\\' && !escaped;
    }
    count
}

#[test]
fn test_ranging_confirm_message_has_balanced_markdown() {
    let mut record = record();
    record.regime = "RANGING".to_string();
    record.strategy = "Mean Reversion".to_string();
    record.reasons = vec!["Price at lower_band [BB]".to_string()];

    let message = signal_message(&record, AgentAction::ConfirmLong);

    assert!(message.contains("Regime: RANGING"));
    assert!(message.contains("- Price at lower\\_band \\[BB]"));
    assert_eq!(unescaped_underscores(&message), 0);
}

#[test]
fn test_closure_message_escapes_fields() {
    let mut record = record();
    record.status = SignalStatus::TpHit;
    record.symbol = "1000_PEPEUSDT".to_string();
    record.exit_price = Some(103.0);
    record.exit_time = Some(base_time() + Duration::minutes(30));

    let message = closure_message(&record);

    assert!(message.starts_with("✅ **TP HIT - 1000\\_PEPEUSDT**"));
    assert_eq!(unescaped_underscores(&message), 0);
}
