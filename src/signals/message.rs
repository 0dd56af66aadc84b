//! Markdown notification bodies for new and closed signals

use crate::agent::AgentAction;
use crate::models::signal::{Direction, SignalRecord, SignalStatus};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const RULE: &str = "--------------------";

/// Two decimals for normal prices, more for sub-dollar assets
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.6}", price)
    }
}

/// Backslash-escape the characters Telegram's legacy Markdown treats as entity markers
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Announcement for a freshly opened signal
pub fn signal_message(record: &SignalRecord, action: AgentAction) -> String {
    let marker = match record.direction {
        Direction::Long => "🟢",
        Direction::Short => "🔴",
    };
    let stop_pct = (record.entry - record.stop).abs() / record.entry * 100.0;
    let target_pct = (record.target - record.entry).abs() / record.entry * 100.0;

    let mut message = String::new();
    let _ = writeln!(
        message,
        "{} **SIGNAL {} - {}**",
        marker,
        escape_markdown(&record.strategy),
        record.direction
    );
    let _ = writeln!(message, "{}", RULE);
    let _ = writeln!(message, "{} @ ${}", escape_markdown(&record.symbol), format_price(record.entry));
    let _ = writeln!(message, "Score: {:.0}/100", record.score);
    let _ = writeln!(message, "Regime: {}", escape_markdown(&record.regime));
    let _ = writeln!(message, "Agent: {}", escape_markdown(action.as_str()));
    let _ = writeln!(message);
    let _ = writeln!(message, "Entry: ${}", format_price(record.entry));
    let _ = writeln!(message, "SL: ${} (-{:.1}%)", format_price(record.stop), stop_pct);
    let _ = writeln!(message, "TP: ${} (+{:.1}%)", format_price(record.target), target_pct);
    let _ = writeln!(message, "Size: ${:.0} USDT", record.size);

    if !record.reasons.is_empty() {
        let _ = writeln!(message);
        let _ = writeln!(message, "Reasons:");
        for reason in &record.reasons {
            let _ = writeln!(message, "- {}", escape_markdown(reason));
        }
    }

    let _ = writeln!(message);
    message.push_str(&timestamp_line(record.timestamp));
    message
}

/// Result of a signal that hit its stop or target
pub fn closure_message(record: &SignalRecord) -> String {
    let marker = if record.status == SignalStatus::TpHit { "✅" } else { "❌" };
    let exit_time = record.exit_time.unwrap_or(record.timestamp);
    let minutes = (exit_time - record.timestamp).num_minutes().max(0);

    let mut message = String::new();
    let _ = writeln!(
        message,
        "{} **{} - {}**",
        marker,
        record.status.as_str().replace('_', " "),
        escape_markdown(&record.symbol)
    );
    let _ = writeln!(message, "{}", RULE);
    let _ = writeln!(message, "Strategy: {}", escape_markdown(&record.strategy));
    let _ = writeln!(message, "Entry: ${}", format_price(record.entry));
    if let Some(exit) = record.exit_price {
        let _ = writeln!(message, "Exit: ${}", format_price(exit));
    }
    let _ = writeln!(
        message,
        "PnL: {}% ({} USDT)",
        signed(record.pnl_percent.unwrap_or(0.0)),
        signed(record.pnl_usdt.unwrap_or(0.0))
    );
    let _ = writeln!(message, "Duration: {}h {}m", minutes / 60, minutes % 60);
    let _ = write!(message, "Score: {:.0}/100", record.score);
    message
}

pub(crate) fn timestamp_line(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M UTC").to_string()
}
