//! Performance statistics over stored signals

use crate::models::signal::{Direction, SignalRecord, SignalStatus};
use crate::signals::message::{escape_markdown, timestamp_line};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Profit factor reported when there are wins but no losses
pub const UNBOUNDED_PROFIT_FACTOR: f64 = 999.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    pub symbol: String,
    pub direction: Direction,
    pub pnl_percent: f64,
    pub pnl_usdt: f64,
}

impl TradeSummary {
    fn from_record(record: &SignalRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            direction: record.direction,
            pnl_percent: record.pnl_percent.unwrap_or(0.0),
            pnl_usdt: record.pnl_usdt.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceStats {
    pub total_signals: usize,
    pub open_signals: usize,
    pub closed_signals: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percent of closed signals that hit their target
    pub win_rate: f64,
    pub total_pnl_percent: f64,
    pub total_pnl_usdt: f64,
    pub avg_win_usdt: f64,
    /// Positive magnitude
    pub avg_loss_usdt: f64,
    pub profit_factor: f64,
    pub best_trade: Option<TradeSummary>,
    pub worst_trade: Option<TradeSummary>,
}

fn usdt(record: &SignalRecord) -> f64 {
    record.pnl_usdt.unwrap_or(0.0)
}

impl PerformanceStats {
    pub fn from_records(records: &[SignalRecord]) -> Self {
        let closed: Vec<&SignalRecord> = records.iter().filter(|r| !r.is_open()).collect();
        let mut stats = Self {
            total_signals: records.len(),
            open_signals: records.len() - closed.len(),
            closed_signals: closed.len(),
            ..Self::default()
        };
        if closed.is_empty() {
            return stats;
        }

        let winners: Vec<&&SignalRecord> = closed.iter().filter(|r| r.status == SignalStatus::TpHit).collect();
        let losers: Vec<&&SignalRecord> = closed.iter().filter(|r| r.status == SignalStatus::SlHit).collect();

        let gross_win: f64 = winners.iter().map(|r| usdt(r)).sum();
        let gross_loss: f64 = losers.iter().map(|r| usdt(r)).sum::<f64>().abs();

        stats.wins = winners.len();
        stats.losses = losers.len();
        stats.win_rate = winners.len() as f64 / closed.len() as f64 * 100.0;
        stats.total_pnl_percent = closed.iter().map(|r| r.pnl_percent.unwrap_or(0.0)).sum();
        stats.total_pnl_usdt = closed.iter().map(|r| usdt(r)).sum();
        stats.avg_win_usdt = if winners.is_empty() { 0.0 } else { gross_win / winners.len() as f64 };
        stats.avg_loss_usdt = if losers.is_empty() { 0.0 } else { gross_loss / losers.len() as f64 };
        stats.profit_factor = if gross_loss > 0.0 {
            gross_win / gross_loss
        } else if gross_win > 0.0 {
            UNBOUNDED_PROFIT_FACTOR
        } else {
            0.0
        };

        stats.best_trade = closed
            .iter()
            .max_by(|a, b| usdt(a).total_cmp(&usdt(b)))
            .map(|r| TradeSummary::from_record(r));
        stats.worst_trade = closed
            .iter()
            .min_by(|a, b| usdt(a).total_cmp(&usdt(b)))
            .map(|r| TradeSummary::from_record(r));

        stats
    }

    /// Daily summary notification; `None` when nothing has closed yet
    pub fn summary_message(&self, now: DateTime<Utc>) -> Option<String> {
        if self.closed_signals == 0 {
            return None;
        }

        let mut message = String::new();
        let _ = writeln!(message, "📊 **DAILY SUMMARY - {}**", now.format("%Y-%m-%d"));
        let _ = writeln!(message, "--------------------");
        let _ = writeln!(message, "Closed: {}", self.closed_signals);
        let _ = writeln!(message, "Wins: {} ({:.1}%)", self.wins, self.win_rate);
        let _ = writeln!(message, "Losses: {}", self.losses);
        let _ = writeln!(message, "Total PnL: {:+.2} USDT ({:+.2}%)", self.total_pnl_usdt, self.total_pnl_percent);
        let _ = writeln!(message, "Profit factor: {:.2}", self.profit_factor);
        if let Some(best) = &self.best_trade {
            let _ = writeln!(message, "Best: {} {} {:+.2}%", escape_markdown(&best.symbol), best.direction, best.pnl_percent);
        }
        if let Some(worst) = &self.worst_trade {
            let _ = writeln!(message, "Worst: {} {} {:+.2}%", escape_markdown(&worst.symbol), worst.direction, worst.pnl_percent);
        }
        let _ = writeln!(message, "Open: {}", self.open_signals);
        let _ = writeln!(message);
        message.push_str(&timestamp_line(now));
        Some(message)
    }
}
